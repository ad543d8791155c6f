//! HTTP client for the export endpoints

use roster_core::{PublicKey, RemoteVerifier, Verification};
use tracing::{debug, info, warn};

use crate::error::{ClientError, Result};

/// Path of the public key endpoint, relative to the base URL
pub const PUBLIC_KEY_PATH: &str = "/users/public-key";

/// Path of the export endpoint, relative to the base URL
pub const EXPORT_PATH: &str = "/users/export";

/// Fetches signed exports from a roster server and verifies them locally
#[derive(Debug, Clone)]
pub struct RosterClient {
    base_url: String,
    http_client: reqwest::Client,
    pinned_key: Option<PublicKey>,
}

impl RosterClient {
    /// Create a client for the server at `base_url`, e.g. `http://localhost:3000`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_http_client(base_url, reqwest::Client::new())
    }

    /// Create a client that reuses an existing `reqwest::Client`
    pub fn with_http_client(base_url: impl Into<String>, http_client: reqwest::Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            http_client,
            pinned_key: None,
        }
    }

    /// Verify against a key obtained out of band instead of fetching one
    ///
    /// A key fetched from the same server as the export only proves the
    /// export is consistent with that server. Pinning closes that gap.
    pub fn with_pinned_key(mut self, public_key: PublicKey) -> Self {
        self.pinned_key = Some(public_key);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get(&self, path: &str) -> Result<reqwest::Response> {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "Fetching");

        let response = self.http_client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!(url = %url, status = status.as_u16(), "Request failed");
            return Err(ClientError::Status {
                url,
                status: status.as_u16(),
            });
        }
        Ok(response)
    }

    /// Fetch the server's public key (SPKI PEM)
    pub async fn fetch_public_key(&self) -> Result<PublicKey> {
        let pem = self.get(PUBLIC_KEY_PATH).await?.text().await?;
        Ok(PublicKey::from_spki_pem(&pem)?)
    }

    /// Fetch the raw export envelope
    pub async fn fetch_export(&self) -> Result<Vec<u8>> {
        let bytes = self.get(EXPORT_PATH).await?.bytes().await?;
        Ok(bytes.to_vec())
    }

    /// Fetch the export and verify every record
    ///
    /// Rejected records are reported in the result, not as an error. A body
    /// that does not decode fails the whole call.
    pub async fn fetch_verified_users(&self) -> Result<Verification> {
        let public_key = match &self.pinned_key {
            Some(key) => key.clone(),
            None => self.fetch_public_key().await?,
        };
        let envelope = self.fetch_export().await?;

        let verification = RemoteVerifier::new(&public_key).verify(&envelope)?;

        info!(
            verified = verification.verified.len(),
            rejected = verification.rejected.len(),
            "Verified export"
        );
        Ok(verification)
    }
}
