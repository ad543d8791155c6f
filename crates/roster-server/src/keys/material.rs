//! Key Material for the server
//!
//! Holds the process-wide signing key pair, loaded once at startup:
//! - the record signer (private half, never exposed)
//! - the public key, pre-rendered in the containers the API hands out

use roster_core::{KeyPair, PublicKey, PublicKeyEncoding, RecordSigner, RosterError};
use std::path::Path;
use tracing::info;

/// Immutable key material shared by all handlers
#[derive(Debug)]
pub struct KeyMaterial {
    key_pair: KeyPair,
    signer: RecordSigner,
    spki_pem: String,
    pkcs1_pem: String,
}

impl KeyMaterial {
    /// Wrap a loaded key pair and pre-render its public encodings
    pub fn new(key_pair: KeyPair) -> Result<Self, RosterError> {
        let signer = RecordSigner::new(&key_pair);
        let spki_pem = key_pair.public_key().to_spki_pem()?;
        let pkcs1_pem = pem_text(key_pair.public_key().export(PublicKeyEncoding::Pkcs1Pem)?)?;

        info!(bits = key_pair.public_key().bits(), "Key material initialized");

        Ok(Self {
            key_pair,
            signer,
            spki_pem,
            pkcs1_pem,
        })
    }

    /// Load the key pair from PEM files
    ///
    /// Any failure here is fatal for the process: nothing can be signed
    /// without valid keys.
    pub fn load(
        private_key_path: impl AsRef<Path>,
        public_key_path: impl AsRef<Path>,
    ) -> Result<Self, RosterError> {
        Self::new(KeyPair::load(private_key_path, public_key_path)?)
    }

    /// Signer for record emails
    pub fn signer(&self) -> &RecordSigner {
        &self.signer
    }

    /// The public key
    pub fn public_key(&self) -> &PublicKey {
        self.key_pair.public_key()
    }

    /// Public key as SPKI PEM, the distribution format
    pub fn spki_pem(&self) -> &str {
        &self.spki_pem
    }

    /// Public key as PKCS#1 PEM, returned alongside newly created users
    pub fn pkcs1_pem(&self) -> &str {
        &self.pkcs1_pem
    }
}

fn pem_text(bytes: Vec<u8>) -> Result<String, RosterError> {
    String::from_utf8(bytes).map_err(|e| RosterError::KeyFormat(e.to_string()))
}
