//! Error types for the signed export protocol

use thiserror::Error;

/// Result type alias using RosterError
pub type Result<T> = std::result::Result<T, RosterError>;

/// Errors that can occur while signing, encoding, decoding or verifying
///
/// A record whose signature does not check out is *not* an error: the
/// verifier reports it in the rejected partition instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RosterError {
    /// Key files missing, unreadable, malformed, or not a matching pair
    #[error("Failed to load key material: {0}")]
    KeyLoad(String),

    /// Public key could not be imported or exported in the requested container
    #[error("Invalid key format: {0}")]
    KeyFormat(String),

    /// Private-key operation failed (corrupted key material)
    #[error("Signing failed: {0}")]
    Signing(String),

    /// A record does not satisfy the wire schema; nothing was encoded
    #[error("Schema violation in record {index}: {reason}")]
    SchemaViolation { index: usize, reason: String },

    /// Envelope bytes are truncated or structurally invalid
    #[error("Malformed envelope: {0}")]
    MalformedEnvelope(String),
}

impl RosterError {
    pub(crate) fn schema(index: usize, reason: impl Into<String>) -> Self {
        RosterError::SchemaViolation {
            index,
            reason: reason.into(),
        }
    }
}

impl From<prost::DecodeError> for RosterError {
    fn from(err: prost::DecodeError) -> Self {
        RosterError::MalformedEnvelope(err.to_string())
    }
}

impl From<rsa::signature::Error> for RosterError {
    fn from(err: rsa::signature::Error) -> Self {
        RosterError::Signing(err.to_string())
    }
}
