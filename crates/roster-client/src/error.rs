//! Error types for the roster client

use roster_core::RosterError;
use thiserror::Error;

/// Result type for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur while fetching or verifying an export
#[derive(Error, Debug)]
pub enum ClientError {
    /// Transport failure or unreadable response body
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("{url} returned status {status}")]
    Status { url: String, status: u16 },

    /// The public key or the envelope could not be used
    #[error(transparent)]
    Roster(#[from] RosterError),
}
