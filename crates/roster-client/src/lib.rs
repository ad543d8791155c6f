//! Roster Client
//!
//! Consumer side of the signed export. The client downloads the binary
//! envelope from a roster server, checks every record's signature against
//! the server's public key, and hands back the verified and rejected
//! records separately.
//!
//! ## Usage
//!
//! ```ignore
//! use roster_client::RosterClient;
//!
//! let client = RosterClient::new("http://localhost:3000");
//! let result = client.fetch_verified_users().await?;
//! for rejected in &result.rejected {
//!     println!("{} rejected: {}", rejected.record.email, rejected.reason);
//! }
//! ```

pub mod client;
pub mod error;

pub use client::{RosterClient, EXPORT_PATH, PUBLIC_KEY_PATH};
pub use error::{ClientError, Result};
