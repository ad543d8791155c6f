//! # Roster Core
//!
//! Signed bulk export of user records and its client-side verification.
//!
//! ## Components
//!
//! - **Key material** ([`crypto`]): RSA key pair loaded from PEM files; the
//!   public half is re-encoded as SPKI for distribution
//! - **Record signer** ([`signer`]): SHA-384 hex digest of the email, signed
//!   with RSA PKCS#1 v1.5 / SHA-384 over the digest's hex text
//! - **Envelope codec** ([`envelope`]): protobuf `UserList`, validated before
//!   encoding
//! - **Export assembler** ([`export`]): records to wire records to bytes
//! - **Remote verifier** ([`verify`]): decode, recompute, verify, partition
//!
//! ## Invariants
//!
//! 1. A record's signature always covers the digest of its *current* email
//! 2. Signer and verifier hash and sign exactly the same bytes (the hex text)
//! 3. The role/status integer mapping is identical on both sides

pub mod crypto;
pub mod envelope;
pub mod error;
pub mod export;
pub mod signer;
pub mod types;
pub mod verify;

pub use crypto::{KeyPair, PublicKey, PublicKeyEncoding};
pub use error::{Result, RosterError};
pub use export::{assemble, format_timestamp, to_wire};
pub use signer::{digest, Digest, RecordSigner};
pub use types::{Record, Role, Status, UserList, WireRecord};
pub use verify::{verify_envelope, RejectReason, Rejected, RemoteVerifier, Verification};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
