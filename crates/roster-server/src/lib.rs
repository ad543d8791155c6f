//! Roster Server
//!
//! User administration service that signs every user's email and exports
//! the whole table as a binary envelope a remote client can verify.
//!
//! ## Signing
//!
//! The server holds an RSA key pair loaded once at startup. On creation,
//! and whenever an email changes, the SHA-384 hex digest of the email is
//! signed and stored with the user. The public key is distributed so that
//! consumers of the export can check each record independently.
//!
//! ## API Endpoints
//!
//! - `GET /health` - Liveness check
//! - `POST /users` - Create a user
//! - `GET /users/{id}` - Get a user
//! - `PATCH /users/{id}` - Update a user, re-signing a changed email
//! - `DELETE /users/{id}` - Delete a user
//! - `GET /users/export` - Binary envelope of all users
//! - `GET /users/public-key` - Public key as SPKI PEM
//! - `GET /users/stats/weekly` - Registrations per day for the last week

pub mod api;
pub mod config;
pub mod core;
pub mod keys;
pub mod storage;

pub use api::create_router;
pub use api::handlers::AppState;
pub use config::{ConfigError, ServerConfig};
pub use core::UserService;
pub use keys::KeyMaterial;
pub use storage::{MemoryStore, UserStore};
