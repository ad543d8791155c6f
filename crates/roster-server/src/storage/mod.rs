//! Storage abstraction for user records
//!
//! The service only talks to a [`UserStore`]; the in-memory backend is the
//! default. Implementations must apply an email change and its new signature
//! in one write, so a reader never observes a signature paired with another
//! email. [`SignedEmail`] makes that pairing explicit in the API.

pub mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use roster_core::{Record, Role, Status};
use std::fmt::Debug;

/// Error type for storage operations
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("User not found: {0}")]
    NotFound(i64),

    #[error("Email already registered: {0}")]
    DuplicateEmail(String),
}

/// An email together with the signature over its digest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedEmail {
    pub email: String,
    pub signature: String,
}

/// A user to insert; the store assigns the id
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: SignedEmail,
    pub role: Role,
    pub status: Status,
    pub created_at: DateTime<Utc>,
}

/// Field changes applied by an update; `None` leaves the field untouched
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub email: Option<SignedEmail>,
    pub role: Option<Role>,
    pub status: Option<Status>,
}

impl UserChanges {
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.role.is_none() && self.status.is_none()
    }
}

/// Storage backend trait for user records
///
/// Implementations must be thread-safe and support concurrent access.
#[async_trait]
pub trait UserStore: Send + Sync + Debug {
    /// Insert a new user; fails with `DuplicateEmail` if the email is taken
    async fn insert(&self, user: NewUser) -> Result<Record, StorageError>;

    /// Get a user by id
    async fn get(&self, id: i64) -> Result<Option<Record>, StorageError>;

    /// Get a user by email
    async fn get_by_email(&self, email: &str) -> Result<Option<Record>, StorageError>;

    /// Apply changes to a user; `Ok(None)` if the id does not exist
    async fn update(&self, id: i64, changes: UserChanges) -> Result<Option<Record>, StorageError>;

    /// Remove a user; returns whether it existed
    async fn delete(&self, id: i64) -> Result<bool, StorageError>;

    /// All users, ordered by id
    async fn list(&self) -> Result<Vec<Record>, StorageError>;

    /// Creation times of users created at or after `since`
    async fn created_since(&self, since: DateTime<Utc>) -> Result<Vec<DateTime<Utc>>, StorageError>;
}
