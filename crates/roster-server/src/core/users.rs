//! User service
//!
//! Owns the signing side of the protocol: every email that reaches storage
//! is signed here first, and an email change is written together with its
//! new signature so the old one is never served again.

use chrono::{DateTime, Duration, NaiveTime, Utc};
use roster_core::{Record, Role, RosterError, Status};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use crate::core::validation::{validate_email, ValidationError};
use crate::keys::KeyMaterial;
use crate::storage::{NewUser, SignedEmail, StorageError, UserChanges, UserStore};

/// Number of days covered by the weekly statistics
pub const STATS_DAYS: i64 = 7;

/// Errors from user operations
#[derive(Error, Debug)]
pub enum UserError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("User with ID {0} not found")]
    NotFound(i64),

    #[error("A user with this email already exists")]
    DuplicateEmail(String),

    #[error(transparent)]
    Roster(#[from] RosterError),
}

impl From<StorageError> for UserError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(id) => UserError::NotFound(id),
            StorageError::DuplicateEmail(email) => UserError::DuplicateEmail(email),
        }
    }
}

/// Request to create a user; role and status default to USER and ACTIVE
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub status: Option<Status>,
}

/// Partial update of a user
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub status: Option<Status>,
}

/// Registrations on one day
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayCount {
    /// Short weekday name, e.g. `Mon`
    pub day: String,
    pub count: usize,
}

/// User operations over a store, signing with the server's key material
#[derive(Debug, Clone)]
pub struct UserService {
    store: Arc<dyn UserStore>,
    keys: Arc<KeyMaterial>,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>, keys: Arc<KeyMaterial>) -> Self {
        Self { store, keys }
    }

    /// The server's key material
    pub fn keys(&self) -> &KeyMaterial {
        &self.keys
    }

    fn sign(&self, email: String) -> Result<SignedEmail, UserError> {
        let signature = self.keys.signer().sign_identity(&email)?;
        Ok(SignedEmail { email, signature })
    }

    /// Validate, sign and store a new user
    pub async fn create(&self, request: CreateUserRequest) -> Result<Record, UserError> {
        validate_email(&request.email)?;

        let user = NewUser {
            email: self.sign(request.email)?,
            role: request.role.unwrap_or_default(),
            status: request.status.unwrap_or_default(),
            created_at: Utc::now(),
        };

        let record = self.store.insert(user).await?;
        info!(id = record.id, role = %record.role, "Created user");
        Ok(record)
    }

    /// Fetch one user
    pub async fn get(&self, id: i64) -> Result<Record, UserError> {
        self.store.get(id).await?.ok_or(UserError::NotFound(id))
    }

    /// Apply a partial update, re-signing when the email changes
    pub async fn update(&self, id: i64, request: UpdateUserRequest) -> Result<Record, UserError> {
        let current = self.get(id).await?;

        let email = match request.email {
            Some(email) if email != current.email => {
                validate_email(&email)?;
                Some(self.sign(email)?)
            }
            _ => None,
        };
        let resigned = email.is_some();

        let changes = UserChanges {
            email,
            role: request.role,
            status: request.status,
        };
        if changes.is_empty() {
            return Ok(current);
        }

        let record = self
            .store
            .update(id, changes)
            .await?
            .ok_or(UserError::NotFound(id))?;

        info!(id = id, resigned = resigned, "Updated user");
        Ok(record)
    }

    /// Delete a user
    pub async fn delete(&self, id: i64) -> Result<(), UserError> {
        if !self.store.delete(id).await? {
            return Err(UserError::NotFound(id));
        }
        info!(id = id, "Deleted user");
        Ok(())
    }

    /// Encode the whole table as a signed export envelope
    pub async fn export(&self) -> Result<Vec<u8>, UserError> {
        let records = self.store.list().await?;
        let bytes = roster_core::assemble(&records).inspect_err(|e| {
            warn!(error = %e, records = records.len(), "Export failed schema validation");
        })?;
        info!(records = records.len(), bytes = bytes.len(), "Exported users");
        Ok(bytes)
    }

    /// Registrations per UTC day for the last seven days, oldest first
    pub async fn weekly_stats(&self, now: DateTime<Utc>) -> Result<Vec<DayCount>, UserError> {
        let first_day = (now - Duration::days(STATS_DAYS - 1)).date_naive();
        let since = first_day.and_time(NaiveTime::MIN).and_utc();

        let created = self.store.created_since(since).await?;

        let stats = (0..STATS_DAYS)
            .map(|offset| {
                let day = first_day + Duration::days(offset);
                DayCount {
                    day: day.format("%a").to_string(),
                    count: created.iter().filter(|t| t.date_naive() == day).count(),
                }
            })
            .collect();

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use chrono::TimeZone;
    use roster_core::{digest, KeyPair, RemoteVerifier};

    const PRIVATE_PEM: &str = include_str!("../../../roster-core/tests/fixtures/private.pem");
    const PUBLIC_PEM: &str = include_str!("../../../roster-core/tests/fixtures/public.pem");

    fn service() -> (UserService, Arc<MemoryStore>) {
        let keys = KeyMaterial::new(KeyPair::from_pem(PRIVATE_PEM, PUBLIC_PEM).unwrap()).unwrap();
        let store = Arc::new(MemoryStore::new());
        (UserService::new(store.clone(), Arc::new(keys)), store)
    }

    fn create(email: &str) -> CreateUserRequest {
        CreateUserRequest {
            email: email.into(),
            role: None,
            status: None,
        }
    }

    fn verifies(service: &UserService, email: &str, signature: &str) -> bool {
        let verifier = RemoteVerifier::new(service.keys().public_key());
        verifier
            .verify_signature(&digest(email), &hex::decode(signature).unwrap())
            .is_ok()
    }

    #[tokio::test]
    async fn test_create_signs_email_and_applies_defaults() {
        let (service, _) = service();
        let user = service.create(create("a@b.com")).await.unwrap();

        assert_eq!(user.role, Role::User);
        assert_eq!(user.status, Status::Active);
        assert!(verifies(&service, "a@b.com", &user.signature));
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_email() {
        let (service, store) = service();
        let err = service.create(create("not-an-email")).await.unwrap_err();

        assert!(matches!(err, UserError::Validation(ValidationError::InvalidEmail(_))));
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_duplicate_email() {
        let (service, _) = service();
        service.create(create("a@b.com")).await.unwrap();
        let err = service.create(create("a@b.com")).await.unwrap_err();
        assert!(matches!(err, UserError::DuplicateEmail(_)));
    }

    #[tokio::test]
    async fn test_email_update_resigns() {
        let (service, _) = service();
        let user = service.create(create("old@example.com")).await.unwrap();

        let updated = service
            .update(
                user.id,
                UpdateUserRequest {
                    email: Some("new@example.com".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_ne!(updated.signature, user.signature);
        assert!(verifies(&service, "new@example.com", &updated.signature));
        assert!(!verifies(&service, "old@example.com", &updated.signature));

        let stored = service.get(user.id).await.unwrap();
        assert_eq!(stored.signature, updated.signature);
        assert_eq!(stored.created_at, user.created_at);
    }

    #[tokio::test]
    async fn test_role_update_keeps_signature() {
        let (service, _) = service();
        let user = service.create(create("a@b.com")).await.unwrap();

        let updated = service
            .update(
                user.id,
                UpdateUserRequest {
                    role: Some(Role::Admin),
                    status: Some(Status::Inactive),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.role, Role::Admin);
        assert_eq!(updated.status, Status::Inactive);
        assert_eq!(updated.signature, user.signature);
    }

    #[tokio::test]
    async fn test_update_with_invalid_email_changes_nothing() {
        let (service, _) = service();
        let user = service.create(create("a@b.com")).await.unwrap();

        let err = service
            .update(
                user.id,
                UpdateUserRequest {
                    email: Some("broken".into()),
                    role: Some(Role::Admin),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, UserError::Validation(_)));
        assert_eq!(service.get(user.id).await.unwrap(), user);
    }

    #[test]
    fn test_storage_errors_map_to_user_errors() {
        assert!(matches!(
            UserError::from(StorageError::NotFound(4)),
            UserError::NotFound(4)
        ));
        assert!(matches!(
            UserError::from(StorageError::DuplicateEmail("a@b.com".into())),
            UserError::DuplicateEmail(e) if e == "a@b.com"
        ));
    }

    #[tokio::test]
    async fn test_missing_user() {
        let (service, _) = service();
        assert!(matches!(service.get(9).await, Err(UserError::NotFound(9))));
        assert!(matches!(
            service.update(9, UpdateUserRequest::default()).await,
            Err(UserError::NotFound(9))
        ));
        assert!(matches!(service.delete(9).await, Err(UserError::NotFound(9))));
    }

    #[tokio::test]
    async fn test_export_verifies() {
        let (service, _) = service();
        for email in ["a@b.com", "c@d.com", "e@f.com"] {
            service.create(create(email)).await.unwrap();
        }

        let bytes = service.export().await.unwrap();
        let verifier = RemoteVerifier::new(service.keys().public_key());
        let result = verifier.verify(&bytes).unwrap();

        assert_eq!(result.verified.len(), 3);
        assert!(result.rejected.is_empty());
        assert_eq!(result.verified[0].email, "a@b.com");
    }

    #[tokio::test]
    async fn test_weekly_stats() {
        let (service, store) = service();
        let now = Utc.with_ymd_and_hms(2024, 6, 9, 12, 0, 0).unwrap(); // Sunday

        let days_ago = [0, 0, 1, 6, 7, 30];
        for (i, days) in days_ago.iter().enumerate() {
            store
                .insert(NewUser {
                    email: SignedEmail {
                        email: format!("u{}@x.io", i),
                        signature: "00".into(),
                    },
                    role: Role::User,
                    status: Status::Active,
                    created_at: now - Duration::days(*days),
                })
                .await
                .unwrap();
        }

        let stats = service.weekly_stats(now).await.unwrap();
        let days: Vec<&str> = stats.iter().map(|s| s.day.as_str()).collect();
        let counts: Vec<usize> = stats.iter().map(|s| s.count).collect();

        assert_eq!(days, ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"]);
        assert_eq!(counts, [1, 0, 0, 0, 0, 1, 2]);
    }
}
