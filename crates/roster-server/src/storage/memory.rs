//! In-memory storage backend
//!
//! Default storage implementation. A single lock guards the table and the
//! email index, so every operation is atomic and `list` is a consistent
//! snapshot. Data is lost on restart.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use roster_core::Record;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;
use tracing::debug;

use super::{NewUser, StorageError, UserChanges, UserStore};

#[derive(Debug)]
struct Table {
    users: BTreeMap<i64, Record>,
    emails: HashMap<String, i64>,
    next_id: i64,
}

/// In-memory user store
#[derive(Debug)]
pub struct MemoryStore {
    table: RwLock<Table>,
}

impl MemoryStore {
    /// Create a new, empty store; ids start at 1
    pub fn new() -> Self {
        Self {
            table: RwLock::new(Table {
                users: BTreeMap::new(),
                emails: HashMap::new(),
                next_id: 1,
            }),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert(&self, user: NewUser) -> Result<Record, StorageError> {
        let mut table = self.table.write().await;

        if table.emails.contains_key(&user.email.email) {
            return Err(StorageError::DuplicateEmail(user.email.email));
        }

        let id = table.next_id;
        table.next_id += 1;

        let record = Record {
            id,
            email: user.email.email,
            role: user.role,
            status: user.status,
            created_at: user.created_at,
            signature: user.email.signature,
        };

        table.emails.insert(record.email.clone(), id);
        table.users.insert(id, record.clone());

        debug!(id = id, "Inserted user");
        Ok(record)
    }

    async fn get(&self, id: i64) -> Result<Option<Record>, StorageError> {
        let table = self.table.read().await;
        Ok(table.users.get(&id).cloned())
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<Record>, StorageError> {
        let table = self.table.read().await;
        Ok(table
            .emails
            .get(email)
            .and_then(|id| table.users.get(id))
            .cloned())
    }

    async fn update(&self, id: i64, changes: UserChanges) -> Result<Option<Record>, StorageError> {
        let mut guard = self.table.write().await;
        let table = &mut *guard;

        let Some(current) = table.users.get(&id) else {
            return Ok(None);
        };

        if let Some(signed) = &changes.email {
            if let Some(owner) = table.emails.get(&signed.email) {
                if *owner != id {
                    return Err(StorageError::DuplicateEmail(signed.email.clone()));
                }
            }
        }

        let old_email = current.email.clone();
        let record = table
            .users
            .get_mut(&id)
            .ok_or(StorageError::NotFound(id))?;

        if let Some(signed) = changes.email {
            table.emails.remove(&old_email);
            table.emails.insert(signed.email.clone(), id);
            record.email = signed.email;
            record.signature = signed.signature;
        }
        if let Some(role) = changes.role {
            record.role = role;
        }
        if let Some(status) = changes.status {
            record.status = status;
        }

        debug!(id = id, "Updated user");
        Ok(Some(record.clone()))
    }

    async fn delete(&self, id: i64) -> Result<bool, StorageError> {
        let mut table = self.table.write().await;
        match table.users.remove(&id) {
            Some(record) => {
                table.emails.remove(&record.email);
                debug!(id = id, "Deleted user");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list(&self) -> Result<Vec<Record>, StorageError> {
        let table = self.table.read().await;
        Ok(table.users.values().cloned().collect())
    }

    async fn created_since(&self, since: DateTime<Utc>) -> Result<Vec<DateTime<Utc>>, StorageError> {
        let table = self.table.read().await;
        Ok(table
            .users
            .values()
            .filter(|u| u.created_at >= since)
            .map(|u| u.created_at)
            .collect())
    }
}
