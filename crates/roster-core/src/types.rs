//! Record types and their wire projection
//!
//! [`Record`] is the strongly typed, storage-side view of a user.
//! [`WireRecord`] is its schema-constrained transport form, with roles and
//! statuses projected to integers. The projection is part of the public wire
//! contract: signer and verifier must agree on it exactly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// User role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    #[default]
    User,
}

impl Role {
    /// All variants, in wire order
    pub const ALL: [Role; 2] = [Role::Admin, Role::User];

    /// Wire integer for this role (ADMIN=0, USER=1)
    pub fn to_wire(self) -> i32 {
        match self {
            Role::Admin => 0,
            Role::User => 1,
        }
    }

    /// Inverse of [`Role::to_wire`]; `None` for unmapped integers
    pub fn from_wire(value: i32) -> Option<Self> {
        match value {
            0 => Some(Role::Admin),
            1 => Some(Role::User),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "ADMIN"),
            Role::User => write!(f, "USER"),
        }
    }
}

/// Account status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    #[default]
    Active,
    Inactive,
}

impl Status {
    /// All variants, in wire order
    pub const ALL: [Status; 2] = [Status::Active, Status::Inactive];

    /// Wire integer for this status (ACTIVE=0, INACTIVE=1)
    pub fn to_wire(self) -> i32 {
        match self {
            Status::Active => 0,
            Status::Inactive => 1,
        }
    }

    /// Inverse of [`Status::to_wire`]; `None` for unmapped integers
    pub fn from_wire(value: i32) -> Option<Self> {
        match value {
            0 => Some(Status::Active),
            1 => Some(Status::Inactive),
            _ => None,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Active => write!(f, "ACTIVE"),
            Status::Inactive => write!(f, "INACTIVE"),
        }
    }
}

/// Authoritative user record as held by storage
///
/// `signature` is always the hex signature over the digest of the current
/// `email`; storage rewrites both together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// Storage-assigned identifier
    pub id: i64,
    /// Unique email address; the signed identity field
    pub email: String,
    pub role: Role,
    pub status: Status,
    /// Creation time, immutable
    pub created_at: DateTime<Utc>,
    /// Lowercase hex signature over `digest(email)`
    pub signature: String,
}

/// Transport projection of a [`Record`]
#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct WireRecord {
    #[prost(int32, tag = "1")]
    pub id: i32,
    #[prost(string, tag = "2")]
    pub email: String,
    /// 0 = ADMIN, 1 = USER
    #[prost(int32, tag = "3")]
    pub role: i32,
    /// 0 = ACTIVE, 1 = INACTIVE
    #[prost(int32, tag = "4")]
    pub status: i32,
    /// RFC 3339 timestamp, UTC
    #[prost(string, tag = "5")]
    pub created_at: String,
    /// Lowercase hex signature
    #[prost(string, tag = "6")]
    pub signature: String,
}

/// The envelope message: an ordered list of wire records
#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct UserList {
    #[prost(message, repeated, tag = "1")]
    pub users: Vec<WireRecord>,
}
