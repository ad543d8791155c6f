//! User CRUD Handlers
//!
//! Every write that touches an email goes through [`UserService`], which
//! signs the new email before it is stored. Extractor rejections (bad JSON,
//! unknown role or status, non-numeric id) are turned into [`ApiError`] so
//! they share the JSON error body.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use roster_core::Record;
use serde::Serialize;
use std::sync::Arc;

use crate::api::error::ApiError;
use crate::core::{CreateUserRequest, UpdateUserRequest, UserService};

/// Application state shared across handlers
#[derive(Debug, Clone)]
pub struct AppState {
    /// User operations, including the signing key material
    pub users: UserService,
}

/// Response from user creation
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserResponse {
    pub message: String,

    /// The stored user, signature included
    pub user: Record,

    /// Public key as PKCS#1 PEM
    pub public_key: String,
}

/// Response from user update
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserResponse {
    pub status_code: u16,
    pub message: String,
    pub data: Record,
}

/// Response from user deletion
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteUserResponse {
    pub status_code: u16,
    pub message: String,
}

/// Create a user
///
/// POST /users
///
/// Validates the email, signs its digest and stores the user. Role and
/// status default to USER and ACTIVE.
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateUserResponse>), ApiError> {
    let Json(request) = payload?;
    let user = state.users.create(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateUserResponse {
            message: "User created successfully".into(),
            user,
            public_key: state.users.keys().pkcs1_pem().to_string(),
        }),
    ))
}

/// Get a user
///
/// GET /users/{id}
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Record>, ApiError> {
    let Path(id) = id?;
    Ok(Json(state.users.get(id).await?))
}

/// Update a user
///
/// PATCH /users/{id}
///
/// A changed email is re-signed and stored together with its signature.
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<Json<UpdateUserResponse>, ApiError> {
    let Path(id) = id?;
    let Json(request) = payload?;
    let data = state.users.update(id, request).await?;

    Ok(Json(UpdateUserResponse {
        status_code: StatusCode::OK.as_u16(),
        message: "User updated successfully".into(),
        data,
    }))
}

/// Delete a user
///
/// DELETE /users/{id}
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<DeleteUserResponse>, ApiError> {
    let Path(id) = id?;
    state.users.delete(id).await?;

    Ok(Json(DeleteUserResponse {
        status_code: StatusCode::OK.as_u16(),
        message: "User deleted successfully".into(),
    }))
}
