//! Export Handlers
//!
//! The two halves a remote verifier needs: the signed envelope and the
//! public key to check it with.

use axum::{extract::State, http::header, response::IntoResponse};
use std::sync::Arc;

use crate::api::error::ApiError;
use crate::api::handlers::AppState;

/// Content type of the export envelope
pub const ENVELOPE_CONTENT_TYPE: &str = "application/octet-stream";

/// Export all users as a binary envelope
///
/// GET /users/export
pub async fn export_users(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let bytes = state.users.export().await?;
    Ok(([(header::CONTENT_TYPE, ENVELOPE_CONTENT_TYPE)], bytes))
}

/// Distribute the public key as SPKI PEM
///
/// GET /users/public-key
pub async fn public_key(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        state.users.keys().spki_pem().to_string(),
    )
}
