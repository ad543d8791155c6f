//! API error types and responses

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use roster_core::RosterError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::core::UserError;

/// API error type
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// The request could not be parsed; `reason` is the extractor's message
    #[error("Malformed request: {message}")]
    MalformedRequest { message: String, reason: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// API error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg, None),
            ApiError::MalformedRequest { message, reason } => (
                StatusCode::BAD_REQUEST,
                "BAD_REQUEST",
                message,
                Some(serde_json::json!({ "reason": reason })),
            ),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg, None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg, None),
            ApiError::Internal(msg) => {
                error!(error = %msg, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Internal server error".to_string(),
                    None,
                )
            }
        };

        let body = ErrorResponse {
            error: message,
            code: code.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::Validation(e) => ApiError::BadRequest(e.to_string()),
            UserError::NotFound(_) => ApiError::NotFound(err.to_string()),
            UserError::DuplicateEmail(_) => ApiError::Conflict(err.to_string()),
            UserError::Roster(e) => e.into(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::MalformedRequest {
            message: "Invalid request body".into(),
            reason: rejection.body_text(),
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::MalformedRequest {
            message: "Invalid user id".into(),
            reason: rejection.body_text(),
        }
    }
}

/// Key, signing and schema failures on the server are defects, never client errors
impl From<RosterError> for ApiError {
    fn from(err: RosterError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ValidationError;

    fn status(err: ApiError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_user_error_mapping() {
        assert_eq!(
            status(UserError::Validation(ValidationError::MissingEmail).into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status(UserError::NotFound(3).into()), StatusCode::NOT_FOUND);
        assert_eq!(
            status(UserError::DuplicateEmail("a@b.com".into()).into()),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status(UserError::Roster(RosterError::Signing("bad key".into())).into()),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_schema_violation_is_internal() {
        let err = RosterError::SchemaViolation {
            index: 0,
            reason: "empty email".into(),
        };
        assert_eq!(status(err.into()), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_validation_message_passed_through() {
        let err: ApiError = UserError::Validation(ValidationError::InvalidEmail("x".into())).into();
        assert_eq!(err.to_string(), "Invalid request: Invalid email format.");
    }
}
