//! API error types with IntoResponse
//!
//! Errors become JSON bodies with a single `error` key, except not-found
//! which uses `message`. `Rejected` keeps status 200 and reports the
//! failure in the body only; member creation answers that way for existing
//! clients.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::db::DbError;
use crate::models::ValidationError;

/// Message for bodies that are not valid JSON for the route.
pub const INVALID_REQUEST_DATA: &str = "Invalid request data";

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Required field blank (400)
    Validation(ValidationError),

    /// Malformed request or failed operation reported to the client (400)
    BadRequest { message: String },

    /// Resource not found (404, `message` key)
    NotFound { message: String },

    /// Credential mismatch (401)
    Unauthorized { message: String },

    /// Failure signalled in the body with status 200
    Rejected { message: String },

    /// Internal error (500, logged, generic body)
    Internal { message: String },
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }

    pub fn internal(err: impl std::fmt::Display) -> Self {
        Self::Internal {
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::Validation(e) => (StatusCode::BAD_REQUEST, json!({ "error": e.to_string() })),
            Self::BadRequest { message } => (StatusCode::BAD_REQUEST, json!({ "error": message })),
            Self::NotFound { message } => (StatusCode::NOT_FOUND, json!({ "message": message })),
            Self::Unauthorized { message } => {
                (StatusCode::UNAUTHORIZED, json!({ "error": message }))
            }
            Self::Rejected { message } => (StatusCode::OK, json!({ "error": message })),
            Self::Internal { message } => {
                // Log the actual error, return generic message
                tracing::error!("Internal error: {}", message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "an internal error occurred" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound { resource, id } => Self::NotFound {
                message: format!("{} '{}' not found", resource, id),
            },
            DbError::InvalidCredentials => Self::Unauthorized {
                message: "Invalid username or password".into(),
            },
            other => Self::internal(other),
        }
    }
}
