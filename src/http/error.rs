//! HTTP error handling and response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::db::repository::RepositoryError;

/// JSON error body.
///
/// Single failures use the `error` key, field validation failures the
/// `errors` list; only the populated key is serialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

impl ErrorBody {
    pub fn single(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            errors: None,
        }
    }

    pub fn list(messages: Vec<String>) -> Self {
        Self {
            error: None,
            errors: Some(messages),
        }
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Resource not found
    NotFound(String),
    /// Malformed request (e.g. unknown PATCH field)
    BadRequest(String),
    /// Field validation failures
    Validation(Vec<String>),
    /// Internal server error
    Internal(String),
    /// Repository error
    Repository(RepositoryError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorBody::single(msg)),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ErrorBody::single(msg)),
            AppError::Validation(errors) => (StatusCode::BAD_REQUEST, ErrorBody::list(errors)),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, ErrorBody::single(msg)),
            AppError::Repository(err) => match err {
                RepositoryError::NotFound { message, .. } => {
                    (StatusCode::NOT_FOUND, ErrorBody::single(message))
                }
                RepositoryError::ValidationError { message, .. } => {
                    (StatusCode::BAD_REQUEST, ErrorBody::list(vec![message]))
                }
                other => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody::single(other.to_string()),
                ),
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        AppError::Repository(err)
    }
}
