//! Error types for voice-todo.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Top-level error type for the service.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Database-related errors.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("Connection pool error: {0}")]
    Pool(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Constraint violation: {0}")]
    Constraint(String),

    #[error("Migration failed: {0}")]
    Migration(String),
}

impl DatabaseError {
    /// Classify a libSQL error raised by `op`, splitting out constraint
    /// violations (e.g. a duplicate phone number) from other failures.
    pub fn from_libsql(op: &str, e: libsql::Error) -> Self {
        let msg = e.to_string();
        if msg.contains("constraint failed") {
            DatabaseError::Constraint(format!("{op}: {msg}"))
        } else {
            DatabaseError::Query(format!("{op}: {msg}"))
        }
    }
}

/// Client-facing failures of a single webhook request.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// No tool call in the batch matched the expected function, or a
    /// required argument was missing.
    #[error("{0}")]
    InvalidRequest(String),

    /// The arguments payload could not be decoded into a key/value map.
    #[error("Invalid tool call arguments: {0}")]
    Decode(String),

    #[error("User not found")]
    UserNotFound,

    #[error("User with this phone number already exists")]
    UserAlreadyExists,

    #[error("Todo not found")]
    TodoNotFound,

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

impl ServiceError {
    /// The generic "no matching tool call" failure.
    pub fn invalid_request() -> Self {
        ServiceError::InvalidRequest("Invalid Request".to_string())
    }

    /// Stable status category for this condition.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::InvalidRequest(_) | ServiceError::Decode(_) => StatusCode::BAD_REQUEST,
            ServiceError::UserNotFound | ServiceError::TodoNotFound => StatusCode::NOT_FOUND,
            ServiceError::UserAlreadyExists => StatusCode::CONFLICT,
            ServiceError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    detail: String,
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            ServiceError::Database(e) => tracing::error!(error = %e, "Request failed in store"),
            other => tracing::warn!(status = status.as_u16(), error = %other, "Request rejected"),
        }
        (
            status,
            Json(ErrorBody {
                detail: self.to_string(),
            }),
        )
            .into_response()
    }
}

/// Errors from the outbound call-status client.
#[derive(Debug, thiserror::Error)]
pub enum CallError {
    #[error("Call status request failed: {0}")]
    RequestFailed(String),

    #[error("Call status endpoint returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Invalid call status response: {0}")]
    InvalidResponse(String),
}

/// Result type alias for the service.
pub type Result<T> = std::result::Result<T, Error>;
