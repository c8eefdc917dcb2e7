//! Error types for the engagement-api library.
//!
//! This module provides custom error types using `thiserror` for better error handling
//! and more specific error messages throughout the application, plus the HTTP-facing
//! `ApiError` that maps library errors onto response statuses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Errors that can occur in the engagement-api application.
#[derive(Error, Debug)]
pub enum EngagementError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Connection pool errors
    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid date format in a query filter
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Malformed or missing compliance policy document
    #[error("Policy error: {0}")]
    Policy(String),

    /// Message not found in the store
    #[error("Message not found: {0}")]
    MessageNotFound(i64),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// CSV parsing errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// General error with context
    #[error("{0}")]
    Other(String),
}

/// Convenience type alias for Result with EngagementError
pub type Result<T> = std::result::Result<T, EngagementError>;

impl From<anyhow::Error> for EngagementError {
    fn from(err: anyhow::Error) -> Self {
        EngagementError::Other(err.to_string())
    }
}

/// HTTP-facing error: status code plus a `{"detail": ...}` body.
#[derive(Debug)]
pub enum ApiError {
    /// Client sent an unusable filter or parameter (400)
    BadRequest(String),
    /// Requested entity does not exist (404)
    NotFound(String),
    /// Anything the client cannot fix (500)
    Internal(EngagementError),
}

impl From<EngagementError> for ApiError {
    fn from(err: EngagementError) -> Self {
        match err {
            EngagementError::InvalidDate(msg) => Self::BadRequest(format!("Invalid date format: {msg}")),
            EngagementError::MessageNotFound(_) => Self::NotFound("Message not found".to_string()),
            other => Self::Internal(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            Self::BadRequest(detail) => (StatusCode::BAD_REQUEST, detail),
            Self::NotFound(detail) => (StatusCode::NOT_FOUND, detail),
            Self::Internal(err) => {
                tracing::error!(error = %err, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}
