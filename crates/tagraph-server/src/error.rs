//! API error types with HTTP status code mapping.
//!
//! [`ApiError`] is the unified error type for all endpoints. It implements
//! `axum::response::IntoResponse` to produce structured JSON error responses.
//! Client mistakes map to 4xx; malformed graph output and unexpected failures
//! map to 5xx with a message, never a backtrace.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use tagraph_core::RejectedRecord;
use tagraph_storage::StorageError;

/// Structured error detail in API responses.
#[derive(Debug, Clone, Serialize)]
pub struct ApiErrorDetail {
    /// Machine-readable error code (e.g., "NOT_FOUND", "BAD_REQUEST").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional structured details (e.g., rejected records).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// API errors with HTTP status code mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Resource not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Invalid request (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Input records were rejected (422).
    #[error("validation failed")]
    ValidationFailed(Vec<RejectedRecord>),

    /// A graph document failed the structural check (500).
    #[error("malformed graph: {0}")]
    MalformedGraph(String),

    /// Internal server error (500).
    #[error("internal error: {0}")]
    InternalError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg, None),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg, None),
            ApiError::ValidationFailed(rejected) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "VALIDATION_FAILED",
                format!("{} record(s) rejected", rejected.len()),
                serde_json::to_value(&rejected).ok(),
            ),
            ApiError::MalformedGraph(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "MALFORMED_GRAPH",
                msg,
                None,
            ),
            ApiError::InternalError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                msg,
                None,
            ),
        };

        if status.is_server_error() {
            tracing::error!(code, %message, "request failed");
        }

        let detail = ApiErrorDetail {
            code: code.to_string(),
            message,
            details,
        };
        let body = serde_json::json!({
            "success": false,
            "error": detail,
        });

        (status, axum::Json(body)).into_response()
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Validation { rejected } => ApiError::ValidationFailed(rejected),
            e @ StorageError::EmptyBatch => ApiError::BadRequest(e.to_string()),
            e @ StorageError::NotFound { .. } => ApiError::NotFound(e.to_string()),
            StorageError::MalformedGraph { reason } => ApiError::MalformedGraph(reason),
            other => ApiError::InternalError(other.to_string()),
        }
    }
}
