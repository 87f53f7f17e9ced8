//! Error types for the Listkeeper server.
//!
//! The API surfaces three error classes, mirroring the handler taxonomy:
//!
//! - [`ApiError::Validation`] - malformed input, `400 Bad Request`
//! - [`ApiError::NotFound`] - referenced id absent, `404 Not Found`
//! - [`ApiError::Storage`] - the data file could not be read, written, or
//!   parsed, `500 Internal Server Error`
//!
//! Every error renders as a JSON body of the form `{"error": "..."}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use listkeeper_store::StoreError;

/// Errors returned by API route handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request was syntactically or semantically invalid.
    #[error("{0}")]
    Validation(String),

    /// The referenced todo does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The store failed; there is no automatic recovery or repair.
    #[error("storage error: {0}")]
    Storage(#[from] StoreError),
}

impl ApiError {
    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }
}

/// JSON error response body.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Storage(err) => {
                error!(error = %err, "Store operation failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = ErrorResponse {
            error: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
