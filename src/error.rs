//! Error types and HTTP error response handling.
//!
//! This module defines the errors the record service can return and how they
//! are converted into HTTP responses with appropriate status codes and JSON bodies.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::store::StoreError;

/// Error returned by the record service.
///
/// # Status Code Mapping
///
/// - `InvalidRequest` → 400 Bad Request
/// - `MalformedId` → 400 Bad Request
/// - `NotFound` → 404 Not Found
/// - `Internal` → 500 Internal Server Error
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Request input failed validation before reaching the store.
    #[error("{message}")]
    InvalidRequest {
        message: String,
        details: Option<String>,
    },

    /// The id is not a valid identifier for the `api_keys` table.
    #[error("Invalid API key ID format")]
    MalformedId,

    /// No record matches a well-formed id.
    #[error("API key not found")]
    NotFound,

    /// The store failed. `message` names the operation; `details` carries
    /// the store's own message when it is safe to echo.
    #[error("{message}")]
    Internal {
        message: &'static str,
        details: Option<String>,
    },
}

impl AppError {
    pub fn invalid_request(message: impl Into<String>) -> Self {
        AppError::InvalidRequest {
            message: message.into(),
            details: None,
        }
    }

    /// Map a store failure, hiding the store's message from the client.
    pub fn from_store(message: &'static str) -> impl FnOnce(StoreError) -> AppError {
        move |err| Self::map_store(err, message, false)
    }

    /// Map a store failure, echoing the store's message as `details`.
    pub fn from_store_with_details(message: &'static str) -> impl FnOnce(StoreError) -> AppError {
        move |err| Self::map_store(err, message, true)
    }

    fn map_store(err: StoreError, message: &'static str, with_details: bool) -> AppError {
        match err {
            StoreError::MalformedId(id) => {
                tracing::warn!(%id, "Rejected malformed API key id");
                AppError::MalformedId
            }
            StoreError::Database(source) => {
                tracing::error!(error = %source, "{}", message);
                AppError::Internal {
                    message,
                    details: with_details.then(|| source.to_string()),
                }
            }
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidRequest { .. } | AppError::MalformedId => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error body returned for every failed request.
///
/// ```json
/// {
///   "error": "Failed to update API key",
///   "details": "pool timed out while waiting for an open connection"
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error = self.to_string();

        let details = match self {
            AppError::InvalidRequest { details, .. } | AppError::Internal { details, .. } => {
                details
            }
            AppError::MalformedId | AppError::NotFound => None,
        };

        (status, Json(ErrorBody { error, details })).into_response()
    }
}
