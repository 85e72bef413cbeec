//! Error types for arena-server
//!
//! Every handler error becomes a JSON body `{ok: false, error}`; nothing
//! reaches the transport layer as a bare failure.

use crate::services::VoteValidationError;
use arena_common::api::ErrorResponse;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed vote body (400)
    #[error("{0}")]
    Validation(#[from] VoteValidationError),

    /// Unsupported HTTP method for the endpoint (405)
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// Storage unreachable or failing (503)
    #[error("Storage error: {0}")]
    Storage(#[from] arena_common::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            ApiError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                "Method not allowed".to_string(),
            ),
            ApiError::Storage(err) => {
                error!("Storage failure: {}", err);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Storage unavailable".to_string(),
                )
            }
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
