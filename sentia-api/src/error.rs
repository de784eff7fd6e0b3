//! API error types for sentia-api
//!
//! Maps the error taxonomy onto HTTP status codes: validation failures are
//! client errors, external model failures are gateway errors, everything
//! else is internal. Persistence failures after a successful analysis never
//! reach this type (they degrade to a logged warning in the orchestrator).

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// External model call failed or timed out (502)
    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),

    /// Generic error
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<sentia_common::Error> for ApiError {
    fn from(err: sentia_common::Error) -> Self {
        match err {
            sentia_common::Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            sentia_common::Error::ModelUnavailable(msg) => ApiError::ModelUnavailable(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::ModelUnavailable(msg) => {
                (StatusCode::BAD_GATEWAY, "MODEL_UNAVAILABLE", msg)
            }
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg),
            ApiError::Other(ref err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                err.to_string(),
            ),
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
