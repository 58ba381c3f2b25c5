//! Error types for the proxy
//!
//! Every failure the proxy itself generates is converted here into a
//! client-facing JSON response. Non-2xx statuses returned by the backend are
//! not errors; they are relayed verbatim by the forwarder.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::middleware::auth::AuthError;

/// Application-level errors
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Failed to connect to backend ({backend}): {cause}")]
    BackendUnreachable { backend: String, cause: String },

    #[error("Timed out contacting backend ({backend}): {cause}")]
    BackendTimeout { backend: String, cause: String },

    #[error("Failed to read request body: {0}")]
    InvalidRequestBody(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Auth(_) => StatusCode::UNAUTHORIZED,
            AppError::BackendUnreachable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AppError::BackendTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            AppError::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::Auth(AuthError::MissingToken) => "UNAUTHORIZED",
            AppError::Auth(AuthError::InvalidToken) => "INVALID_TOKEN",
            AppError::BackendUnreachable { .. } => "BACKEND_UNREACHABLE",
            AppError::BackendTimeout { .. } => "BACKEND_TIMEOUT",
            AppError::InvalidRequestBody(_) => "INVALID_REQUEST_BODY",
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

/// Error details
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.code().to_string(),
                message: self.to_string(),
            },
        };

        (self.status_code(), Json(body)).into_response()
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;
