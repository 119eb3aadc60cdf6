//! Warm transfer service error types.
//!
//! All errors map to an HTTP status code and a structured JSON body via the
//! `IntoResponse` impl:
//!
//! ```json
//! {"error": {"code": "CONFIGURATION_ERROR", "message": "..."}}
//! ```
//!
//! Configuration and upstream messages are returned as-is so operators can
//! diagnose them; cryptographic and internal failures are logged server-side
//! and answered with a generic message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Service error type.
///
/// Maps to HTTP status codes:
/// - Configuration, Upstream, Crypto, Internal: 500 Internal Server Error
/// - Validation: 400 Bad Request
/// - InvalidToken: 401 Unauthorized
#[derive(Debug, Error)]
pub enum WtError {
    /// A required secret or URL is missing from the process environment.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Request fields are missing, empty, or malformed.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The model provider call failed.
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// Token signing failed.
    #[error("Cryptographic error: {0}")]
    Crypto(String),

    /// A presented token failed verification.
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Internal server error")]
    Internal,
}

impl WtError {
    /// Returns the HTTP status code for this error (for metrics recording).
    pub fn status_code(&self) -> u16 {
        match self {
            WtError::Configuration(_)
            | WtError::Upstream(_)
            | WtError::Crypto(_)
            | WtError::Internal => 500,
            WtError::Validation(_) => 400,
            WtError::InvalidToken(_) => 401,
        }
    }

    /// Bounded label used for the `error_type` metric.
    pub fn error_type(&self) -> &'static str {
        match self {
            WtError::Configuration(_) => "configuration",
            WtError::Validation(_) => "validation",
            WtError::Upstream(_) => "upstream",
            WtError::Crypto(_) => "crypto",
            WtError::InvalidToken(_) => "invalid_token",
            WtError::Internal => "internal",
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

impl IntoResponse for WtError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            WtError::Configuration(reason) => {
                tracing::error!(target: "wt.config", reason = %reason, "Required configuration missing");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "CONFIGURATION_ERROR",
                    reason.clone(),
                )
            }
            WtError::Validation(reason) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", reason.clone())
            }
            WtError::Upstream(reason) => {
                tracing::warn!(target: "wt.upstream", reason = %reason, "Upstream call failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "UPSTREAM_ERROR",
                    reason.clone(),
                )
            }
            WtError::Crypto(err) => {
                // Log actual error server-side, return generic message to client
                tracing::error!(target: "wt.crypto", error = %err, "Token signing failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "CRYPTO_ERROR",
                    "An internal cryptographic error occurred".to_string(),
                )
            }
            WtError::InvalidToken(reason) => {
                (StatusCode::UNAUTHORIZED, "INVALID_TOKEN", reason.clone())
            }
            WtError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            ),
        };

        let error_response = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };

        (status, Json(error_response)).into_response()
    }
}
