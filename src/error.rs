use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use miette::Diagnostic;
use serde_json::json;
use thiserror::Error;

/// Main error type for the relay
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Configuration error: {0}")]
    #[diagnostic(code(calendar_relay::config))]
    Config(String),

    #[error("{0}")]
    #[diagnostic(code(calendar_relay::validation))]
    Validation(String),

    #[error("Google Calendar API error: {0}")]
    #[diagnostic(code(calendar_relay::upstream))]
    Upstream(String),

    #[error(transparent)]
    #[diagnostic(code(calendar_relay::io))]
    Io(#[from] std::io::Error),
}

/// Type alias for Result with our Error type
pub type RelayResult<T> = Result<T, Error>;

/// Helper to create configuration errors
pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}

/// Helper to create validation errors
pub fn validation_error(message: &str) -> Error {
    Error::Validation(message.to_string())
}

/// Helper to create upstream (Google Calendar) errors
pub fn upstream_error(message: &str) -> Error {
    Error::Upstream(message.to_string())
}

/// Map each error kind to its HTTP status and JSON error body.
///
/// Validation problems are the caller's fault (400); configuration and
/// upstream failures are reported as 500. Upstream failures carry the
/// provider's message under a separate `details` field.
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::Validation(message) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
            }
            Error::Upstream(details) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to add event", "details": details })),
            )
                .into_response(),
            other => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": other.to_string() })),
            )
                .into_response(),
        }
    }
}
