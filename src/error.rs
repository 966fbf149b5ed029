//! Error types for the proxy
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::models::ErrorResponse;

// == Proxy Error Enum ==
/// Errors raised while serving a proxied request.
///
/// Non-200 upstream responses are not errors; they are relayed as-is.
#[derive(Error, Debug)]
pub enum ProxyError {
    /// No HTTP response was obtained from the upstream (connect, timeout, bad URL)
    #[error("Upstream request failed: {0}")]
    Transport(String),

    /// The upstream answered with a status but its body could not be read
    #[error("Failed to read upstream response: {message}")]
    UpstreamBody { status: StatusCode, message: String },

    /// The HTTP client could not be constructed
    #[error("Failed to build upstream client: {0}")]
    Client(String),
}

impl ProxyError {
    /// Status code reported to the caller.
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::UpstreamBody { status, .. } => *status,
            ProxyError::Transport(_) | ProxyError::Client(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<reqwest::Error> for ProxyError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProxyError::Transport(format!("upstream timed out: {}", err))
        } else {
            ProxyError::Transport(err.to_string())
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ProxyError::UpstreamBody { status, .. } => ErrorResponse::with_details(
                self.to_string(),
                json!({ "upstream_status": status.as_u16() }),
            ),
            _ => ErrorResponse::new(self.to_string()),
        };

        (status, Json(body)).into_response()
    }
}

// == Config Error Enum ==
/// Errors raised while loading configuration at startup.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is not set
    #[error("Missing required configuration: {0}")]
    Missing(&'static str),

    /// A variable is set but cannot be parsed or is out of range
    #[error("Invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

// == Result Type Alias ==
/// Convenience Result type for the proxy.
pub type Result<T> = std::result::Result<T, ProxyError>;
