//! Response DTOs for the proxy
//!
//! Defines the JSON envelope returned when the upstream cannot be reached.

use serde::Serialize;
use serde_json::Value;

/// Error response body for all proxy-generated failures
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
    /// Extra detail about the upstream exchange, when any was captured
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse without details
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    /// Creates a new ErrorResponse carrying upstream details
    pub fn with_details(error: impl Into<String>, details: Value) -> Self {
        Self {
            error: error.into(),
            details: Some(details),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_response_serialize() {
        let resp = ErrorResponse::new("Something went wrong");
        let json = serde_json::to_string(&resp).unwrap();
        assert_eq!(json, r#"{"error":"Something went wrong"}"#);
    }

    #[test]
    fn test_error_response_with_details() {
        let resp = ErrorResponse::with_details("bad body", json!({ "upstream_status": 503 }));
        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(value["error"], "bad body");
        assert_eq!(value["details"]["upstream_status"], 503);
    }
}
