//! Response envelope shared by every API endpoint.
//!
//! Success bodies look like `{"success": true, "data": ...}` and failures
//! like `{"success": false, "error": {"message", "code"}}`. A timestamp is
//! always present, plus a request id when the handler attached one.
//! Clients switch on `error.code`; `error.message` arrives already
//! localized for display.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Error payload carried inside the envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Localized, human-readable description
    pub message: String,

    /// Stable machine-checkable code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl ErrorBody {
    /// Payload with a message only.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
        }
    }

    /// Payload with a message and a machine-checkable code.
    pub fn with_code(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: Some(code.into()),
        }
    }
}

/// Envelope wrapping every response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Outcome flag mirrored by the HTTP status
    pub success: bool,

    /// Payload, present on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    /// Error payload, present on failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,

    /// Server time the response was built
    pub timestamp: DateTime<Utc>,

    /// Correlation id assigned by the tracing middleware
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Envelope for a successful outcome.
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            timestamp: Utc::now(),
            request_id: None,
        }
    }

    /// Envelope for a failed outcome.
    pub fn error(error: ErrorBody) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
            timestamp: Utc::now(),
            request_id: None,
        }
    }

    /// Attach the request id assigned by the tracing middleware.
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }
}

/// Body of the `/health` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"healthy"` when the process can answer at all
    pub status: String,

    /// Which binary answered
    pub service: String,

    /// Server time
    pub timestamp: DateTime<Utc>,

    /// Crate version baked in at compile time
    pub version: String,
}

impl HealthResponse {
    /// Healthy report for the named service.
    pub fn healthy(service: impl Into<String>) -> Self {
        Self {
            status: String::from("healthy"),
            service: service.into(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
