//! API response envelope

use serde::{Deserialize, Serialize};

/// Body returned by every OTP endpoint
///
/// ```json
/// { "success": false, "message": "Failed to send OTP", "error": "..." }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Whether the request achieved its purpose
    pub success: bool,

    /// Human-readable outcome
    pub message: String,

    /// Underlying failure description, only on server errors
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StatusResponse {
    /// Create a successful response
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            error: None,
        }
    }

    /// Create a failure response without error detail
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            error: None,
        }
    }

    /// Attach the underlying error description
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }
}
