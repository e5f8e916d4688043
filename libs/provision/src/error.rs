//! Error types for provisioning API calls.

use thiserror::Error;

/// Provisioning client errors.
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// The API answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The request never got a response.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The response body did not match the expected shape.
    #[error("failed to decode response from {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// The auth token can't be sent as an HTTP header.
    #[error("auth token is not a valid header value")]
    InvalidToken,
}

impl ProvisionError {
    /// Create an API error from response details.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// HTTP status of an API error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns true if repeating the same call later may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Api { status, .. } => matches!(status, 429 | 500 | 502 | 503 | 504),
            Self::Network(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }
}
