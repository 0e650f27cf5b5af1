//! Error types for the board sync crate.

use thiserror::Error;

/// Result type alias for board sync operations.
pub type Result<T> = std::result::Result<T, BoardSyncError>;

/// Errors that can occur while talking to the board server or the local cache.
#[derive(Debug, Error)]
pub enum BoardSyncError {
    /// Transport failure: connection refused, timeout, broken body.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Non-2xx response from the server
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The server has no store configuration
    #[error("Database is not configured")]
    NotConfigured,

    /// The local cache slot could not be written
    #[error("Local cache error: {0}")]
    Cache(String),
}

impl BoardSyncError {
    /// Create an API error from status and message
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    pub fn cache(message: impl Into<String>) -> Self {
        Self::Cache(message.into())
    }

    pub fn is_not_configured(&self) -> bool {
        matches!(self, Self::NotConfigured)
    }

    /// HTTP status if this is an API error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
