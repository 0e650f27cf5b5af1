//! Wire types for the board server API.

use serde::{Deserialize, Serialize};

/// Error code the server returns (with HTTP 503) when no store is configured.
pub const NOT_CONFIGURED_CODE: &str = "DB_NOT_CONFIGURED";

/// Error body returned by every failing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Body of successful write endpoints (`POST /api/data`, `/api/config`, `/api/init`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
