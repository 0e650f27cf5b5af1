use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Marker the sync client recognizes as "no store configured".
pub const NOT_CONFIGURED_CODE: &str = "DB_NOT_CONFIGURED";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Database is not configured")]
    NotConfigured,

    #[error("{0}")]
    BadRequest(String),

    #[error("{message}")]
    Failed {
        message: String,
        details: Option<String>,
    },
}

impl ApiError {
    pub fn failed(message: impl Into<String>) -> Self {
        ApiError::Failed {
            message: message.into(),
            details: None,
        }
    }

    pub fn failed_with(message: impl Into<String>, details: impl ToString) -> Self {
        ApiError::Failed {
            message: message.into(),
            details: Some(details.to_string()),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::NotConfigured => (
                StatusCode::SERVICE_UNAVAILABLE,
                json!({ "error": NOT_CONFIGURED_CODE }),
            ),
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, json!({ "error": message })),
            ApiError::Failed { message, details } => {
                let body = match details {
                    Some(details) => json!({ "error": message, "details": details }),
                    None => json!({ "error": message }),
                };
                (StatusCode::INTERNAL_SERVER_ERROR, body)
            }
        };
        (status, Json(body)).into_response()
    }
}
