use std::sync::Arc;

use axum::Router;
use serde::Serialize;

use crate::main_lib::AppState;

mod config;
mod data;

#[derive(Debug, Serialize)]
pub(crate) struct SuccessBody {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'static str>,
}

impl SuccessBody {
    pub(crate) fn ok() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    pub(crate) fn with_message(message: &'static str) -> Self {
        Self {
            success: true,
            message: Some(message),
        }
    }
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().merge(config::router()).merge(data::router())
}
