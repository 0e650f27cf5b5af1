//! HTTP client for the TaskPulse board server.

use std::time::Duration;

use log::debug;
use taskpulse_core::board::EntityGraph;
use taskpulse_core::config::{ConfigStatus, ConnectionConfigRecord};
use taskpulse_core::sync::{BOARD_SYNC_HTTP_TIMEOUT_SECS, DEFAULT_SERVER_URL};

use crate::error::{BoardSyncError, Result};
use crate::types::*;

const MAX_LOG_BODY_CHARS: usize = 512;

/// Client for the board server's `/api` endpoints.
#[derive(Debug, Clone)]
pub struct BoardSyncClient {
    client: reqwest::Client,
    base_url: String,
}

impl BoardSyncClient {
    fn log_response(status: reqwest::StatusCode, body: &str) {
        if status.is_success() {
            debug!("[BoardSync] API response status: {}", status);
            return;
        }

        let mut preview = body.chars().take(MAX_LOG_BODY_CHARS).collect::<String>();
        if body.chars().count() > MAX_LOG_BODY_CHARS {
            preview.push_str("...");
        }
        debug!("[BoardSync] API response error ({}): {}", status, preview);
    }

    /// Create a new client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Server root, e.g. `http://127.0.0.1:3001`. A trailing slash is ignored.
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(BOARD_SYNC_HTTP_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Client for the server on [`DEFAULT_SERVER_URL`].
    pub fn default_server() -> Result<Self> {
        Self::new(DEFAULT_SERVER_URL)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path)
    }

    /// Parse a JSON response body, mapping error bodies onto [`BoardSyncError`].
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();
        let body = response.text().await?;
        Self::log_response(status, &body);

        if !status.is_success() {
            if let Ok(error) = serde_json::from_str::<ApiErrorResponse>(&body) {
                if status == reqwest::StatusCode::SERVICE_UNAVAILABLE
                    && error.error == NOT_CONFIGURED_CODE
                {
                    return Err(BoardSyncError::NotConfigured);
                }
                let message = match error.details {
                    Some(details) => format!("{}: {}", error.error, details),
                    None => error.error,
                };
                return Err(BoardSyncError::api(status.as_u16(), message));
            }
            return Err(BoardSyncError::api(
                status.as_u16(),
                format!("Request failed: {}", body),
            ));
        }

        serde_json::from_str(&body).map_err(|e| {
            log::error!("[BoardSync] Failed to deserialize response: {}", e);
            BoardSyncError::from(e)
        })
    }

    /// Fetch the whole board.
    ///
    /// GET /api/data
    pub async fn get_data(&self) -> Result<EntityGraph> {
        let response = self.client.get(self.url("data")).send().await?;
        Self::parse_response(response).await
    }

    /// Replace the whole board.
    ///
    /// POST /api/data
    pub async fn post_data(&self, graph: &EntityGraph) -> Result<SuccessResponse> {
        debug!(
            "[BoardSync] Posting board with {} task(s), {} member(s), {} group(s)",
            graph.tasks.len(),
            graph.members.len(),
            graph.groups.len()
        );
        let response = self
            .client
            .post(self.url("data"))
            .json(graph)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    /// GET /api/config
    pub async fn get_config(&self) -> Result<ConfigStatus> {
        let response = self.client.get(self.url("config")).send().await?;
        Self::parse_response(response).await
    }

    /// POST /api/config
    pub async fn post_config(&self, record: &ConnectionConfigRecord) -> Result<SuccessResponse> {
        let response = self
            .client
            .post(self.url("config"))
            .json(record)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    /// Create the board tables if missing.
    ///
    /// POST /api/init
    pub async fn post_init(&self) -> Result<SuccessResponse> {
        let response = self.client.post(self.url("init")).send().await?;
        Self::parse_response(response).await
    }
}
