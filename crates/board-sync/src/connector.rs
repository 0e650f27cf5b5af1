//! Fallback policy around the board server.
//!
//! Reads fall back from the server to the local cache to the seeded board;
//! writes always land in the local cache first. Only a missing store
//! configuration, and a save that reaches neither place, reach the caller.

use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info, warn};
use taskpulse_core::board::{default_graph, EntityGraph};
use taskpulse_core::config::{ConfigStatus, ConnectionConfigRecord};
use taskpulse_core::sync::SaveOutcome;

use crate::cache::LocalCache;
use crate::client::BoardSyncClient;
use crate::error::{BoardSyncError, Result};
use crate::types::SuccessResponse;

/// Server operations the connector depends on.
#[async_trait]
pub trait BoardApi: Send + Sync {
    async fn fetch_graph(&self) -> Result<EntityGraph>;

    async fn store_graph(&self, graph: &EntityGraph) -> Result<()>;

    async fn config_status(&self) -> Result<ConfigStatus>;

    async fn store_config(&self, record: &ConnectionConfigRecord) -> Result<()>;

    async fn init_schema(&self) -> Result<SuccessResponse>;
}

#[async_trait]
impl BoardApi for BoardSyncClient {
    async fn fetch_graph(&self) -> Result<EntityGraph> {
        self.get_data().await
    }

    async fn store_graph(&self, graph: &EntityGraph) -> Result<()> {
        self.post_data(graph).await.map(|_| ())
    }

    async fn config_status(&self) -> Result<ConfigStatus> {
        self.get_config().await
    }

    async fn store_config(&self, record: &ConnectionConfigRecord) -> Result<()> {
        self.post_config(record).await.map(|_| ())
    }

    async fn init_schema(&self) -> Result<SuccessResponse> {
        self.post_init().await
    }
}

/// Something that can persist a full board snapshot.
#[async_trait]
pub trait GraphSaver: Send + Sync {
    async fn save_graph(&self, graph: &EntityGraph) -> Result<SaveOutcome>;
}

pub struct RemoteConnector {
    api: Arc<dyn BoardApi>,
    cache: Arc<dyn LocalCache>,
}

impl RemoteConnector {
    pub fn new(api: Arc<dyn BoardApi>, cache: Arc<dyn LocalCache>) -> Self {
        Self { api, cache }
    }

    /// Connector talking HTTP to the server at `base_url`.
    pub fn with_server(base_url: &str, cache: Arc<dyn LocalCache>) -> Result<Self> {
        Ok(Self::new(Arc::new(BoardSyncClient::new(base_url)?), cache))
    }

    /// Connector for a server on [`taskpulse_core::sync::DEFAULT_SERVER_URL`].
    pub fn with_default_server(cache: Arc<dyn LocalCache>) -> Result<Self> {
        Ok(Self::new(Arc::new(BoardSyncClient::default_server()?), cache))
    }

    /// Load the board for a new session.
    ///
    /// Fails only with [`BoardSyncError::NotConfigured`]. Any other failure
    /// falls back to the cached board, then to the seeded one.
    pub async fn fetch_graph(&self) -> Result<EntityGraph> {
        match self.api.fetch_graph().await {
            Ok(graph) => {
                if let Err(e) = self.write_cache(graph.clone()).await {
                    warn!("[BoardSync] Failed to refresh local cache: {}", e);
                }
                Ok(graph)
            }
            Err(BoardSyncError::NotConfigured) => Err(BoardSyncError::NotConfigured),
            Err(e) => {
                warn!("[BoardSync] Fetch failed, using local fallback: {}", e);
                match self.read_cache().await {
                    Some(graph) => Ok(graph),
                    None => {
                        info!("[BoardSync] No cached board, starting from the default board");
                        Ok(default_graph())
                    }
                }
            }
        }
    }

    /// Cache first, then the server. A server failure of any kind gives a
    /// `Local` outcome; the call errs only if the cache write failed as well.
    pub async fn save_graph(&self, graph: &EntityGraph) -> Result<SaveOutcome> {
        let cached = self.write_cache(graph.clone()).await;
        if let Err(e) = &cached {
            warn!("[BoardSync] Local cache write failed: {}", e);
        }

        match self.api.store_graph(graph).await {
            Ok(()) => {
                debug!("[BoardSync] Board saved to server");
                Ok(SaveOutcome::remote())
            }
            Err(e) => {
                warn!("[BoardSync] Server save failed: {}", e);
                cached.map(|()| SaveOutcome::local())
            }
        }
    }

    async fn write_cache(&self, graph: EntityGraph) -> Result<()> {
        let cache = self.cache.clone();
        tokio::task::spawn_blocking(move || cache.write(&graph))
            .await
            .map_err(|e| BoardSyncError::cache(e.to_string()))?
    }

    async fn read_cache(&self) -> Option<EntityGraph> {
        let cache = self.cache.clone();
        match tokio::task::spawn_blocking(move || cache.read()).await {
            Ok(graph) => graph,
            Err(e) => {
                warn!("[BoardSync] Cache read task failed: {}", e);
                None
            }
        }
    }

    /// `true` only when the server returns the board with a 2xx.
    pub async fn check_reachable(&self) -> bool {
        match self.api.fetch_graph().await {
            Ok(_) => true,
            Err(e) => {
                debug!("[BoardSync] Server not usable: {}", e);
                false
            }
        }
    }

    /// Server configuration status; "not configured" when it cannot be read.
    pub async fn get_config(&self) -> ConfigStatus {
        self.api.config_status().await.unwrap_or_else(|e| {
            debug!("[BoardSync] Config fetch failed: {}", e);
            ConfigStatus::default()
        })
    }

    pub async fn save_config(&self, record: &ConnectionConfigRecord) -> Result<()> {
        self.api.store_config(record).await
    }

    /// Returns the server's confirmation message.
    pub async fn initialize_schema(&self) -> Result<String> {
        let response = self.api.init_schema().await?;
        Ok(response
            .message
            .unwrap_or_else(|| "Database initialized".to_string()))
    }
}

#[async_trait]
impl GraphSaver for RemoteConnector {
    async fn save_graph(&self, graph: &EntityGraph) -> Result<SaveOutcome> {
        RemoteConnector::save_graph(self, graph).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryLocalCache;
    use crate::test_support::{unreachable_url, MockServer};
    use taskpulse_core::board::Group;
    use taskpulse_core::sync::SaveMode;

    struct BrokenCache;

    impl LocalCache for BrokenCache {
        fn write(&self, _graph: &EntityGraph) -> Result<()> {
            Err(BoardSyncError::cache("disk full"))
        }

        fn read(&self) -> Option<EntityGraph> {
            None
        }
    }

    fn small_graph() -> EntityGraph {
        EntityGraph {
            groups: vec![Group {
                id: "g1".to_string(),
                name: "Eng".to_string(),
            }],
            ..Default::default()
        }
    }

    async fn offline(cache: Arc<dyn LocalCache>) -> RemoteConnector {
        RemoteConnector::with_server(&unreachable_url().await, cache).unwrap()
    }

    #[tokio::test]
    async fn unreachable_without_cache_falls_back_to_seed() {
        let connector = offline(Arc::new(MemoryLocalCache::new())).await;
        let graph = connector.fetch_graph().await.unwrap();
        assert_eq!(graph.tasks.len(), default_graph().tasks.len());
        assert_eq!(graph.groups.len(), 4);
    }

    #[tokio::test]
    async fn unreachable_with_cache_returns_cached_board() {
        let connector = offline(Arc::new(MemoryLocalCache::with_graph(small_graph()))).await;
        assert_eq!(connector.fetch_graph().await.unwrap(), small_graph());
    }

    #[tokio::test]
    async fn server_error_falls_back_to_cache() {
        let server = MockServer::start(vec![(
            "GET /api/data",
            500,
            r#"{"error":"Failed to fetch data from database","details":"boom"}"#,
        )])
        .await;
        let cache = Arc::new(MemoryLocalCache::with_graph(small_graph()));
        let connector = RemoteConnector::with_server(&server.url(), cache).unwrap();
        assert_eq!(connector.fetch_graph().await.unwrap(), small_graph());
    }

    #[tokio::test]
    async fn not_configured_propagates_without_fallback() {
        let server = MockServer::start(vec![(
            "GET /api/data",
            503,
            r#"{"error":"DB_NOT_CONFIGURED"}"#,
        )])
        .await;
        let cache = Arc::new(MemoryLocalCache::with_graph(small_graph()));
        let connector = RemoteConnector::with_server(&server.url(), cache).unwrap();

        assert!(connector.fetch_graph().await.unwrap_err().is_not_configured());
        assert!(!connector.check_reachable().await);
    }

    #[tokio::test]
    async fn successful_fetch_refreshes_cache() {
        let server = MockServer::start(vec![(
            "GET /api/data",
            200,
            r#"{"tasks":[],"members":[],"groups":[{"id":"g7","name":"Remote"}]}"#,
        )])
        .await;
        let cache = Arc::new(MemoryLocalCache::with_graph(small_graph()));
        let connector = RemoteConnector::with_server(&server.url(), cache.clone()).unwrap();

        let graph = connector.fetch_graph().await.unwrap();
        assert_eq!(graph.groups[0].id, "g7");
        assert_eq!(cache.read(), Some(graph));
        assert!(connector.check_reachable().await);
    }

    #[tokio::test]
    async fn remote_failure_saves_locally() {
        let server = MockServer::start(vec![(
            "POST /api/data",
            500,
            r#"{"error":"Failed to save data to database"}"#,
        )])
        .await;
        let cache = Arc::new(MemoryLocalCache::new());
        let connector = RemoteConnector::with_server(&server.url(), cache.clone()).unwrap();

        let outcome = connector.save_graph(&small_graph()).await.unwrap();
        assert_eq!(outcome.mode, SaveMode::Local);
        assert!(!outcome.ok);
        assert_eq!(cache.read(), Some(small_graph()));
    }

    #[tokio::test]
    async fn unreachable_save_saves_locally() {
        let cache = Arc::new(MemoryLocalCache::new());
        let connector = offline(cache.clone()).await;

        let outcome = connector.save_graph(&small_graph()).await.unwrap();
        assert_eq!(outcome, SaveOutcome::local());
        assert_eq!(cache.read(), Some(small_graph()));
    }

    #[tokio::test]
    async fn remote_ack_is_remote_even_if_cache_fails() {
        let server =
            MockServer::start(vec![("POST /api/data", 200, r#"{"success":true}"#)]).await;
        let connector = RemoteConnector::with_server(&server.url(), Arc::new(BrokenCache)).unwrap();

        assert_eq!(
            connector.save_graph(&small_graph()).await.unwrap(),
            SaveOutcome::remote()
        );
    }

    #[tokio::test]
    async fn save_fails_when_neither_cache_nor_server_accepts() {
        let connector = offline(Arc::new(BrokenCache)).await;
        assert!(matches!(
            connector.save_graph(&small_graph()).await,
            Err(BoardSyncError::Cache(_))
        ));
    }

    #[tokio::test]
    async fn config_status_degrades_when_server_is_down() {
        let connector = offline(Arc::new(MemoryLocalCache::new())).await;
        let status = connector.get_config().await;
        assert!(!status.configured);
        assert_eq!(status.config, ConnectionConfigRecord::default());
    }

    #[tokio::test]
    async fn setup_actions_surface_failures() {
        let server = MockServer::start(vec![
            ("POST /api/config", 200, r#"{"success":true}"#),
            (
                "POST /api/init",
                400,
                r#"{"error":"Database not configured"}"#,
            ),
        ])
        .await;
        let connector =
            RemoteConnector::with_server(&server.url(), Arc::new(MemoryLocalCache::new()))
                .unwrap();

        let record = ConnectionConfigRecord {
            host: Some("localhost".to_string()),
            user: Some("root".to_string()),
            database: Some("taskpulse".to_string()),
            ..Default::default()
        };
        connector.save_config(&record).await.unwrap();

        let err = connector.initialize_schema().await.unwrap_err();
        assert_eq!(err.status_code(), Some(400));

        let posted = server.requests().await;
        let body: serde_json::Value = serde_json::from_str(&posted[0].body).unwrap();
        assert_eq!(body["host"], "localhost");
        assert!(body.get("password").is_none());
    }
}
