use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use axum::extract::DefaultBodyLimit;
use axum::Router;
use taskpulse_core::config::ConfigResolver;
use taskpulse_storage_sqlite::{BoardStore, BoardStoreProvider};
use tracing_subscriber::EnvFilter;

use crate::api;

const DEFAULT_PORT: u16 = 3001;
const DEFAULT_DATA_DIR: &str = "./data";
/// Boards are posted whole, so allow generous request bodies.
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub data_dir: PathBuf,
    pub config_file: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        let port = match std::env::var("PORT") {
            Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
                tracing::warn!("Ignoring invalid PORT '{}', using {}", raw, DEFAULT_PORT);
                DEFAULT_PORT
            }),
            Err(_) => DEFAULT_PORT,
        };
        let data_dir = std::env::var("TASKPULSE_DATA_DIR")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
        let config_file = std::env::var("TASKPULSE_CONFIG_FILE")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join(taskpulse_core::config::CONFIG_RECORD_FILE));

        Self {
            listen_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, port)),
            data_dir,
            config_file,
        }
    }
}

pub struct AppState {
    pub resolver: ConfigResolver,
    pub stores: BoardStoreProvider,
}

impl AppState {
    pub fn new(resolver: ConfigResolver, stores: BoardStoreProvider) -> Self {
        Self { resolver, stores }
    }

    /// Store for the configuration in effect right now. Blocking.
    pub fn open_store(&self) -> taskpulse_core::Result<Arc<BoardStore>> {
        let config = self.resolver.resolve()?;
        self.stores.open(&config)
    }
}

pub fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    std::fs::create_dir_all(&config.data_dir).with_context(|| {
        format!("Failed to create data directory {}", config.data_dir.display())
    })?;
    let data_dir = config
        .data_dir
        .to_str()
        .context("Data directory path is not valid UTF-8")?;

    let resolver = ConfigResolver::from_process_env(&config.config_file);
    tracing::info!(
        "Configuration record at {}",
        resolver.record_path().display()
    );
    Ok(Arc::new(AppState::new(
        resolver,
        BoardStoreProvider::new(data_dir),
    )))
}

pub fn app_router(state: Arc<AppState>) -> Router {
    Router::new()
        .nest("/api", api::router())
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}

pub fn init_tracing() -> anyhow::Result<()> {
    tracing_log::LogTracer::init().context("Failed to install log bridge")?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to install tracing subscriber")?;
    Ok(())
}
