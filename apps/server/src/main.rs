//! TaskPulse board server: store configuration plus whole-board read and replace.

mod api;
mod error;
mod main_lib;

use main_lib::{app_router, build_state, init_tracing, Config};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;

    let config = Config::from_env();
    let state = build_state(&config)?;
    let app = app_router(state);

    let listener = TcpListener::bind(config.listen_addr).await?;
    tracing::info!("TaskPulse server listening on {}", config.listen_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
