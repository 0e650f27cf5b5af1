//! Whole-board read and replace.

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use taskpulse_core::board::{BoardRepositoryTrait, EntityGraph};
use taskpulse_storage_sqlite::BoardStore;
use tracing::{debug, error, info};

use super::SuccessBody;
use crate::error::{ApiError, ApiResult};
use crate::main_lib::AppState;

const FETCH_FAILED: &str = "Failed to fetch data from database";
const SAVE_FAILED: &str = "Failed to save data to database";

async fn open_store(state: &Arc<AppState>) -> taskpulse_core::Result<Arc<BoardStore>> {
    let state = state.clone();
    tokio::task::spawn_blocking(move || state.open_store())
        .await
        .map_err(|e| {
            taskpulse_core::Error::Database(taskpulse_core::errors::DatabaseError::Internal(
                e.to_string(),
            ))
        })?
}

async fn get_data(State(state): State<Arc<AppState>>) -> ApiResult<Json<EntityGraph>> {
    let store = open_store(&state).await.map_err(|e| {
        if e.is_not_configured() {
            ApiError::NotConfigured
        } else {
            error!("{}: {}", FETCH_FAILED, e);
            ApiError::failed_with(FETCH_FAILED, e)
        }
    })?;

    let graph = tokio::task::spawn_blocking(move || store.repository().load_graph())
        .await
        .map_err(|e| ApiError::failed_with(FETCH_FAILED, e))?
        .map_err(|e| {
            error!("{}: {}", FETCH_FAILED, e);
            ApiError::failed_with(FETCH_FAILED, e)
        })?;

    debug!(
        "Loaded board: {} groups, {} members, {} tasks",
        graph.groups.len(),
        graph.members.len(),
        graph.tasks.len()
    );
    Ok(Json(graph))
}

/// Replace the stored board. A graph that fails validation is refused with
/// `400` before any transaction starts; clients treat it like any other
/// non-2xx and keep the edit locally.
async fn save_data(
    State(state): State<Arc<AppState>>,
    Json(graph): Json<EntityGraph>,
) -> ApiResult<Json<SuccessBody>> {
    graph
        .validate()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let store = open_store(&state).await.map_err(|e| {
        error!("{}: {}", SAVE_FAILED, e);
        ApiError::failed(SAVE_FAILED)
    })?;

    let task_count = graph.tasks.len();
    store
        .repository()
        .replace_graph(graph)
        .await
        .map_err(|e| {
            error!("{}: {}", SAVE_FAILED, e);
            ApiError::failed(SAVE_FAILED)
        })?;

    info!("Board saved ({} tasks)", task_count);
    Ok(Json(SuccessBody::ok()))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/data", get(get_data).post(save_data))
}
