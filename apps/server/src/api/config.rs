//! Store configuration endpoints: inspect, record and initialize.

use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use taskpulse_core::config::{ConfigStatus, ConnectionConfig, ConnectionConfigRecord};
use tracing::{error, info};

use super::SuccessBody;
use crate::error::{ApiError, ApiResult};
use crate::main_lib::AppState;

async fn resolve_config(state: &AppState) -> ApiResult<Option<ConnectionConfig>> {
    let resolver = state.resolver.clone();
    tokio::task::spawn_blocking(move || resolver.try_resolve())
        .await
        .map_err(|e| ApiError::failed(e.to_string()))
}

async fn get_config(State(state): State<Arc<AppState>>) -> ApiResult<Json<ConfigStatus>> {
    let resolved = resolve_config(&state).await?;
    Ok(Json(ConfigStatus::from_resolved(resolved.as_ref())))
}

async fn save_config(
    State(state): State<Arc<AppState>>,
    Json(record): Json<ConnectionConfigRecord>,
) -> ApiResult<Json<SuccessBody>> {
    let resolver = state.resolver.clone();
    tokio::task::spawn_blocking(move || resolver.save(&record))
        .await
        .map_err(|e| ApiError::failed_with("Failed to save config", e))?
        .map_err(|e| {
            error!("Failed to save config: {}", e);
            ApiError::failed("Failed to save config")
        })?;
    Ok(Json(SuccessBody::ok()))
}

async fn init_database(State(state): State<Arc<AppState>>) -> ApiResult<Json<SuccessBody>> {
    let Some(config) = resolve_config(&state).await? else {
        return Err(ApiError::BadRequest("Database not configured".to_string()));
    };

    let result = tokio::task::spawn_blocking(move || {
        let store = state.stores.open(&config)?;
        store.initialize_schema()?;
        Ok::<_, taskpulse_core::Error>(store.db_path().to_string())
    })
    .await
    .map_err(|e| ApiError::failed(e.to_string()))?;

    match result {
        Ok(db_path) => {
            info!("Board schema ready at {}", db_path);
            Ok(Json(SuccessBody::with_message(
                "Database initialized successfully",
            )))
        }
        Err(e) => {
            error!("Schema initialization failed: {}", e);
            Err(ApiError::failed(e.to_string()))
        }
    }
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/config", get(get_config).post(save_config))
        .route("/init", post(init_database))
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use crate::main_lib::test_support::spawn_server;

    #[tokio::test]
    async fn unconfigured_server_reports_empty_config() {
        let server = spawn_server().await;
        let body: Value = reqwest::get(format!("{}/api/config", server.url))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body, json!({ "configured": false, "config": {} }));
    }

    #[tokio::test]
    async fn init_without_config_is_a_bad_request() {
        let server = spawn_server().await;
        let response = reqwest::Client::new()
            .post(format!("{}/api/init", server.url))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 400);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["error"], "Database not configured");
    }

    #[tokio::test]
    async fn saved_config_is_reported_with_masked_password() {
        let server = spawn_server().await;
        let client = reqwest::Client::new();
        let saved: Value = client
            .post(format!("{}/api/config", server.url))
            .json(&json!({
                "host": "localhost",
                "user": "root",
                "password": "hunter2",
                "database": "board",
            }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(saved, json!({ "success": true }));

        let body: Value = client
            .get(format!("{}/api/config", server.url))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["configured"], true);
        assert_eq!(body["config"]["host"], "localhost");
        assert_eq!(body["config"]["database"], "board");
        assert_eq!(body["config"]["password"], "***");
        assert!(!body.to_string().contains("hunter2"));
    }

    #[tokio::test]
    async fn init_is_idempotent() {
        let server = spawn_server().await;
        let client = reqwest::Client::new();
        client
            .post(format!("{}/api/config", server.url))
            .json(&json!({ "host": "localhost", "user": "root", "database": "board" }))
            .send()
            .await
            .unwrap();

        for _ in 0..2 {
            let response = client
                .post(format!("{}/api/init", server.url))
                .send()
                .await
                .unwrap();
            assert_eq!(response.status(), 200);
            let body: Value = response.json().await.unwrap();
            assert_eq!(
                body,
                json!({ "success": true, "message": "Database initialized successfully" })
            );
        }
    }

    #[tokio::test]
    async fn init_with_unusable_database_name_fails() {
        let server = spawn_server().await;
        let client = reqwest::Client::new();
        client
            .post(format!("{}/api/config", server.url))
            .json(&json!({ "host": "localhost", "user": "root", "database": "../escape" }))
            .send()
            .await
            .unwrap();

        let response = client
            .post(format!("{}/api/init", server.url))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 500);
        let body: Value = response.json().await.unwrap();
        assert!(body["error"].as_str().unwrap().contains("../escape"));
    }
}
