use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;

use crate::{config::AppMode, ApiState};

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    mode: String,
}

#[derive(Serialize)]
struct VersionResponse {
    version: String,
}

async fn health_check(State(state): State<Arc<ApiState>>) -> Json<HealthResponse> {
    let mode = match state.mode {
        AppMode::Live => "live",
        AppMode::Demo => "demo",
    };
    Json(HealthResponse {
        status: "ok".to_string(),
        mode: mode.to_string(),
    })
}

async fn version() -> Json<VersionResponse> {
    Json(VersionResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/health", get(health_check))
        .route("/version", get(version))
}
