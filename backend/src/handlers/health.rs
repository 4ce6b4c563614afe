//! Health check handlers

use axum::{extract::State, Json};
use serde::Serialize;

use crate::services::SnapshotStatus;
use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub environment: String,
    pub upstream: String,
    pub snapshot: SnapshotStatus,
}

/// Health check endpoint handler
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let snapshot = state.snapshots.status().await;

    let status = if snapshot.loaded { "healthy" } else { "degraded" };
    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        environment: state.config.environment.clone(),
        upstream: state.snapshots.client().base_url().to_string(),
        snapshot,
    })
}
