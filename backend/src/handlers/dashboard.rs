//! Dashboard and snapshot refresh handlers

use axum::{extract::State, Json};
use serde::Serialize;
use shared::reports::DashboardOverview;

use crate::error::AppResult;
use crate::services::{RefreshOutcome, SnapshotStatus};
use crate::AppState;

/// Landing page figures
pub async fn get_dashboard(State(state): State<AppState>) -> AppResult<Json<DashboardOverview>> {
    let snapshot = state.snapshots.snapshot().await?;
    let overview = state
        .alerts
        .with_read_state(|read_state| state.reporting.dashboard(&snapshot, read_state))
        .await;
    Ok(Json(overview))
}

#[derive(Serialize)]
pub struct RefreshResponse {
    pub applied: bool,
    pub generation: u64,
    pub snapshot: SnapshotStatus,
}

/// Re-fetch every collection from upstream
pub async fn refresh_snapshot(State(state): State<AppState>) -> AppResult<Json<RefreshResponse>> {
    let outcome = state.snapshots.refresh().await?;
    let (applied, generation) = match outcome {
        RefreshOutcome::Applied { generation } => (true, generation),
        RefreshOutcome::Stale { generation, .. } => (false, generation),
    };
    Ok(Json(RefreshResponse {
        applied,
        generation,
        snapshot: state.snapshots.status().await,
    }))
}
