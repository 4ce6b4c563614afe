//! Low-stock alert handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use shared::alerts::AlertFilter;

use crate::error::AppResult;
use crate::services::alerts::AlertList;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct AlertQuery {
    #[serde(default)]
    pub filter: AlertFilter,
}

/// List alerts derived from the current snapshot
pub async fn list_alerts(
    State(state): State<AppState>,
    Query(query): Query<AlertQuery>,
) -> AppResult<Json<AlertList>> {
    let snapshot = state.snapshots.snapshot().await?;
    Ok(Json(state.alerts.list(&snapshot, query.filter).await))
}

/// Mark an alert as read
pub async fn mark_alert_read(
    State(state): State<AppState>,
    Path(alert_id): Path<String>,
) -> AppResult<StatusCode> {
    let snapshot = state.snapshots.snapshot().await?;
    state.alerts.mark_read(&snapshot, &alert_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Dismiss an alert, clearing its read flag
pub async fn dismiss_alert(
    State(state): State<AppState>,
    Path(alert_id): Path<String>,
) -> StatusCode {
    state.alerts.dismiss(&alert_id).await;
    StatusCode::NO_CONTENT
}
