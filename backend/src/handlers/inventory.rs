//! HTTP handlers that forward inventory mutations upstream
//!
//! Inputs are validated before they leave the gateway. After a successful
//! mutation the snapshot is re-fetched so reports reflect the change.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use shared::models::{
    Material, MaterialInput, Supplier, SupplierInput, Transaction, TransactionInput,
};
use validator::Validate;

use crate::error::AppResult;
use crate::services::RefreshOutcome;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct MutationResponse<T> {
    /// The record as echoed by the upstream service, when it sent one back
    pub record: Option<T>,
    /// Whether the follow-up snapshot refresh was applied
    pub refreshed: bool,
}

async fn refresh_after_mutation(state: &AppState, what: &str) -> bool {
    match state.snapshots.refresh().await {
        Ok(RefreshOutcome::Applied { .. }) => true,
        Ok(RefreshOutcome::Stale { .. }) => false,
        Err(e) => {
            tracing::warn!("Refresh after {} failed: {}", what, e);
            false
        }
    }
}

async fn respond<T>(
    state: &AppState,
    what: &str,
    record: Option<T>,
) -> Json<MutationResponse<T>> {
    let refreshed = refresh_after_mutation(state, what).await;
    Json(MutationResponse { record, refreshed })
}

/// Create a material
pub async fn create_material(
    State(state): State<AppState>,
    Json(input): Json<MaterialInput>,
) -> AppResult<(StatusCode, Json<MutationResponse<Material>>)> {
    input.validate()?;
    let record = state.snapshots.client().create_material(&input).await?;
    tracing::info!("Created material {}", input.name);
    Ok((StatusCode::CREATED, respond(&state, "material create", record).await))
}

/// Replace a material
pub async fn update_material(
    State(state): State<AppState>,
    Path(material_id): Path<String>,
    Json(input): Json<MaterialInput>,
) -> AppResult<Json<MutationResponse<Material>>> {
    input.validate()?;
    let record = state
        .snapshots
        .client()
        .update_material(&material_id, &input)
        .await?;
    tracing::info!("Updated material {}", material_id);
    Ok(respond(&state, "material update", record).await)
}

/// Delete a material
pub async fn delete_material(
    State(state): State<AppState>,
    Path(material_id): Path<String>,
) -> AppResult<StatusCode> {
    state.snapshots.client().delete_material(&material_id).await?;
    tracing::info!("Deleted material {}", material_id);
    refresh_after_mutation(&state, "material delete").await;
    Ok(StatusCode::NO_CONTENT)
}

/// Create a supplier
pub async fn create_supplier(
    State(state): State<AppState>,
    Json(input): Json<SupplierInput>,
) -> AppResult<(StatusCode, Json<MutationResponse<Supplier>>)> {
    input.validate()?;
    let record = state.snapshots.client().create_supplier(&input).await?;
    tracing::info!("Created supplier {}", input.name);
    Ok((StatusCode::CREATED, respond(&state, "supplier create", record).await))
}

/// Replace a supplier
pub async fn update_supplier(
    State(state): State<AppState>,
    Path(supplier_id): Path<String>,
    Json(input): Json<SupplierInput>,
) -> AppResult<Json<MutationResponse<Supplier>>> {
    input.validate()?;
    let record = state
        .snapshots
        .client()
        .update_supplier(&supplier_id, &input)
        .await?;
    tracing::info!("Updated supplier {}", supplier_id);
    Ok(respond(&state, "supplier update", record).await)
}

/// Delete a supplier
pub async fn delete_supplier(
    State(state): State<AppState>,
    Path(supplier_id): Path<String>,
) -> AppResult<StatusCode> {
    state.snapshots.client().delete_supplier(&supplier_id).await?;
    tracing::info!("Deleted supplier {}", supplier_id);
    refresh_after_mutation(&state, "supplier delete").await;
    Ok(StatusCode::NO_CONTENT)
}

/// Record a stock-in or stock-out transaction
pub async fn record_transaction(
    State(state): State<AppState>,
    Json(input): Json<TransactionInput>,
) -> AppResult<(StatusCode, Json<MutationResponse<Transaction>>)> {
    input.validate()?;
    let record = state.snapshots.client().create_transaction(&input).await?;
    tracing::info!(
        "Recorded {} of {} for material {}",
        input.direction,
        input.quantity,
        input.material_id
    );
    Ok((StatusCode::CREATED, respond(&state, "transaction", record).await))
}
