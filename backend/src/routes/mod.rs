//! Route definitions for the RMC inventory reporting gateway

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/dashboard", get(handlers::get_dashboard))
        .route("/refresh", post(handlers::refresh_snapshot))
        .nest("/reports", report_routes())
        .nest("/alerts", alert_routes())
        .nest("/materials", material_routes())
        .nest("/suppliers", supplier_routes())
        .route("/transactions", post(handlers::record_transaction))
}

/// Report routes
fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_reports))
        .route("/:kind", get(handlers::get_report))
}

/// Alert routes
fn alert_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_alerts))
        .route("/:alert_id", delete(handlers::dismiss_alert))
        .route("/:alert_id/read", post(handlers::mark_alert_read))
}

/// Material mutation routes
fn material_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::create_material))
        .route(
            "/:material_id",
            put(handlers::update_material).delete(handlers::delete_material),
        )
}

/// Supplier mutation routes
fn supplier_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::create_supplier))
        .route(
            "/:supplier_id",
            put(handlers::update_supplier).delete(handlers::delete_supplier),
        )
}
