//! RMC Plant Inventory - Reporting Gateway
//!
//! Fetches materials, transactions and suppliers from the plant's inventory
//! service and serves derived reports, alerts and dashboard figures.

use axum::{routing::get, Router};
use std::{net::SocketAddr, sync::Arc};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod external;
mod handlers;
mod routes;
mod services;

pub use config::Config;

use external::InventoryApiClient;
use services::{AlertService, ReportingService, SnapshotService};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub snapshots: Arc<SnapshotService>,
    pub alerts: Arc<AlertService>,
    pub reporting: ReportingService,
}

impl AppState {
    pub fn new(config: Config) -> error::AppResult<Self> {
        let client = InventoryApiClient::new(&config.upstream)?;
        Ok(Self {
            snapshots: Arc::new(SnapshotService::new(client)),
            alerts: Arc::new(AlertService::new()),
            reporting: ReportingService::new(config.reports.clone()),
            config: Arc::new(config),
        })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before the filter reads RUST_LOG
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rmc_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = config::Config::load()?;

    tracing::info!("Starting RMC inventory reporting gateway");
    tracing::info!("Environment: {}", config.environment);
    tracing::info!("Upstream inventory service: {}", config.upstream.base_url);

    let state = AppState::new(config.clone())?;

    // Warm the snapshot; the gateway still starts if upstream is down
    if let Err(e) = state.snapshots.refresh().await {
        tracing::warn!("Initial snapshot fetch failed: {}", e);
    }

    // Build application
    let app = create_app(state);

    // Start server
    let ip: std::net::IpAddr = config
        .server
        .host
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid server host '{}': {}", config.server.host, e))?;
    let addr = SocketAddr::new(ip, config.server.port);
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes and middleware
fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "RMC Plant Inventory Reporting API v1.0"
}
