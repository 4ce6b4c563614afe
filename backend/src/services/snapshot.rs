//! Snapshot store for the upstream inventory collections
//!
//! Each refresh takes a generation number before fetching. A finished fetch is
//! applied only while its generation is still the latest one handed out, so a
//! slow response can never overwrite the result of a newer request.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use shared::models::InventorySnapshot;
use tokio::sync::RwLock;

use crate::error::{AppError, AppResult};
use crate::external::InventoryApiClient;

/// Outcome of offering a fetched snapshot to the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Applied { generation: u64 },
    /// A newer refresh was started while this one was in flight
    Stale { generation: u64, latest: u64 },
}

/// Snapshot state reported by the health endpoint
#[derive(Debug, Clone, Serialize)]
pub struct SnapshotStatus {
    pub loaded: bool,
    pub generation: u64,
    pub refreshed_at: Option<DateTime<Utc>>,
    pub materials: usize,
    pub transactions: usize,
    pub suppliers: usize,
    pub last_error: Option<String>,
}

#[derive(Default)]
struct SnapshotState {
    snapshot: Option<Arc<InventorySnapshot>>,
    generation: u64,
    refreshed_at: Option<DateTime<Utc>>,
    last_error: Option<String>,
}

/// Snapshot service
pub struct SnapshotService {
    client: InventoryApiClient,
    issued: AtomicU64,
    state: RwLock<SnapshotState>,
}

impl SnapshotService {
    pub fn new(client: InventoryApiClient) -> Self {
        Self {
            client,
            issued: AtomicU64::new(0),
            state: RwLock::new(SnapshotState::default()),
        }
    }

    pub fn client(&self) -> &InventoryApiClient {
        &self.client
    }

    /// Hand out the next generation number
    pub fn begin(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn latest_generation(&self) -> u64 {
        self.issued.load(Ordering::SeqCst)
    }

    /// Install `snapshot` if `generation` is still the latest issued
    pub async fn apply(&self, generation: u64, snapshot: InventorySnapshot) -> RefreshOutcome {
        let mut state = self.state.write().await;
        let latest = self.latest_generation();
        if generation != latest {
            tracing::info!(
                "Dropping stale snapshot (generation {}, latest {})",
                generation,
                latest
            );
            return RefreshOutcome::Stale { generation, latest };
        }

        tracing::info!(
            "Applied snapshot generation {}: {} materials, {} transactions, {} suppliers",
            generation,
            snapshot.materials.len(),
            snapshot.transactions.len(),
            snapshot.suppliers.len()
        );
        state.snapshot = Some(Arc::new(snapshot));
        state.generation = generation;
        state.refreshed_at = Some(Utc::now());
        state.last_error = None;
        RefreshOutcome::Applied { generation }
    }

    /// Record a failed fetch; the current snapshot, if any, stays in place
    async fn record_failure(&self, generation: u64, error: &AppError) {
        if generation != self.latest_generation() {
            return;
        }
        let mut state = self.state.write().await;
        state.last_error = Some(error.to_string());
    }

    /// Fetch all three collections concurrently and apply them
    pub async fn refresh(&self) -> AppResult<RefreshOutcome> {
        let generation = self.begin();
        tracing::debug!("Refreshing inventory snapshot (generation {})", generation);

        let fetched = tokio::try_join!(
            self.client.fetch_materials(),
            self.client.fetch_transactions(),
            self.client.fetch_suppliers(),
        );

        match fetched {
            Ok((materials, transactions, suppliers)) => {
                let snapshot = InventorySnapshot::new(materials, transactions, suppliers);
                Ok(self.apply(generation, snapshot).await)
            }
            Err(e) => {
                tracing::error!("Snapshot refresh {} failed: {}", generation, e);
                self.record_failure(generation, &e).await;
                Err(e)
            }
        }
    }

    /// The current snapshot, without fetching
    pub async fn current(&self) -> Option<Arc<InventorySnapshot>> {
        self.state.read().await.snapshot.clone()
    }

    /// The current snapshot, fetching one first if none has been loaded
    pub async fn snapshot(&self) -> AppResult<Arc<InventorySnapshot>> {
        if let Some(snapshot) = self.current().await {
            return Ok(snapshot);
        }
        self.refresh().await?;
        self.current().await.ok_or(AppError::SnapshotUnavailable)
    }

    pub async fn status(&self) -> SnapshotStatus {
        let state = self.state.read().await;
        let (materials, transactions, suppliers) = state
            .snapshot
            .as_ref()
            .map(|s| (s.materials.len(), s.transactions.len(), s.suppliers.len()))
            .unwrap_or_default();
        SnapshotStatus {
            loaded: state.snapshot.is_some(),
            generation: state.generation,
            refreshed_at: state.refreshed_at,
            materials,
            transactions,
            suppliers,
            last_error: state.last_error.clone(),
        }
    }
}
