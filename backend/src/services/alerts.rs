//! Alert listing with gateway-held read flags

use serde::Serialize;
use shared::alerts::{
    critical_count, derive_alerts, filter_alerts, unread_count, AlertFilter, AlertReadState,
    InMemoryReadState,
};
use shared::models::{Alert, InventorySnapshot};
use tokio::sync::RwLock;

use crate::error::{AppError, AppResult};

/// Alert list plus the counters shown above it
#[derive(Debug, Clone, Serialize)]
pub struct AlertList {
    pub filter: AlertFilter,
    pub total: usize,
    pub unread: usize,
    pub critical: usize,
    pub alerts: Vec<Alert>,
}

/// Alert service
#[derive(Default)]
pub struct AlertService {
    read_state: RwLock<InMemoryReadState>,
}

impl AlertService {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn list(&self, snapshot: &InventorySnapshot, filter: AlertFilter) -> AlertList {
        let read_state = self.read_state.read().await;
        let alerts = derive_alerts(&snapshot.materials, &*read_state);
        AlertList {
            filter,
            total: alerts.len(),
            unread: unread_count(&alerts),
            critical: critical_count(&alerts),
            alerts: filter_alerts(&alerts, filter),
        }
    }

    /// Flag an alert as read. The alert must exist in `snapshot`.
    pub async fn mark_read(&self, snapshot: &InventorySnapshot, alert_id: &str) -> AppResult<()> {
        let read_state = self.read_state.read().await;
        let exists = derive_alerts(&snapshot.materials, &*read_state)
            .iter()
            .any(|a| a.id == alert_id);
        drop(read_state);

        if !exists {
            return Err(AppError::NotFound(format!("Alert {}", alert_id)));
        }
        self.read_state.write().await.mark_read(alert_id);
        tracing::debug!("Alert {} marked as read", alert_id);
        Ok(())
    }

    /// Clear the read flag of an alert
    pub async fn dismiss(&self, alert_id: &str) {
        self.read_state.write().await.forget(alert_id);
        tracing::debug!("Alert {} dismissed", alert_id);
    }

    /// Run `f` with the current read flags
    pub async fn with_read_state<T>(&self, f: impl FnOnce(&dyn AlertReadState) -> T) -> T {
        let read_state = self.read_state.read().await;
        f(&*read_state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use shared::models::Material;

    fn material(id: &str, stock: i64, min: i64) -> Material {
        Material {
            id: id.to_string(),
            name: format!("Material {}", id),
            category: "Cement".to_string(),
            unit: "MT".to_string(),
            current_stock: Decimal::from(stock),
            min_stock_level: Decimal::from(min),
            max_stock_level: Decimal::from(min * 2),
            unit_price: Decimal::from(100),
            supplier_id: None,
            supplier_name: None,
            location: String::new(),
            last_updated: None,
        }
    }

    fn snapshot() -> InventorySnapshot {
        InventorySnapshot::new(
            vec![material("1", 0, 50), material("2", 40, 50), material("3", 80, 50)],
            Vec::new(),
            Vec::new(),
        )
    }

    #[tokio::test]
    async fn test_list_and_mark_read() {
        let service = AlertService::new();
        let snapshot = snapshot();

        let all = service.list(&snapshot, AlertFilter::All).await;
        assert_eq!(all.total, 2);
        assert_eq!(all.unread, 2);
        assert_eq!(all.critical, 1);

        service.mark_read(&snapshot, "1").await.unwrap();
        let unread = service.list(&snapshot, AlertFilter::Unread).await;
        assert_eq!(unread.alerts.len(), 1);
        assert_eq!(unread.alerts[0].id, "2");

        let read = service.list(&snapshot, AlertFilter::Read).await;
        assert_eq!(read.alerts[0].id, "1");
    }

    #[tokio::test]
    async fn test_mark_unknown_alert() {
        let service = AlertService::new();
        let result = service.mark_read(&snapshot(), "3").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_dismiss_clears_read_flag() {
        let service = AlertService::new();
        let snapshot = snapshot();
        service.mark_read(&snapshot, "2").await.unwrap();
        service.dismiss("2").await;

        let list = service.list(&snapshot, AlertFilter::All).await;
        assert_eq!(list.unread, 2);
        assert!(service.with_read_state(|state| !state.is_read("2")).await);
    }
}
