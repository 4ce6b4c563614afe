//! Dashboard landing page figures

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{MovementRow, ReportEngine};
use crate::alerts::{derive_alerts, unread_count, AlertReadState};
use crate::models::Alert;

/// Rows shown in each dashboard list
pub const DASHBOARD_LIST_LIMIT: usize = 5;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashboardOverview {
    pub total_materials: usize,
    /// Materials requiring attention
    pub low_stock_count: usize,
    pub unread_alerts: usize,
    pub total_value: Decimal,
    pub movements_today: usize,
    pub low_stock_alerts: Vec<Alert>,
    pub recent_movements: Vec<MovementRow>,
}

impl<'a> ReportEngine<'a> {
    pub fn dashboard_overview(&self, read_state: &dyn AlertReadState) -> DashboardOverview {
        let today = self.options().today;
        let alerts = derive_alerts(self.materials(), read_state);

        DashboardOverview {
            total_materials: self.materials().len(),
            low_stock_count: alerts.len(),
            unread_alerts: unread_count(&alerts),
            total_value: self.total_inventory_value(),
            movements_today: self
                .transactions()
                .iter()
                .filter(|t| t.created_on() == Some(today))
                .count(),
            low_stock_alerts: alerts.into_iter().take(DASHBOARD_LIST_LIMIT).collect(),
            recent_movements: self.recent_movements(DASHBOARD_LIST_LIMIT),
        }
    }
}
