//! Low-stock alert derivation and the client-local read-state store

use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{Alert, AlertSeverity, AlertType, Material};
use crate::types::format_one_dp;

/// Tracks which alerts the user has already seen, keyed by alert id.
///
/// Read flags are client-local; the upstream service knows nothing about them.
pub trait AlertReadState {
    fn is_read(&self, alert_id: &str) -> bool;

    fn mark_read(&mut self, alert_id: &str);

    /// Drop the read flag for an alert (used when an alert is dismissed)
    fn forget(&mut self, alert_id: &str);
}

/// Read-state store held in memory
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InMemoryReadState {
    read: HashSet<String>,
}

impl InMemoryReadState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.read.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read.is_empty()
    }
}

impl AlertReadState for InMemoryReadState {
    fn is_read(&self, alert_id: &str) -> bool {
        self.read.contains(alert_id)
    }

    fn mark_read(&mut self, alert_id: &str) {
        self.read.insert(alert_id.to_string());
    }

    fn forget(&mut self, alert_id: &str) {
        self.read.remove(alert_id);
    }
}

/// Which alerts to list
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AlertFilter {
    #[default]
    All,
    Unread,
    Read,
}

impl AlertFilter {
    pub fn matches(&self, alert: &Alert) -> bool {
        match self {
            AlertFilter::All => true,
            AlertFilter::Unread => !alert.is_read,
            AlertFilter::Read => alert.is_read,
        }
    }
}

/// Alert for a single material, if it is at or below its minimum level
pub fn alert_for(material: &Material, read_state: &dyn AlertReadState) -> Option<Alert> {
    if !material.is_low_stock() {
        return None;
    }

    let half_min = material.min_stock_level / Decimal::TWO;
    let severity = if material.current_stock < half_min {
        AlertSeverity::Critical
    } else {
        AlertSeverity::Warning
    };
    let alert_type = if material.is_out_of_stock() {
        AlertType::OutOfStock
    } else {
        AlertType::LowStock
    };

    Some(Alert {
        id: material.id.clone(),
        material_id: material.id.clone(),
        material_name: material.name.clone(),
        category: material.category.clone(),
        current_stock: material.current_stock,
        min_stock: material.min_stock_level,
        unit: material.unit.clone(),
        severity,
        message: format!(
            "{}: {} {} (Min: {})",
            material.name,
            format_one_dp(material.current_stock),
            material.unit,
            format_one_dp(material.min_stock_level)
        ),
        alert_type,
        created_at: material.last_updated,
        is_read: read_state.is_read(&material.id),
    })
}

/// Derive alerts for every low-stock material, in material order
pub fn derive_alerts(materials: &[Material], read_state: &dyn AlertReadState) -> Vec<Alert> {
    materials
        .iter()
        .filter_map(|material| alert_for(material, read_state))
        .collect()
}

pub fn filter_alerts(alerts: &[Alert], filter: AlertFilter) -> Vec<Alert> {
    alerts
        .iter()
        .filter(|alert| filter.matches(alert))
        .cloned()
        .collect()
}

pub fn unread_count(alerts: &[Alert]) -> usize {
    alerts.iter().filter(|alert| !alert.is_read).count()
}

/// Alerts that need immediate attention
pub fn critical_count(alerts: &[Alert]) -> usize {
    alerts
        .iter()
        .filter(|alert| {
            alert.severity == AlertSeverity::Critical || alert.alert_type == AlertType::OutOfStock
        })
        .count()
}
