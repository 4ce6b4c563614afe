//! Stock alert models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A low-stock alert derived from a material snapshot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Alert {
    /// Alerts are keyed by the id of the material they concern
    pub id: String,
    pub material_id: String,
    pub material_name: String,
    pub category: String,
    pub current_stock: Decimal,
    pub min_stock: Decimal,
    pub unit: String,
    pub severity: AlertSeverity,
    pub message: String,
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    pub created_at: Option<DateTime<Utc>>,
    /// Client-local read flag
    pub is_read: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    /// Stock below half of the minimum level
    Critical,
    Warning,
}

impl std::fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlertSeverity::Critical => write!(f, "CRITICAL"),
            AlertSeverity::Warning => write!(f, "WARNING"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    LowStock,
    OutOfStock,
}
