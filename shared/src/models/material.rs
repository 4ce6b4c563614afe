//! Raw material models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::Supplier;
use crate::validation::{validate_non_negative, validate_stock_levels_input};

/// A raw material held at the plant (cement, sand, aggregates, admixtures...)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Material {
    pub id: String,
    pub name: String,
    pub category: String,
    pub unit: String,
    pub current_stock: Decimal,
    pub min_stock_level: Decimal,
    pub max_stock_level: Decimal,
    pub unit_price: Decimal,
    pub supplier_id: Option<String>,
    /// Supplier name as carried by the upstream record
    pub supplier_name: Option<String>,
    pub location: String,
    pub last_updated: Option<DateTime<Utc>>,
}

impl Material {
    /// Value of the stock on hand
    pub fn stock_value(&self) -> Decimal {
        self.current_stock.saturating_mul(self.unit_price)
    }

    /// Value of the stock at maximum stocking capacity
    pub fn max_value(&self) -> Decimal {
        self.max_stock_level.saturating_mul(self.unit_price)
    }

    pub fn is_low_stock(&self) -> bool {
        self.current_stock <= self.min_stock_level
    }

    pub fn is_out_of_stock(&self) -> bool {
        self.current_stock.is_zero()
    }

    /// Whether this material is supplied by `supplier`.
    ///
    /// Matches on supplier id when the material carries one, otherwise on the
    /// supplier name (the upstream service only stores names).
    pub fn is_supplied_by(&self, supplier: &Supplier) -> bool {
        match (&self.supplier_id, &self.supplier_name) {
            (Some(id), _) => *id == supplier.id,
            (None, Some(name)) => *name == supplier.name,
            (None, None) => false,
        }
    }

    pub fn stock_status(&self) -> StockStatus {
        if self.is_out_of_stock() {
            StockStatus::OutOfStock
        } else if self.is_low_stock() {
            StockStatus::LowStock
        } else if self.current_stock >= self.max_stock_level {
            StockStatus::Overstocked
        } else {
            StockStatus::InStock
        }
    }
}

/// Stock status shown next to each material
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    OutOfStock,
    LowStock,
    Overstocked,
    InStock,
}

impl std::fmt::Display for StockStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StockStatus::OutOfStock => write!(f, "Out of Stock"),
            StockStatus::LowStock => write!(f, "Low Stock"),
            StockStatus::Overstocked => write!(f, "Overstocked"),
            StockStatus::InStock => write!(f, "In Stock"),
        }
    }
}

/// Payload for creating or replacing a material upstream
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_stock_levels_input"))]
pub struct MaterialInput {
    #[validate(length(min = 1, message = "Material name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Category is required"))]
    pub category: String,
    #[validate(length(min = 1, message = "Unit is required"))]
    pub unit: String,
    #[validate(custom = "validate_non_negative")]
    pub current_stock: Decimal,
    #[validate(custom = "validate_non_negative")]
    pub min_stock_level: Decimal,
    /// Defaults to twice the minimum level when omitted
    pub max_stock_level: Option<Decimal>,
    #[validate(custom = "validate_non_negative")]
    pub unit_price: Decimal,
    pub supplier_name: Option<String>,
    #[serde(default)]
    pub location: String,
}
