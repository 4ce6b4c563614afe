//! Low stock & reorder report

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{ReportEngine, EMPTY_LABEL};
use crate::models::Material;

/// Materials up to this multiple of their minimum level are listed for reorder
pub const REORDER_LISTING_FACTOR: Decimal = Decimal::from_parts(12, 0, 0, false, 1);

/// Stock at or below this multiple of the minimum level is urgent
pub const URGENT_FACTOR: Decimal = Decimal::from_parts(5, 0, 0, false, 1);

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum ReorderUrgency {
    Critical,
    Urgent,
    Low,
}

impl ReorderUrgency {
    /// Critical when out of stock, Urgent at or below half the minimum level
    pub fn classify(current_stock: Decimal, min_stock_level: Decimal) -> Self {
        if current_stock.is_zero() {
            ReorderUrgency::Critical
        } else if current_stock <= min_stock_level * URGENT_FACTOR {
            ReorderUrgency::Urgent
        } else {
            ReorderUrgency::Low
        }
    }
}

impl std::fmt::Display for ReorderUrgency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReorderUrgency::Critical => write!(f, "Critical"),
            ReorderUrgency::Urgent => write!(f, "Urgent"),
            ReorderUrgency::Low => write!(f, "Low"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReorderRow {
    pub material_id: String,
    pub material_name: String,
    pub category: String,
    pub unit: String,
    pub supplier_name: String,
    pub current_stock: Decimal,
    pub min_stock_level: Decimal,
    pub max_stock_level: Decimal,
    /// Quantity needed to refill to the maximum level, never negative
    pub reorder_qty: Decimal,
    pub reorder_cost: Decimal,
    pub urgency: ReorderUrgency,
    /// Stock already above the maximum level; nothing to reorder
    pub overstocked: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LowStockReport {
    pub rows: Vec<ReorderRow>,
    pub total_reorder_cost: Decimal,
    pub critical_count: usize,
    pub urgent_count: usize,
}

/// Build the reorder line for a material, if it is close enough to its minimum
pub fn reorder_row(material: &Material) -> Option<ReorderRow> {
    if material.current_stock > material.min_stock_level * REORDER_LISTING_FACTOR {
        return None;
    }

    let shortfall = material.max_stock_level - material.current_stock;
    let overstocked = shortfall < Decimal::ZERO;
    let reorder_qty = shortfall.max(Decimal::ZERO);

    Some(ReorderRow {
        material_id: material.id.clone(),
        material_name: material.name.clone(),
        category: material.category.clone(),
        unit: material.unit.clone(),
        supplier_name: material
            .supplier_name
            .clone()
            .unwrap_or_else(|| EMPTY_LABEL.to_string()),
        current_stock: material.current_stock,
        min_stock_level: material.min_stock_level,
        max_stock_level: material.max_stock_level,
        reorder_qty,
        reorder_cost: reorder_qty * material.unit_price,
        urgency: ReorderUrgency::classify(material.current_stock, material.min_stock_level),
        overstocked,
    })
}

/// Current stock relative to the minimum level (zero when the minimum is zero)
fn stock_ratio(material: &Material) -> Decimal {
    material
        .current_stock
        .checked_div(material.min_stock_level)
        .unwrap_or(Decimal::ZERO)
}

impl<'a> ReportEngine<'a> {
    /// Materials at or near their minimum level, most depleted first
    pub fn low_stock_report(&self) -> LowStockReport {
        let mut candidates: Vec<&Material> = self
            .materials()
            .iter()
            .filter(|m| reorder_row(m).is_some())
            .collect();
        candidates.sort_by(|a, b| stock_ratio(a).cmp(&stock_ratio(b)));

        let rows: Vec<ReorderRow> = candidates.into_iter().filter_map(reorder_row).collect();
        let count = |urgency: ReorderUrgency| rows.iter().filter(|r| r.urgency == urgency).count();

        LowStockReport {
            total_reorder_cost: rows.iter().map(|r| r.reorder_cost).sum(),
            critical_count: count(ReorderUrgency::Critical),
            urgent_count: count(ReorderUrgency::Urgent),
            rows,
        }
    }
}
