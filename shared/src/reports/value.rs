//! Value utilization, consumption trends and supplier comparison

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{group_by_category, ReportEngine};
use crate::models::{PerformanceTier, Supplier};
use crate::types::{mean_of, percent_of};

/// How full a material's stock is, by value
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UtilizationBand {
    Low,
    Medium,
    High,
}

impl UtilizationBand {
    /// low below 30%, medium below 70%, high otherwise
    pub fn from_percent(percent: Decimal) -> Self {
        if percent < Decimal::from(30) {
            UtilizationBand::Low
        } else if percent < Decimal::from(70) {
            UtilizationBand::Medium
        } else {
            UtilizationBand::High
        }
    }
}

impl std::fmt::Display for UtilizationBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UtilizationBand::Low => write!(f, "Low"),
            UtilizationBand::Medium => write!(f, "Medium"),
            UtilizationBand::High => write!(f, "High"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValueAnalysisRow {
    pub material_id: String,
    pub material_name: String,
    pub category: String,
    pub unit: String,
    pub current_stock: Decimal,
    pub stock_value: Decimal,
    pub max_value: Decimal,
    pub value_utilization: Decimal,
    pub band: UtilizationBand,
    pub consumed: Decimal,
    pub consumed_value: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryConsumption {
    pub category: String,
    pub consumed: Decimal,
    pub consumed_value: Decimal,
    pub material_count: usize,
    pub percent_of_consumed_value: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SupplierComparisonRow {
    pub supplier_id: String,
    pub supplier_name: String,
    pub is_active: bool,
    pub material_count: usize,
    pub total_value: Decimal,
    /// Mean unit price of supplied materials, zero when none are supplied
    pub avg_price: Decimal,
    pub rating: Decimal,
    pub performance_score: Decimal,
    pub tier: PerformanceTier,
}

impl<'a> ReportEngine<'a> {
    /// Per-material value utilization, highest stock value first
    pub fn value_analysis(&self) -> Vec<ValueAnalysisRow> {
        let mut rows: Vec<ValueAnalysisRow> = self
            .materials()
            .iter()
            .map(|material| {
                let stock_value = material.stock_value();
                let max_value = material.max_value();
                let value_utilization = percent_of(stock_value, max_value);
                let consumed = self.movement(&material.id).stock_out;
                ValueAnalysisRow {
                    material_id: material.id.clone(),
                    material_name: material.name.clone(),
                    category: material.category.clone(),
                    unit: material.unit.clone(),
                    current_stock: material.current_stock,
                    stock_value,
                    max_value,
                    value_utilization,
                    band: UtilizationBand::from_percent(value_utilization),
                    consumed,
                    consumed_value: consumed * material.unit_price,
                }
            })
            .collect();
        rows.sort_by(|a, b| b.stock_value.cmp(&a.stock_value));
        rows
    }

    /// Consumption per category, highest consumed value first
    pub fn consumption_trends(&self) -> Vec<CategoryConsumption> {
        let mut rows: Vec<CategoryConsumption> = group_by_category(self.materials())
            .into_iter()
            .map(|(category, materials)| {
                let (consumed, consumed_value) =
                    materials
                        .iter()
                        .fold((Decimal::ZERO, Decimal::ZERO), |(qty, value), m| {
                            let out = self.movement(&m.id).stock_out;
                            (qty + out, value + out * m.unit_price)
                        });
                CategoryConsumption {
                    category: category.to_string(),
                    consumed,
                    consumed_value,
                    material_count: materials.len(),
                    percent_of_consumed_value: Decimal::ZERO,
                }
            })
            .collect();

        let total: Decimal = rows.iter().map(|row| row.consumed_value).sum();
        for row in &mut rows {
            row.percent_of_consumed_value = percent_of(row.consumed_value, total);
        }
        rows.sort_by(|a, b| b.consumed_value.cmp(&a.consumed_value));
        rows
    }

    /// Suppliers ranked by performance score
    pub fn supplier_comparison(&self) -> Vec<SupplierComparisonRow> {
        let mut rows: Vec<SupplierComparisonRow> = self
            .suppliers()
            .iter()
            .map(|supplier| self.supplier_comparison_row(supplier))
            .collect();
        rows.sort_by(|a, b| b.performance_score.cmp(&a.performance_score));
        rows
    }

    fn supplier_comparison_row(&self, supplier: &Supplier) -> SupplierComparisonRow {
        let supplied = self.supplied_materials(supplier);
        let price_total: Decimal = supplied.iter().map(|m| m.unit_price).sum();
        let performance_score = supplier.performance_score();
        SupplierComparisonRow {
            supplier_id: supplier.id.clone(),
            supplier_name: supplier.name.clone(),
            is_active: supplier.is_active,
            material_count: supplied.len(),
            total_value: supplied.iter().map(|m| m.stock_value()).sum(),
            avg_price: mean_of(price_total, supplied.len()),
            rating: supplier.rating,
            performance_score,
            tier: PerformanceTier::from_score(performance_score),
        }
    }
}
