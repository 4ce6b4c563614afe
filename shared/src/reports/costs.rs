//! Procurement and consumption cost reports

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{group_by_category, ReportEngine};
use crate::models::Material;
use crate::types::{mean_of, percent_of};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CostRow {
    pub material_id: String,
    pub material_name: String,
    pub category: String,
    pub unit: String,
    /// Cost basis per unit; the upstream service keeps one price per material
    pub unit_price: Decimal,
    pub total_procured: Decimal,
    pub total_consumed: Decimal,
    pub procurement_cost: Decimal,
    pub consumption_cost: Decimal,
    pub current_stock_value: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CostAnalysisReport {
    pub rows: Vec<CostRow>,
    pub total_procurement_cost: Decimal,
    pub total_consumption_cost: Decimal,
    pub total_stock_value: Decimal,
    /// Current stock value as a share of everything procured
    pub stock_value_percent_of_procurement: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProcurementCostRow {
    pub supplier_id: String,
    pub supplier_name: String,
    pub rating: Decimal,
    pub materials_supplied: usize,
    pub total_procurement_cost: Decimal,
    pub total_current_value: Decimal,
    /// Current value as a percentage of procurement cost (zero when nothing was procured)
    pub cost_efficiency: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProcurementCostReport {
    pub rows: Vec<ProcurementCostRow>,
    pub total_procurement_cost: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConsumptionCostLine {
    pub category: String,
    pub material_id: String,
    pub material_name: String,
    pub unit: String,
    pub unit_price: Decimal,
    pub consumed: Decimal,
    pub consumption_cost: Decimal,
    pub percent_of_category: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConsumptionCostCategory {
    pub category: String,
    pub consumed: Decimal,
    pub consumed_value: Decimal,
    pub material_count: usize,
    pub avg_cost_per_material: Decimal,
    pub percent_of_total: Decimal,
    /// Materials of the category, highest consumption cost first
    pub materials: Vec<ConsumptionCostLine>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConsumptionCostReport {
    pub categories: Vec<ConsumptionCostCategory>,
    pub total_consumption_cost: Decimal,
    pub total_consumed: Decimal,
    pub total_materials: usize,
}

impl<'a> ReportEngine<'a> {
    pub fn cost_row(&self, material: &Material) -> CostRow {
        let movement = self.movement(&material.id);
        CostRow {
            material_id: material.id.clone(),
            material_name: material.name.clone(),
            category: material.category.clone(),
            unit: material.unit.clone(),
            unit_price: material.unit_price,
            total_procured: movement.stock_in,
            total_consumed: movement.stock_out,
            procurement_cost: movement.stock_in * material.unit_price,
            consumption_cost: movement.stock_out * material.unit_price,
            current_stock_value: material.stock_value(),
        }
    }

    pub fn cost_analysis(&self) -> CostAnalysisReport {
        let rows: Vec<CostRow> = self
            .materials()
            .iter()
            .map(|material| self.cost_row(material))
            .collect();

        let total_procurement_cost: Decimal = rows.iter().map(|r| r.procurement_cost).sum();
        let total_consumption_cost: Decimal = rows.iter().map(|r| r.consumption_cost).sum();
        let total_stock_value: Decimal = rows.iter().map(|r| r.current_stock_value).sum();

        CostAnalysisReport {
            rows,
            total_procurement_cost,
            total_consumption_cost,
            total_stock_value,
            stock_value_percent_of_procurement: percent_of(
                total_stock_value,
                total_procurement_cost,
            ),
        }
    }

    /// Procurement cost per supplier, highest first
    pub fn procurement_cost(&self) -> ProcurementCostReport {
        let mut rows: Vec<ProcurementCostRow> = self
            .suppliers()
            .iter()
            .map(|supplier| {
                let supplied = self.supplied_materials(supplier);
                let total_procurement_cost: Decimal = supplied
                    .iter()
                    .map(|m| self.movement(&m.id).stock_in * m.unit_price)
                    .sum();
                let total_current_value: Decimal = supplied.iter().map(|m| m.stock_value()).sum();
                ProcurementCostRow {
                    supplier_id: supplier.id.clone(),
                    supplier_name: supplier.name.clone(),
                    rating: supplier.rating,
                    materials_supplied: supplied.len(),
                    total_procurement_cost,
                    total_current_value,
                    cost_efficiency: percent_of(total_current_value, total_procurement_cost),
                }
            })
            .collect();
        rows.sort_by(|a, b| b.total_procurement_cost.cmp(&a.total_procurement_cost));

        ProcurementCostReport {
            total_procurement_cost: rows.iter().map(|r| r.total_procurement_cost).sum(),
            rows,
        }
    }

    /// Consumption cost per category with a per-material breakdown
    pub fn consumption_cost(&self) -> ConsumptionCostReport {
        let mut categories: Vec<ConsumptionCostCategory> = group_by_category(self.materials())
            .into_iter()
            .map(|(category, materials)| {
                let mut lines: Vec<ConsumptionCostLine> = materials
                    .iter()
                    .map(|m| {
                        let consumed = self.movement(&m.id).stock_out;
                        ConsumptionCostLine {
                            category: category.to_string(),
                            material_id: m.id.clone(),
                            material_name: m.name.clone(),
                            unit: m.unit.clone(),
                            unit_price: m.unit_price,
                            consumed,
                            consumption_cost: consumed * m.unit_price,
                            percent_of_category: Decimal::ZERO,
                        }
                    })
                    .collect();

                let consumed: Decimal = lines.iter().map(|l| l.consumed).sum();
                let consumed_value: Decimal = lines.iter().map(|l| l.consumption_cost).sum();
                for line in &mut lines {
                    line.percent_of_category = percent_of(line.consumption_cost, consumed_value);
                }
                lines.sort_by(|a, b| b.consumption_cost.cmp(&a.consumption_cost));

                ConsumptionCostCategory {
                    category: category.to_string(),
                    consumed,
                    consumed_value,
                    material_count: materials.len(),
                    avg_cost_per_material: mean_of(consumed_value, materials.len()),
                    percent_of_total: Decimal::ZERO,
                    materials: lines,
                }
            })
            .collect();

        let total_consumption_cost: Decimal = categories.iter().map(|c| c.consumed_value).sum();
        for category in &mut categories {
            category.percent_of_total = percent_of(category.consumed_value, total_consumption_cost);
        }
        categories.sort_by(|a, b| b.consumed_value.cmp(&a.consumed_value));

        ConsumptionCostReport {
            total_consumed: categories.iter().map(|c| c.consumed).sum(),
            total_materials: categories.iter().map(|c| c.material_count).sum(),
            total_consumption_cost,
            categories,
        }
    }
}
