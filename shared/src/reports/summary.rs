//! Summary overview: headline metrics and the four summary tabs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{group_by_category, ReportEngine, TOP_CONSUMED_LIMIT};
use crate::models::{StockDirection, StockStatus};
use crate::types::{percent_of, DateRange};

/// Stock in/out over the trailing window
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WindowTotals {
    pub window: DateRange,
    pub stock_in: Decimal,
    pub stock_in_count: usize,
    pub stock_out: Decimal,
    pub stock_out_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConsumedMaterial {
    pub material_id: String,
    pub material_name: String,
    pub unit: String,
    pub consumed: Decimal,
    pub consumed_value: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryRollup {
    pub category: String,
    pub material_count: usize,
    pub total_value: Decimal,
    pub percent_of_total: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SupplierValue {
    pub supplier_id: String,
    pub supplier_name: String,
    pub material_count: usize,
    pub total_value: Decimal,
    pub rating: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InventoryStatusRow {
    pub material_id: String,
    pub material_name: String,
    pub category: String,
    pub unit: String,
    pub current_stock: Decimal,
    pub max_stock_level: Decimal,
    pub unit_price: Decimal,
    pub stock_value: Decimal,
    /// Current stock as a percentage of the maximum level
    pub stock_percentage: Decimal,
    pub status: StockStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SummaryReport {
    pub total_inventory_value: Decimal,
    pub total_materials: usize,
    pub low_stock_items: usize,
    pub window: WindowTotals,
    pub top_consumed: Vec<ConsumedMaterial>,
    pub categories: Vec<CategoryRollup>,
    /// Suppliers ranked by the value of the stock they supplied
    pub suppliers: Vec<SupplierValue>,
    pub inventory_status: Vec<InventoryStatusRow>,
}

impl<'a> ReportEngine<'a> {
    pub fn summary(&self) -> SummaryReport {
        SummaryReport {
            total_inventory_value: self.total_inventory_value(),
            total_materials: self.materials().len(),
            low_stock_items: self.low_stock_count(),
            window: self.window_totals(),
            top_consumed: self.top_consumed(TOP_CONSUMED_LIMIT),
            categories: self.category_rollup(),
            suppliers: self.supplier_values(),
            inventory_status: self.inventory_status(),
        }
    }

    /// Stock in/out over `[today - window_days, today]`.
    ///
    /// Transactions whose timestamp did not parse are left out.
    pub fn window_totals(&self) -> WindowTotals {
        let window = DateRange::trailing_days(self.options().today, self.options().window_days);
        let mut totals = WindowTotals {
            window,
            stock_in: Decimal::ZERO,
            stock_in_count: 0,
            stock_out: Decimal::ZERO,
            stock_out_count: 0,
        };

        for transaction in self.transactions() {
            let Some(date) = transaction.created_on() else {
                continue;
            };
            if !window.contains(date) {
                continue;
            }
            match transaction.direction {
                StockDirection::In => {
                    totals.stock_in += transaction.quantity;
                    totals.stock_in_count += 1;
                }
                StockDirection::Out => {
                    totals.stock_out += transaction.quantity;
                    totals.stock_out_count += 1;
                }
            }
        }
        totals
    }

    /// Out-quantity per material, in material order
    pub fn material_consumption(&self) -> Vec<ConsumedMaterial> {
        self.materials()
            .iter()
            .map(|material| {
                let consumed = self.movement(&material.id).stock_out;
                ConsumedMaterial {
                    material_id: material.id.clone(),
                    material_name: material.name.clone(),
                    unit: material.unit.clone(),
                    consumed,
                    consumed_value: consumed * material.unit_price,
                }
            })
            .collect()
    }

    /// Most consumed materials; ties keep material order
    pub fn top_consumed(&self, limit: usize) -> Vec<ConsumedMaterial> {
        let mut consumption = self.material_consumption();
        consumption.sort_by(|a, b| b.consumed.cmp(&a.consumed));
        consumption.truncate(limit);
        consumption
    }

    /// Count and value per category, with each category's share of the total
    pub fn category_rollup(&self) -> Vec<CategoryRollup> {
        let total_value = self.total_inventory_value();
        group_by_category(self.materials())
            .into_iter()
            .map(|(category, materials)| {
                let value: Decimal = materials.iter().map(|m| m.stock_value()).sum();
                CategoryRollup {
                    category: category.to_string(),
                    material_count: materials.len(),
                    total_value: value,
                    percent_of_total: percent_of(value, total_value),
                }
            })
            .collect()
    }

    /// Suppliers ordered by supplied stock value, highest first
    pub fn supplier_values(&self) -> Vec<SupplierValue> {
        let mut rows: Vec<SupplierValue> = self
            .suppliers()
            .iter()
            .map(|supplier| {
                let supplied = self.supplied_materials(supplier);
                SupplierValue {
                    supplier_id: supplier.id.clone(),
                    supplier_name: supplier.name.clone(),
                    material_count: supplied.len(),
                    total_value: supplied.iter().map(|m| m.stock_value()).sum(),
                    rating: supplier.rating,
                }
            })
            .collect();
        rows.sort_by(|a, b| b.total_value.cmp(&a.total_value));
        rows
    }

    pub fn inventory_status(&self) -> Vec<InventoryStatusRow> {
        self.materials()
            .iter()
            .map(|material| InventoryStatusRow {
                material_id: material.id.clone(),
                material_name: material.name.clone(),
                category: material.category.clone(),
                unit: material.unit.clone(),
                current_stock: material.current_stock,
                max_stock_level: material.max_stock_level,
                unit_price: material.unit_price,
                stock_value: material.stock_value(),
                stock_percentage: percent_of(material.current_stock, material.max_stock_level),
                status: material.stock_status(),
            })
            .collect()
    }
}
