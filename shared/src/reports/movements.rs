//! Material-wise, supplier-wise and recent stock movements

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{ReportEngine, EMPTY_LABEL, UNKNOWN_LABEL};
use crate::models::{StockDirection, Transaction};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MaterialTransactionRow {
    pub material_id: String,
    pub material_name: String,
    pub category: String,
    pub unit: String,
    pub stock_in: Decimal,
    pub stock_out: Decimal,
    pub net_movement: Decimal,
    pub current_stock: Decimal,
    pub total_transactions: usize,
    pub last_transaction: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SupplierTransactionRow {
    pub supplier_id: String,
    pub supplier_name: String,
    pub contact: String,
    pub rating: Decimal,
    pub is_active: bool,
    pub material_count: usize,
    pub stock_in: Decimal,
    pub total_value: Decimal,
    pub transaction_count: usize,
}

/// One stock movement joined with its material and supplier
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovementRow {
    pub transaction_id: String,
    pub date: Option<DateTime<Utc>>,
    /// Timestamp as received, for rows whose date did not parse
    pub date_raw: String,
    pub reference: String,
    pub material_id: String,
    pub material_name: String,
    pub unit: String,
    #[serde(rename = "type")]
    pub direction: StockDirection,
    pub quantity: Decimal,
    pub supplier_name: String,
    pub recorded_by: String,
}

impl<'a> ReportEngine<'a> {
    pub fn material_transactions(&self) -> Vec<MaterialTransactionRow> {
        self.materials()
            .iter()
            .map(|material| {
                let movement = self.movement(&material.id);
                MaterialTransactionRow {
                    material_id: material.id.clone(),
                    material_name: material.name.clone(),
                    category: material.category.clone(),
                    unit: material.unit.clone(),
                    stock_in: movement.stock_in,
                    stock_out: movement.stock_out,
                    net_movement: movement.net(),
                    current_stock: material.current_stock,
                    total_transactions: movement.transaction_count(),
                    last_transaction: movement.last_at,
                }
            })
            .collect()
    }

    pub fn supplier_transactions(&self) -> Vec<SupplierTransactionRow> {
        self.suppliers()
            .iter()
            .map(|supplier| {
                let supplied = self.supplied_materials(supplier);
                let (stock_in, transaction_count) =
                    supplied.iter().fold((Decimal::ZERO, 0), |(qty, count), m| {
                        let movement = self.movement(&m.id);
                        (qty + movement.stock_in, count + movement.transaction_count())
                    });

                SupplierTransactionRow {
                    supplier_id: supplier.id.clone(),
                    supplier_name: supplier.name.clone(),
                    contact: join_contact(&supplier.contact_person, &supplier.phone),
                    rating: supplier.rating,
                    is_active: supplier.is_active,
                    material_count: supplied.len(),
                    stock_in,
                    total_value: supplied.iter().map(|m| m.stock_value()).sum(),
                    transaction_count,
                }
            })
            .collect()
    }

    /// Latest `limit` movements, newest first.
    ///
    /// Movements with an unparseable timestamp sort after every dated one and
    /// otherwise keep their input order.
    pub fn recent_movements(&self, limit: usize) -> Vec<MovementRow> {
        let mut ordered: Vec<&Transaction> = self.transactions().iter().collect();
        ordered.sort_by(|a, b| newest_first(a.created_at, b.created_at));
        ordered
            .into_iter()
            .take(limit)
            .map(|transaction| self.movement_row(transaction))
            .collect()
    }

    fn movement_row(&self, transaction: &Transaction) -> MovementRow {
        let material = self.material(&transaction.material_id);

        let material_name = material
            .map(|m| m.name.clone())
            .or_else(|| transaction.material_name.clone())
            .unwrap_or_else(|| UNKNOWN_LABEL.to_string());
        let unit = material
            .map(|m| m.unit.clone())
            .filter(|unit| !unit.is_empty())
            .unwrap_or_else(|| EMPTY_LABEL.to_string());
        let supplier_name = transaction
            .supplier_id
            .as_deref()
            .and_then(|id| self.supplier(id))
            .map(|s| s.name.clone())
            .or_else(|| transaction.supplier_name.clone())
            .unwrap_or_else(|| EMPTY_LABEL.to_string());

        MovementRow {
            transaction_id: transaction.id.clone(),
            date: transaction.created_at,
            date_raw: transaction.created_at_raw.clone(),
            reference: or_placeholder(&transaction.reference_number),
            material_id: transaction.material_id.clone(),
            material_name,
            unit,
            direction: transaction.direction,
            quantity: transaction.quantity,
            supplier_name,
            recorded_by: or_placeholder(&transaction.created_by),
        }
    }
}

fn newest_first(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn or_placeholder(value: &str) -> String {
    if value.trim().is_empty() {
        EMPTY_LABEL.to_string()
    } else {
        value.to_string()
    }
}

fn join_contact(person: &str, phone: &str) -> String {
    match (person.is_empty(), phone.is_empty()) {
        (true, true) => EMPTY_LABEL.to_string(),
        (false, true) => person.to_string(),
        (true, false) => phone.to_string(),
        (false, false) => format!("{} {}", person, phone),
    }
}
