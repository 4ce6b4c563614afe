//! Point-in-time copy of the three upstream collections

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{Material, Supplier, Transaction};

/// Materials, transactions and suppliers as fetched in one refresh
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct InventorySnapshot {
    pub materials: Vec<Material>,
    pub transactions: Vec<Transaction>,
    pub suppliers: Vec<Supplier>,
}

impl InventorySnapshot {
    pub fn new(
        materials: Vec<Material>,
        transactions: Vec<Transaction>,
        suppliers: Vec<Supplier>,
    ) -> Self {
        Self {
            materials,
            transactions,
            suppliers,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty() && self.transactions.is_empty() && self.suppliers.is_empty()
    }

    /// Index materials by id. Later duplicates do not replace earlier ones.
    pub fn material_index(&self) -> HashMap<&str, &Material> {
        let mut index = HashMap::with_capacity(self.materials.len());
        for material in &self.materials {
            index.entry(material.id.as_str()).or_insert(material);
        }
        index
    }

    pub fn supplier_index(&self) -> HashMap<&str, &Supplier> {
        let mut index = HashMap::with_capacity(self.suppliers.len());
        for supplier in &self.suppliers {
            index.entry(supplier.id.as_str()).or_insert(supplier);
        }
        index
    }
}
