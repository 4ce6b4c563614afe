//! Derived-metrics reporting engine
//!
//! Every report is a pure function of an [`InventorySnapshot`] and a set of
//! [`ReportOptions`]: running the same report twice over the same snapshot
//! yields the same output. Ratios with a zero denominator are reported as zero.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{InventorySnapshot, Material, StockDirection, Supplier, Transaction};

pub mod costs;
pub mod markdown;
pub mod movements;
pub mod overview;
pub mod reorder;
pub mod summary;
pub mod value;

pub use costs::*;
pub use markdown::render_markdown;
pub use movements::*;
pub use overview::*;
pub use reorder::*;
pub use summary::*;
pub use value::*;

/// Placeholder for names that could not be resolved
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Placeholder for optional columns with no value
pub const EMPTY_LABEL: &str = "-";

/// Number of rows in the "top consumed" ranking
pub const TOP_CONSUMED_LIMIT: usize = 5;

/// Default number of rows in the recent movements report
pub const RECENT_MOVEMENTS_LIMIT: usize = 20;

/// Default trailing window for stock in/out totals
pub const DEFAULT_WINDOW_DAYS: u32 = 7;

/// The report views offered by the dashboard
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    #[default]
    Summary,
    MaterialTransactions,
    SupplierTransactions,
    RecentMovements,
    ValueAnalysis,
    ConsumptionTrends,
    SupplierComparison,
    LowStockReport,
    CostAnalysis,
    ProcurementCost,
    ConsumptionCost,
}

impl ReportKind {
    pub const ALL: [ReportKind; 11] = [
        ReportKind::Summary,
        ReportKind::MaterialTransactions,
        ReportKind::SupplierTransactions,
        ReportKind::RecentMovements,
        ReportKind::ValueAnalysis,
        ReportKind::ConsumptionTrends,
        ReportKind::SupplierComparison,
        ReportKind::LowStockReport,
        ReportKind::CostAnalysis,
        ReportKind::ProcurementCost,
        ReportKind::ConsumptionCost,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            ReportKind::Summary => "summary",
            ReportKind::MaterialTransactions => "material_transactions",
            ReportKind::SupplierTransactions => "supplier_transactions",
            ReportKind::RecentMovements => "recent_movements",
            ReportKind::ValueAnalysis => "value_analysis",
            ReportKind::ConsumptionTrends => "consumption_trends",
            ReportKind::SupplierComparison => "supplier_comparison",
            ReportKind::LowStockReport => "low_stock_report",
            ReportKind::CostAnalysis => "cost_analysis",
            ReportKind::ProcurementCost => "procurement_cost",
            ReportKind::ConsumptionCost => "consumption_cost",
        }
    }

    pub fn parse(code: &str) -> Option<Self> {
        let code = code.trim().to_ascii_lowercase().replace('-', "_");
        match code.as_str() {
            // "overview" is the name used by the plain dashboard page
            "overview" => Some(ReportKind::Summary),
            "materialwise" => Some(ReportKind::MaterialTransactions),
            "supplierwise" => Some(ReportKind::SupplierTransactions),
            "recent" => Some(ReportKind::RecentMovements),
            other => Self::ALL.into_iter().find(|kind| kind.code() == other),
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ReportKind::Summary => "Summary Overview",
            ReportKind::MaterialTransactions => "Material-wise Transactions",
            ReportKind::SupplierTransactions => "Supplier-wise Transactions",
            ReportKind::RecentMovements => "Recent Stock Movements",
            ReportKind::ValueAnalysis => "Inventory Value Analysis",
            ReportKind::ConsumptionTrends => "Consumption Trends by Category",
            ReportKind::SupplierComparison => "Supplier Performance Comparison",
            ReportKind::LowStockReport => "Low Stock & Reorder Report",
            ReportKind::CostAnalysis => "Complete Cost Analysis",
            ReportKind::ProcurementCost => "Procurement Cost by Supplier",
            ReportKind::ConsumptionCost => "Consumption Cost by Category",
        }
    }
}

impl std::fmt::Display for ReportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl std::str::FromStr for ReportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unknown report kind `{}`", s))
    }
}

/// Parameters that are not part of the snapshot
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReportOptions {
    /// Reference date for windowed totals and "today" counts
    pub today: NaiveDate,
    /// Trailing window, in days, for stock in/out totals
    pub window_days: u32,
    /// Row limit of the recent movements report
    pub recent_limit: usize,
}

impl ReportOptions {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            window_days: DEFAULT_WINDOW_DAYS,
            recent_limit: RECENT_MOVEMENTS_LIMIT,
        }
    }

    pub fn with_window_days(mut self, days: u32) -> Self {
        self.window_days = days;
        self
    }

    pub fn with_recent_limit(mut self, limit: usize) -> Self {
        self.recent_limit = limit;
        self
    }
}

/// Output of a report run, one variant per [`ReportKind`]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum Report {
    Summary(SummaryReport),
    MaterialTransactions(Vec<MaterialTransactionRow>),
    SupplierTransactions(Vec<SupplierTransactionRow>),
    RecentMovements(Vec<MovementRow>),
    ValueAnalysis(Vec<ValueAnalysisRow>),
    ConsumptionTrends(Vec<CategoryConsumption>),
    SupplierComparison(Vec<SupplierComparisonRow>),
    LowStockReport(LowStockReport),
    CostAnalysis(CostAnalysisReport),
    ProcurementCost(ProcurementCostReport),
    ConsumptionCost(ConsumptionCostReport),
}

impl Report {
    pub fn kind(&self) -> ReportKind {
        match self {
            Report::Summary(_) => ReportKind::Summary,
            Report::MaterialTransactions(_) => ReportKind::MaterialTransactions,
            Report::SupplierTransactions(_) => ReportKind::SupplierTransactions,
            Report::RecentMovements(_) => ReportKind::RecentMovements,
            Report::ValueAnalysis(_) => ReportKind::ValueAnalysis,
            Report::ConsumptionTrends(_) => ReportKind::ConsumptionTrends,
            Report::SupplierComparison(_) => ReportKind::SupplierComparison,
            Report::LowStockReport(_) => ReportKind::LowStockReport,
            Report::CostAnalysis(_) => ReportKind::CostAnalysis,
            Report::ProcurementCost(_) => ReportKind::ProcurementCost,
            Report::ConsumptionCost(_) => ReportKind::ConsumptionCost,
        }
    }
}

/// Stock in/out totals of one material over all transactions
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MaterialMovement {
    pub stock_in: Decimal,
    pub stock_out: Decimal,
    pub in_count: usize,
    pub out_count: usize,
    /// Latest parsed transaction timestamp
    pub last_at: Option<DateTime<Utc>>,
}

impl MaterialMovement {
    pub fn transaction_count(&self) -> usize {
        self.in_count + self.out_count
    }

    pub fn net(&self) -> Decimal {
        self.stock_in - self.stock_out
    }

    fn record(&mut self, transaction: &Transaction) {
        match transaction.direction {
            StockDirection::In => {
                self.stock_in += transaction.quantity;
                self.in_count += 1;
            }
            StockDirection::Out => {
                self.stock_out += transaction.quantity;
                self.out_count += 1;
            }
        }
        if let Some(ts) = transaction.created_at {
            self.last_at = Some(self.last_at.map_or(ts, |last| last.max(ts)));
        }
    }
}

/// Computes reports over one snapshot.
///
/// Lookups (materials and suppliers by id, per-material movement totals) are
/// built once on construction and shared by every report.
pub struct ReportEngine<'a> {
    snapshot: &'a InventorySnapshot,
    options: ReportOptions,
    materials_by_id: HashMap<&'a str, &'a Material>,
    suppliers_by_id: HashMap<&'a str, &'a Supplier>,
    movements: HashMap<&'a str, MaterialMovement>,
}

impl<'a> ReportEngine<'a> {
    pub fn new(snapshot: &'a InventorySnapshot, options: ReportOptions) -> Self {
        let mut movements: HashMap<&'a str, MaterialMovement> = HashMap::new();
        for transaction in &snapshot.transactions {
            movements
                .entry(transaction.material_id.as_str())
                .or_default()
                .record(transaction);
        }

        Self {
            snapshot,
            options,
            materials_by_id: snapshot.material_index(),
            suppliers_by_id: snapshot.supplier_index(),
            movements,
        }
    }

    pub fn options(&self) -> &ReportOptions {
        &self.options
    }

    pub fn materials(&self) -> &'a [Material] {
        &self.snapshot.materials
    }

    pub fn transactions(&self) -> &'a [Transaction] {
        &self.snapshot.transactions
    }

    pub fn suppliers(&self) -> &'a [Supplier] {
        &self.snapshot.suppliers
    }

    /// Run the report selected by `kind`
    pub fn generate(&self, kind: ReportKind) -> Report {
        match kind {
            ReportKind::Summary => Report::Summary(self.summary()),
            ReportKind::MaterialTransactions => {
                Report::MaterialTransactions(self.material_transactions())
            }
            ReportKind::SupplierTransactions => {
                Report::SupplierTransactions(self.supplier_transactions())
            }
            ReportKind::RecentMovements => {
                Report::RecentMovements(self.recent_movements(self.options.recent_limit))
            }
            ReportKind::ValueAnalysis => Report::ValueAnalysis(self.value_analysis()),
            ReportKind::ConsumptionTrends => Report::ConsumptionTrends(self.consumption_trends()),
            ReportKind::SupplierComparison => {
                Report::SupplierComparison(self.supplier_comparison())
            }
            ReportKind::LowStockReport => Report::LowStockReport(self.low_stock_report()),
            ReportKind::CostAnalysis => Report::CostAnalysis(self.cost_analysis()),
            ReportKind::ProcurementCost => Report::ProcurementCost(self.procurement_cost()),
            ReportKind::ConsumptionCost => Report::ConsumptionCost(self.consumption_cost()),
        }
    }

    /// Σ current stock × unit price over all materials
    pub fn total_inventory_value(&self) -> Decimal {
        self.materials().iter().map(Material::stock_value).sum()
    }

    /// Number of materials at or below their minimum level
    pub fn low_stock_count(&self) -> usize {
        self.materials().iter().filter(|m| m.is_low_stock()).count()
    }

    /// Movement totals for a material id (zero when it has no transactions)
    pub fn movement(&self, material_id: &str) -> MaterialMovement {
        self.movements
            .get(material_id)
            .copied()
            .unwrap_or_default()
    }

    pub fn material(&self, material_id: &str) -> Option<&'a Material> {
        self.materials_by_id.get(material_id).copied()
    }

    pub fn supplier(&self, supplier_id: &str) -> Option<&'a Supplier> {
        self.suppliers_by_id.get(supplier_id).copied()
    }

    /// Materials supplied by `supplier`, in material order
    pub fn supplied_materials(&self, supplier: &Supplier) -> Vec<&'a Material> {
        self.materials()
            .iter()
            .filter(|m| m.is_supplied_by(supplier))
            .collect()
    }
}

/// Group materials by category, preserving first-seen category order
pub(crate) fn group_by_category<'m>(materials: &'m [Material]) -> Vec<(&'m str, Vec<&'m Material>)> {
    let mut groups: Vec<(&'m str, Vec<&'m Material>)> = Vec::new();
    let mut positions: HashMap<&'m str, usize> = HashMap::new();
    for material in materials {
        let category = material.category.as_str();
        let position = *positions.entry(category).or_insert_with(|| {
            groups.push((category, Vec::new()));
            groups.len() - 1
        });
        groups[position].1.push(material);
    }
    groups
}
