//! WebAssembly module for the RMC Plant Inventory dashboard
//!
//! Provides client-side computation for:
//! - Report generation over fetched materials, transactions and suppliers
//! - Markdown rendering of reports
//! - Reorder urgency, value utilization and supplier score classification

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::Value;
use wasm_bindgen::prelude::*;

use shared::models::{performance_score, InventorySnapshot, PerformanceTier};
use shared::reports::{
    render_markdown, Report, ReportEngine, ReportKind, ReportOptions, ReorderUrgency,
    UtilizationBand,
};
use shared::wire::{
    map_records, material_from_wire, supplier_from_wire, transaction_from_wire, MappedRecords,
};

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;

/// Generate a report and return it as JSON.
///
/// Inputs are the raw JSON arrays returned by the inventory service. Records
/// that cannot be read are skipped and reported on the console. `today` is a
/// `YYYY-MM-DD` date and defaults to the browser's current date.
#[wasm_bindgen]
pub fn generate_report(
    kind: &str,
    materials_json: &str,
    transactions_json: &str,
    suppliers_json: &str,
    today: Option<String>,
    days: Option<u32>,
) -> Result<String, JsValue> {
    let today = resolve_today(today.as_deref())?;
    let report = build_report(kind, materials_json, transactions_json, suppliers_json, today, days)
        .map_err(|e| JsValue::from_str(&e))?;
    serde_json::to_string(&report)
        .map_err(|e| JsValue::from_str(&format!("Failed to serialize report: {}", e)))
}

/// Generate a report and render it as markdown
#[wasm_bindgen]
pub fn render_report_markdown(
    kind: &str,
    materials_json: &str,
    transactions_json: &str,
    suppliers_json: &str,
    today: Option<String>,
    days: Option<u32>,
) -> Result<String, JsValue> {
    let today = resolve_today(today.as_deref())?;
    let report = build_report(kind, materials_json, transactions_json, suppliers_json, today, days)
        .map_err(|e| JsValue::from_str(&e))?;
    Ok(render_markdown(&report))
}

/// Classify how urgently a material needs reordering
#[wasm_bindgen]
pub fn classify_reorder_urgency(current_stock: f64, min_stock_level: f64) -> String {
    ReorderUrgency::classify(to_decimal(current_stock), to_decimal(min_stock_level)).to_string()
}

/// Classify a value-utilization percentage as Low, Medium or High
#[wasm_bindgen]
pub fn classify_value_utilization(percent: f64) -> String {
    UtilizationBand::from_percent(to_decimal(percent)).to_string()
}

/// Supplier performance score (0-100) from a 0-5 rating
#[wasm_bindgen]
pub fn supplier_performance_score(rating: f64) -> f64 {
    performance_score(to_decimal(rating))
        .to_string()
        .parse()
        .unwrap_or(0.0)
}

/// Performance tier label for a 0-100 score
#[wasm_bindgen]
pub fn classify_supplier_tier(score: f64) -> String {
    PerformanceTier::from_score(to_decimal(score)).to_string()
}

fn to_decimal(value: f64) -> Decimal {
    Decimal::try_from(value).unwrap_or(Decimal::ZERO)
}

fn resolve_today(today: Option<&str>) -> Result<NaiveDate, JsValue> {
    match today {
        Some(raw) => parse_date(raw).map_err(|e| JsValue::from_str(&e)),
        None => {
            let now = js_sys::Date::new_0();
            NaiveDate::from_ymd_opt(now.get_full_year() as i32, now.get_month() + 1, now.get_date())
                .ok_or_else(|| JsValue::from_str("Browser returned an invalid date"))
        }
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|e| format!("Invalid date '{}': {}", raw, e))
}

fn parse_array(label: &str, json: &str) -> Result<Vec<Value>, String> {
    if json.trim().is_empty() {
        return Ok(Vec::new());
    }
    match serde_json::from_str::<Value>(json) {
        Ok(Value::Array(values)) => Ok(values),
        Ok(Value::Null) => Ok(Vec::new()),
        Ok(_) => Err(format!("Invalid {} JSON: expected an array", label)),
        Err(e) => Err(format!("Invalid {} JSON: {}", label, e)),
    }
}

fn log_rejected<T>(label: &str, mapped: &MappedRecords<T>) {
    // The console only exists inside a JS host
    if !cfg!(target_arch = "wasm32") {
        return;
    }
    for (index, error) in &mapped.rejected {
        web_sys::console::warn_1(&JsValue::from_str(&format!(
            "Skipping {} record {}: {}",
            label, index, error
        )));
    }
}

/// Parse the three collections into a snapshot
fn build_snapshot(
    materials_json: &str,
    transactions_json: &str,
    suppliers_json: &str,
) -> Result<InventorySnapshot, String> {
    let materials = map_records(&parse_array("materials", materials_json)?, material_from_wire);
    let transactions = map_records(
        &parse_array("transactions", transactions_json)?,
        transaction_from_wire,
    );
    let suppliers = map_records(&parse_array("suppliers", suppliers_json)?, supplier_from_wire);

    log_rejected("materials", &materials);
    log_rejected("transactions", &transactions);
    log_rejected("suppliers", &suppliers);

    Ok(InventorySnapshot::new(
        materials.records,
        transactions.records,
        suppliers.records,
    ))
}

fn build_report(
    kind: &str,
    materials_json: &str,
    transactions_json: &str,
    suppliers_json: &str,
    today: NaiveDate,
    days: Option<u32>,
) -> Result<Report, String> {
    let kind = ReportKind::parse(kind).ok_or_else(|| format!("Unknown report '{}'", kind))?;
    let snapshot = build_snapshot(materials_json, transactions_json, suppliers_json)?;

    let mut options = ReportOptions::new(today);
    if let Some(days) = days {
        options = options.with_window_days(days);
    }
    Ok(ReportEngine::new(&snapshot, options).generate(kind))
}
