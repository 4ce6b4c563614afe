//! Markdown rendering of reports

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::*;
use crate::types::{format_currency, format_one_dp};

/// Markdown table built row by row
struct Table {
    headers: Vec<&'static str>,
    rows: Vec<Vec<String>>,
}

impl Table {
    fn new(headers: &[&'static str]) -> Self {
        Self {
            headers: headers.to_vec(),
            rows: Vec::new(),
        }
    }

    fn row(&mut self, cells: Vec<String>) {
        self.rows.push(cells);
    }

    fn render(&self, out: &mut String) {
        let _ = writeln!(out, "|{}|", self.headers.join("|"));
        let _ = writeln!(out, "|{}|", vec!["--"; self.headers.len()].join("|"));
        for row in &self.rows {
            let cells: Vec<String> = row.iter().map(|cell| escape_cell(cell)).collect();
            let _ = writeln!(out, "|{}|", cells.join("|"));
        }
    }
}

fn escape_cell(cell: &str) -> String {
    cell.replace('|', "\\|").replace('\n', " ")
}

fn qty(value: Decimal, unit: &str) -> String {
    format!("{} {}", format_one_dp(value), unit).trim_end().to_string()
}

fn pct(value: Decimal) -> String {
    format!("{}%", format_one_dp(value))
}

fn date(value: Option<DateTime<Utc>>, raw: &str) -> String {
    match value {
        Some(ts) => ts.format("%d %b %Y %H:%M").to_string(),
        None if raw.trim().is_empty() => EMPTY_LABEL.to_string(),
        None => raw.to_string(),
    }
}

fn heading(out: &mut String, kind: ReportKind) {
    let _ = writeln!(out, "### {}\n", kind.title());
}

fn empty_notice(out: &mut String, what: &str) {
    let _ = writeln!(out, "No {}.", what);
}

/// Render a report as a markdown document
pub fn render_markdown(report: &Report) -> String {
    let mut out = String::new();
    heading(&mut out, report.kind());

    match report {
        Report::Summary(summary) => render_summary(&mut out, summary),
        Report::MaterialTransactions(rows) => {
            let mut table = Table::new(&[
                "Material",
                "Category",
                "Stock In",
                "Stock Out",
                "Net Movement",
                "Current Stock",
                "Total Transactions",
            ]);
            for r in rows {
                table.row(vec![
                    r.material_name.clone(),
                    r.category.clone(),
                    qty(r.stock_in, &r.unit),
                    qty(r.stock_out, &r.unit),
                    qty(r.net_movement, &r.unit),
                    qty(r.current_stock, &r.unit),
                    r.total_transactions.to_string(),
                ]);
            }
            table.render(&mut out);
        }
        Report::SupplierTransactions(rows) => {
            let mut table = Table::new(&[
                "Supplier",
                "Contact",
                "Rating",
                "Materials",
                "Stock In",
                "Total Value",
                "Total Transactions",
                "Status",
            ]);
            for r in rows {
                table.row(vec![
                    r.supplier_name.clone(),
                    r.contact.clone(),
                    format!("★ {}", format_one_dp(r.rating)),
                    r.material_count.to_string(),
                    format_one_dp(r.stock_in),
                    format_currency(r.total_value),
                    r.transaction_count.to_string(),
                    if r.is_active { "Active" } else { "Inactive" }.to_string(),
                ]);
            }
            table.render(&mut out);
        }
        Report::RecentMovements(rows) => {
            if rows.is_empty() {
                empty_notice(&mut out, "recent movements");
            } else {
                let mut table = Table::new(&[
                    "Date",
                    "Reference",
                    "Material",
                    "Type",
                    "Quantity",
                    "Supplier",
                    "Recorded By",
                ]);
                for r in rows {
                    table.row(vec![
                        date(r.date, &r.date_raw),
                        r.reference.clone(),
                        r.material_name.clone(),
                        r.direction.to_string(),
                        qty(r.quantity, &r.unit),
                        r.supplier_name.clone(),
                        r.recorded_by.clone(),
                    ]);
                }
                table.render(&mut out);
            }
        }
        Report::ValueAnalysis(rows) => {
            let mut table = Table::new(&[
                "Material",
                "Current Stock",
                "Stock Value",
                "Max Value",
                "Utilization",
                "Consumed Value",
            ]);
            for r in rows {
                table.row(vec![
                    r.material_name.clone(),
                    qty(r.current_stock, &r.unit),
                    format_currency(r.stock_value),
                    format_currency(r.max_value),
                    format!("{} ({})", pct(r.value_utilization), r.band),
                    format_currency(r.consumed_value),
                ]);
            }
            table.render(&mut out);
        }
        Report::ConsumptionTrends(rows) => {
            let mut table = Table::new(&[
                "Category",
                "Materials",
                "Consumed",
                "Consumed Value",
                "Share",
            ]);
            for r in rows {
                table.row(vec![
                    r.category.clone(),
                    r.material_count.to_string(),
                    format_one_dp(r.consumed),
                    format_currency(r.consumed_value),
                    pct(r.percent_of_consumed_value),
                ]);
            }
            table.render(&mut out);
        }
        Report::SupplierComparison(rows) => {
            let mut table = Table::new(&[
                "Supplier",
                "Materials",
                "Total Value",
                "Avg Price",
                "Rating",
                "Performance",
            ]);
            for r in rows {
                table.row(vec![
                    r.supplier_name.clone(),
                    r.material_count.to_string(),
                    format_currency(r.total_value),
                    format_currency(r.avg_price),
                    format!("{}/5", format_one_dp(r.rating)),
                    format!("{} ({})", pct(r.performance_score), r.tier),
                ]);
            }
            table.render(&mut out);
        }
        Report::LowStockReport(report) => render_low_stock(&mut out, report),
        Report::CostAnalysis(report) => render_cost_analysis(&mut out, report),
        Report::ProcurementCost(report) => {
            let mut table = Table::new(&[
                "Supplier",
                "Rating",
                "Materials",
                "Procurement Cost",
                "Current Value",
                "Cost Efficiency",
            ]);
            for r in &report.rows {
                table.row(vec![
                    r.supplier_name.clone(),
                    format_one_dp(r.rating),
                    r.materials_supplied.to_string(),
                    format_currency(r.total_procurement_cost),
                    format_currency(r.total_current_value),
                    pct(r.cost_efficiency),
                ]);
            }
            table.render(&mut out);
            let _ = writeln!(
                out,
                "\n**Total Procurement Cost:** {}",
                format_currency(report.total_procurement_cost)
            );
        }
        Report::ConsumptionCost(report) => render_consumption_cost(&mut out, report),
    }

    out
}

fn render_summary(out: &mut String, summary: &SummaryReport) {
    let mut table = Table::new(&[
        "Material",
        "Category",
        "Quantity",
        "Unit Price",
        "Total Value",
        "Status",
    ]);
    for r in &summary.inventory_status {
        table.row(vec![
            r.material_name.clone(),
            r.category.clone(),
            qty(r.current_stock, &r.unit),
            format_currency(r.unit_price),
            format_currency(r.stock_value),
            r.status.to_string(),
        ]);
    }
    table.render(out);

    let window = &summary.window;
    let _ = writeln!(
        out,
        "\n**Total Inventory Value:** {}  \n**Total Materials:** {}  \n**Low Stock Items:** {}  \n**Stock In ({} to {}):** {} in {} transactions  \n**Stock Out ({} to {}):** {} in {} transactions",
        format_currency(summary.total_inventory_value),
        summary.total_materials,
        summary.low_stock_items,
        window.window.start,
        window.window.end,
        format_one_dp(window.stock_in),
        window.stock_in_count,
        window.window.start,
        window.window.end,
        format_one_dp(window.stock_out),
        window.stock_out_count,
    );

    if !summary.top_consumed.is_empty() {
        let _ = writeln!(out, "\n#### Top Consumed\n");
        let mut table = Table::new(&["#", "Material", "Consumed", "Value"]);
        for (index, r) in summary.top_consumed.iter().enumerate() {
            table.row(vec![
                (index + 1).to_string(),
                r.material_name.clone(),
                qty(r.consumed, &r.unit),
                format_currency(r.consumed_value),
            ]);
        }
        table.render(out);
    }

    if !summary.categories.is_empty() {
        let _ = writeln!(out, "\n#### By Category\n");
        let mut table = Table::new(&["Category", "Materials", "Value", "Share"]);
        for r in &summary.categories {
            table.row(vec![
                r.category.clone(),
                r.material_count.to_string(),
                format_currency(r.total_value),
                pct(r.percent_of_total),
            ]);
        }
        table.render(out);
    }

    if !summary.suppliers.is_empty() {
        let _ = writeln!(out, "\n#### Suppliers\n");
        let mut table = Table::new(&["Supplier", "Materials", "Rating", "Value"]);
        for r in &summary.suppliers {
            table.row(vec![
                r.supplier_name.clone(),
                r.material_count.to_string(),
                format!("{}/5", format_one_dp(r.rating)),
                format_currency(r.total_value),
            ]);
        }
        table.render(out);
    }
}

fn render_low_stock(out: &mut String, report: &LowStockReport) {
    if report.rows.is_empty() {
        empty_notice(out, "materials at or near their minimum level");
        return;
    }

    let mut table = Table::new(&[
        "Material",
        "Current Stock",
        "Min Level",
        "Reorder Qty",
        "Urgency",
        "Reorder Cost",
    ]);
    for r in &report.rows {
        let reorder = if r.overstocked {
            "overstocked".to_string()
        } else {
            qty(r.reorder_qty, &r.unit)
        };
        table.row(vec![
            r.material_name.clone(),
            qty(r.current_stock, &r.unit),
            qty(r.min_stock_level, &r.unit),
            reorder,
            r.urgency.to_string(),
            format_currency(r.reorder_cost),
        ]);
    }
    table.render(out);
    let _ = writeln!(
        out,
        "\n**Total Reorder Cost:** {}  \n**Critical:** {}  \n**Urgent:** {}",
        format_currency(report.total_reorder_cost),
        report.critical_count,
        report.urgent_count
    );
}

fn render_cost_analysis(out: &mut String, report: &CostAnalysisReport) {
    let mut table = Table::new(&[
        "Material",
        "Procured",
        "Consumed",
        "Procurement Cost",
        "Consumption Cost",
        "Stock Value",
    ]);
    for r in &report.rows {
        table.row(vec![
            r.material_name.clone(),
            qty(r.total_procured, &r.unit),
            qty(r.total_consumed, &r.unit),
            format_currency(r.procurement_cost),
            format_currency(r.consumption_cost),
            format_currency(r.current_stock_value),
        ]);
    }
    table.render(out);
    let _ = writeln!(
        out,
        "\n**Total Procurement Cost:** {}  \n**Total Consumption Cost:** {}  \n**Current Stock Value:** {} ({} of procurement)",
        format_currency(report.total_procurement_cost),
        format_currency(report.total_consumption_cost),
        format_currency(report.total_stock_value),
        pct(report.stock_value_percent_of_procurement)
    );
}

fn render_consumption_cost(out: &mut String, report: &ConsumptionCostReport) {
    let mut table = Table::new(&[
        "Category",
        "Materials",
        "Consumed",
        "Consumption Cost",
        "Avg per Material",
        "Share",
    ]);
    for c in &report.categories {
        table.row(vec![
            c.category.clone(),
            c.material_count.to_string(),
            format_one_dp(c.consumed),
            format_currency(c.consumed_value),
            format_currency(c.avg_cost_per_material),
            pct(c.percent_of_total),
        ]);
    }
    table.row(vec![
        "**Total**".to_string(),
        report.total_materials.to_string(),
        format_one_dp(report.total_consumed),
        format_currency(report.total_consumption_cost),
        EMPTY_LABEL.to_string(),
        EMPTY_LABEL.to_string(),
    ]);
    table.render(out);

    for c in &report.categories {
        let _ = writeln!(
            out,
            "\n#### {} - {}\n",
            c.category,
            format_currency(c.consumed_value)
        );
        let mut lines = Table::new(&["Material", "Consumed", "Cost", "Share of Category"]);
        for line in &c.materials {
            lines.row(vec![
                line.material_name.clone(),
                format!(
                    "{} @ {}/{}",
                    qty(line.consumed, &line.unit),
                    format_currency(line.unit_price),
                    line.unit
                ),
                format_currency(line.consumption_cost),
                pct(line.percent_of_category),
            ]);
        }
        lines.render(out);
    }
}
