//! Reporting service for derived inventory reports and data export

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use shared::alerts::AlertReadState;
use shared::models::InventorySnapshot;
use shared::reports::{
    render_markdown, DashboardOverview, Report, ReportEngine, ReportKind, ReportOptions,
};

use crate::config::ReportsConfig;
use crate::error::{AppError, AppResult};

/// Reporting service
#[derive(Clone)]
pub struct ReportingService {
    defaults: ReportsConfig,
}

/// Per-request report parameters
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportRequest {
    pub window_days: Option<u32>,
    pub recent_limit: Option<usize>,
    /// Reference date; today (UTC) when unset
    pub today: Option<NaiveDate>,
}

impl ReportingService {
    pub fn new(defaults: ReportsConfig) -> Self {
        Self { defaults }
    }

    pub fn options(&self, request: &ReportRequest) -> ReportOptions {
        let today = request.today.unwrap_or_else(|| Utc::now().date_naive());
        ReportOptions::new(today)
            .with_window_days(request.window_days.unwrap_or(self.defaults.default_window_days))
            .with_recent_limit(request.recent_limit.unwrap_or(self.defaults.recent_movements_limit))
    }

    pub fn parse_kind(code: &str) -> AppResult<ReportKind> {
        ReportKind::parse(code).ok_or_else(|| AppError::UnknownReport(code.to_string()))
    }

    pub fn generate(
        &self,
        snapshot: &InventorySnapshot,
        kind: ReportKind,
        request: &ReportRequest,
    ) -> Report {
        let engine = ReportEngine::new(snapshot, self.options(request));
        let report = engine.generate(kind);
        tracing::debug!("Generated {} report", kind);
        report
    }

    pub fn dashboard(
        &self,
        snapshot: &InventorySnapshot,
        read_state: &dyn AlertReadState,
    ) -> DashboardOverview {
        ReportEngine::new(snapshot, self.options(&ReportRequest::default()))
            .dashboard_overview(read_state)
    }

    pub fn to_markdown(report: &Report) -> String {
        render_markdown(report)
    }

    /// Export the primary rows of a report as CSV
    pub fn report_to_csv(report: &Report) -> AppResult<String> {
        match report {
            Report::Summary(summary) => Self::export_to_csv(&summary.inventory_status),
            Report::MaterialTransactions(rows) => Self::export_to_csv(rows),
            Report::SupplierTransactions(rows) => Self::export_to_csv(rows),
            Report::RecentMovements(rows) => Self::export_to_csv(rows),
            Report::ValueAnalysis(rows) => Self::export_to_csv(rows),
            Report::ConsumptionTrends(rows) => Self::export_to_csv(rows),
            Report::SupplierComparison(rows) => Self::export_to_csv(rows),
            Report::LowStockReport(report) => Self::export_to_csv(&report.rows),
            Report::CostAnalysis(report) => Self::export_to_csv(&report.rows),
            Report::ProcurementCost(report) => Self::export_to_csv(&report.rows),
            Report::ConsumptionCost(report) => {
                let lines: Vec<_> = report
                    .categories
                    .iter()
                    .flat_map(|c| c.materials.iter())
                    .collect();
                Self::export_to_csv(&lines)
            }
        }
    }

    /// Export report data as CSV
    pub fn export_to_csv<T: Serialize>(data: &[T]) -> AppResult<String> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        for record in data {
            wtr.serialize(record)
                .map_err(|e| AppError::Internal(format!("CSV serialization error: {}", e)))?;
        }
        let bytes = wtr
            .into_inner()
            .map_err(|e| AppError::Internal(format!("CSV writer error: {}", e)))?;
        String::from_utf8(bytes)
            .map_err(|e| AppError::Internal(format!("UTF-8 conversion error: {}", e)))
    }
}
