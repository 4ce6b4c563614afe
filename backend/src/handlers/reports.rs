//! Report handlers with JSON, markdown and CSV output

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared::reports::ReportKind;

use crate::error::{AppError, AppResult};
use crate::services::{ReportRequest, ReportingService};
use crate::AppState;

/// Output format of a report
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Json,
    Markdown,
    Csv,
}

#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    /// Trailing window in days for stock in/out totals
    pub days: Option<u32>,
    /// Row limit of the recent movements report
    pub limit: Option<usize>,
    /// Reference date (YYYY-MM-DD), defaults to today
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub format: ReportFormat,
}

impl ReportQuery {
    fn request(&self) -> AppResult<ReportRequest> {
        if self.days == Some(0) {
            return Err(AppError::Validation {
                field: "days".to_string(),
                message: "Window must be at least one day".to_string(),
            });
        }
        Ok(ReportRequest {
            window_days: self.days,
            recent_limit: self.limit,
            today: self.date,
        })
    }
}

#[derive(Serialize)]
pub struct ReportDescriptor {
    pub kind: ReportKind,
    pub title: &'static str,
}

/// List the available reports
pub async fn list_reports() -> Json<Vec<ReportDescriptor>> {
    Json(
        ReportKind::ALL
            .into_iter()
            .map(|kind| ReportDescriptor {
                kind,
                title: kind.title(),
            })
            .collect(),
    )
}

/// Run a report over the current snapshot
pub async fn get_report(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Query(query): Query<ReportQuery>,
) -> AppResult<Response> {
    let kind = ReportingService::parse_kind(&kind)?;
    let request = query.request()?;
    let snapshot = state.snapshots.snapshot().await?;
    let report = state.reporting.generate(&snapshot, kind, &request);

    match query.format {
        ReportFormat::Json => Ok(Json(report).into_response()),
        ReportFormat::Markdown => Ok((
            [(header::CONTENT_TYPE, "text/markdown; charset=utf-8")],
            ReportingService::to_markdown(&report),
        )
            .into_response()),
        ReportFormat::Csv => {
            let csv = ReportingService::report_to_csv(&report)?;
            let disposition = format!("attachment; filename=\"{}.csv\"", kind.code());
            Ok((
                [
                    (header::CONTENT_TYPE, "text/csv".to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                csv,
            )
                .into_response())
        }
    }
}
