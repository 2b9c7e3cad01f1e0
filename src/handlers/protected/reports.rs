// handlers/protected/reports.rs - /api/reports
//
// Read-only for every signed-in role. The quarter defaults to the
// active one and the week to the current calendar week, so the common
// dashboard calls need no parameters.

use axum::extract::{Path, Query};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::dates;
use crate::error::{ApiError, FieldError};
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::report_service::{
    ChurchQuarterlyReport, ClassQuarterlyReport, FinancialReport, ReportService, WeeklyReport,
};
use crate::services::QuarterService;
use crate::types::WEEKS_PER_QUARTER;

#[derive(Debug, Deserialize)]
pub struct WeeklyQuery {
    pub quarter_id: Option<Uuid>,
    pub week_number: Option<i32>,
}

/// GET /api/reports/weekly?quarter_id=&week_number=
pub async fn weekly(Query(query): Query<WeeklyQuery>) -> ApiResult<WeeklyReport> {
    if let Some(week_number) = query.week_number {
        if !(1..=WEEKS_PER_QUARTER).contains(&week_number) {
            return Err(ApiError::validation(vec![FieldError::new(
                "week_number",
                format!("Week number must be between 1 and {}", WEEKS_PER_QUARTER),
            )]));
        }
    }

    let quarter = resolve_quarter(query.quarter_id).await?;
    let week_number = query
        .week_number
        .unwrap_or_else(|| dates::current_week_number(quarter.start_date, Utc::now().date_naive()));

    let service = ReportService::new().await?;
    let report = service.weekly_report(quarter.id, week_number).await?;
    Ok(ApiResponse::success(report))
}

/// GET /api/reports/class/:id/quarterly
pub async fn class_quarterly(Path(id): Path<Uuid>) -> ApiResult<ClassQuarterlyReport> {
    let service = ReportService::new().await?;
    let report = service.class_quarterly(id).await?;
    Ok(ApiResponse::success(report))
}

/// GET /api/reports/church/:id/quarterly - `:id` is the quarter; the
/// church is a single denormalized name, not an entity of its own.
pub async fn church_quarterly(Path(id): Path<Uuid>) -> ApiResult<ChurchQuarterlyReport> {
    let service = ReportService::new().await?;
    let report = service.church_quarterly(id).await?;
    Ok(ApiResponse::success(report))
}

#[derive(Debug, Deserialize)]
pub struct FinancialQuery {
    pub quarter_id: Option<Uuid>,
}

/// GET /api/reports/financial?quarter_id=
pub async fn financial(Query(query): Query<FinancialQuery>) -> ApiResult<FinancialReport> {
    let quarter = resolve_quarter(query.quarter_id).await?;
    let service = ReportService::new().await?;
    let report = service.financial(quarter.id).await?;
    Ok(ApiResponse::success(report))
}

/// An explicit quarter id wins; otherwise the active quarter. No active
/// quarter and no id is a 404 rather than an empty report.
async fn resolve_quarter(
    quarter_id: Option<Uuid>,
) -> Result<crate::database::models::Quarter, ApiError> {
    let service = QuarterService::new().await?;
    let quarter = match quarter_id {
        Some(id) => service.get_by_id(id).await?,
        None => service.active().await?,
    };
    Ok(quarter)
}
