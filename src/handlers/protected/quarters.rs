// handlers/protected/quarters.rs - /api/quarters
//
// Reads are open to any signed-in role; mutations are layered behind
// the admin gate in the router.

use axum::extract::{Path, Query};
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::database::models::Quarter;
use crate::dates;
use crate::error::{ApiError, FieldError};
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::quarter_service::{QuarterPatch, QuarterService};
use crate::types::QuarterName;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub year: Option<i32>,
}

/// GET /api/quarters?year=
pub async fn list(Query(query): Query<ListQuery>) -> ApiResult<Vec<Quarter>> {
    let service = QuarterService::new().await?;
    let quarters = service.list(query.year).await?;
    Ok(ApiResponse::success(quarters))
}

/// GET /api/quarters/active - 404 when no quarter is active.
pub async fn active() -> ApiResult<Quarter> {
    let service = QuarterService::new().await?;
    let quarter = service.active().await?;
    Ok(ApiResponse::success(quarter))
}

/// GET /api/quarters/:id
pub async fn get(Path(id): Path<Uuid>) -> ApiResult<Quarter> {
    let service = QuarterService::new().await?;
    let quarter = service.get_by_id(id).await?;
    Ok(ApiResponse::success(quarter))
}

#[derive(Debug, Deserialize)]
pub struct CreateQuarterRequest {
    pub name: String,
    pub year: i32,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// POST /api/quarters - omitted dates default to the fixed calendar
/// boundaries for the label and year.
pub async fn create(Json(payload): Json<CreateQuarterRequest>) -> ApiResult<Quarter> {
    let name = match payload.name.parse::<QuarterName>() {
        Ok(name) => name,
        Err(message) => {
            return Err(ApiError::validation(vec![FieldError::new("name", message)]));
        }
    };
    if !(1900..=2200).contains(&payload.year) {
        return Err(ApiError::validation(vec![FieldError::new(
            "year",
            "Year must be between 1900 and 2200",
        )]));
    }

    // Year range was checked, so the calendar boundaries always exist
    let (default_start, default_end) = dates::quarter_date_range(name, payload.year)
        .ok_or_else(|| ApiError::bad_request("Year is out of range"))?;

    let start_date = payload.start_date.unwrap_or(default_start);
    let end_date = payload.end_date.unwrap_or(default_end);
    if end_date < start_date {
        return Err(ApiError::validation(vec![FieldError::new(
            "end_date",
            "End date must not precede start date",
        )]));
    }

    let service = QuarterService::new().await?;
    let quarter = service.create(name, payload.year, start_date, end_date).await?;
    Ok(ApiResponse::created(quarter))
}

#[derive(Debug, Deserialize)]
pub struct UpdateQuarterRequest {
    pub name: Option<String>,
    pub year: Option<i32>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub is_active: Option<bool>,
}

/// PATCH /api/quarters/:id - partial update. Setting `is_active: true`
/// runs the deactivate-all/activate-one swap in one transaction, so at
/// most one quarter is ever active.
pub async fn update(
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateQuarterRequest>,
) -> ApiResult<Quarter> {
    let name = match payload.name.as_deref() {
        Some(raw) => match raw.parse::<QuarterName>() {
            Ok(name) => Some(name),
            Err(message) => {
                return Err(ApiError::validation(vec![FieldError::new("name", message)]));
            }
        },
        None => None,
    };
    if let Some(year) = payload.year {
        if !(1900..=2200).contains(&year) {
            return Err(ApiError::validation(vec![FieldError::new(
                "year",
                "Year must be between 1900 and 2200",
            )]));
        }
    }

    let service = QuarterService::new().await?;
    let mut quarter = service
        .update(
            id,
            QuarterPatch {
                name,
                year: payload.year,
                start_date: payload.start_date,
                end_date: payload.end_date,
            },
        )
        .await?;

    match payload.is_active {
        Some(true) => quarter = service.set_active(id).await?,
        Some(false) => quarter = service.deactivate(id).await?,
        None => {}
    }

    Ok(ApiResponse::success(quarter))
}

/// DELETE /api/quarters/:id - cascades to classes, members and records.
pub async fn remove(Path(id): Path<Uuid>) -> ApiResult<Value> {
    let service = QuarterService::new().await?;
    service.delete(id).await?;
    Ok(ApiResponse::success(json!({ "deleted": true })))
}
