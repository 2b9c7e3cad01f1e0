// handlers/protected/weekly.rs - /api/weekly-data
//
// Weekly submissions, one per class and Sabbath. Creation and edits go
// through the staff gate; the (class, week) uniqueness lives in the
// schema, so the handler never pre-checks for duplicates.

use axum::extract::{Path, Query};
use axum::{Extension, Json};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::database::models::WeeklyRecord;
use crate::error::{ApiError, FieldError};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::weekly_service::{NewWeeklyRecord, WeeklyPatch, WeeklyService};
use crate::types::WEEKS_PER_QUARTER;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub class_id: Option<Uuid>,
    pub week_number: Option<i32>,
}

/// GET /api/weekly-data?class_id=&week_number=
pub async fn list(Query(query): Query<ListQuery>) -> ApiResult<Vec<WeeklyRecord>> {
    let service = WeeklyService::new().await?;
    let records = service.list(query.class_id, query.week_number).await?;
    Ok(ApiResponse::success(records))
}

/// GET /api/weekly-data/:id
pub async fn get(Path(id): Path<Uuid>) -> ApiResult<WeeklyRecord> {
    let service = WeeklyService::new().await?;
    let record = service.get_by_id(id).await?;
    Ok(ApiResponse::success(record))
}

#[derive(Debug, Deserialize)]
pub struct CreateWeeklyRequest {
    pub class_id: Uuid,
    pub week_number: i32,
    pub sabbath_date: Option<NaiveDate>,
    #[serde(default)]
    pub attendance: i32,
    #[serde(default)]
    pub visits: i32,
    #[serde(default)]
    pub bible_studies: i32,
    #[serde(default)]
    pub visitors: i32,
    #[serde(default)]
    pub guides_distributed: i32,
    #[serde(default)]
    pub helped_others: i32,
    #[serde(default)]
    pub studied_lesson: i32,
    #[serde(default)]
    pub offering: f64,
    #[serde(default)]
    pub lesson_payments: String,
    #[serde(default)]
    pub advance_lesson_payments: String,
    #[serde(default)]
    pub morning_watch_payments: String,
    #[serde(default)]
    pub advance_morning_watch_payments: String,
    pub notes: Option<String>,
}

fn validate_week(week_number: i32, errors: &mut Vec<FieldError>) {
    if !(1..=WEEKS_PER_QUARTER).contains(&week_number) {
        errors.push(FieldError::new(
            "week_number",
            format!("Week number must be between 1 and {}", WEEKS_PER_QUARTER),
        ));
    }
}

fn validate_counters(counters: &[(&str, i32)], offering: f64, errors: &mut Vec<FieldError>) {
    for (field, value) in counters {
        if *value < 0 {
            errors.push(FieldError::new(*field, "Value must not be negative"));
        }
    }
    if offering < 0.0 {
        errors.push(FieldError::new("offering", "Offering must not be negative"));
    }
}

/// POST /api/weekly-data - an omitted sabbath_date is derived from the
/// class's quarter. A second submission for the same week is a 409.
pub async fn create(
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateWeeklyRequest>,
) -> ApiResult<WeeklyRecord> {
    let mut errors = Vec::new();
    validate_week(payload.week_number, &mut errors);
    validate_counters(
        &[
            ("attendance", payload.attendance),
            ("visits", payload.visits),
            ("bible_studies", payload.bible_studies),
            ("visitors", payload.visitors),
            ("guides_distributed", payload.guides_distributed),
            ("helped_others", payload.helped_others),
            ("studied_lesson", payload.studied_lesson),
        ],
        payload.offering,
        &mut errors,
    );
    if !errors.is_empty() {
        return Err(ApiError::validation(errors));
    }

    let service = WeeklyService::new().await?;
    let record = service
        .create(
            NewWeeklyRecord {
                class_id: payload.class_id,
                week_number: payload.week_number,
                sabbath_date: payload.sabbath_date,
                attendance: payload.attendance,
                visits: payload.visits,
                bible_studies: payload.bible_studies,
                visitors: payload.visitors,
                guides_distributed: payload.guides_distributed,
                helped_others: payload.helped_others,
                studied_lesson: payload.studied_lesson,
                offering: payload.offering,
                lesson_payments: payload.lesson_payments,
                advance_lesson_payments: payload.advance_lesson_payments,
                morning_watch_payments: payload.morning_watch_payments,
                advance_morning_watch_payments: payload.advance_morning_watch_payments,
                notes: payload.notes,
            },
            user.id,
        )
        .await?;

    Ok(ApiResponse::created(record))
}

#[derive(Debug, Deserialize)]
pub struct UpdateWeeklyRequest {
    pub week_number: Option<i32>,
    pub sabbath_date: Option<NaiveDate>,
    pub attendance: Option<i32>,
    pub visits: Option<i32>,
    pub bible_studies: Option<i32>,
    pub visitors: Option<i32>,
    pub guides_distributed: Option<i32>,
    pub helped_others: Option<i32>,
    pub studied_lesson: Option<i32>,
    pub offering: Option<f64>,
    pub lesson_payments: Option<String>,
    pub advance_lesson_payments: Option<String>,
    pub morning_watch_payments: Option<String>,
    pub advance_morning_watch_payments: Option<String>,
    pub notes: Option<String>,
}

/// PUT /api/weekly-data/:id - partial update; moving onto a taken week
/// conflicts the same way a duplicate submission does.
pub async fn update(
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateWeeklyRequest>,
) -> ApiResult<WeeklyRecord> {
    let mut errors = Vec::new();
    if let Some(week_number) = payload.week_number {
        validate_week(week_number, &mut errors);
    }
    let counters = [
        ("attendance", payload.attendance),
        ("visits", payload.visits),
        ("bible_studies", payload.bible_studies),
        ("visitors", payload.visitors),
        ("guides_distributed", payload.guides_distributed),
        ("helped_others", payload.helped_others),
        ("studied_lesson", payload.studied_lesson),
    ];
    for (field, value) in counters {
        if let Some(value) = value {
            if value < 0 {
                errors.push(FieldError::new(field, "Value must not be negative"));
            }
        }
    }
    if payload.offering.is_some_and(|o| o < 0.0) {
        errors.push(FieldError::new("offering", "Offering must not be negative"));
    }
    if !errors.is_empty() {
        return Err(ApiError::validation(errors));
    }

    let service = WeeklyService::new().await?;
    let record = service
        .update(
            id,
            WeeklyPatch {
                week_number: payload.week_number,
                sabbath_date: payload.sabbath_date,
                attendance: payload.attendance,
                visits: payload.visits,
                bible_studies: payload.bible_studies,
                visitors: payload.visitors,
                guides_distributed: payload.guides_distributed,
                helped_others: payload.helped_others,
                studied_lesson: payload.studied_lesson,
                offering: payload.offering,
                lesson_payments: payload.lesson_payments,
                advance_lesson_payments: payload.advance_lesson_payments,
                morning_watch_payments: payload.morning_watch_payments,
                advance_morning_watch_payments: payload.advance_morning_watch_payments,
                notes: payload.notes,
            },
        )
        .await?;

    Ok(ApiResponse::success(record))
}

/// DELETE /api/weekly-data/:id
pub async fn remove(Path(id): Path<Uuid>) -> ApiResult<Value> {
    let service = WeeklyService::new().await?;
    service.delete(id).await?;
    Ok(ApiResponse::success(json!({ "deleted": true })))
}
