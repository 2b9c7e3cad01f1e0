// handlers/protected/classes.rs - /api/classes
//
// Reads are open to any signed-in role; create/update/delete sit behind
// the admin gate in the router.

use axum::extract::{Path, Query};
use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::database::models::Class;
use crate::error::{ApiError, FieldError};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::class_service::{ClassPatch, ClassService, NewClass};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub quarter_id: Option<Uuid>,
}

/// GET /api/classes?quarter_id=
pub async fn list(Query(query): Query<ListQuery>) -> ApiResult<Vec<Class>> {
    let service = ClassService::new().await?;
    let classes = service.list(query.quarter_id).await?;
    Ok(ApiResponse::success(classes))
}

/// GET /api/classes/my-classes - classes the caller is secretary of.
/// Admins and viewers without linked classes get an empty list.
pub async fn my_classes(Extension(user): Extension<AuthUser>) -> ApiResult<Vec<Class>> {
    let service = ClassService::new().await?;
    let classes = service.my_classes(user.id).await?;
    Ok(ApiResponse::success(classes))
}

/// GET /api/classes/:id
pub async fn get(Path(id): Path<Uuid>) -> ApiResult<Class> {
    let service = ClassService::new().await?;
    let class = service.get_by_id(id).await?;
    Ok(ApiResponse::success(class))
}

#[derive(Debug, Deserialize)]
pub struct CreateClassRequest {
    pub quarter_id: Uuid,
    pub name: String,
    pub teacher_name: Option<String>,
    pub secretary_id: Option<Uuid>,
    pub secretary_name: Option<String>,
    pub church_name: Option<String>,
}

/// POST /api/classes - the church name defaults to the configured
/// organization name, the secretary name to the linked account's name.
pub async fn create(Json(payload): Json<CreateClassRequest>) -> ApiResult<Class> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(ApiError::validation(vec![FieldError::new(
            "name",
            "Class name is required",
        )]));
    }

    let service = ClassService::new().await?;
    let class = service
        .create(NewClass {
            quarter_id: payload.quarter_id,
            name: name.to_string(),
            teacher_name: payload.teacher_name,
            secretary_id: payload.secretary_id,
            secretary_name: payload.secretary_name,
            church_name: payload.church_name,
        })
        .await?;

    Ok(ApiResponse::created(class))
}

#[derive(Debug, Deserialize)]
pub struct UpdateClassRequest {
    pub name: Option<String>,
    pub teacher_name: Option<String>,
    pub secretary_id: Option<Uuid>,
    pub secretary_name: Option<String>,
    pub church_name: Option<String>,
}

/// PUT /api/classes/:id - partial update.
pub async fn update(
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateClassRequest>,
) -> ApiResult<Class> {
    if let Some(name) = payload.name.as_deref() {
        if name.trim().is_empty() {
            return Err(ApiError::validation(vec![FieldError::new(
                "name",
                "Class name must not be empty",
            )]));
        }
    }

    let service = ClassService::new().await?;
    let class = service
        .update(
            id,
            ClassPatch {
                name: payload.name,
                teacher_name: payload.teacher_name,
                secretary_id: payload.secretary_id,
                secretary_name: payload.secretary_name,
                church_name: payload.church_name,
            },
        )
        .await?;

    Ok(ApiResponse::success(class))
}

/// DELETE /api/classes/:id - members and weekly records cascade.
pub async fn remove(Path(id): Path<Uuid>) -> ApiResult<Value> {
    let service = ClassService::new().await?;
    service.delete(id).await?;
    Ok(ApiResponse::success(json!({ "deleted": true })))
}
