// handlers/protected/members.rs - /api/class-members
//
// Roster management. Mutations are restricted to administrators and
// class secretaries via the staff gate; delete is a soft delete.

use axum::extract::{Path, Query};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::ClassMember;
use crate::error::{ApiError, FieldError};
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::MemberService;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub class_id: Uuid,
    #[serde(default)]
    pub include_inactive: bool,
}

/// GET /api/class-members?class_id=&include_inactive=
pub async fn list(Query(query): Query<ListQuery>) -> ApiResult<Vec<ClassMember>> {
    let service = MemberService::new().await?;
    let members = service.list(query.class_id, query.include_inactive).await?;
    Ok(ApiResponse::success(members))
}

/// GET /api/class-members/:id
pub async fn get(Path(id): Path<Uuid>) -> ApiResult<ClassMember> {
    let service = MemberService::new().await?;
    let member = service.get_by_id(id).await?;
    Ok(ApiResponse::success(member))
}

#[derive(Debug, Deserialize)]
pub struct CreateMemberRequest {
    pub class_id: Uuid,
    pub name: String,
}

/// POST /api/class-members - names are unique per class, case-insensitive.
pub async fn create(Json(payload): Json<CreateMemberRequest>) -> ApiResult<ClassMember> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(ApiError::validation(vec![FieldError::new(
            "name",
            "Member name is required",
        )]));
    }

    let service = MemberService::new().await?;
    let member = service.create(payload.class_id, name).await?;
    Ok(ApiResponse::created(member))
}

#[derive(Debug, Deserialize)]
pub struct UpdateMemberRequest {
    pub name: Option<String>,
    pub is_active: Option<bool>,
}

/// PUT /api/class-members/:id - rename or (re)activate.
pub async fn update(
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateMemberRequest>,
) -> ApiResult<ClassMember> {
    if let Some(name) = payload.name.as_deref() {
        if name.trim().is_empty() {
            return Err(ApiError::validation(vec![FieldError::new(
                "name",
                "Member name must not be empty",
            )]));
        }
    }

    let service = MemberService::new().await?;
    let member = service
        .update(id, payload.name.as_deref().map(str::trim), payload.is_active)
        .await?;

    Ok(ApiResponse::success(member))
}

/// DELETE /api/class-members/:id - soft delete: the row stays so old
/// reports keep their people, it just drops off the active roster.
pub async fn remove(Path(id): Path<Uuid>) -> ApiResult<ClassMember> {
    let service = MemberService::new().await?;
    let member = service.deactivate(id).await?;
    Ok(ApiResponse::success(member))
}
