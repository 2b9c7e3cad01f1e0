// handlers/protected/accounts.rs - /api/accounts (admin only)

use axum::extract::Path;
use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::database::models::Account;
use crate::error::{ApiError, FieldError};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::AccountService;
use crate::types::Role;

/// GET /api/accounts - every account, oldest first.
pub async fn list() -> ApiResult<Vec<Account>> {
    let service = AccountService::new().await?;
    let accounts = service.list().await?;
    Ok(ApiResponse::success(accounts))
}

#[derive(Debug, Deserialize)]
pub struct UpdateAccountRequest {
    pub name: Option<String>,
    pub role: Option<String>,
    pub is_active: Option<bool>,
}

/// PUT /api/accounts/:id - rename, change role, activate/deactivate.
pub async fn update(
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateAccountRequest>,
) -> ApiResult<Account> {
    let role = match payload.role.as_deref() {
        Some(raw) => match raw.parse::<Role>() {
            Ok(role) => Some(role),
            Err(message) => {
                return Err(ApiError::validation(vec![FieldError::new("role", message)]));
            }
        },
        None => None,
    };

    if let Some(name) = payload.name.as_deref() {
        if name.trim().is_empty() {
            return Err(ApiError::validation(vec![FieldError::new(
                "name",
                "Name must not be empty",
            )]));
        }
    }

    let service = AccountService::new().await?;
    let account = service
        .update(id, payload.name.as_deref(), role, payload.is_active)
        .await?;

    Ok(ApiResponse::success(account))
}

/// DELETE /api/accounts/:id - refused for the caller's own account.
pub async fn remove(
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Value> {
    let service = AccountService::new().await?;
    service.delete(id, user.id).await?;
    Ok(ApiResponse::success(json!({ "deleted": true })))
}
