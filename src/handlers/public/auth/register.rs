// handlers/public/auth/register.rs - POST /api/auth/register

use axum::Json;
use serde::Deserialize;

use crate::database::models::Account;
use crate::error::{ApiError, FieldError};
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::AccountService;
use crate::types::Role;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub name: String,
    pub password: String,
}

/// Create an account. Self-registration always yields the secretary
/// role; admins are promoted later by an existing admin. No session is
/// issued here, the new account logs in afterwards.
pub async fn register(Json(payload): Json<RegisterRequest>) -> ApiResult<Account> {
    let email = payload.email.trim();
    let name = payload.name.trim();

    let mut errors = Vec::new();
    if email.is_empty() {
        errors.push(FieldError::new("email", "Email is required"));
    } else if !email.contains('@') {
        errors.push(FieldError::new("email", "Email address is not valid"));
    }
    if name.is_empty() {
        errors.push(FieldError::new("name", "Name is required"));
    }
    if payload.password.len() < 8 {
        errors.push(FieldError::new("password", "Password must be at least 8 characters"));
    }
    if !errors.is_empty() {
        return Err(ApiError::validation(errors));
    }

    let service = AccountService::new().await?;
    let account = service
        .register(email, name, &payload.password, Role::Secretary)
        .await?;

    Ok(ApiResponse::created(account))
}
