// handlers/public/auth/login.rs - POST /api/auth/login

use axum::http::header::SET_COOKIE;
use axum::response::{AppendHeaders, IntoResponse};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::auth::{self, cookies, Claims};
use crate::database::models::Account;
use crate::error::{ApiError, FieldError};
use crate::middleware::ApiResponse;
use crate::services::AccountService;
use crate::types::Role;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub account: Account,
    /// Seconds until the session token expires.
    pub expires_in: i64,
}

/// Verify credentials, mint a session token and set the session cookie.
pub async fn login(Json(payload): Json<LoginRequest>) -> Result<impl IntoResponse, ApiError> {
    let mut errors = Vec::new();
    if payload.email.trim().is_empty() {
        errors.push(FieldError::new("email", "Email is required"));
    }
    if payload.password.is_empty() {
        errors.push(FieldError::new("password", "Password is required"));
    }
    if !errors.is_empty() {
        return Err(ApiError::validation(errors));
    }

    let service = AccountService::new().await?;
    let account = service
        .authenticate(payload.email.trim(), &payload.password)
        .await?;

    // Stored roles passed the schema CHECK, so a parse failure here
    // means corrupt data, not client error.
    let role = account.role.parse::<Role>().map_err(ApiError::internal)?;

    let claims = Claims::new(account.id, &account.email, role);
    let expires_in = claims.exp - claims.iat;
    let token = auth::generate_jwt(&claims)?;
    let cookie = cookies::session_cookie(&token);

    Ok((
        AppendHeaders([(SET_COOKIE, cookie.to_string())]),
        ApiResponse::success(LoginResponse { account, expires_in }),
    ))
}
