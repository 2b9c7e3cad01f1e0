// handlers/protected/auth/session.rs - profile, password change, logout

use axum::http::header::SET_COOKIE;
use axum::response::{AppendHeaders, IntoResponse};
use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::cookies;
use crate::database::models::Account;
use crate::error::{ApiError, FieldError};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::AccountService;

/// GET /api/auth/profile - fresh account details for the session holder.
/// Reads the database rather than echoing token claims, so role changes
/// show up before the token is reissued.
pub async fn profile(Extension(user): Extension<AuthUser>) -> ApiResult<Account> {
    let service = AccountService::new().await?;
    let account = service.get_by_id(user.id).await?;
    Ok(ApiResponse::success(account))
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// POST /api/auth/change-password - requires the current password.
pub async fn change_password(
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<ChangePasswordRequest>,
) -> ApiResult<Value> {
    if payload.new_password.len() < 8 {
        return Err(ApiError::validation(vec![FieldError::new(
            "new_password",
            "Password must be at least 8 characters",
        )]));
    }

    let service = AccountService::new().await?;
    service
        .change_password(user.id, &payload.current_password, &payload.new_password)
        .await?;

    Ok(ApiResponse::success(json!({ "changed": true })))
}

/// POST /api/auth/logout - clear the session cookie. Tokens are
/// stateless, so the copy a client kept stays valid until expiry; this
/// only removes the browser's cookie.
pub async fn logout() -> impl IntoResponse {
    let cookie = cookies::clear_session_cookie();

    (
        AppendHeaders([(SET_COOKIE, cookie.to_string())]),
        ApiResponse::success(json!({ "logged_out": true })),
    )
}
