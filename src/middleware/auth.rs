use axum::{extract::Request, http::HeaderMap, middleware::Next, response::Response};
use uuid::Uuid;

use crate::auth::{self, cookies, Claims};
use crate::error::ApiError;
use crate::types::Role;

/// Authenticated account context extracted from the session token
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            email: claims.email,
            role: claims.role,
        }
    }
}

/// Session middleware for every /api route behind a login. Verifies the
/// token and injects [`AuthUser`] into request extensions.
pub async fn session_auth_middleware(
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = cookies::extract_session_token(&headers)
        .ok_or_else(|| ApiError::unauthenticated("Missing session token"))?;

    let claims = auth::validate_jwt(&token)
        .map_err(|_| ApiError::unauthenticated("Invalid or expired session"))?;

    request.extensions_mut().insert(AuthUser::from(claims));

    Ok(next.run(request).await)
}

/// Role layer: administrators only.
pub async fn require_admin(request: Request, next: Next) -> Result<Response, ApiError> {
    require_role(&[Role::Admin], request, next).await
}

/// Role layer: administrators and class secretaries.
pub async fn require_staff(request: Request, next: Next) -> Result<Response, ApiError> {
    require_role(&[Role::Admin, Role::Secretary], request, next).await
}

/// Runs inside `session_auth_middleware`, so the extension is present on
/// every request that reaches it.
async fn require_role(
    allowed: &[Role],
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = request
        .extensions()
        .get::<AuthUser>()
        .ok_or_else(|| ApiError::unauthenticated("Missing session token"))?;

    if !allowed.contains(&user.role) {
        return Err(ApiError::forbidden("Your role does not permit this operation"));
    }

    Ok(next.run(request).await)
}
