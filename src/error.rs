// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use serde_json::{json, Value};

/// One field-level validation failure. Clients get these as a list so a
/// form can annotate several inputs from a single response.
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field: field.into(), message: message.into() }
    }
}

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),
    ValidationError(Vec<FieldError>),
    InvalidOperation(String),

    // 401 Unauthorized
    Unauthenticated(String),

    // 403 Forbidden
    Forbidden(String),

    // 404 Not Found
    NotFound(String),

    // 409 Conflict
    Conflict(String),

    // 500 Internal Server Error
    InternalServerError(String),

    // 503 Service Unavailable
    ServiceUnavailable(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::BadRequest(_) => 400,
            ApiError::ValidationError(_) => 400,
            ApiError::InvalidOperation(_) => 400,
            ApiError::Unauthenticated(_) => 401,
            ApiError::Forbidden(_) => 403,
            ApiError::NotFound(_) => 404,
            ApiError::Conflict(_) => 409,
            ApiError::InternalServerError(_) => 500,
            ApiError::ServiceUnavailable(_) => 503,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::ValidationError(_) => "Validation failed",
            ApiError::InvalidOperation(msg) => msg,
            ApiError::Unauthenticated(msg) => msg,
            ApiError::Forbidden(msg) => msg,
            ApiError::NotFound(msg) => msg,
            ApiError::Conflict(msg) => msg,
            ApiError::InternalServerError(msg) => msg,
            ApiError::ServiceUnavailable(msg) => msg,
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        match self {
            ApiError::ValidationError(errors) => json!({
                "success": false,
                "message": self.message(),
                "errors": errors,
            }),
            _ => json!({
                "success": false,
                "message": self.message(),
            }),
        }
    }
}

// Static constructor methods
impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn validation(errors: Vec<FieldError>) -> Self {
        ApiError::ValidationError(errors)
    }

    pub fn invalid_operation(message: impl Into<String>) -> Self {
        ApiError::InvalidOperation(message.into())
    }

    pub fn unauthenticated(message: impl Into<String>) -> Self {
        ApiError::Unauthenticated(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(message.into())
    }

    /// Log the real failure, return a 500. Production clients only ever
    /// see a generic message; development keeps the detail in the body.
    pub fn internal(detail: impl Into<String>) -> Self {
        let detail = detail.into();
        tracing::error!("{}", detail);
        if crate::is_production!() {
            ApiError::InternalServerError("An unexpected error occurred".to_string())
        } else {
            ApiError::InternalServerError(detail)
        }
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        ApiError::ServiceUnavailable(message.into())
    }

    /// Central mapping from database failures onto the wire taxonomy.
    /// Known Postgres SQLSTATE codes become client errors; everything
    /// else is a 500.
    pub fn from_sqlx(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => ApiError::not_found("Record not found"),
            sqlx::Error::Database(db) => match db.code().as_deref() {
                Some("23505") => ApiError::conflict("A record with these values already exists"),
                Some("23503") => ApiError::bad_request("Invalid reference to a related record"),
                Some("22P02") => ApiError::bad_request("Invalid input syntax"),
                _ => ApiError::internal(format!("Database error: {}", db.message())),
            },
            sqlx::Error::PoolTimedOut => {
                ApiError::service_unavailable("Database temporarily unavailable")
            }
            _ => ApiError::internal(format!("Database error: {}", err)),
        }
    }
}

// Convert other error types to ApiError
impl From<crate::database::manager::DatabaseError> for ApiError {
    fn from(err: crate::database::manager::DatabaseError) -> Self {
        use crate::database::manager::DatabaseError;
        match err {
            DatabaseError::ConfigMissing(var) => {
                tracing::error!("Database unavailable: {} is not set", var);
                ApiError::service_unavailable("Database is not configured")
            }
            DatabaseError::Sqlx(e) => ApiError::from_sqlx(e),
            DatabaseError::Migration(e) => {
                tracing::error!("Migration error: {}", e);
                ApiError::service_unavailable("Service is being updated, please try again later")
            }
        }
    }
}

impl From<crate::auth::JwtError> for ApiError {
    fn from(err: crate::auth::JwtError) -> Self {
        use crate::auth::JwtError;
        match err {
            JwtError::MissingSecret => ApiError::internal("Session secret is not configured"),
            JwtError::Signing(msg) => ApiError::internal(format!("Failed to sign session token: {}", msg)),
            JwtError::InvalidToken => ApiError::unauthenticated("Invalid or expired session"),
        }
    }
}

impl From<crate::services::account_service::AccountError> for ApiError {
    fn from(err: crate::services::account_service::AccountError) -> Self {
        use crate::services::account_service::AccountError;
        match err {
            AccountError::NotFound => ApiError::not_found("Account not found"),
            AccountError::DuplicateEmail => ApiError::conflict("Email is already registered"),
            AccountError::InvalidCredentials => ApiError::unauthenticated("Invalid email or password"),
            AccountError::Inactive => ApiError::forbidden("Account is deactivated"),
            AccountError::WrongPassword => ApiError::bad_request("Current password is incorrect"),
            AccountError::SelfDeletion => ApiError::invalid_operation("You cannot delete your own account"),
            AccountError::Password(e) => ApiError::internal(e.to_string()),
            AccountError::Manager(e) => e.into(),
            AccountError::Database(e) => ApiError::from_sqlx(e),
        }
    }
}

impl From<crate::services::quarter_service::QuarterError> for ApiError {
    fn from(err: crate::services::quarter_service::QuarterError) -> Self {
        use crate::services::quarter_service::QuarterError;
        match err {
            QuarterError::NotFound => ApiError::not_found("Quarter not found"),
            QuarterError::Duplicate => {
                ApiError::conflict("A quarter with that name and year already exists")
            }
            QuarterError::Manager(e) => e.into(),
            QuarterError::Database(e) => ApiError::from_sqlx(e),
        }
    }
}

impl From<crate::services::class_service::ClassError> for ApiError {
    fn from(err: crate::services::class_service::ClassError) -> Self {
        use crate::services::class_service::ClassError;
        match err {
            ClassError::NotFound => ApiError::not_found("Class not found"),
            // Referenced from a request body, so a client error rather
            // than a missing-resource response.
            ClassError::QuarterNotFound => ApiError::bad_request("Quarter does not exist"),
            ClassError::Manager(e) => e.into(),
            ClassError::Database(e) => ApiError::from_sqlx(e),
        }
    }
}

impl From<crate::services::member_service::MemberError> for ApiError {
    fn from(err: crate::services::member_service::MemberError) -> Self {
        use crate::services::member_service::MemberError;
        match err {
            MemberError::NotFound => ApiError::not_found("Class member not found"),
            MemberError::ClassNotFound => ApiError::bad_request("Class does not exist"),
            MemberError::DuplicateName(name) => {
                ApiError::conflict(format!("'{}' is already a member of this class", name))
            }
            MemberError::Manager(e) => e.into(),
            MemberError::Database(e) => ApiError::from_sqlx(e),
        }
    }
}

impl From<crate::services::weekly_service::WeeklyError> for ApiError {
    fn from(err: crate::services::weekly_service::WeeklyError) -> Self {
        use crate::services::weekly_service::WeeklyError;
        match err {
            WeeklyError::NotFound => ApiError::not_found("Weekly record not found"),
            WeeklyError::ClassNotFound => ApiError::bad_request("Class does not exist"),
            WeeklyError::DuplicateWeek(week) => {
                ApiError::conflict(format!("A record for week {} already exists for this class", week))
            }
            WeeklyError::Manager(e) => e.into(),
            WeeklyError::Database(e) => ApiError::from_sqlx(e),
        }
    }
}

impl From<crate::services::report_service::ReportError> for ApiError {
    fn from(err: crate::services::report_service::ReportError) -> Self {
        use crate::services::report_service::ReportError;
        match err {
            ReportError::ClassNotFound => ApiError::not_found("Class not found"),
            ReportError::QuarterNotFound => ApiError::not_found("Quarter not found"),
            ReportError::Manager(e) => e.into(),
            ReportError::Database(e) => ApiError::from_sqlx(e),
        }
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_json())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_match_the_taxonomy() {
        assert_eq!(ApiError::bad_request("x").status_code(), 400);
        assert_eq!(ApiError::validation(vec![]).status_code(), 400);
        assert_eq!(ApiError::invalid_operation("x").status_code(), 400);
        assert_eq!(ApiError::unauthenticated("x").status_code(), 401);
        assert_eq!(ApiError::forbidden("x").status_code(), 403);
        assert_eq!(ApiError::not_found("x").status_code(), 404);
        assert_eq!(ApiError::conflict("x").status_code(), 409);
        assert_eq!(ApiError::service_unavailable("x").status_code(), 503);
    }

    #[test]
    fn plain_errors_omit_the_field_list() {
        let body = ApiError::not_found("Quarter not found").to_json();
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Quarter not found");
        assert!(body.get("errors").is_none());
    }

    #[test]
    fn validation_errors_carry_field_details() {
        let body = ApiError::validation(vec![
            FieldError::new("email", "Email is required"),
            FieldError::new("password", "Password must be at least 8 characters"),
        ])
        .to_json();
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Validation failed");
        assert_eq!(body["errors"].as_array().map(|a| a.len()), Some(2));
        assert_eq!(body["errors"][0]["field"], "email");
    }

    #[test]
    fn sqlx_row_not_found_maps_to_404() {
        let err = ApiError::from_sqlx(sqlx::Error::RowNotFound);
        assert_eq!(err.status_code(), 404);
    }

    #[test]
    fn pool_timeout_maps_to_503() {
        let err = ApiError::from_sqlx(sqlx::Error::PoolTimedOut);
        assert_eq!(err.status_code(), 503);
    }
}
