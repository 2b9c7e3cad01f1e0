pub mod auth;
pub mod response;

pub use auth::{require_admin, require_staff, session_auth_middleware, AuthUser};
pub use response::{ApiResponse, ApiResult};
