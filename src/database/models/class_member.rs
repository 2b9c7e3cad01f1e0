use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ClassMember {
    pub id: Uuid,
    pub class_id: Uuid,
    pub name: String,
    /// Soft-delete flag. Inactive members stay on historical reports.
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}
