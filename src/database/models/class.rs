use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Class {
    pub id: Uuid,
    pub quarter_id: Uuid,
    pub name: String,
    pub teacher_name: String,
    /// Account responsible for this class's weekly submissions. Kept as
    /// a nullable reference so deleting the account keeps the class.
    pub secretary_id: Option<Uuid>,
    pub secretary_name: Option<String>,
    pub church_name: String,
    pub created_at: DateTime<Utc>,
}
