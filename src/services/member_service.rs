use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::ClassMember;
use crate::database::is_unique_violation;

#[derive(Debug, thiserror::Error)]
pub enum MemberError {
    #[error("Class member not found")]
    NotFound,

    #[error("Class does not exist")]
    ClassNotFound,

    #[error("'{0}' is already a member of this class")]
    DuplicateName(String),

    #[error(transparent)]
    Manager(#[from] DatabaseError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Class roster management. Removal is a soft delete so historical
/// reports keep their people.
pub struct MemberService {
    pool: PgPool,
}

impl MemberService {
    pub async fn new() -> Result<Self, MemberError> {
        let pool = DatabaseManager::pool().await?;
        Ok(Self { pool })
    }

    /// Add a member to a class. Names are unique per class ignoring
    /// case; the index catches duplicates even under concurrent adds.
    pub async fn create(&self, class_id: Uuid, name: &str) -> Result<ClassMember, MemberError> {
        let class_exists: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM classes WHERE id = $1")
            .bind(class_id)
            .fetch_optional(&self.pool)
            .await?;
        if class_exists.is_none() {
            return Err(MemberError::ClassNotFound);
        }

        let result = sqlx::query_as::<_, ClassMember>(
            r#"
            INSERT INTO class_members (class_id, name)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(class_id)
        .bind(name)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(member) => Ok(member),
            Err(err) if is_unique_violation(&err) => {
                Err(MemberError::DuplicateName(name.to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Roster for one class, active members only unless asked otherwise.
    pub async fn list(
        &self,
        class_id: Uuid,
        include_inactive: bool,
    ) -> Result<Vec<ClassMember>, MemberError> {
        let members = sqlx::query_as::<_, ClassMember>(
            r#"
            SELECT * FROM class_members
            WHERE class_id = $1 AND (is_active OR $2)
            ORDER BY name
            "#,
        )
        .bind(class_id)
        .bind(include_inactive)
        .fetch_all(&self.pool)
        .await?;

        Ok(members)
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<ClassMember, MemberError> {
        sqlx::query_as::<_, ClassMember>("SELECT * FROM class_members WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(MemberError::NotFound)
    }

    /// Rename or (re)activate a member. A rename that collides with an
    /// existing name in the class is a conflict.
    pub async fn update(
        &self,
        id: Uuid,
        name: Option<&str>,
        is_active: Option<bool>,
    ) -> Result<ClassMember, MemberError> {
        let result = sqlx::query_as::<_, ClassMember>(
            r#"
            UPDATE class_members
            SET name = COALESCE($2, name),
                is_active = COALESCE($3, is_active)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(is_active)
        .fetch_optional(&self.pool)
        .await;

        match result {
            Ok(Some(member)) => Ok(member),
            Ok(None) => Err(MemberError::NotFound),
            Err(err) if is_unique_violation(&err) => {
                Err(MemberError::DuplicateName(name.unwrap_or_default().to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Soft delete: flip the active flag and keep the row.
    pub async fn deactivate(&self, id: Uuid) -> Result<ClassMember, MemberError> {
        sqlx::query_as::<_, ClassMember>(
            "UPDATE class_members SET is_active = false WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(MemberError::NotFound)
    }
}
