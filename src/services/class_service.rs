use sqlx::PgPool;
use uuid::Uuid;

use crate::config;
use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::Class;

#[derive(Debug, thiserror::Error)]
pub enum ClassError {
    #[error("Class not found")]
    NotFound,

    #[error("Quarter does not exist")]
    QuarterNotFound,

    #[error(transparent)]
    Manager(#[from] DatabaseError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, Default)]
pub struct NewClass {
    pub quarter_id: Uuid,
    pub name: String,
    pub teacher_name: Option<String>,
    pub secretary_id: Option<Uuid>,
    pub secretary_name: Option<String>,
    pub church_name: Option<String>,
}

/// Partial update; `None` leaves the column unchanged.
#[derive(Debug, Default)]
pub struct ClassPatch {
    pub name: Option<String>,
    pub teacher_name: Option<String>,
    pub secretary_id: Option<Uuid>,
    pub secretary_name: Option<String>,
    pub church_name: Option<String>,
}

/// Class CRUD within quarters.
pub struct ClassService {
    pool: PgPool,
}

impl ClassService {
    pub async fn new() -> Result<Self, ClassError> {
        let pool = DatabaseManager::pool().await?;
        Ok(Self { pool })
    }

    /// Create a class under a quarter. The church name falls back to the
    /// configured default, and an omitted secretary name is filled in
    /// from the referenced account.
    pub async fn create(&self, new_class: NewClass) -> Result<Class, ClassError> {
        let quarter_exists: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM quarters WHERE id = $1")
                .bind(new_class.quarter_id)
                .fetch_optional(&self.pool)
                .await?;
        if quarter_exists.is_none() {
            return Err(ClassError::QuarterNotFound);
        }

        let church_name = new_class
            .church_name
            .unwrap_or_else(|| config::config().organization.church_name.clone());

        let secretary_name = match (&new_class.secretary_name, new_class.secretary_id) {
            (Some(name), _) => Some(name.clone()),
            (None, Some(account_id)) => self.account_name(account_id).await?,
            (None, None) => None,
        };

        let class = sqlx::query_as::<_, Class>(
            r#"
            INSERT INTO classes (quarter_id, name, teacher_name, secretary_id, secretary_name, church_name)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(new_class.quarter_id)
        .bind(&new_class.name)
        .bind(new_class.teacher_name.as_deref().unwrap_or(""))
        .bind(new_class.secretary_id)
        .bind(secretary_name)
        .bind(&church_name)
        .fetch_one(&self.pool)
        .await?;

        Ok(class)
    }

    async fn account_name(&self, account_id: Uuid) -> Result<Option<String>, ClassError> {
        let row: Option<(String,)> = sqlx::query_as("SELECT name FROM accounts WHERE id = $1")
            .bind(account_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|(name,)| name))
    }

    /// List classes, optionally restricted to one quarter.
    pub async fn list(&self, quarter_id: Option<Uuid>) -> Result<Vec<Class>, ClassError> {
        let classes = sqlx::query_as::<_, Class>(
            r#"
            SELECT * FROM classes
            WHERE ($1::uuid IS NULL OR quarter_id = $1)
            ORDER BY name, created_at
            "#,
        )
        .bind(quarter_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(classes)
    }

    /// Classes whose secretary is the given account. Other roles simply
    /// get an empty list.
    pub async fn my_classes(&self, secretary_id: Uuid) -> Result<Vec<Class>, ClassError> {
        let classes = sqlx::query_as::<_, Class>(
            "SELECT * FROM classes WHERE secretary_id = $1 ORDER BY name",
        )
        .bind(secretary_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(classes)
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Class, ClassError> {
        sqlx::query_as::<_, Class>("SELECT * FROM classes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(ClassError::NotFound)
    }

    pub async fn update(&self, id: Uuid, patch: ClassPatch) -> Result<Class, ClassError> {
        sqlx::query_as::<_, Class>(
            r#"
            UPDATE classes
            SET name = COALESCE($2, name),
                teacher_name = COALESCE($3, teacher_name),
                secretary_id = COALESCE($4, secretary_id),
                secretary_name = COALESCE($5, secretary_name),
                church_name = COALESCE($6, church_name)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(patch.name)
        .bind(patch.teacher_name)
        .bind(patch.secretary_id)
        .bind(patch.secretary_name)
        .bind(patch.church_name)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ClassError::NotFound)
    }

    /// Delete a class. Members and weekly records go with it.
    pub async fn delete(&self, id: Uuid) -> Result<(), ClassError> {
        let result = sqlx::query("DELETE FROM classes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ClassError::NotFound);
        }

        Ok(())
    }
}
