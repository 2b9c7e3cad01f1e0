use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::Quarter;
use crate::database::is_unique_violation;
use crate::types::QuarterName;

#[derive(Debug, thiserror::Error)]
pub enum QuarterError {
    #[error("Quarter not found")]
    NotFound,

    #[error("A quarter with that name and year already exists")]
    Duplicate,

    #[error(transparent)]
    Manager(#[from] DatabaseError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Partial update; `None` leaves the column unchanged.
#[derive(Debug, Default)]
pub struct QuarterPatch {
    pub name: Option<QuarterName>,
    pub year: Option<i32>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Quarter lifecycle, including the single-active invariant.
pub struct QuarterService {
    pool: PgPool,
}

impl QuarterService {
    pub async fn new() -> Result<Self, QuarterError> {
        let pool = DatabaseManager::pool().await?;
        Ok(Self { pool })
    }

    /// Create a quarter. New quarters always start inactive; activation
    /// is a separate, explicit step.
    pub async fn create(
        &self,
        name: QuarterName,
        year: i32,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Quarter, QuarterError> {
        let result = sqlx::query_as::<_, Quarter>(
            r#"
            INSERT INTO quarters (name, year, start_date, end_date)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(name.as_str())
        .bind(year)
        .bind(start_date)
        .bind(end_date)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(quarter) => Ok(quarter),
            Err(err) if is_unique_violation(&err) => Err(QuarterError::Duplicate),
            Err(err) => Err(err.into()),
        }
    }

    /// List quarters, optionally restricted to one year. Newest first,
    /// Q4 before Q1 within a year.
    pub async fn list(&self, year: Option<i32>) -> Result<Vec<Quarter>, QuarterError> {
        let quarters = sqlx::query_as::<_, Quarter>(
            r#"
            SELECT * FROM quarters
            WHERE ($1::int IS NULL OR year = $1)
            ORDER BY year DESC, name DESC
            "#,
        )
        .bind(year)
        .fetch_all(&self.pool)
        .await?;

        Ok(quarters)
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Quarter, QuarterError> {
        sqlx::query_as::<_, Quarter>("SELECT * FROM quarters WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(QuarterError::NotFound)
    }

    /// The single active quarter; `NotFound` when none is active.
    pub async fn active(&self) -> Result<Quarter, QuarterError> {
        sqlx::query_as::<_, Quarter>("SELECT * FROM quarters WHERE is_active")
            .fetch_optional(&self.pool)
            .await?
            .ok_or(QuarterError::NotFound)
    }

    pub async fn update(&self, id: Uuid, patch: QuarterPatch) -> Result<Quarter, QuarterError> {
        let result = sqlx::query_as::<_, Quarter>(
            r#"
            UPDATE quarters
            SET name = COALESCE($2, name),
                year = COALESCE($3, year),
                start_date = COALESCE($4, start_date),
                end_date = COALESCE($5, end_date)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(patch.name.map(|n| n.as_str()))
        .bind(patch.year)
        .bind(patch.start_date)
        .bind(patch.end_date)
        .fetch_optional(&self.pool)
        .await;

        match result {
            Ok(Some(quarter)) => Ok(quarter),
            Ok(None) => Err(QuarterError::NotFound),
            Err(err) if is_unique_violation(&err) => Err(QuarterError::Duplicate),
            Err(err) => Err(err.into()),
        }
    }

    /// Make this quarter the active one. Deactivate-all and activate-one
    /// run in a single transaction, and the partial unique index on
    /// is_active backs the invariant if activations ever race.
    pub async fn set_active(&self, id: Uuid) -> Result<Quarter, QuarterError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE quarters SET is_active = false WHERE is_active")
            .execute(&mut *tx)
            .await?;

        let quarter = sqlx::query_as::<_, Quarter>(
            "UPDATE quarters SET is_active = true WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(QuarterError::NotFound)?;

        tx.commit().await?;
        Ok(quarter)
    }

    /// Clear the active flag on one quarter, leaving none active.
    pub async fn deactivate(&self, id: Uuid) -> Result<Quarter, QuarterError> {
        sqlx::query_as::<_, Quarter>(
            "UPDATE quarters SET is_active = false WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(QuarterError::NotFound)
    }

    /// Delete a quarter. The schema cascades to its classes, members
    /// and weekly records.
    pub async fn delete(&self, id: Uuid) -> Result<(), QuarterError> {
        let result = sqlx::query("DELETE FROM quarters WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(QuarterError::NotFound);
        }

        Ok(())
    }
}
