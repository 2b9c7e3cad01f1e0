use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{Quarter, WeeklyRecord};
use crate::database::is_unique_violation;
use crate::dates;

#[derive(Debug, thiserror::Error)]
pub enum WeeklyError {
    #[error("Weekly record not found")]
    NotFound,

    #[error("Class does not exist")]
    ClassNotFound,

    #[error("A record for week {0} already exists for this class")]
    DuplicateWeek(i32),

    #[error(transparent)]
    Manager(#[from] DatabaseError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// A new weekly submission. Counters and ledgers default to empty in
/// the handler; `sabbath_date` is derived from the quarter when omitted.
#[derive(Debug)]
pub struct NewWeeklyRecord {
    pub class_id: Uuid,
    pub week_number: i32,
    pub sabbath_date: Option<NaiveDate>,
    pub attendance: i32,
    pub visits: i32,
    pub bible_studies: i32,
    pub visitors: i32,
    pub guides_distributed: i32,
    pub helped_others: i32,
    pub studied_lesson: i32,
    pub offering: f64,
    pub lesson_payments: String,
    pub advance_lesson_payments: String,
    pub morning_watch_payments: String,
    pub advance_morning_watch_payments: String,
    pub notes: Option<String>,
}

/// Partial update; `None` leaves the column unchanged.
#[derive(Debug, Default)]
pub struct WeeklyPatch {
    pub week_number: Option<i32>,
    pub sabbath_date: Option<NaiveDate>,
    pub attendance: Option<i32>,
    pub visits: Option<i32>,
    pub bible_studies: Option<i32>,
    pub visitors: Option<i32>,
    pub guides_distributed: Option<i32>,
    pub helped_others: Option<i32>,
    pub studied_lesson: Option<i32>,
    pub offering: Option<f64>,
    pub lesson_payments: Option<String>,
    pub advance_lesson_payments: Option<String>,
    pub morning_watch_payments: Option<String>,
    pub advance_morning_watch_payments: Option<String>,
    pub notes: Option<String>,
}

/// Weekly record submissions, one per class and Sabbath.
pub struct WeeklyService {
    pool: PgPool,
}

impl WeeklyService {
    pub async fn new() -> Result<Self, WeeklyError> {
        let pool = DatabaseManager::pool().await?;
        Ok(Self { pool })
    }

    /// Insert a weekly record. The (class_id, week_number) uniqueness is
    /// enforced by the database, so two racing submissions cannot both
    /// land; the loser gets `DuplicateWeek`.
    pub async fn create(
        &self,
        record: NewWeeklyRecord,
        submitted_by: Uuid,
    ) -> Result<WeeklyRecord, WeeklyError> {
        let quarter = self.quarter_of_class(record.class_id).await?;

        let sabbath_date = record
            .sabbath_date
            .unwrap_or_else(|| dates::sabbath_date_for_week(record.week_number, quarter.start_date));

        let result = sqlx::query_as::<_, WeeklyRecord>(
            r#"
            INSERT INTO weekly_records (
                class_id, week_number, sabbath_date,
                attendance, visits, bible_studies, visitors,
                guides_distributed, helped_others, studied_lesson,
                offering,
                lesson_payments, advance_lesson_payments,
                morning_watch_payments, advance_morning_watch_payments,
                notes, submitted_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            RETURNING *
            "#,
        )
        .bind(record.class_id)
        .bind(record.week_number)
        .bind(sabbath_date)
        .bind(record.attendance)
        .bind(record.visits)
        .bind(record.bible_studies)
        .bind(record.visitors)
        .bind(record.guides_distributed)
        .bind(record.helped_others)
        .bind(record.studied_lesson)
        .bind(record.offering)
        .bind(&record.lesson_payments)
        .bind(&record.advance_lesson_payments)
        .bind(&record.morning_watch_payments)
        .bind(&record.advance_morning_watch_payments)
        .bind(record.notes.as_deref())
        .bind(submitted_by)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(record) => Ok(record),
            Err(err) if is_unique_violation(&err) => {
                Err(WeeklyError::DuplicateWeek(record.week_number))
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn quarter_of_class(&self, class_id: Uuid) -> Result<Quarter, WeeklyError> {
        sqlx::query_as::<_, Quarter>(
            r#"
            SELECT q.* FROM quarters q
            JOIN classes c ON c.quarter_id = q.id
            WHERE c.id = $1
            "#,
        )
        .bind(class_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(WeeklyError::ClassNotFound)
    }

    /// List records, filtered by class and/or week number.
    pub async fn list(
        &self,
        class_id: Option<Uuid>,
        week_number: Option<i32>,
    ) -> Result<Vec<WeeklyRecord>, WeeklyError> {
        let records = sqlx::query_as::<_, WeeklyRecord>(
            r#"
            SELECT * FROM weekly_records
            WHERE ($1::uuid IS NULL OR class_id = $1)
              AND ($2::int IS NULL OR week_number = $2)
            ORDER BY week_number, sabbath_date
            "#,
        )
        .bind(class_id)
        .bind(week_number)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<WeeklyRecord, WeeklyError> {
        sqlx::query_as::<_, WeeklyRecord>("SELECT * FROM weekly_records WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(WeeklyError::NotFound)
    }

    /// Patch a record. Moving it onto an already-taken week is the same
    /// conflict as submitting that week twice.
    pub async fn update(&self, id: Uuid, patch: WeeklyPatch) -> Result<WeeklyRecord, WeeklyError> {
        let result = sqlx::query_as::<_, WeeklyRecord>(
            r#"
            UPDATE weekly_records
            SET week_number = COALESCE($2, week_number),
                sabbath_date = COALESCE($3, sabbath_date),
                attendance = COALESCE($4, attendance),
                visits = COALESCE($5, visits),
                bible_studies = COALESCE($6, bible_studies),
                visitors = COALESCE($7, visitors),
                guides_distributed = COALESCE($8, guides_distributed),
                helped_others = COALESCE($9, helped_others),
                studied_lesson = COALESCE($10, studied_lesson),
                offering = COALESCE($11, offering),
                lesson_payments = COALESCE($12, lesson_payments),
                advance_lesson_payments = COALESCE($13, advance_lesson_payments),
                morning_watch_payments = COALESCE($14, morning_watch_payments),
                advance_morning_watch_payments = COALESCE($15, advance_morning_watch_payments),
                notes = COALESCE($16, notes)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(patch.week_number)
        .bind(patch.sabbath_date)
        .bind(patch.attendance)
        .bind(patch.visits)
        .bind(patch.bible_studies)
        .bind(patch.visitors)
        .bind(patch.guides_distributed)
        .bind(patch.helped_others)
        .bind(patch.studied_lesson)
        .bind(patch.offering)
        .bind(patch.lesson_payments)
        .bind(patch.advance_lesson_payments)
        .bind(patch.morning_watch_payments)
        .bind(patch.advance_morning_watch_payments)
        .bind(patch.notes)
        .fetch_optional(&self.pool)
        .await;

        match result {
            Ok(Some(record)) => Ok(record),
            Ok(None) => Err(WeeklyError::NotFound),
            Err(err) if is_unique_violation(&err) => {
                Err(WeeklyError::DuplicateWeek(patch.week_number.unwrap_or_default()))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Hard delete one record.
    pub async fn delete(&self, id: Uuid) -> Result<(), WeeklyError> {
        let result = sqlx::query("DELETE FROM weekly_records WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(WeeklyError::NotFound);
        }

        Ok(())
    }
}
