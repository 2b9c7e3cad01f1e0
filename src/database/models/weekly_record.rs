use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One class's submission for one Sabbath. (class_id, week_number) is
/// unique; week numbers run 1..=13.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WeeklyRecord {
    pub id: Uuid,
    pub class_id: Uuid,
    pub week_number: i32,
    pub sabbath_date: NaiveDate,
    pub attendance: i32,
    pub visits: i32,
    pub bible_studies: i32,
    pub visitors: i32,
    pub guides_distributed: i32,
    pub helped_others: i32,
    pub studied_lesson: i32,
    pub offering: f64,
    // Payment ledgers in the legacy "Name: amount, Name: amount" form.
    // Stored verbatim; reports decode them on the fly.
    pub lesson_payments: String,
    pub advance_lesson_payments: String,
    pub morning_watch_payments: String,
    pub advance_morning_watch_payments: String,
    pub notes: Option<String>,
    pub submitted_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl WeeklyRecord {
    /// The four payment ledgers in fixed category order: lesson, advance
    /// lesson, morning watch, advance morning watch.
    pub fn payment_ledgers(&self) -> [&str; 4] {
        [
            &self.lesson_payments,
            &self.advance_lesson_payments,
            &self.morning_watch_payments,
            &self.advance_morning_watch_payments,
        ]
    }
}
