// Financial rollups: per-class and church-wide money totals.

use serde::Serialize;

use crate::database::models::WeeklyRecord;
use crate::reports::ledger;

/// Money totals for the four payment categories plus the loose offering.
/// `grand_total` is the simple sum of all five.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FinancialRollup {
    pub offering: f64,
    pub lesson_payments: f64,
    pub advance_lesson_payments: f64,
    pub morning_watch_payments: f64,
    pub advance_morning_watch_payments: f64,
    pub grand_total: f64,
}

impl FinancialRollup {
    fn add_record(&mut self, record: &WeeklyRecord) {
        self.offering += record.offering;
        self.lesson_payments += ledger::sum(&record.lesson_payments);
        self.advance_lesson_payments += ledger::sum(&record.advance_lesson_payments);
        self.morning_watch_payments += ledger::sum(&record.morning_watch_payments);
        self.advance_morning_watch_payments += ledger::sum(&record.advance_morning_watch_payments);
    }

    fn finish(mut self) -> Self {
        self.grand_total = self.offering
            + self.lesson_payments
            + self.advance_lesson_payments
            + self.morning_watch_payments
            + self.advance_morning_watch_payments;
        self
    }
}

/// Fold one class's records into its financial rollup.
pub fn class_rollup(records: &[WeeklyRecord]) -> FinancialRollup {
    let mut rollup = FinancialRollup::default();
    for record in records {
        rollup.add_record(record);
    }
    rollup.finish()
}

/// Field-wise sum of per-class rollups into the church-wide rollup.
pub fn church_rollup<'a>(rollups: impl IntoIterator<Item = &'a FinancialRollup>) -> FinancialRollup {
    let mut church = FinancialRollup::default();
    for rollup in rollups {
        church.offering += rollup.offering;
        church.lesson_payments += rollup.lesson_payments;
        church.advance_lesson_payments += rollup.advance_lesson_payments;
        church.morning_watch_payments += rollup.morning_watch_payments;
        church.advance_morning_watch_payments += rollup.advance_morning_watch_payments;
    }
    church.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use uuid::Uuid;

    fn record(offering: f64, lesson: &str, morning: &str) -> WeeklyRecord {
        WeeklyRecord {
            id: Uuid::new_v4(),
            class_id: Uuid::new_v4(),
            week_number: 1,
            sabbath_date: NaiveDate::from_ymd_opt(2025, 1, 4).unwrap(),
            attendance: 0,
            visits: 0,
            bible_studies: 0,
            visitors: 0,
            guides_distributed: 0,
            helped_others: 0,
            studied_lesson: 0,
            offering,
            lesson_payments: lesson.to_string(),
            advance_lesson_payments: String::new(),
            morning_watch_payments: morning.to_string(),
            advance_morning_watch_payments: String::new(),
            notes: None,
            submitted_by: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn class_rollup_decodes_and_sums() {
        let records = vec![
            record(1000.0, "Alice: 500, Bob: 250", "Alice: 100"),
            record(500.0, "Carol: 750", ""),
        ];
        let rollup = class_rollup(&records);

        assert_eq!(rollup.offering, 1500.0);
        assert_eq!(rollup.lesson_payments, 1500.0);
        assert_eq!(rollup.morning_watch_payments, 100.0);
        assert_eq!(rollup.grand_total, 3100.0);
    }

    #[test]
    fn empty_class_rolls_up_to_zero() {
        assert_eq!(class_rollup(&[]), FinancialRollup::default().finish());
    }

    #[test]
    fn church_rollup_is_the_field_wise_sum() {
        let a = class_rollup(&[record(100.0, "X: 10", "")]);
        let b = class_rollup(&[record(200.0, "Y: 20", "Z: 5")]);
        let church = church_rollup([&a, &b]);

        assert_eq!(church.offering, 300.0);
        assert_eq!(church.lesson_payments, 30.0);
        assert_eq!(church.morning_watch_payments, 5.0);
        assert_eq!(church.grand_total, church.offering + 35.0);
    }
}
