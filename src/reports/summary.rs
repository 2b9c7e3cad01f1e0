// Pure folds over weekly record collections: totals, safe averages and
// reporting consistency for one class's quarter.

use serde::Serialize;

use crate::database::models::WeeklyRecord;
use crate::reports::ledger;
use crate::types::WEEKS_PER_QUARTER;

/// Sums of every counter and money field across a set of records.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QuarterTotals {
    pub attendance: i64,
    pub visits: i64,
    pub bible_studies: i64,
    pub visitors: i64,
    pub guides_distributed: i64,
    pub helped_others: i64,
    pub studied_lesson: i64,
    pub offering: f64,
    pub lesson_payments: f64,
    pub advance_lesson_payments: f64,
    pub morning_watch_payments: f64,
    pub advance_morning_watch_payments: f64,
}

impl QuarterTotals {
    /// Sum of the four decoded payment categories.
    pub fn total_payments(&self) -> f64 {
        self.lesson_payments
            + self.advance_lesson_payments
            + self.morning_watch_payments
            + self.advance_morning_watch_payments
    }
}

/// Per-week averages derived from the totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QuarterAverages {
    pub attendance: f64,
    pub offering: f64,
}

/// A class's quarter in aggregate.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ClassSummary {
    pub weeks_reported: i64,
    /// Fraction of the 13 Sabbaths with a submitted record, 0.0..=1.0.
    pub consistency: f64,
    pub totals: QuarterTotals,
    pub averages: QuarterAverages,
    pub total_payments: f64,
}

/// `sum / count` with an empty collection averaging to zero instead of
/// dividing by zero.
pub fn safe_average(sum: f64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Fold a class's weekly records into its quarter summary. Averages are
/// over reported weeks only; missing weeks do not drag them down.
pub fn summarize(records: &[WeeklyRecord]) -> ClassSummary {
    let mut totals = QuarterTotals::default();

    for record in records {
        totals.attendance += record.attendance as i64;
        totals.visits += record.visits as i64;
        totals.bible_studies += record.bible_studies as i64;
        totals.visitors += record.visitors as i64;
        totals.guides_distributed += record.guides_distributed as i64;
        totals.helped_others += record.helped_others as i64;
        totals.studied_lesson += record.studied_lesson as i64;
        totals.offering += record.offering;
        totals.lesson_payments += ledger::sum(&record.lesson_payments);
        totals.advance_lesson_payments += ledger::sum(&record.advance_lesson_payments);
        totals.morning_watch_payments += ledger::sum(&record.morning_watch_payments);
        totals.advance_morning_watch_payments += ledger::sum(&record.advance_morning_watch_payments);
    }

    let count = records.len();
    let averages = QuarterAverages {
        attendance: safe_average(totals.attendance as f64, count),
        offering: safe_average(totals.offering, count),
    };

    ClassSummary {
        weeks_reported: count as i64,
        consistency: count as f64 / WEEKS_PER_QUARTER as f64,
        total_payments: totals.total_payments(),
        totals,
        averages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use uuid::Uuid;

    pub(crate) fn record(week: i32, attendance: i32, offering: f64) -> WeeklyRecord {
        WeeklyRecord {
            id: Uuid::new_v4(),
            class_id: Uuid::new_v4(),
            week_number: week,
            sabbath_date: NaiveDate::from_ymd_opt(2025, 1, 4).unwrap(),
            attendance,
            visits: 1,
            bible_studies: 2,
            visitors: 0,
            guides_distributed: 3,
            helped_others: 1,
            studied_lesson: attendance,
            offering,
            lesson_payments: "Alice: 100".to_string(),
            advance_lesson_payments: String::new(),
            morning_watch_payments: "Bob: 50".to_string(),
            advance_morning_watch_payments: String::new(),
            notes: None,
            submitted_by: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn empty_record_set_summarizes_to_zero() {
        let summary = summarize(&[]);
        assert_eq!(summary.weeks_reported, 0);
        assert_eq!(summary.consistency, 0.0);
        assert_eq!(summary.averages.attendance, 0.0);
        assert_eq!(summary.averages.offering, 0.0);
        assert_eq!(summary.total_payments, 0.0);
    }

    #[test]
    fn totals_accumulate_across_weeks() {
        let records = vec![record(1, 10, 500.0), record(2, 14, 700.0)];
        let summary = summarize(&records);

        assert_eq!(summary.weeks_reported, 2);
        assert_eq!(summary.totals.attendance, 24);
        assert_eq!(summary.totals.offering, 1200.0);
        assert_eq!(summary.totals.visits, 2);
        assert_eq!(summary.totals.guides_distributed, 6);
    }

    #[test]
    fn averages_divide_by_reported_weeks_only() {
        let records = vec![record(1, 10, 500.0), record(2, 14, 700.0)];
        let summary = summarize(&records);

        assert_eq!(summary.averages.attendance, 12.0);
        assert_eq!(summary.averages.offering, 600.0);
    }

    #[test]
    fn payments_are_decoded_per_category() {
        let records = vec![record(1, 10, 0.0), record(2, 10, 0.0)];
        let summary = summarize(&records);

        assert_eq!(summary.totals.lesson_payments, 200.0);
        assert_eq!(summary.totals.morning_watch_payments, 100.0);
        assert_eq!(summary.totals.advance_lesson_payments, 0.0);
        assert_eq!(summary.total_payments, 300.0);
    }

    #[test]
    fn consistency_is_weeks_over_thirteen() {
        let records = vec![record(1, 1, 0.0)];
        assert!((summarize(&records).consistency - 1.0 / 13.0).abs() < 1e-12);

        let full: Vec<_> = (1..=13).map(|w| record(w, 1, 0.0)).collect();
        assert_eq!(summarize(&full).consistency, 1.0);
    }

    #[test]
    fn safe_average_handles_zero_count() {
        assert_eq!(safe_average(100.0, 0), 0.0);
        assert_eq!(safe_average(100.0, 4), 25.0);
    }
}
