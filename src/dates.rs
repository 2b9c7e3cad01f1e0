// Quarter calendar boundaries and Sabbath date arithmetic.
//
// Everything here works on NaiveDate: the domain deals in calendar days
// and carries no timezone.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::types::{QuarterName, WEEKS_PER_QUARTER};

/// Fixed calendar boundaries for a quarter label in a given year.
/// Q1 is Jan 1 - Mar 31, Q2 Apr 1 - Jun 30, and so on. `None` only for
/// years outside chrono's supported range.
pub fn quarter_date_range(name: QuarterName, year: i32) -> Option<(NaiveDate, NaiveDate)> {
    let (start, end) = match name {
        QuarterName::Q1 => ((1, 1), (3, 31)),
        QuarterName::Q2 => ((4, 1), (6, 30)),
        QuarterName::Q3 => ((7, 1), (9, 30)),
        QuarterName::Q4 => ((10, 1), (12, 31)),
    };

    Some((
        NaiveDate::from_ymd_opt(year, start.0, start.1)?,
        NaiveDate::from_ymd_opt(year, end.0, end.1)?,
    ))
}

/// First Saturday on or after the quarter start.
pub fn first_sabbath(quarter_start: NaiveDate) -> NaiveDate {
    let days_ahead = (Weekday::Sat.num_days_from_sunday() + 7
        - quarter_start.weekday().num_days_from_sunday())
        % 7;
    quarter_start + Duration::days(days_ahead as i64)
}

/// The Sabbath date for a 1-based week number within a quarter: the
/// first Saturday on or after the quarter start, plus whole weeks.
pub fn sabbath_date_for_week(week_number: i32, quarter_start: NaiveDate) -> NaiveDate {
    first_sabbath(quarter_start) + Duration::days(((week_number - 1) * 7) as i64)
}

/// 1-based week index of `today` within a quarter, clamped to 1..=13.
/// A week runs up to and including its Sabbath, so this returns the week
/// whose Sabbath is the next one on or after `today`, and it inverts
/// `sabbath_date_for_week` exactly.
pub fn current_week_number(quarter_start: NaiveDate, today: NaiveDate) -> i32 {
    let first = first_sabbath(quarter_start);
    let days = (today - first).num_days();
    let week = (days + 6).div_euclid(7) + 1;
    week.clamp(1, WEEKS_PER_QUARTER as i64) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn quarter_boundaries_are_fixed() {
        assert_eq!(
            quarter_date_range(QuarterName::Q1, 2025),
            Some((date(2025, 1, 1), date(2025, 3, 31)))
        );
        assert_eq!(
            quarter_date_range(QuarterName::Q2, 2025),
            Some((date(2025, 4, 1), date(2025, 6, 30)))
        );
        assert_eq!(
            quarter_date_range(QuarterName::Q3, 2025),
            Some((date(2025, 7, 1), date(2025, 9, 30)))
        );
        assert_eq!(
            quarter_date_range(QuarterName::Q4, 2025),
            Some((date(2025, 10, 1), date(2025, 12, 31)))
        );
    }

    #[test]
    fn first_sabbath_lands_on_a_saturday() {
        // 2025-01-01 is a Wednesday; the first Sabbath is Jan 4
        assert_eq!(first_sabbath(date(2025, 1, 1)), date(2025, 1, 4));
        // A quarter starting on a Saturday keeps that day
        assert_eq!(first_sabbath(date(2025, 11, 1)), date(2025, 11, 1));
        // Sunday start rolls forward six days
        assert_eq!(first_sabbath(date(2025, 6, 1)), date(2025, 6, 7));
    }

    #[test]
    fn sabbath_dates_step_by_whole_weeks() {
        let start = date(2025, 1, 1);
        assert_eq!(sabbath_date_for_week(1, start), date(2025, 1, 4));
        assert_eq!(sabbath_date_for_week(2, start), date(2025, 1, 11));
        assert_eq!(sabbath_date_for_week(13, start), date(2025, 3, 29));
    }

    #[test]
    fn current_week_tracks_the_calendar() {
        let start = date(2025, 1, 1);
        assert_eq!(current_week_number(start, date(2025, 1, 4)), 1);
        assert_eq!(current_week_number(start, date(2025, 1, 5)), 2);
        assert_eq!(current_week_number(start, date(2025, 1, 11)), 2);
        assert_eq!(current_week_number(start, date(2025, 2, 14)), 7);
    }

    #[test]
    fn week_number_inverts_sabbath_dates() {
        let start = date(2025, 4, 1);
        for week in 1..=13 {
            let sabbath = sabbath_date_for_week(week, start);
            assert_eq!(current_week_number(start, sabbath), week);
        }
    }

    #[test]
    fn current_week_clamps_outside_the_quarter() {
        let start = date(2025, 1, 1);
        assert_eq!(current_week_number(start, date(2024, 12, 15)), 1);
        assert_eq!(current_week_number(start, date(2025, 7, 1)), 13);
    }
}
