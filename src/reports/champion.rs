// Champion scoring: the weighted formula behind the quarterly standings
// board. The weights are presentation policy carried over from years of
// printed reports and must not drift.

use std::cmp::Ordering;

use serde::Serialize;
use uuid::Uuid;

use crate::reports::summary::ClassSummary;

/// Weighted linear combination over a class summary. Attendance and
/// offering enter as per-week averages, the outreach counters as raw
/// totals, and consistency as its 0..=1 fraction.
pub fn score(summary: &ClassSummary) -> f64 {
    let totals = &summary.totals;

    summary.averages.attendance * 10.0
        + summary.averages.offering / 1000.0
        + totals.visits as f64 * 2.0
        + totals.bible_studies as f64 * 3.0
        + totals.visitors as f64 * 2.0
        + totals.helped_others as f64 * 1.5
        + totals.studied_lesson as f64 * 1.0
        + totals.guides_distributed as f64 * 1.0
        + summary.total_payments / 10000.0
        + summary.consistency * 20.0
}

/// Letter grade as a step function of the score.
pub fn grade(score: f64) -> &'static str {
    if score >= 100.0 {
        "A+"
    } else if score >= 80.0 {
        "A"
    } else if score >= 70.0 {
        "B+"
    } else if score >= 60.0 {
        "B"
    } else if score >= 50.0 {
        "C+"
    } else if score >= 40.0 {
        "C"
    } else if score >= 30.0 {
        "D"
    } else {
        "F"
    }
}

/// One class's scored standing in the church-wide ranking.
#[derive(Debug, Clone, Serialize)]
pub struct ClassStanding {
    pub class_id: Uuid,
    pub class_name: String,
    pub score: f64,
    pub grade: &'static str,
    pub summary: ClassSummary,
}

impl ClassStanding {
    pub fn new(class_id: Uuid, class_name: impl Into<String>, summary: ClassSummary) -> Self {
        let value = score(&summary);
        Self {
            class_id,
            class_name: class_name.into(),
            score: value,
            grade: grade(value),
            summary,
        }
    }
}

/// Sort standings into the overall ranking: score descending, class name
/// ascending as the tie-break so the order is stable across requests.
pub fn rank_overall(standings: &mut [ClassStanding]) {
    standings.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.class_name.cmp(&b.class_name))
    });
}

/// A class's entry in a single-metric leaderboard.
#[derive(Debug, Clone, Serialize)]
pub struct MetricLeader {
    pub class_id: Uuid,
    pub class_name: String,
    pub value: f64,
}

/// Top-N leaderboard for one raw metric.
#[derive(Debug, Clone, Serialize)]
pub struct MetricRanking {
    pub metric: &'static str,
    pub leaders: Vec<MetricLeader>,
}

type MetricFn = fn(&ClassStanding) -> f64;

const METRICS: &[(&str, MetricFn)] = &[
    ("attendance", |s| s.summary.totals.attendance as f64),
    ("offering", |s| s.summary.totals.offering),
    ("visits", |s| s.summary.totals.visits as f64),
    ("bible_studies", |s| s.summary.totals.bible_studies as f64),
    ("visitors", |s| s.summary.totals.visitors as f64),
    ("guides_distributed", |s| s.summary.totals.guides_distributed as f64),
    ("helped_others", |s| s.summary.totals.helped_others as f64),
    ("studied_lesson", |s| s.summary.totals.studied_lesson as f64),
    ("total_payments", |s| s.summary.total_payments),
];

/// Independent top-N leaderboards for every raw metric, value descending
/// with the same name tie-break as the overall ranking.
pub fn metric_rankings(standings: &[ClassStanding], top_n: usize) -> Vec<MetricRanking> {
    METRICS
        .iter()
        .map(|&(metric, extract)| {
            let mut leaders: Vec<MetricLeader> = standings
                .iter()
                .map(|standing| MetricLeader {
                    class_id: standing.class_id,
                    class_name: standing.class_name.clone(),
                    value: extract(standing),
                })
                .collect();

            leaders.sort_by(|a, b| {
                b.value
                    .partial_cmp(&a.value)
                    .unwrap_or(Ordering::Equal)
                    .then_with(|| a.class_name.cmp(&b.class_name))
            });
            leaders.truncate(top_n);

            MetricRanking { metric, leaders }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::summary::{QuarterAverages, QuarterTotals};

    fn summary(avg_attendance: f64, consistency: f64) -> ClassSummary {
        ClassSummary {
            weeks_reported: (consistency * 13.0).round() as i64,
            consistency,
            totals: QuarterTotals::default(),
            averages: QuarterAverages { attendance: avg_attendance, offering: 0.0 },
            total_payments: 0.0,
        }
    }

    #[test]
    fn score_applies_the_published_weights() {
        let s = ClassSummary {
            weeks_reported: 6,
            consistency: 0.5,
            totals: QuarterTotals {
                attendance: 60,
                visits: 5,
                bible_studies: 2,
                visitors: 3,
                guides_distributed: 7,
                helped_others: 2,
                studied_lesson: 4,
                offering: 6000.0,
                ..QuarterTotals::default()
            },
            averages: QuarterAverages { attendance: 10.0, offering: 1000.0 },
            total_payments: 20000.0,
        };

        // 10*10 + 1000/1000 + 5*2 + 2*3 + 3*2 + 2*1.5 + 4*1 + 7*1
        //   + 20000/10000 + 0.5*20
        let expected = 100.0 + 1.0 + 10.0 + 6.0 + 6.0 + 3.0 + 4.0 + 7.0 + 2.0 + 10.0;
        assert!((score(&s) - expected).abs() < 1e-9);
    }

    #[test]
    fn empty_summary_scores_zero_and_fails() {
        let s = ClassSummary::default();
        assert_eq!(score(&s), 0.0);
        assert_eq!(grade(score(&s)), "F");
    }

    #[test]
    fn grades_step_at_the_published_thresholds() {
        assert_eq!(grade(120.0), "A+");
        assert_eq!(grade(100.0), "A+");
        assert_eq!(grade(99.9), "A");
        assert_eq!(grade(80.0), "A");
        assert_eq!(grade(79.9), "B+");
        assert_eq!(grade(70.0), "B+");
        assert_eq!(grade(69.9), "B");
        assert_eq!(grade(60.0), "B");
        assert_eq!(grade(59.9), "C+");
        assert_eq!(grade(50.0), "C+");
        assert_eq!(grade(49.9), "C");
        assert_eq!(grade(40.0), "C");
        assert_eq!(grade(39.9), "D");
        assert_eq!(grade(30.0), "D");
        assert_eq!(grade(29.9), "F");
    }

    #[test]
    fn overall_ranking_is_score_descending() {
        let mut standings = vec![
            ClassStanding::new(Uuid::new_v4(), "Bereans", summary(5.0, 0.0)),
            ClassStanding::new(Uuid::new_v4(), "Anchors", summary(9.0, 0.0)),
            ClassStanding::new(Uuid::new_v4(), "Candles", summary(7.0, 0.0)),
        ];
        rank_overall(&mut standings);

        let names: Vec<_> = standings.iter().map(|s| s.class_name.as_str()).collect();
        assert_eq!(names, ["Anchors", "Candles", "Bereans"]);
    }

    #[test]
    fn ties_break_on_class_name() {
        let mut standings = vec![
            ClassStanding::new(Uuid::new_v4(), "Zebras", summary(5.0, 0.0)),
            ClassStanding::new(Uuid::new_v4(), "Apples", summary(5.0, 0.0)),
        ];
        rank_overall(&mut standings);
        assert_eq!(standings[0].class_name, "Apples");
    }

    #[test]
    fn metric_rankings_cover_every_metric_and_truncate() {
        let standings: Vec<_> = (0..5)
            .map(|i| ClassStanding::new(Uuid::new_v4(), format!("Class {}", i), summary(i as f64, 0.0)))
            .collect();

        let rankings = metric_rankings(&standings, 3);
        assert_eq!(rankings.len(), 9);
        for ranking in &rankings {
            assert!(ranking.leaders.len() <= 3);
        }
    }
}
