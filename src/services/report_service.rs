use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{Class, Quarter, WeeklyRecord};
use crate::dates;
use crate::reports::champion::{self, ClassStanding, MetricRanking};
use crate::reports::financial::{self, FinancialRollup};
use crate::reports::ledger;
use crate::reports::summary::{self, ClassSummary, QuarterTotals};

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Class not found")]
    ClassNotFound,

    #[error("Quarter not found")]
    QuarterNotFound,

    #[error(transparent)]
    Manager(#[from] DatabaseError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// One class's line in the church-wide weekly report. Classes that have
/// not submitted appear with zeros and `reported: false`.
#[derive(Debug, Serialize)]
pub struct WeeklyReportRow {
    pub class_id: Uuid,
    pub class_name: String,
    pub reported: bool,
    pub attendance: i32,
    pub visits: i32,
    pub bible_studies: i32,
    pub visitors: i32,
    pub guides_distributed: i32,
    pub helped_others: i32,
    pub studied_lesson: i32,
    pub offering: f64,
    pub total_payments: f64,
}

impl WeeklyReportRow {
    fn build(class: &Class, record: Option<&WeeklyRecord>) -> Self {
        match record {
            Some(record) => Self {
                class_id: class.id,
                class_name: class.name.clone(),
                reported: true,
                attendance: record.attendance,
                visits: record.visits,
                bible_studies: record.bible_studies,
                visitors: record.visitors,
                guides_distributed: record.guides_distributed,
                helped_others: record.helped_others,
                studied_lesson: record.studied_lesson,
                offering: record.offering,
                total_payments: record
                    .payment_ledgers()
                    .iter()
                    .map(|raw| ledger::sum(raw))
                    .sum(),
            },
            None => Self {
                class_id: class.id,
                class_name: class.name.clone(),
                reported: false,
                attendance: 0,
                visits: 0,
                bible_studies: 0,
                visitors: 0,
                guides_distributed: 0,
                helped_others: 0,
                studied_lesson: 0,
                offering: 0.0,
                total_payments: 0.0,
            },
        }
    }
}

/// Church-wide snapshot of one Sabbath.
#[derive(Debug, Serialize)]
pub struct WeeklyReport {
    pub quarter: Quarter,
    pub week_number: i32,
    pub sabbath_date: NaiveDate,
    pub classes: Vec<WeeklyReportRow>,
    pub totals: QuarterTotals,
    pub total_payments: f64,
}

/// One class's full quarter: records, aggregates and its champion score.
#[derive(Debug, Serialize)]
pub struct ClassQuarterlyReport {
    pub class: Class,
    pub quarter: Quarter,
    pub summary: ClassSummary,
    pub total_offerings: f64,
    pub total_payments: f64,
    pub score: f64,
    pub grade: &'static str,
    pub records: Vec<WeeklyRecord>,
}

/// Church-wide quarter standings with per-metric leaderboards.
#[derive(Debug, Serialize)]
pub struct ChurchQuarterlyReport {
    pub quarter: Quarter,
    pub church_name: String,
    pub standings: Vec<ClassStanding>,
    pub metric_rankings: Vec<MetricRanking>,
    pub financial: FinancialRollup,
}

#[derive(Debug, Serialize)]
pub struct FinancialClassRow {
    pub class_id: Uuid,
    pub class_name: String,
    #[serde(flatten)]
    pub rollup: FinancialRollup,
}

/// All money for a quarter, by class and church-wide.
#[derive(Debug, Serialize)]
pub struct FinancialReport {
    pub quarter: Quarter,
    pub classes: Vec<FinancialClassRow>,
    pub totals: FinancialRollup,
}

/// Read-only aggregation over quarters, classes and weekly records. All
/// arithmetic lives in the pure report modules; this service only
/// fetches and assembles.
pub struct ReportService {
    pool: PgPool,
}

impl ReportService {
    pub async fn new() -> Result<Self, ReportError> {
        let pool = DatabaseManager::pool().await?;
        Ok(Self { pool })
    }

    /// Snapshot of one week across every class in a quarter.
    pub async fn weekly_report(
        &self,
        quarter_id: Uuid,
        week_number: i32,
    ) -> Result<WeeklyReport, ReportError> {
        let quarter = self.quarter(quarter_id).await?;
        let classes = self.classes_of_quarter(quarter_id).await?;

        let records = sqlx::query_as::<_, WeeklyRecord>(
            r#"
            SELECT r.* FROM weekly_records r
            JOIN classes c ON c.id = r.class_id
            WHERE c.quarter_id = $1 AND r.week_number = $2
            "#,
        )
        .bind(quarter_id)
        .bind(week_number)
        .fetch_all(&self.pool)
        .await?;

        let by_class: HashMap<Uuid, &WeeklyRecord> =
            records.iter().map(|record| (record.class_id, record)).collect();

        let rows: Vec<WeeklyReportRow> = classes
            .iter()
            .map(|class| WeeklyReportRow::build(class, by_class.get(&class.id).copied()))
            .collect();

        let week_summary = summary::summarize(&records);

        Ok(WeeklyReport {
            sabbath_date: dates::sabbath_date_for_week(week_number, quarter.start_date),
            quarter,
            week_number,
            classes: rows,
            total_payments: week_summary.total_payments,
            totals: week_summary.totals,
        })
    }

    /// One class's quarter: every record, the aggregate summary and the
    /// champion score.
    pub async fn class_quarterly(&self, class_id: Uuid) -> Result<ClassQuarterlyReport, ReportError> {
        let class = sqlx::query_as::<_, Class>("SELECT * FROM classes WHERE id = $1")
            .bind(class_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(ReportError::ClassNotFound)?;

        let quarter = self.quarter(class.quarter_id).await?;

        let records = sqlx::query_as::<_, WeeklyRecord>(
            "SELECT * FROM weekly_records WHERE class_id = $1 ORDER BY week_number",
        )
        .bind(class_id)
        .fetch_all(&self.pool)
        .await?;

        let summary = summary::summarize(&records);
        let score = champion::score(&summary);

        Ok(ClassQuarterlyReport {
            class,
            quarter,
            total_offerings: summary.totals.offering,
            total_payments: summary.total_payments,
            score,
            grade: champion::grade(score),
            summary,
            records,
        })
    }

    /// Church-wide quarter standings: champion ranking over every class,
    /// per-metric leaderboards and the financial rollup.
    pub async fn church_quarterly(
        &self,
        quarter_id: Uuid,
    ) -> Result<ChurchQuarterlyReport, ReportError> {
        let quarter = self.quarter(quarter_id).await?;
        let classes = self.classes_of_quarter(quarter_id).await?;
        let mut records_by_class = self.records_by_class(quarter_id).await?;

        let mut standings = Vec::with_capacity(classes.len());
        let mut rollups = Vec::with_capacity(classes.len());

        for class in &classes {
            let records = records_by_class.remove(&class.id).unwrap_or_default();
            let summary = summary::summarize(&records);
            standings.push(ClassStanding::new(class.id, class.name.clone(), summary));
            rollups.push(financial::class_rollup(&records));
        }

        champion::rank_overall(&mut standings);

        Ok(ChurchQuarterlyReport {
            church_name: classes
                .first()
                .map(|class| class.church_name.clone())
                .unwrap_or_else(|| crate::config::config().organization.church_name.clone()),
            quarter,
            metric_rankings: champion::metric_rankings(&standings, 3),
            standings,
            financial: financial::church_rollup(&rollups),
        })
    }

    /// Money only: per-class rollups plus the church-wide totals.
    pub async fn financial(&self, quarter_id: Uuid) -> Result<FinancialReport, ReportError> {
        let quarter = self.quarter(quarter_id).await?;
        let classes = self.classes_of_quarter(quarter_id).await?;
        let mut records_by_class = self.records_by_class(quarter_id).await?;

        let rows: Vec<FinancialClassRow> = classes
            .iter()
            .map(|class| {
                let records = records_by_class.remove(&class.id).unwrap_or_default();
                FinancialClassRow {
                    class_id: class.id,
                    class_name: class.name.clone(),
                    rollup: financial::class_rollup(&records),
                }
            })
            .collect();

        let totals = financial::church_rollup(rows.iter().map(|row| &row.rollup));

        Ok(FinancialReport { quarter, classes: rows, totals })
    }

    async fn quarter(&self, id: Uuid) -> Result<Quarter, ReportError> {
        sqlx::query_as::<_, Quarter>("SELECT * FROM quarters WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(ReportError::QuarterNotFound)
    }

    async fn classes_of_quarter(&self, quarter_id: Uuid) -> Result<Vec<Class>, ReportError> {
        let classes = sqlx::query_as::<_, Class>(
            "SELECT * FROM classes WHERE quarter_id = $1 ORDER BY name",
        )
        .bind(quarter_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(classes)
    }

    async fn records_by_class(
        &self,
        quarter_id: Uuid,
    ) -> Result<HashMap<Uuid, Vec<WeeklyRecord>>, ReportError> {
        let records = sqlx::query_as::<_, WeeklyRecord>(
            r#"
            SELECT r.* FROM weekly_records r
            JOIN classes c ON c.id = r.class_id
            WHERE c.quarter_id = $1
            ORDER BY r.week_number
            "#,
        )
        .bind(quarter_id)
        .fetch_all(&self.pool)
        .await?;

        let mut by_class: HashMap<Uuid, Vec<WeeklyRecord>> = HashMap::new();
        for record in records {
            by_class.entry(record.class_id).or_default().push(record);
        }

        Ok(by_class)
    }
}
