//! Summary document
//!
//! The JSON shape handed to the wrapped presentation layer:
//!
//! ```text
//! {
//!   "exportDate": ..., "totalRecords": ..., "totalWorkouts": ...,
//!   "totalActivitySummaries": ...,
//!   "year2025": { "records": ..., "stats": ..., "monthlyBreakdown": [...], ... }
//! }
//! ```
//!
//! The year object's key follows the configured target year.

pub mod error;
pub mod writer;

pub use error::{OutputError, OutputResult};
pub use writer::{to_json, write_daily_csv, write_summary, write_summary_async};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;

use crate::analysis::{
    calculate_streaks, MetricStats, MonthRollup, PersonalRecords, StreakStats, TemporalRollups,
    TimePatterns, TopDays, WrappedInsights,
};
use crate::analysis::stats::{record_type_counts, workout_type_counts};
use crate::config::Config;
use crate::ingest::YearDataset;

/// Everything derived for the target year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearSummary {
    pub records: u64,
    pub workouts: u64,
    pub activity_summaries: u64,
    pub record_types: BTreeMap<String, u64>,
    pub workout_types: BTreeMap<String, u64>,
    pub stats: MetricStats,
    pub monthly_breakdown: Vec<MonthRollup>,
    pub top_days: TopDays,
    pub streaks: StreakStats,
    pub personal_records: PersonalRecords,
    pub time_patterns: TimePatterns,
    pub wrapped_insights: WrappedInsights,
}

/// The complete summary of one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SummaryDocument", into = "SummaryDocument")]
pub struct Summary {
    pub export_date: Option<String>,
    pub total_records: u64,
    pub total_workouts: u64,
    pub total_activity_summaries: u64,
    pub target_year: String,
    pub year: YearSummary,
}

impl Summary {
    /// Run every analysis stage over a dataset
    pub fn build(dataset: &YearDataset, config: &Config) -> Self {
        let rollups = TemporalRollups::build(&dataset.records, &dataset.workouts);
        Self::from_rollups(dataset, &rollups, config)
    }

    /// Run the remaining stages over rollups built by the caller
    pub fn from_rollups(dataset: &YearDataset, rollups: &TemporalRollups, config: &Config) -> Self {
        let started = Instant::now();
        let records = &dataset.records;
        let workouts = &dataset.workouts;

        let stats = MetricStats::compute(records, workouts);
        let streaks = calculate_streaks(&rollups.days, config.wrapped.active_day_step_threshold);
        let personal_records = PersonalRecords::extract(records, workouts, rollups);
        let time_patterns = TimePatterns::analyze(workouts);
        let wrapped_insights = WrappedInsights::synthesize(
            workouts,
            rollups,
            &time_patterns,
            stats.heart_rate.as_ref(),
            &config.insights,
        );

        let year = YearSummary {
            records: records.len() as u64,
            workouts: workouts.len() as u64,
            activity_summaries: dataset.activity_summaries.len() as u64,
            record_types: record_type_counts(records),
            workout_types: workout_type_counts(workouts),
            stats,
            monthly_breakdown: rollups.months.clone(),
            top_days: rollups.top_days(config.wrapped.top_n),
            streaks,
            personal_records,
            time_patterns,
            wrapped_insights,
        };

        tracing::info!(
            days = rollups.days.len(),
            longest_streak = year.streaks.longest_streak,
            personality = %year.wrapped_insights.personality.label,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Summary built"
        );

        Self {
            export_date: dataset.export_date.clone(),
            total_records: dataset.totals.records,
            total_workouts: dataset.totals.workouts,
            total_activity_summaries: dataset.totals.activity_summaries,
            target_year: dataset.target_year.clone(),
            year,
        }
    }

    /// JSON key of the year object, e.g. `year2025`
    pub fn year_key(&self) -> String {
        year_key(&self.target_year)
    }
}

fn year_key(year: &str) -> String {
    format!("year{}", year)
}

/// Wire form of [`Summary`] with the year object under a dynamic key
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryDocument {
    export_date: Option<String>,
    total_records: u64,
    total_workouts: u64,
    total_activity_summaries: u64,
    #[serde(flatten)]
    years: BTreeMap<String, YearSummary>,
}

impl From<Summary> for SummaryDocument {
    fn from(summary: Summary) -> Self {
        let mut years = BTreeMap::new();
        years.insert(year_key(&summary.target_year), summary.year);

        Self {
            export_date: summary.export_date,
            total_records: summary.total_records,
            total_workouts: summary.total_workouts,
            total_activity_summaries: summary.total_activity_summaries,
            years,
        }
    }
}

impl TryFrom<SummaryDocument> for Summary {
    type Error = String;

    fn try_from(doc: SummaryDocument) -> Result<Self, Self::Error> {
        if doc.years.len() != 1 {
            return Err(format!("expected exactly one year object, found {}", doc.years.len()));
        }

        let (key, year) = doc
            .years
            .into_iter()
            .next()
            .ok_or_else(|| "missing year object".to_string())?;

        let target_year = key
            .strip_prefix("year")
            .filter(|y| y.len() == 4 && y.bytes().all(|b| b.is_ascii_digit()))
            .ok_or_else(|| format!("unexpected field {:?}", key))?
            .to_string();

        Ok(Self {
            export_date: doc.export_date,
            total_records: doc.total_records,
            total_workouts: doc.total_workouts,
            total_activity_summaries: doc.total_activity_summaries,
            target_year,
            year,
        })
    }
}
