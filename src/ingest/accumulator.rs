//! Year filter and accumulator
//!
//! Counts every tracked element in the export and keeps only the ones whose
//! date falls in the target year. The accumulator owns everything the
//! streaming pass produces; [`YearAccumulator::finish`] freezes it into a
//! [`YearDataset`] for the analysis stages.

use serde::Serialize;

use crate::health::{
    in_year, ActivitySummary, ElementKind, MeasurementRecord, RawElement, Workout,
};

/// Default number of elements between progress reports
pub const DEFAULT_PROGRESS_INTERVAL: u64 = 100_000;

/// Element counts across the whole export, regardless of year
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExportTotals {
    pub records: u64,
    pub workouts: u64,
    pub activity_summaries: u64,
    pub elements: u64,
}

/// Everything retained from one streaming pass
#[derive(Debug, Clone, Default)]
pub struct YearDataset {
    pub target_year: String,
    pub export_date: Option<String>,
    pub totals: ExportTotals,
    pub records: Vec<MeasurementRecord>,
    pub workouts: Vec<Workout>,
    pub activity_summaries: Vec<ActivitySummary>,
}

/// Accumulates target-year elements during the streaming pass
pub struct YearAccumulator {
    target_year: String,
    progress_interval: u64,
    export_date: Option<String>,
    totals: ExportTotals,
    records: Vec<MeasurementRecord>,
    workouts: Vec<Workout>,
    activity_summaries: Vec<ActivitySummary>,
}

impl YearAccumulator {
    /// Create an accumulator for a four-digit target year
    pub fn new(target_year: impl Into<String>) -> Self {
        Self {
            target_year: target_year.into(),
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            export_date: None,
            totals: ExportTotals::default(),
            records: Vec::new(),
            workouts: Vec::new(),
            activity_summaries: Vec::new(),
        }
    }

    /// Set how often progress is reported (0 disables it)
    pub fn with_progress_interval(mut self, interval: u64) -> Self {
        self.progress_interval = interval;
        self
    }

    pub fn target_year(&self) -> &str {
        &self.target_year
    }

    pub fn totals(&self) -> ExportTotals {
        self.totals
    }

    /// Handle one opened element
    pub fn observe(&mut self, element: &RawElement) {
        self.totals.elements += 1;
        if self.progress_interval > 0 && self.totals.elements % self.progress_interval == 0 {
            self.report_progress();
        }

        let Some(kind) = ElementKind::from_name(&element.name) else {
            return;
        };

        match kind {
            ElementKind::ExportDate => {
                if self.export_date.is_none() {
                    self.export_date = element.attr("value").map(str::to_string);
                }
            }
            ElementKind::Record => {
                self.totals.records += 1;
                if in_year(element.attr("startDate"), &self.target_year) {
                    self.records.push(MeasurementRecord::from_element(element));
                }
            }
            ElementKind::Workout => {
                self.totals.workouts += 1;
                if in_year(element.attr("startDate"), &self.target_year) {
                    self.workouts.push(Workout::from_element(element));
                }
            }
            ElementKind::ActivitySummary => {
                self.totals.activity_summaries += 1;
                if in_year(element.attr("dateComponents"), &self.target_year) {
                    self.activity_summaries
                        .push(ActivitySummary::from_element(element));
                }
            }
        }
    }

    fn report_progress(&self) {
        tracing::info!(
            elements = self.totals.elements,
            retained_records = self.records.len(),
            retained_workouts = self.workouts.len(),
            "Processed {:.1}M elements",
            self.totals.elements as f64 / 1_000_000.0
        );
    }

    /// Freeze the accumulated state
    pub fn finish(self) -> YearDataset {
        tracing::info!(
            total_records = self.totals.records,
            total_workouts = self.totals.workouts,
            total_activity_summaries = self.totals.activity_summaries,
            year = %self.target_year,
            records = self.records.len(),
            workouts = self.workouts.len(),
            activity_summaries = self.activity_summaries.len(),
            "Streaming pass complete"
        );

        YearDataset {
            target_year: self.target_year,
            export_date: self.export_date,
            totals: self.totals,
            records: self.records,
            workouts: self.workouts,
            activity_summaries: self.activity_summaries,
        }
    }
}
