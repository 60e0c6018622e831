//! Per-type statistics
//!
//! Summary statistics over the retained records of one measurement type,
//! plus the workout aggregate and the type histograms.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::health::{display_type, identifiers, parse_numeric, MeasurementRecord, NumericField, Workout};

/// Count/total/average/min/max of one measurement type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub count: u64,
    pub total: f64,
    pub average: f64,
    pub max: f64,
    pub min: f64,
    pub unit: Option<String>,
}

/// Statistics for one type identifier, `None` when the type has no values
///
/// Records with an empty value are not candidates; values that fail to
/// parse are dropped from the computation without failing it.
pub fn compute_stats(records: &[MeasurementRecord], type_identifier: &str) -> Option<Stats> {
    let mut candidates = records
        .iter()
        .filter(|r| r.record_type == type_identifier)
        .filter(|r| r.value.as_deref().map(|v| !v.is_empty()).unwrap_or(false))
        .peekable();

    let unit = candidates.peek().and_then(|r| r.unit.clone());

    let mut count = 0u64;
    let mut skipped = 0u64;
    let mut total = 0.0;
    let mut max = f64::NEG_INFINITY;
    let mut min = f64::INFINITY;

    for record in candidates {
        match parse_numeric(record.value.as_deref()) {
            NumericField::Value(v) => {
                count += 1;
                total += v;
                max = max.max(v);
                min = min.min(v);
            }
            NumericField::Absent | NumericField::Unparseable => skipped += 1,
        }
    }

    if skipped > 0 {
        tracing::debug!(
            record_type = %type_identifier,
            skipped,
            "Excluded unparseable values from stats"
        );
    }

    if count == 0 {
        return None;
    }

    Some(Stats {
        count,
        total,
        average: total / count as f64,
        max,
        min,
        unit,
    })
}

/// Aggregate over all retained workouts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutStats {
    pub count: u64,
    /// Minutes
    pub total_duration: f64,
    pub avg_duration: f64,
    pub total_distance: f64,
    pub total_calories: f64,
}

/// Workout totals, `None` when there are no workouts
///
/// The average duration only covers workouts that carry a duration.
pub fn workout_stats(workouts: &[Workout]) -> Option<WorkoutStats> {
    if workouts.is_empty() {
        return None;
    }

    let durations: Vec<f64> = workouts
        .iter()
        .filter_map(|w| parse_numeric(w.duration.as_deref()).value())
        .collect();
    let total_duration: f64 = durations.iter().sum();

    let total_distance: f64 = workouts
        .iter()
        .filter_map(|w| parse_numeric(w.total_distance.as_deref()).value())
        .sum();
    let total_calories: f64 = workouts
        .iter()
        .filter_map(|w| parse_numeric(w.total_energy_burned.as_deref()).value())
        .sum();

    Some(WorkoutStats {
        count: workouts.len() as u64,
        total_duration,
        avg_duration: if durations.is_empty() {
            0.0
        } else {
            total_duration / durations.len() as f64
        },
        total_distance,
        total_calories,
    })
}

/// Stats for the metrics the wrapped summary reports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricStats {
    pub heart_rate: Option<Stats>,
    pub steps: Option<Stats>,
    pub active_energy: Option<Stats>,
    pub distance: Option<Stats>,
    pub sleep: Option<Stats>,
    pub resting_heart_rate: Option<Stats>,
    pub vo2_max: Option<Stats>,
    pub flights_climbed: Option<Stats>,
    pub workout_stats: Option<WorkoutStats>,
}

impl MetricStats {
    pub fn compute(records: &[MeasurementRecord], workouts: &[Workout]) -> Self {
        Self {
            heart_rate: compute_stats(records, identifiers::HEART_RATE),
            steps: compute_stats(records, identifiers::STEP_COUNT),
            active_energy: compute_stats(records, identifiers::ACTIVE_ENERGY_BURNED),
            distance: compute_stats(records, identifiers::DISTANCE_WALKING_RUNNING),
            sleep: compute_stats(records, identifiers::SLEEP_ANALYSIS),
            resting_heart_rate: compute_stats(records, identifiers::RESTING_HEART_RATE),
            vo2_max: compute_stats(records, identifiers::VO2_MAX),
            flights_climbed: compute_stats(records, identifiers::FLIGHTS_CLIMBED),
            workout_stats: workout_stats(workouts),
        }
    }
}

/// Record count per display type
pub fn record_type_counts(records: &[MeasurementRecord]) -> BTreeMap<String, u64> {
    let mut counts = BTreeMap::new();
    for record in records {
        *counts
            .entry(display_type(&record.record_type).to_string())
            .or_insert(0) += 1;
    }
    counts
}

/// Workout count per display type
pub fn workout_type_counts(workouts: &[Workout]) -> BTreeMap<String, u64> {
    let mut counts = BTreeMap::new();
    for workout in workouts {
        *counts
            .entry(display_type(&workout.activity_type).to_string())
            .or_insert(0) += 1;
    }
    counts
}
