//! Day and month rollups
//!
//! One fold over the retained records and workouts fills both indexes.
//! Months are pre-seeded so all twelve always appear; days exist only for
//! dates actually seen in the data.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::health::{
    day_key, display_type, identifiers, month_of, parse_numeric, MeasurementRecord, Workout,
};

const MONTH_NAMES: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];

/// Rollup metric a record type feeds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RollupMetric {
    Steps,
    Distance,
    ActiveEnergy,
    HeartRate,
}

impl RollupMetric {
    fn for_type(record_type: &str) -> Option<Self> {
        match record_type {
            identifiers::STEP_COUNT => Some(RollupMetric::Steps),
            identifiers::DISTANCE_WALKING_RUNNING => Some(RollupMetric::Distance),
            identifiers::ACTIVE_ENERGY_BURNED => Some(RollupMetric::ActiveEnergy),
            identifiers::HEART_RATE => Some(RollupMetric::HeartRate),
            _ => None,
        }
    }
}

/// Totals for one calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayRollup {
    /// `YYYY-MM-DD`
    pub date: String,
    pub steps: f64,
    pub distance: f64,
    pub active_energy: f64,
    pub workout_count: u32,
    /// 0 when no heart-rate samples were recorded that day
    pub heart_rate_max: f64,
    /// 0 when no heart-rate samples were recorded that day
    pub heart_rate_avg: f64,
}

/// Totals for one month of the target year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthRollup {
    /// Two-digit month, `01`..`12`
    pub month: String,
    pub name: String,
    pub steps: f64,
    pub distance: f64,
    pub active_energy: f64,
    pub workout_count: u32,
    /// Display workout type → count
    pub workout_types: BTreeMap<String, u32>,
}

impl MonthRollup {
    fn empty(index: usize) -> Self {
        Self {
            month: format!("{:02}", index + 1),
            name: MONTH_NAMES[index].to_string(),
            steps: 0.0,
            distance: 0.0,
            active_energy: 0.0,
            workout_count: 0,
            workout_types: BTreeMap::new(),
        }
    }

    fn add(&mut self, metric: RollupMetric, value: f64) {
        match metric {
            RollupMetric::Steps => self.steps += value,
            RollupMetric::Distance => self.distance += value,
            RollupMetric::ActiveEnergy => self.active_energy += value,
            RollupMetric::HeartRate => {}
        }
    }
}

/// Day state while folding; heart-rate samples reduce to sum and count
#[derive(Debug, Default)]
struct DayBuilder {
    steps: f64,
    distance: f64,
    active_energy: f64,
    workout_count: u32,
    heart_rate_max: f64,
    heart_rate_sum: f64,
    heart_rate_samples: u64,
}

impl DayBuilder {
    fn add(&mut self, metric: RollupMetric, value: f64) {
        match metric {
            RollupMetric::Steps => self.steps += value,
            RollupMetric::Distance => self.distance += value,
            RollupMetric::ActiveEnergy => self.active_energy += value,
            RollupMetric::HeartRate => {
                self.heart_rate_max = self.heart_rate_max.max(value);
                self.heart_rate_sum += value;
                self.heart_rate_samples += 1;
            }
        }
    }

    fn finish(self, date: String) -> DayRollup {
        DayRollup {
            date,
            steps: self.steps,
            distance: self.distance,
            active_energy: self.active_energy,
            workout_count: self.workout_count,
            heart_rate_max: self.heart_rate_max,
            heart_rate_avg: if self.heart_rate_samples == 0 {
                0.0
            } else {
                self.heart_rate_sum / self.heart_rate_samples as f64
            },
        }
    }
}

/// Day-level metric a leaderboard ranks by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayMetric {
    Steps,
    Distance,
    ActiveEnergy,
}

impl DayMetric {
    pub fn of(self, day: &DayRollup) -> f64 {
        match self {
            DayMetric::Steps => day.steps,
            DayMetric::Distance => day.distance,
            DayMetric::ActiveEnergy => day.active_energy,
        }
    }
}

/// Month and day indexes for the target year
#[derive(Debug, Clone, PartialEq)]
pub struct TemporalRollups {
    /// Always twelve entries, January first
    pub months: Vec<MonthRollup>,
    /// Keyed by `YYYY-MM-DD`, ascending
    pub days: BTreeMap<String, DayRollup>,
}

impl TemporalRollups {
    /// Fold records and workouts into both indexes
    pub fn build(records: &[MeasurementRecord], workouts: &[Workout]) -> Self {
        let mut months: Vec<MonthRollup> = (0..12).map(MonthRollup::empty).collect();
        let mut days: BTreeMap<String, DayBuilder> = BTreeMap::new();
        let mut dropped = 0u64;

        for record in records {
            let day = match day_key(&record.start_date) {
                Some(key) => Some(days.entry(key.to_string()).or_default()),
                None => None,
            };
            let month = month_of(&record.start_date);
            if month.is_none() {
                dropped += 1;
            }

            let Some(metric) = RollupMetric::for_type(&record.record_type) else {
                continue;
            };
            let Some(value) = parse_numeric(record.value.as_deref()).value() else {
                continue;
            };

            if let Some(day) = day {
                day.add(metric, value);
            }
            if let Some(m) = month {
                months[(m - 1) as usize].add(metric, value);
            }
        }

        for workout in workouts {
            if let Some(key) = day_key(&workout.start_date) {
                days.entry(key.to_string()).or_default().workout_count += 1;
            }

            match month_of(&workout.start_date) {
                Some(m) => {
                    let month = &mut months[(m - 1) as usize];
                    month.workout_count += 1;
                    *month
                        .workout_types
                        .entry(display_type(&workout.activity_type).to_string())
                        .or_insert(0) += 1;
                }
                None => dropped += 1,
            }
        }

        if dropped > 0 {
            tracing::debug!(dropped, "Skipped entries with malformed month in monthly rollup");
        }

        let days = days
            .into_iter()
            .map(|(date, builder)| {
                let day = builder.finish(date.clone());
                (date, day)
            })
            .collect();

        Self { months, days }
    }

    /// Top `n` days by a metric, descending; ties keep date order
    pub fn leaderboard(&self, metric: DayMetric, n: usize) -> Vec<DayRollup> {
        let mut ranked: Vec<&DayRollup> = self.days.values().collect();
        ranked.sort_by(|a, b| metric.of(b).total_cmp(&metric.of(a)));
        ranked.into_iter().take(n).cloned().collect()
    }

    /// All three leaderboards
    pub fn top_days(&self, n: usize) -> TopDays {
        TopDays {
            by_steps: self.leaderboard(DayMetric::Steps, n),
            by_distance: self.leaderboard(DayMetric::Distance, n),
            by_active_energy: self.leaderboard(DayMetric::ActiveEnergy, n),
        }
    }

    /// Sum of one metric across all months
    pub fn total(&self, metric: DayMetric) -> f64 {
        self.months
            .iter()
            .map(|m| match metric {
                DayMetric::Steps => m.steps,
                DayMetric::Distance => m.distance,
                DayMetric::ActiveEnergy => m.active_energy,
            })
            .sum()
    }
}

/// Leaderboards of the best days
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopDays {
    pub by_steps: Vec<DayRollup>,
    pub by_distance: Vec<DayRollup>,
    pub by_active_energy: Vec<DayRollup>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(record_type: &str, date: &str, value: &str) -> MeasurementRecord {
        MeasurementRecord::new(record_type, date).value(value)
    }

    #[test]
    fn test_twelve_months_always_present() {
        let rollups = TemporalRollups::build(&[], &[]);
        assert_eq!(rollups.months.len(), 12);
        assert_eq!(rollups.months[0].month, "01");
        assert_eq!(rollups.months[11].month, "12");
        assert_eq!(rollups.months[11].name, "December");
        assert!(rollups.days.is_empty());
    }

    #[test]
    fn test_monthly_steps_match_record_sum() {
        let records = vec![
            record(identifiers::STEP_COUNT, "2025-01-03 08:00:00 +0000", "1000"),
            record(identifiers::STEP_COUNT, "2025-01-03 12:00:00 +0000", "500"),
            record(identifiers::STEP_COUNT, "2025-06-10 12:00:00 +0000", "2500"),
            record(identifiers::STEP_COUNT, "2025-06-10 13:00:00 +0000", "oops"),
        ];

        let rollups = TemporalRollups::build(&records, &[]);
        assert_eq!(rollups.months[0].steps, 1500.0);
        assert_eq!(rollups.months[5].steps, 2500.0);
        assert_eq!(rollups.total(DayMetric::Steps), 4000.0);
        assert_eq!(rollups.days["2025-01-03"].steps, 1500.0);
    }

    #[test]
    fn test_malformed_month_dropped_from_months_only() {
        let records = vec![record(identifiers::STEP_COUNT, "2025-13-01 08:00:00", "700")];
        let rollups = TemporalRollups::build(&records, &[]);

        assert_eq!(rollups.total(DayMetric::Steps), 0.0);
        assert_eq!(rollups.days["2025-13-01"].steps, 700.0);
    }

    #[test]
    fn test_heart_rate_reduced_per_day() {
        let records = vec![
            record(identifiers::HEART_RATE, "2025-02-01 08:00:00 +0000", "60"),
            record(identifiers::HEART_RATE, "2025-02-01 09:00:00 +0000", "120"),
            record(identifiers::STEP_COUNT, "2025-02-02 09:00:00 +0000", "10"),
        ];

        let rollups = TemporalRollups::build(&records, &[]);
        let day = &rollups.days["2025-02-01"];
        assert_eq!(day.heart_rate_max, 120.0);
        assert_eq!(day.heart_rate_avg, 90.0);

        // No samples: average falls back to zero
        assert_eq!(rollups.days["2025-02-02"].heart_rate_avg, 0.0);
    }

    #[test]
    fn test_workouts_counted_per_month_and_type() {
        let workouts = vec![
            Workout::new("HKWorkoutActivityTypeRunning", "2025-11-23 18:00:00 +0000"),
            Workout::new("HKWorkoutActivityTypeRunning", "2025-11-24 18:00:00 +0000"),
            Workout::new("HKWorkoutActivityTypeSwimming", "2025-11-24 07:00:00 +0000"),
        ];

        let rollups = TemporalRollups::build(&[], &workouts);
        let november = &rollups.months[10];
        assert_eq!(november.workout_count, 3);
        assert_eq!(november.workout_types.get("Running"), Some(&2));
        assert_eq!(november.workout_types.get("Swimming"), Some(&1));
        assert_eq!(rollups.days["2025-11-24"].workout_count, 2);
    }

    #[test]
    fn test_leaderboards() {
        let records: Vec<MeasurementRecord> = (1..=8)
            .map(|d| {
                record(
                    identifiers::STEP_COUNT,
                    &format!("2025-03-{:02} 10:00:00 +0000", d),
                    &(d * 1000).to_string(),
                )
            })
            .collect();

        let rollups = TemporalRollups::build(&records, &[]);
        let top = rollups.top_days(5);

        assert_eq!(top.by_steps.len(), 5);
        assert_eq!(top.by_steps[0].date, "2025-03-08");
        assert!(top.by_steps.windows(2).all(|w| w[0].steps > w[1].steps));
        assert!(top.by_steps.iter().all(|d| rollups.days.contains_key(&d.date)));
    }

    #[test]
    fn test_leaderboard_ties_keep_date_order() {
        let records = vec![
            record(identifiers::DISTANCE_WALKING_RUNNING, "2025-05-02 10:00:00 +0000", "3"),
            record(identifiers::DISTANCE_WALKING_RUNNING, "2025-05-01 10:00:00 +0000", "3"),
        ];

        let rollups = TemporalRollups::build(&records, &[]);
        let top = rollups.leaderboard(DayMetric::Distance, 5);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].date, "2025-05-01");
        assert_eq!(top[1].date, "2025-05-02");
    }
}
