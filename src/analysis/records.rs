//! Personal records
//!
//! Single best values across the year. Each record carries the date it was
//! set; missing data leaves the record empty rather than failing.

use serde::{Deserialize, Serialize};

use super::rollup::{DayMetric, TemporalRollups};
use crate::health::{
    day_key, display_type, identifiers, parse_numeric, parse_timestamp, MeasurementRecord, Workout,
};

/// A value paired with the day it happened
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatedValue {
    pub date: String,
    pub value: f64,
}

/// A workout worth calling out
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutHighlight {
    pub workout_type: String,
    pub date: String,
    pub start_date: String,
    /// Minutes, 0 when the workout has no usable duration
    pub duration: f64,
    pub distance: Option<f64>,
    pub energy_burned: Option<f64>,
}

impl WorkoutHighlight {
    fn from_workout(workout: &Workout) -> Self {
        Self {
            workout_type: display_type(&workout.activity_type).to_string(),
            date: day_key(&workout.start_date)
                .unwrap_or(&workout.start_date)
                .to_string(),
            start_date: workout.start_date.clone(),
            duration: parse_numeric(workout.duration.as_deref()).or(0.0),
            distance: parse_numeric(workout.total_distance.as_deref()).value(),
            energy_burned: parse_numeric(workout.total_energy_burned.as_deref()).value(),
        }
    }
}

/// Best values of the year
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalRecords {
    /// Largest single step-count sample
    pub max_step_record: Option<DatedValue>,
    /// Largest single walking/running distance sample
    pub max_distance_record: Option<DatedValue>,
    pub most_steps_day: Option<DatedValue>,
    pub most_active_energy_day: Option<DatedValue>,
    pub longest_workout: Option<WorkoutHighlight>,
    pub first_workout: Option<WorkoutHighlight>,
    pub last_workout: Option<WorkoutHighlight>,
}

impl PersonalRecords {
    pub fn extract(
        records: &[MeasurementRecord],
        workouts: &[Workout],
        rollups: &TemporalRollups,
    ) -> Self {
        Self {
            max_step_record: max_record(records, identifiers::STEP_COUNT),
            max_distance_record: max_record(records, identifiers::DISTANCE_WALKING_RUNNING),
            most_steps_day: best_day(rollups, DayMetric::Steps),
            most_active_energy_day: best_day(rollups, DayMetric::ActiveEnergy),
            longest_workout: longest_workout(workouts),
            first_workout: first_workout(workouts),
            last_workout: last_workout(workouts),
        }
    }
}

/// Largest single parsed value of a type; earliest occurrence wins ties
pub fn max_record(records: &[MeasurementRecord], type_identifier: &str) -> Option<DatedValue> {
    let mut best: Option<(&MeasurementRecord, f64)> = None;

    for record in records.iter().filter(|r| r.record_type == type_identifier) {
        let Some(value) = parse_numeric(record.value.as_deref()).value() else {
            continue;
        };
        if best.map(|(_, v)| value > v).unwrap_or(true) {
            best = Some((record, value));
        }
    }

    best.map(|(record, value)| DatedValue {
        date: day_key(&record.start_date)
            .unwrap_or(&record.start_date)
            .to_string(),
        value,
    })
}

/// Day with the highest value of a metric; earliest day wins ties
pub fn best_day(rollups: &TemporalRollups, metric: DayMetric) -> Option<DatedValue> {
    let mut best: Option<DatedValue> = None;

    for day in rollups.days.values() {
        let value = metric.of(day);
        if best.as_ref().map(|b| value > b.value).unwrap_or(true) {
            best = Some(DatedValue {
                date: day.date.clone(),
                value,
            });
        }
    }

    best
}

/// Workout with the longest duration; missing durations count as 0
pub fn longest_workout(workouts: &[Workout]) -> Option<WorkoutHighlight> {
    let mut best: Option<(&Workout, f64)> = None;

    for workout in workouts {
        let duration = parse_numeric(workout.duration.as_deref()).or(0.0);
        if best.map(|(_, d)| duration > d).unwrap_or(true) {
            best = Some((workout, duration));
        }
    }

    best.map(|(workout, _)| WorkoutHighlight::from_workout(workout))
}

/// Chronologically first workout with a parseable start
pub fn first_workout(workouts: &[Workout]) -> Option<WorkoutHighlight> {
    workouts
        .iter()
        .filter_map(|w| parse_timestamp(&w.start_date).map(|ts| (ts, w)))
        .min_by_key(|(ts, _)| *ts)
        .map(|(_, w)| WorkoutHighlight::from_workout(w))
}

/// Chronologically last workout with a parseable start
pub fn last_workout(workouts: &[Workout]) -> Option<WorkoutHighlight> {
    workouts
        .iter()
        .filter_map(|w| parse_timestamp(&w.start_date).map(|ts| (ts, w)))
        .max_by_key(|(ts, _)| *ts)
        .map(|(_, w)| WorkoutHighlight::from_workout(w))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn steps(date: &str, value: &str) -> MeasurementRecord {
        MeasurementRecord::new(identifiers::STEP_COUNT, date).value(value)
    }

    #[test]
    fn test_empty_data_yields_empty_records() {
        let rollups = TemporalRollups::build(&[], &[]);
        let records = PersonalRecords::extract(&[], &[], &rollups);
        assert_eq!(records, PersonalRecords::default());
    }

    #[test]
    fn test_max_step_record() {
        let records = vec![
            steps("2025-08-14 10:00:00 +0000", "1200"),
            steps("2025-08-15 10:00:00 +0000", "junk"),
            steps("2025-09-01 10:00:00 +0000", "900"),
        ];

        let best = max_record(&records, identifiers::STEP_COUNT).unwrap();
        assert_eq!(best.date, "2025-08-14");
        assert_eq!(best.value, 1200.0);
        assert!(max_record(&records, identifiers::DISTANCE_WALKING_RUNNING).is_none());
    }

    #[test]
    fn test_best_days() {
        let records = vec![
            steps("2025-08-14 10:00:00 +0000", "20000"),
            steps("2025-08-14 18:00:00 +0000", "16070"),
            steps("2025-08-20 10:00:00 +0000", "30000"),
            MeasurementRecord::new(identifiers::ACTIVE_ENERGY_BURNED, "2025-11-23 10:00:00 +0000")
                .value("1024"),
        ];
        let rollups = TemporalRollups::build(&records, &[]);

        let best = best_day(&rollups, DayMetric::Steps).unwrap();
        assert_eq!(best.date, "2025-08-14");
        assert_eq!(best.value, 36070.0);

        let energy = best_day(&rollups, DayMetric::ActiveEnergy).unwrap();
        assert_eq!(energy.date, "2025-11-23");
    }

    #[test]
    fn test_longest_workout_defaults_missing_duration() {
        let workouts = vec![
            Workout::new("HKWorkoutActivityTypeWalking", "2025-03-01 08:00:00 +0000"),
            Workout::new("HKWorkoutActivityTypeRunning", "2025-11-23 17:00:00 +0000")
                .duration("141.2")
                .energy("1024"),
            Workout::new("HKWorkoutActivityTypeCycling", "2025-05-01 08:00:00 +0000").duration("bad"),
        ];

        let longest = longest_workout(&workouts).unwrap();
        assert_eq!(longest.workout_type, "Running");
        assert_eq!(longest.date, "2025-11-23");
        assert_eq!(longest.duration, 141.2);
        assert_eq!(longest.energy_burned, Some(1024.0));
        assert_eq!(longest.distance, None);
    }

    #[test]
    fn test_first_and_last_workout_by_time() {
        let workouts = vec![
            Workout::new("HKWorkoutActivityTypeSwimming", "2025-06-01 08:00:00 +0000"),
            Workout::new("HKWorkoutActivityTypeRunning", "2025-01-02 07:00:00 +0000"),
            Workout::new("HKWorkoutActivityTypeHiking", "2025-12-20 09:00:00 +0000"),
            Workout::new("HKWorkoutActivityTypeYoga", "2025-xx"),
        ];

        assert_eq!(first_workout(&workouts).unwrap().workout_type, "Running");
        assert_eq!(last_workout(&workouts).unwrap().workout_type, "Hiking");
    }
}
