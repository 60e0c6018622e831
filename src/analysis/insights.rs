//! Wrapped insights
//!
//! Narrative facts assembled from the other analysis outputs. Every label
//! comes from the configured tables and ladders.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::patterns::{Chronotype, TimePatterns};
use super::rollup::{DayMetric, MonthRollup, TemporalRollups};
use super::stats::Stats;
use crate::config::{InsightsConfig, LadderRung};
use crate::health::{display_type, Workout};

const MINUTES_PER_YEAR: f64 = 60.0 * 24.0 * 365.0;
const DAYS_PER_YEAR: f64 = 365.0;

/// Personality derived from the favourite workout type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalityInsight {
    pub label: String,
    pub description: String,
    /// Display name of the most frequent workout type
    pub top_workout_type: Option<String>,
    pub top_workout_count: u32,
}

/// Month with the most workouts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BestMonth {
    pub month: String,
    pub name: String,
    pub workouts: u32,
    pub steps: f64,
    pub distance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimePersonality {
    pub label: String,
    pub chronotype: Chronotype,
    pub peak_hour: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistanceComparison {
    pub total_distance: f64,
    pub comparison: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLevel {
    pub average_daily_steps: f64,
    pub level: String,
}

/// The narrative facts of the year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WrappedInsights {
    pub personality: PersonalityInsight,
    pub best_month: BestMonth,
    pub time_personality: TimePersonality,
    pub distance_comparison: DistanceComparison,
    /// Average heart rate sustained over a whole year
    pub estimated_heartbeats: u64,
    pub activity_level: ActivityLevel,
}

impl WrappedInsights {
    pub fn synthesize(
        workouts: &[Workout],
        rollups: &TemporalRollups,
        patterns: &TimePatterns,
        heart_rate: Option<&Stats>,
        config: &InsightsConfig,
    ) -> Self {
        let total_distance = rollups.total(DayMetric::Distance);
        let average_daily_steps = rollups.total(DayMetric::Steps) / DAYS_PER_YEAR;

        Self {
            personality: personality(workouts, config),
            best_month: best_month(&rollups.months),
            time_personality: time_personality(patterns),
            distance_comparison: DistanceComparison {
                total_distance,
                comparison: ladder_label(&config.distance_comparisons, total_distance),
            },
            estimated_heartbeats: estimated_heartbeats(heart_rate),
            activity_level: ActivityLevel {
                average_daily_steps,
                level: ladder_label(&config.activity_levels, average_daily_steps),
            },
        }
    }
}

/// Most frequent workout type by full identifier; the type seen first wins ties
pub fn top_workout_type(workouts: &[Workout]) -> Option<(&str, u32)> {
    let mut slots: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(&str, u32)> = Vec::new();

    for workout in workouts.iter().filter(|w| !w.activity_type.is_empty()) {
        let workout_type = workout.activity_type.as_str();
        let slot = *slots.entry(workout_type).or_insert_with(|| {
            counts.push((workout_type, 0));
            counts.len() - 1
        });
        counts[slot].1 += 1;
    }

    let mut best: Option<(&str, u32)> = None;
    for (workout_type, count) in counts {
        if best.map(|(_, c)| count > c).unwrap_or(true) {
            best = Some((workout_type, count));
        }
    }
    best
}

fn personality(workouts: &[Workout], config: &InsightsConfig) -> PersonalityInsight {
    let top = top_workout_type(workouts);

    let rule = top.and_then(|(workout_type, _)| {
        config
            .personalities
            .iter()
            .find(|rule| rule.workout_type == workout_type)
    });

    let (label, description) = match rule {
        Some(rule) => (rule.label.clone(), rule.description.clone()),
        None => (
            config.default_personality.label.clone(),
            config.default_personality.description.clone(),
        ),
    };

    PersonalityInsight {
        label,
        description,
        top_workout_type: top.map(|(t, _)| display_type(t).to_string()),
        top_workout_count: top.map(|(_, c)| c).unwrap_or(0),
    }
}

/// Month with the most workouts; earliest month wins ties
pub fn best_month(months: &[MonthRollup]) -> BestMonth {
    let mut best: Option<&MonthRollup> = None;
    for month in months {
        if best.map(|b| month.workout_count > b.workout_count).unwrap_or(true) {
            best = Some(month);
        }
    }

    match best {
        Some(m) => BestMonth {
            month: m.month.clone(),
            name: m.name.clone(),
            workouts: m.workout_count,
            steps: m.steps,
            distance: m.distance,
        },
        None => BestMonth {
            month: "01".to_string(),
            name: "January".to_string(),
            workouts: 0,
            steps: 0.0,
            distance: 0.0,
        },
    }
}

fn time_personality(patterns: &TimePatterns) -> TimePersonality {
    let label = match patterns.chronotype {
        Chronotype::Morning => "Early Bird",
        Chronotype::Night => "Night Owl",
        Chronotype::Flexible => "Flexible",
    };

    TimePersonality {
        label: label.to_string(),
        chronotype: patterns.chronotype,
        peak_hour: patterns.peak_hour,
    }
}

/// Label of the highest rung whose threshold `value` reaches
///
/// Values below the first rung take the first rung's label.
pub fn ladder_label(ladder: &[LadderRung], value: f64) -> String {
    ladder
        .iter()
        .take_while(|rung| value >= rung.threshold)
        .last()
        .or_else(|| ladder.first())
        .map(|rung| rung.label.clone())
        .unwrap_or_default()
}

/// Beats in a year at the measured average heart rate
pub fn estimated_heartbeats(heart_rate: Option<&Stats>) -> u64 {
    heart_rate
        .map(|stats| (stats.average * MINUTES_PER_YEAR).round().max(0.0) as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::{identifiers, MeasurementRecord};

    fn rung(threshold: f64, label: &str) -> LadderRung {
        LadderRung {
            threshold,
            label: label.to_string(),
        }
    }

    fn running(date: &str) -> Workout {
        Workout::new("HKWorkoutActivityTypeRunning", date)
    }

    #[test]
    fn test_ladder_label() {
        let ladder = vec![rung(0.0, "low"), rung(10.0, "mid"), rung(100.0, "high")];
        assert_eq!(ladder_label(&ladder, 5.0), "low");
        assert_eq!(ladder_label(&ladder, 10.0), "mid");
        assert_eq!(ladder_label(&ladder, 99.9), "mid");
        assert_eq!(ladder_label(&ladder, 1e6), "high");
        assert_eq!(ladder_label(&ladder, -1.0), "low");
        assert_eq!(ladder_label(&[], 1.0), "");
    }

    #[test]
    fn test_estimated_heartbeats() {
        let stats = Stats {
            count: 10,
            total: 1080.0,
            average: 108.0,
            max: 200.0,
            min: 60.0,
            unit: Some("count/min".to_string()),
        };
        assert_eq!(estimated_heartbeats(Some(&stats)), 56_764_800);
        assert_eq!(estimated_heartbeats(None), 0);
    }

    #[test]
    fn test_personality_lookup_and_fallback() {
        let config = InsightsConfig::default();

        let workouts = vec![
            running("2025-01-01"),
            running("2025-01-02"),
            Workout::new("HKWorkoutActivityTypeSwimming", "2025-01-03"),
        ];
        let p = personality(&workouts, &config);
        assert_eq!(p.label, "Cardio King");
        assert_eq!(p.top_workout_type.as_deref(), Some("Running"));
        assert_eq!(p.top_workout_count, 2);

        let p = personality(&[Workout::new("HKWorkoutActivityTypeCurling", "2025-01-01")], &config);
        assert_eq!(p.label, config.default_personality.label);
        assert_eq!(p.top_workout_type.as_deref(), Some("Curling"));

        let p = personality(&[], &config);
        assert_eq!(p.label, config.default_personality.label);
        assert_eq!(p.top_workout_type, None);
    }

    #[test]
    fn test_top_workout_type_ties_keep_first_seen() {
        let workouts = vec![
            Workout::new("HKWorkoutActivityTypeSwimming", "2025-01-01"),
            running("2025-01-02"),
        ];
        assert_eq!(
            top_workout_type(&workouts),
            Some(("HKWorkoutActivityTypeSwimming", 1))
        );

        let p = personality(&workouts, &InsightsConfig::default());
        assert_eq!(p.label, "Water Spirit");
        assert_eq!(p.top_workout_type.as_deref(), Some("Swimming"));

        // A later type overtakes only with a strictly higher count
        let mut workouts = workouts;
        workouts.push(running("2025-01-03"));
        assert_eq!(
            top_workout_type(&workouts),
            Some(("HKWorkoutActivityTypeRunning", 2))
        );
    }

    #[test]
    fn test_time_personality_without_workouts() {
        let patterns = TimePatterns::analyze(&[]);
        let time = time_personality(&patterns);
        assert_eq!(time.peak_hour, 0);
        assert_eq!(time.chronotype, Chronotype::Night);
        assert_eq!(time.label, "Night Owl");
    }

    #[test]
    fn test_personality_matches_full_identifier() {
        let mut config = InsightsConfig::default();
        config.personalities[0].workout_type = "Running".to_string();

        let p = personality(&[running("2025-01-01")], &config);
        assert_eq!(p.label, config.default_personality.label);
    }

    #[test]
    fn test_best_month_ties_pick_earliest() {
        let workouts = vec![
            running("2025-03-01 10:00:00 +0000"),
            running("2025-11-01 10:00:00 +0000"),
            running("2025-11-02 10:00:00 +0000"),
            running("2025-12-01 10:00:00 +0000"),
            running("2025-12-02 10:00:00 +0000"),
        ];
        let rollups = TemporalRollups::build(&[], &workouts);

        let best = best_month(&rollups.months);
        assert_eq!(best.month, "11");
        assert_eq!(best.name, "November");
        assert_eq!(best.workouts, 2);

        let empty = TemporalRollups::build(&[], &[]);
        assert_eq!(best_month(&empty.months).month, "01");
    }

    #[test]
    fn test_synthesize() {
        let records: Vec<MeasurementRecord> = (1..=28)
            .map(|d| {
                MeasurementRecord::new(identifiers::STEP_COUNT, format!("2025-02-{:02} 09:00:00 +0000", d))
                    .value("130000")
            })
            .chain(std::iter::once(
                MeasurementRecord::new(identifiers::DISTANCE_WALKING_RUNNING, "2025-02-01 09:00:00 +0000")
                    .value("50"),
            ))
            .collect();
        let workouts = vec![running("2025-02-03 06:30:00 +0000")];

        let rollups = TemporalRollups::build(&records, &workouts);
        let patterns = TimePatterns::analyze(&workouts);
        let insights = WrappedInsights::synthesize(
            &workouts,
            &rollups,
            &patterns,
            None,
            &InsightsConfig::default(),
        );

        // 28 * 130000 / 365 ≈ 9972.6
        assert_eq!(insights.activity_level.level, "Moderately Active");
        assert_eq!(insights.distance_comparison.comparison, "A full marathon");
        assert_eq!(insights.time_personality.label, "Early Bird");
        assert_eq!(insights.best_month.month, "02");
        assert_eq!(insights.estimated_heartbeats, 0);
    }
}
