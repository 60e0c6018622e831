//! Activity streaks
//!
//! A day is active when it has a workout or its step total clears the
//! configured threshold. Streak continuity is measured between consecutive
//! active days: a run continues only when the next active day is exactly one
//! calendar day after the previous one.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::rollup::DayRollup;
use crate::health::parse_day;

/// Default step total above which a day counts as active
pub const DEFAULT_ACTIVE_DAY_STEPS: f64 = 3000.0;

/// Longest and most recent runs of active days
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakStats {
    pub longest_streak: u32,
    pub longest_streak_start: Option<String>,
    pub longest_streak_end: Option<String>,
    /// Run ending at the latest active day
    pub current_streak: u32,
    pub active_days: u32,
}

/// Whether a day counts toward a streak
pub fn is_active(day: &DayRollup, step_threshold: f64) -> bool {
    day.workout_count > 0 || day.steps > step_threshold
}

/// Find streaks over day rollups keyed by `YYYY-MM-DD`
pub fn calculate_streaks(days: &BTreeMap<String, DayRollup>, step_threshold: f64) -> StreakStats {
    let active: Vec<(NaiveDate, &str)> = days
        .iter()
        .filter(|(_, day)| is_active(day, step_threshold))
        .filter_map(|(key, _)| parse_day(key).map(|date| (date, key.as_str())))
        .collect();

    if active.is_empty() {
        return StreakStats::default();
    }

    let mut stats = StreakStats {
        active_days: active.len() as u32,
        ..Default::default()
    };

    let mut streak = 0u32;
    let mut streak_start = active[0].1;
    let mut previous: Option<NaiveDate> = None;

    for &(date, key) in &active {
        let consecutive = previous
            .and_then(|prev| prev.succ_opt())
            .map(|next| next == date)
            .unwrap_or(false);

        if consecutive {
            streak += 1;
        } else {
            streak = 1;
            streak_start = key;
        }

        if streak > stats.longest_streak {
            stats.longest_streak = streak;
            stats.longest_streak_start = Some(streak_start.to_string());
            stats.longest_streak_end = Some(key.to_string());
        }

        previous = Some(date);
    }

    stats.current_streak = streak;
    stats
}
