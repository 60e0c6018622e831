//! Workout time patterns
//!
//! Buckets workouts by hour of day and weekday, using the wall-clock time
//! written in the export.

use chrono::{Datelike, Timelike, Weekday};
use serde::{Deserialize, Serialize};

use crate::health::{parse_timestamp, Workout};

/// Weekdays in histogram order
pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Morning/night classification of the peak workout hour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chronotype {
    /// Peak hour in [5, 12)
    Morning,
    /// Peak hour in [20, 24) or [0, 5)
    Night,
    Flexible,
}

impl Chronotype {
    pub fn from_peak_hour(hour: u32) -> Self {
        match hour {
            5..=11 => Chronotype::Morning,
            20..=23 | 0..=4 => Chronotype::Night,
            _ => Chronotype::Flexible,
        }
    }
}

/// Workout counts per weekday
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekdayHistogram {
    pub monday: u32,
    pub tuesday: u32,
    pub wednesday: u32,
    pub thursday: u32,
    pub friday: u32,
    pub saturday: u32,
    pub sunday: u32,
}

impl WeekdayHistogram {
    fn slot(&mut self, day: Weekday) -> &mut u32 {
        match day {
            Weekday::Mon => &mut self.monday,
            Weekday::Tue => &mut self.tuesday,
            Weekday::Wed => &mut self.wednesday,
            Weekday::Thu => &mut self.thursday,
            Weekday::Fri => &mut self.friday,
            Weekday::Sat => &mut self.saturday,
            Weekday::Sun => &mut self.sunday,
        }
    }

    pub fn increment(&mut self, day: Weekday) {
        *self.slot(day) += 1;
    }

    /// Counts in Monday→Sunday order
    pub fn counts(&self) -> [u32; 7] {
        [
            self.monday,
            self.tuesday,
            self.wednesday,
            self.thursday,
            self.friday,
            self.saturday,
            self.sunday,
        ]
    }

    /// Busiest weekday, first in Monday→Sunday order on ties
    pub fn peak(&self) -> Weekday {
        WEEKDAYS[peak_index(&self.counts())]
    }
}

/// When workouts happen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimePatterns {
    pub hourly: [u32; 24],
    pub weekdays: WeekdayHistogram,
    /// First busiest hour; 0 when no workout has a start time
    pub peak_hour: u32,
    /// First busiest weekday; Monday when no workout has a start time
    pub peak_weekday: String,
    pub morning_person: bool,
    pub night_owl: bool,
    pub chronotype: Chronotype,
}

impl TimePatterns {
    pub fn analyze(workouts: &[Workout]) -> Self {
        let mut hourly = [0u32; 24];
        let mut weekdays = WeekdayHistogram::default();
        let mut untimed = 0u64;

        for workout in workouts {
            match parse_timestamp(&workout.start_date) {
                Some(ts) => {
                    hourly[ts.hour() as usize] += 1;
                    weekdays.increment(ts.weekday());
                }
                None => untimed += 1,
            }
        }

        if untimed > 0 {
            tracing::debug!(untimed, "Workouts without a parseable start time skipped");
        }

        let peak_hour = peak_index(&hourly) as u32;
        let chronotype = Chronotype::from_peak_hour(peak_hour);

        Self {
            hourly,
            weekdays,
            peak_hour,
            peak_weekday: weekday_name(weekdays.peak()),
            morning_person: chronotype == Chronotype::Morning,
            night_owl: chronotype == Chronotype::Night,
            chronotype,
        }
    }
}

/// Index of the first maximum
///
/// An all-equal histogram, including an all-zero one, peaks at index 0.
pub fn peak_index(counts: &[u32]) -> usize {
    let mut best = 0;
    for (i, &count) in counts.iter().enumerate() {
        if count > counts[best] {
            best = i;
        }
    }
    best
}

/// Full English weekday name
pub fn weekday_name(day: Weekday) -> String {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn workout_at(start: &str) -> Workout {
        Workout::new("HKWorkoutActivityTypeRunning", start)
    }

    #[test]
    fn test_peak_index_ties_pick_first() {
        assert_eq!(peak_index(&[3, 3, 3, 3]), 0);
        assert_eq!(peak_index(&[0, 2, 5, 5]), 2);
        assert_eq!(peak_index(&[0, 0, 0]), 0);
    }

    #[test]
    fn test_all_equal_weekdays_pick_monday() {
        let mut hist = WeekdayHistogram::default();
        for day in WEEKDAYS {
            hist.increment(day);
        }
        assert_eq!(hist.peak(), Weekday::Mon);
    }

    #[test]
    fn test_chronotype_boundaries() {
        assert_eq!(Chronotype::from_peak_hour(5), Chronotype::Morning);
        assert_eq!(Chronotype::from_peak_hour(11), Chronotype::Morning);
        assert_eq!(Chronotype::from_peak_hour(12), Chronotype::Flexible);
        assert_eq!(Chronotype::from_peak_hour(19), Chronotype::Flexible);
        assert_eq!(Chronotype::from_peak_hour(20), Chronotype::Night);
        assert_eq!(Chronotype::from_peak_hour(0), Chronotype::Night);
        assert_eq!(Chronotype::from_peak_hour(4), Chronotype::Night);
    }

    #[test]
    fn test_analyze_workouts() {
        let workouts = vec![
            // 2025-11-23 is a Sunday
            workout_at("2025-11-23 19:05:00 -0500"),
            workout_at("2025-11-30 19:40:00 -0500"),
            workout_at("2025-11-24 07:00:00 -0500"),
            workout_at("not a date"),
        ];

        let patterns = TimePatterns::analyze(&workouts);
        assert_eq!(patterns.hourly[19], 2);
        assert_eq!(patterns.hourly[7], 1);
        assert_eq!(patterns.hourly.iter().sum::<u32>(), 3);
        assert_eq!(patterns.weekdays.sunday, 2);
        assert_eq!(patterns.weekdays.monday, 1);
        assert_eq!(patterns.peak_hour, 19);
        assert_eq!(patterns.peak_weekday, "Sunday");
        assert!(!patterns.morning_person);
        assert!(!patterns.night_owl);
        assert_eq!(patterns.chronotype, Chronotype::Flexible);
    }

    #[test]
    fn test_no_workouts() {
        let patterns = TimePatterns::analyze(&[]);
        assert_eq!(patterns.hourly, [0; 24]);
        assert_eq!(patterns.peak_hour, 0);
        assert_eq!(patterns.peak_weekday, "Monday");
        assert_eq!(patterns.chronotype, Chronotype::Night);
        assert!(patterns.night_owl);
        assert!(!patterns.morning_person);
    }

    #[test]
    fn test_night_owl() {
        let patterns = TimePatterns::analyze(&[workout_at("2025-01-01 23:30:00 +0000")]);
        assert!(patterns.night_owl);
        assert_eq!(patterns.chronotype, Chronotype::Night);
    }
}
