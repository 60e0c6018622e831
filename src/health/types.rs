//! Typed records retained from an Apple Health export
//!
//! The export describes everything as open attribute bags. Only the
//! attributes the summary needs survive into these types; the rest are
//! dropped when the record is built.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Prefix carried by quantity type identifiers (steps, heart rate, ...)
pub const QUANTITY_TYPE_PREFIX: &str = "HKQuantityTypeIdentifier";
/// Prefix carried by category type identifiers (sleep, mindfulness, ...)
pub const CATEGORY_TYPE_PREFIX: &str = "HKCategoryTypeIdentifier";
/// Prefix carried by workout activity types
pub const WORKOUT_TYPE_PREFIX: &str = "HKWorkoutActivityType";

/// Well-known record type identifiers
pub mod identifiers {
    pub const STEP_COUNT: &str = "HKQuantityTypeIdentifierStepCount";
    pub const DISTANCE_WALKING_RUNNING: &str = "HKQuantityTypeIdentifierDistanceWalkingRunning";
    pub const ACTIVE_ENERGY_BURNED: &str = "HKQuantityTypeIdentifierActiveEnergyBurned";
    pub const HEART_RATE: &str = "HKQuantityTypeIdentifierHeartRate";
    pub const RESTING_HEART_RATE: &str = "HKQuantityTypeIdentifierRestingHeartRate";
    pub const VO2_MAX: &str = "HKQuantityTypeIdentifierVO2Max";
    pub const FLIGHTS_CLIMBED: &str = "HKQuantityTypeIdentifierFlightsClimbed";
    pub const SLEEP_ANALYSIS: &str = "HKCategoryTypeIdentifierSleepAnalysis";
}

/// Element kinds the accumulator understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    /// `<ExportDate value="..."/>`
    ExportDate,
    /// `<Record .../>`
    Record,
    /// `<Workout ...>`
    Workout,
    /// `<ActivitySummary .../>`
    ActivitySummary,
}

impl ElementKind {
    /// Map an element's local name to a tracked kind
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "ExportDate" => Some(ElementKind::ExportDate),
            "Record" => Some(ElementKind::Record),
            "Workout" => Some(ElementKind::Workout),
            "ActivitySummary" => Some(ElementKind::ActivitySummary),
            _ => None,
        }
    }
}

/// An opened element with its attributes, valid for one reader event
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
}

impl RawElement {
    /// Look up an attribute by name
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Owned copy of an attribute, `None` when absent
    fn owned(&self, key: &str) -> Option<String> {
        self.attr(key).map(str::to_string)
    }

    /// Reset for reuse by the reader
    pub(crate) fn clear(&mut self) {
        self.name.clear();
        self.attributes.clear();
    }
}

/// A single measurement (`<Record>`) from the target year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementRecord {
    /// Full type identifier, e.g. `HKQuantityTypeIdentifierStepCount`
    pub record_type: String,
    pub start_date: String,
    /// Raw numeric string; category records carry non-numeric values here
    pub value: Option<String>,
    pub unit: Option<String>,
}

impl MeasurementRecord {
    pub fn from_element(element: &RawElement) -> Self {
        Self {
            record_type: element.owned("type").unwrap_or_default(),
            start_date: element.owned("startDate").unwrap_or_default(),
            value: element.owned("value"),
            unit: element.owned("unit"),
        }
    }

    /// Builder used by tests and benches
    pub fn new(record_type: impl Into<String>, start_date: impl Into<String>) -> Self {
        Self {
            record_type: record_type.into(),
            start_date: start_date.into(),
            value: None,
            unit: None,
        }
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }
}

/// A workout session from the target year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workout {
    /// Full activity type, e.g. `HKWorkoutActivityTypeRunning`
    pub activity_type: String,
    pub start_date: String,
    /// Duration in minutes
    pub duration: Option<String>,
    pub total_distance: Option<String>,
    pub total_energy_burned: Option<String>,
}

impl Workout {
    pub fn from_element(element: &RawElement) -> Self {
        Self {
            activity_type: element.owned("workoutActivityType").unwrap_or_default(),
            start_date: element.owned("startDate").unwrap_or_default(),
            duration: element.owned("duration"),
            total_distance: element.owned("totalDistance"),
            total_energy_burned: element.owned("totalEnergyBurned"),
        }
    }

    pub fn new(activity_type: impl Into<String>, start_date: impl Into<String>) -> Self {
        Self {
            activity_type: activity_type.into(),
            start_date: start_date.into(),
            duration: None,
            total_distance: None,
            total_energy_burned: None,
        }
    }

    pub fn duration(mut self, minutes: impl Into<String>) -> Self {
        self.duration = Some(minutes.into());
        self
    }

    pub fn distance(mut self, distance: impl Into<String>) -> Self {
        self.total_distance = Some(distance.into());
        self
    }

    pub fn energy(mut self, energy: impl Into<String>) -> Self {
        self.total_energy_burned = Some(energy.into());
        self
    }
}

/// A daily ring summary; counted, attributes passed through untouched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivitySummary {
    pub date_components: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

impl ActivitySummary {
    pub fn from_element(element: &RawElement) -> Self {
        let attributes = element
            .attributes
            .iter()
            .filter(|(k, _)| k != "dateComponents")
            .cloned()
            .collect();

        Self {
            date_components: element.owned("dateComponents").unwrap_or_default(),
            attributes,
        }
    }
}

/// Strip the vendor namespace from a type identifier for display
///
/// Matching always uses the full identifier; this is for output keys only.
pub fn display_type(identifier: &str) -> &str {
    identifier
        .strip_prefix(QUANTITY_TYPE_PREFIX)
        .or_else(|| identifier.strip_prefix(CATEGORY_TYPE_PREFIX))
        .or_else(|| identifier.strip_prefix(WORKOUT_TYPE_PREFIX))
        .unwrap_or(identifier)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(name: &str, attrs: &[(&str, &str)]) -> RawElement {
        RawElement {
            name: name.to_string(),
            attributes: attrs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    #[test]
    fn test_display_type() {
        assert_eq!(display_type(identifiers::STEP_COUNT), "StepCount");
        assert_eq!(display_type(identifiers::SLEEP_ANALYSIS), "SleepAnalysis");
        assert_eq!(display_type("HKWorkoutActivityTypeRunning"), "Running");
        assert_eq!(display_type("CustomThing"), "CustomThing");
    }

    #[test]
    fn test_element_kind() {
        assert_eq!(ElementKind::from_name("Record"), Some(ElementKind::Record));
        assert_eq!(ElementKind::from_name("Workout"), Some(ElementKind::Workout));
        assert_eq!(ElementKind::from_name("MetadataEntry"), None);
    }

    #[test]
    fn test_record_from_element_drops_unknown_attributes() {
        let el = element(
            "Record",
            &[
                ("type", identifiers::STEP_COUNT),
                ("sourceName", "Watch"),
                ("unit", "count"),
                ("startDate", "2025-01-02 08:00:00 +0000"),
                ("value", "120"),
            ],
        );

        let record = MeasurementRecord::from_element(&el);
        assert_eq!(record.record_type, identifiers::STEP_COUNT);
        assert_eq!(record.value.as_deref(), Some("120"));
        assert_eq!(record.unit.as_deref(), Some("count"));
    }

    #[test]
    fn test_activity_summary_passes_attributes_through() {
        let el = element(
            "ActivitySummary",
            &[("dateComponents", "2025-03-01"), ("activeEnergyBurned", "512")],
        );

        let summary = ActivitySummary::from_element(&el);
        assert_eq!(summary.date_components, "2025-03-01");
        assert_eq!(summary.attributes.get("activeEnergyBurned").unwrap(), "512");
        assert!(!summary.attributes.contains_key("dateComponents"));
    }
}
