//! Apple Health data model
//!
//! - **types**: Typed records retained from the export (records, workouts, summaries)
//! - **values**: Numeric and date parsing for raw attribute strings

pub mod types;
pub mod values;

pub use types::{
    display_type, identifiers, ActivitySummary, ElementKind, MeasurementRecord, RawElement,
    Workout,
};
pub use values::{
    day_key, in_year, month_of, parse_day, parse_numeric, parse_timestamp, NumericField,
};
