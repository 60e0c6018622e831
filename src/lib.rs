//! # Health Wrapped
//!
//! Year-in-review summaries from Apple Health exports.
//!
//! The export is streamed once; only elements dated in the target year are
//! retained, and everything in the summary is derived from that subset.
//!
//! ## Modules
//!
//! - [`health`]: Typed export records and value coercion
//! - [`ingest`]: Streaming XML/ZIP reader and year accumulator
//! - [`analysis`]: Statistics, rollups, streaks, records, patterns and insights
//! - [`summary`]: The JSON summary document and its writers
//! - [`config`]: TOML configuration with environment overrides
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use health_wrapped::{ingest_path, write_summary, Config, Summary, YearAccumulator};
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!
//!     // Stream the export, keeping only the target year
//!     let accumulator = YearAccumulator::new(config.wrapped.target_year.clone());
//!     let dataset = ingest_path(Path::new("export.zip"), accumulator)?;
//!
//!     let summary = Summary::build(&dataset, &config);
//!     println!("{} workouts in {}", summary.year.workouts, summary.target_year);
//!
//!     write_summary(Path::new("summary.json"), &summary)?;
//!     Ok(())
//! }
//! ```

pub mod analysis;
pub mod config;
pub mod health;
pub mod ingest;
pub mod summary;

// Re-export top-level types for convenience
pub use health::{ActivitySummary, MeasurementRecord, NumericField, Workout};

pub use ingest::{
    ingest_path, ingest_reader, ExportTotals, IngestError, IngestResult, YearAccumulator,
    YearDataset,
};

pub use analysis::{
    MetricStats, PersonalRecords, Stats, StreakStats, TemporalRollups, TimePatterns,
    WrappedInsights,
};

pub use summary::{
    write_daily_csv, write_summary, OutputError, OutputResult, Summary, YearSummary,
};

pub use config::{Config, ConfigError, InsightsConfig, LoggingConfig, WrappedConfig};
