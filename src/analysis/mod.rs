//! Year analysis
//!
//! Derived statistics over a [`YearDataset`](crate::ingest::YearDataset).
//! Every stage is a pure function of the retained records:
//!
//! - **stats**: Per-type count/total/average/min/max and workout totals
//! - **rollup**: Day and month rollups, top-day leaderboards
//! - **streaks**: Longest and current runs of active days
//! - **records**: Personal bests and first/last workout
//! - **patterns**: Hour-of-day and weekday histograms, chronotype
//! - **insights**: Personality, best month, comparisons and tiers
//!
//! ```text
//! YearDataset ─┬─ stats ───────────────────────────┐
//!              └─ rollup ─┬─ streaks               ├─ insights
//!                         ├─ records               │
//!                         └─ patterns ─────────────┘
//! ```

pub mod insights;
pub mod patterns;
pub mod records;
pub mod rollup;
pub mod stats;
pub mod streaks;

pub use insights::{
    ActivityLevel, BestMonth, DistanceComparison, PersonalityInsight, TimePersonality,
    WrappedInsights,
};
pub use patterns::{Chronotype, TimePatterns, WeekdayHistogram};
pub use records::{DatedValue, PersonalRecords, WorkoutHighlight};
pub use rollup::{DayMetric, DayRollup, MonthRollup, TemporalRollups, TopDays};
pub use stats::{compute_stats, workout_stats, MetricStats, Stats, WorkoutStats};
pub use streaks::{calculate_streaks, StreakStats};
