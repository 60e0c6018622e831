//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::analysis::streaks::DEFAULT_ACTIVE_DAY_STEPS;
use crate::ingest::DEFAULT_PROGRESS_INTERVAL;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub wrapped: WrappedConfig,

    #[serde(default)]
    pub insights: InsightsConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Pipeline configuration
#[derive(Debug, Clone, Deserialize)]
pub struct WrappedConfig {
    /// Four-digit year whose data is retained
    #[serde(default = "default_target_year")]
    pub target_year: String,

    /// Steps above which a day counts as active
    #[serde(default = "default_active_day_steps")]
    pub active_day_step_threshold: f64,

    /// Size of each top-days leaderboard
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// Elements between progress reports (0 disables)
    #[serde(default = "default_progress_interval")]
    pub progress_interval: u64,
}

fn default_target_year() -> String {
    "2025".to_string()
}

fn default_active_day_steps() -> f64 {
    DEFAULT_ACTIVE_DAY_STEPS
}

fn default_top_n() -> usize {
    5
}

fn default_progress_interval() -> u64 {
    DEFAULT_PROGRESS_INTERVAL
}

impl Default for WrappedConfig {
    fn default() -> Self {
        Self {
            target_year: default_target_year(),
            active_day_step_threshold: default_active_day_steps(),
            top_n: default_top_n(),
            progress_interval: default_progress_interval(),
        }
    }
}

/// A personality assigned to a favourite workout type
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PersonalityRule {
    /// Full activity type identifier, e.g. `HKWorkoutActivityTypeRunning`
    pub workout_type: String,
    pub label: String,
    #[serde(default)]
    pub description: String,
}

/// Personality used when no rule matches
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Personality {
    pub label: String,
    #[serde(default)]
    pub description: String,
}

/// One rung of an ascending threshold ladder
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LadderRung {
    pub threshold: f64,
    pub label: String,
}

impl LadderRung {
    fn new(threshold: f64, label: &str) -> Self {
        Self {
            threshold,
            label: label.to_string(),
        }
    }
}

/// Lookup tables and ladders behind the wrapped insights
#[derive(Debug, Clone, Deserialize)]
pub struct InsightsConfig {
    #[serde(default = "default_personalities")]
    pub personalities: Vec<PersonalityRule>,

    #[serde(default = "default_personality")]
    pub default_personality: Personality,

    /// Total distance (km) → comparison
    #[serde(default = "default_distance_comparisons")]
    pub distance_comparisons: Vec<LadderRung>,

    /// Average daily steps → activity level
    #[serde(default = "default_activity_levels")]
    pub activity_levels: Vec<LadderRung>,
}

fn default_personalities() -> Vec<PersonalityRule> {
    [
        ("HKWorkoutActivityTypeRunning", "Cardio King", "Running is your thing."),
        ("HKWorkoutActivityTypeWalking", "Urban Explorer", "Every street is a new adventure."),
        ("HKWorkoutActivityTypeCycling", "Road Warrior", "Two wheels, endless miles."),
        ("HKWorkoutActivityTypeSwimming", "Water Spirit", "You feel at home in the pool."),
        ("HKWorkoutActivityTypeHiking", "Trail Blazer", "The mountains keep calling."),
        ("HKWorkoutActivityTypeYoga", "Zen Master", "Balance is your superpower."),
        (
            "HKWorkoutActivityTypeTraditionalStrengthTraining",
            "Iron Lifter",
            "Gravity never stood a chance.",
        ),
        (
            "HKWorkoutActivityTypeFunctionalStrengthTraining",
            "Iron Lifter",
            "Gravity never stood a chance.",
        ),
        (
            "HKWorkoutActivityTypeHighIntensityIntervalTraining",
            "HIIT Machine",
            "Short, sharp and relentless.",
        ),
        ("HKWorkoutActivityTypeDance", "Dance Floor Legend", "You move to your own beat."),
    ]
    .into_iter()
    .map(|(workout_type, label, description)| PersonalityRule {
        workout_type: workout_type.to_string(),
        label: label.to_string(),
        description: description.to_string(),
    })
    .collect()
}

fn default_personality() -> Personality {
    Personality {
        label: "All-Rounder".to_string(),
        description: "You keep your body guessing.".to_string(),
    }
}

fn default_distance_comparisons() -> Vec<LadderRung> {
    vec![
        LadderRung::new(0.0, "A stroll around the block"),
        LadderRung::new(42.195, "A full marathon"),
        LadderRung::new(100.0, "An ultramarathon"),
        LadderRung::new(460.0, "London to Paris"),
        LadderRung::new(1400.0, "Land's End to John o' Groats"),
        LadderRung::new(1800.0, "Singapore to Manila"),
        LadderRung::new(3900.0, "New York to Los Angeles"),
        LadderRung::new(40075.0, "Around the Earth"),
    ]
}

fn default_activity_levels() -> Vec<LadderRung> {
    vec![
        LadderRung::new(0.0, "Sedentary"),
        LadderRung::new(5000.0, "Lightly Active"),
        LadderRung::new(7500.0, "Moderately Active"),
        LadderRung::new(10000.0, "Active"),
        LadderRung::new(12500.0, "Highly Active"),
    ]
}

impl Default for InsightsConfig {
    fn default() -> Self {
        Self {
            personalities: default_personalities(),
            default_personality: default_personality(),
            distance_comparisons: default_distance_comparisons(),
            activity_levels: default_activity_levels(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|e| match e {
            ConfigError::Parse { error, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                error,
            },
            other => other,
        })
    }

    /// Parse and validate TOML content
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: PathBuf::new(),
            error: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load from default locations or environment
    ///
    /// A config file that exists but fails to load is an error; defaults
    /// only apply when no file is present.
    pub fn load_default() -> Result<Self, ConfigError> {
        let config_paths: Vec<PathBuf> = [
            dirs::config_dir().map(|p| p.join("health-wrapped").join("config.toml")),
            Some(PathBuf::from("./health-wrapped.toml")),
        ]
        .into_iter()
        .flatten()
        .collect();

        Self::load_first(&config_paths)
    }

    /// Load the first existing file among `paths`, or fall back to defaults
    fn load_first(paths: &[PathBuf]) -> Result<Self, ConfigError> {
        match paths.iter().find(|path| path.exists()) {
            Some(path) => {
                let config = Self::load_with_env(path)?;
                tracing::info!("Loaded config from {:?}", path);
                Ok(config)
            }
            None => {
                tracing::debug!("Using default config with environment overrides");
                Ok(Self::from_env())
            }
        }
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        if let Ok(year) = std::env::var("HEALTH_WRAPPED_TARGET_YEAR") {
            self.wrapped.target_year = year;
        }

        if let Ok(level) = std::env::var("HEALTH_WRAPPED_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("HEALTH_WRAPPED_LOG_FORMAT") {
            self.logging.format = format;
        }
    }

    /// Check values the pipeline relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_year(&self.wrapped.target_year)?;

        if self.wrapped.top_n == 0 {
            return Err(ConfigError::Invalid("wrapped.top_n must be at least 1".to_string()));
        }
        if !self.wrapped.active_day_step_threshold.is_finite() {
            return Err(ConfigError::Invalid(
                "wrapped.active_day_step_threshold must be a finite number".to_string(),
            ));
        }

        validate_ladder("insights.distance_comparisons", &self.insights.distance_comparisons)?;
        validate_ladder("insights.activity_levels", &self.insights.activity_levels)?;
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            wrapped: WrappedConfig::default(),
            insights: InsightsConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Target years are matched as a four-character prefix
pub fn validate_year(year: &str) -> Result<(), ConfigError> {
    if year.len() == 4 && year.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!(
            "target year must be four digits, got {:?}",
            year
        )))
    }
}

fn validate_ladder(name: &str, ladder: &[LadderRung]) -> Result<(), ConfigError> {
    if ladder.is_empty() {
        return Err(ConfigError::Invalid(format!("{} must not be empty", name)));
    }
    if ladder.windows(2).any(|w| w[1].threshold <= w[0].threshold) {
        return Err(ConfigError::Invalid(format!(
            "{} thresholds must be strictly ascending",
            name
        )));
    }
    Ok(())
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Health Wrapped Configuration
#
# Environment variables override these settings:
# - HEALTH_WRAPPED_TARGET_YEAR
# - HEALTH_WRAPPED_LOG_LEVEL
# - HEALTH_WRAPPED_LOG_FORMAT

[wrapped]
# Year whose records are kept (matched against the first four characters of each date)
target_year = "2025"

# Steps above which a day counts toward a streak (days with a workout always count)
active_day_step_threshold = 3000.0

# Entries per top-days leaderboard
top_n = 5

# Elements between progress reports (0 disables)
progress_interval = 100000

[insights]
# Used when the favourite workout type has no personality below
default_personality = { label = "All-Rounder", description = "You keep your body guessing." }

# Favourite workout type → personality (full activity type identifiers)
[[insights.personalities]]
workout_type = "HKWorkoutActivityTypeRunning"
label = "Cardio King"
description = "Running is your thing."

[[insights.personalities]]
workout_type = "HKWorkoutActivityTypeWalking"
label = "Urban Explorer"
description = "Every street is a new adventure."

[[insights.personalities]]
workout_type = "HKWorkoutActivityTypeCycling"
label = "Road Warrior"
description = "Two wheels, endless miles."

[[insights.personalities]]
workout_type = "HKWorkoutActivityTypeSwimming"
label = "Water Spirit"
description = "You feel at home in the pool."

# Total walking/running distance (km), highest threshold reached wins
[[insights.distance_comparisons]]
threshold = 0.0
label = "A stroll around the block"

[[insights.distance_comparisons]]
threshold = 42.195
label = "A full marathon"

[[insights.distance_comparisons]]
threshold = 460.0
label = "London to Paris"

[[insights.distance_comparisons]]
threshold = 1800.0
label = "Singapore to Manila"

[[insights.distance_comparisons]]
threshold = 3900.0
label = "New York to Los Angeles"

# Average daily steps (total steps / 365)
[[insights.activity_levels]]
threshold = 0.0
label = "Sedentary"

[[insights.activity_levels]]
threshold = 5000.0
label = "Lightly Active"

[[insights.activity_levels]]
threshold = 7500.0
label = "Moderately Active"

[[insights.activity_levels]]
threshold = 10000.0
label = "Active"

[[insights.activity_levels]]
threshold = 12500.0
label = "Highly Active"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
