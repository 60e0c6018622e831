//! Health Wrapped CLI
//!
//! Command-line interface for turning an Apple Health export into a
//! year-in-review summary:
//! - Summarize an `export.xml` or `export.zip`
//! - Generate a default config file

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use health_wrapped::analysis::TemporalRollups;
use health_wrapped::config::{self, Config, LoggingConfig};
use health_wrapped::ingest::{ingest_path, YearAccumulator};
use health_wrapped::summary::{write_daily_csv, write_summary_async, Summary};

#[derive(Parser)]
#[command(name = "health-wrapped")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Year-in-review summaries from Apple Health exports")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Summarize one year of an export
    Summarize {
        /// Path to export.xml or export.zip
        input: PathBuf,
        /// Output file
        #[arg(short, long, default_value = "summary.json")]
        output: PathBuf,
        /// Target year (overrides config)
        #[arg(short, long)]
        year: Option<String>,
        /// Config file (default: platform config dir, then ./health-wrapped.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Also write one CSV row per day of the target year
        #[arg(long)]
        daily_csv: Option<PathBuf>,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Summarize {
            input,
            output,
            year,
            config,
            daily_csv,
        } => {
            let mut config = match config {
                Some(path) => Config::load_with_env(&path)
                    .with_context(|| format!("loading config {}", path.display()))?,
                None => Config::load_default().context("loading default config")?,
            };
            if let Some(year) = year {
                config.wrapped.target_year = year;
            }
            config.validate().context("invalid configuration")?;

            init_logging(&config.logging);

            summarize(input, &output, daily_csv, config).await?;
        }

        Commands::Config { output } => {
            let config = config::generate_default_config();

            match output {
                Some(path) => {
                    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                        tokio::fs::create_dir_all(parent).await?;
                    }
                    tokio::fs::write(&path, &config).await?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{}", config);
                }
            }
        }
    }

    Ok(())
}

fn init_logging(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("health_wrapped={}", logging.level)));

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

async fn summarize(
    input: PathBuf,
    output: &Path,
    daily_csv: Option<PathBuf>,
    config: Config,
) -> anyhow::Result<()> {
    if !input.exists() {
        bail!("input file not found: {}", input.display());
    }

    tracing::info!("Health Wrapped v{}", env!("CARGO_PKG_VERSION"));

    let (summary, rollups) = tokio::task::spawn_blocking(move || -> anyhow::Result<_> {
        let accumulator = YearAccumulator::new(config.wrapped.target_year.clone())
            .with_progress_interval(config.wrapped.progress_interval);
        let dataset = ingest_path(&input, accumulator)
            .with_context(|| format!("reading {}", input.display()))?;

        let rollups = TemporalRollups::build(&dataset.records, &dataset.workouts);
        let summary = Summary::from_rollups(&dataset, &rollups, &config);
        Ok((summary, rollups))
    })
    .await
    .context("summary task failed")??;

    write_summary_async(output, &summary)
        .await
        .with_context(|| format!("writing {}", output.display()))?;

    // Only once the summary is in place
    if let Some(path) = daily_csv {
        tokio::task::spawn_blocking(move || {
            write_daily_csv(&path, &rollups).with_context(|| format!("writing {}", path.display()))
        })
        .await
        .context("daily CSV task failed")??;
    }

    println!(
        "{}: {} records, {} workouts in {} (of {} records in export) -> {}",
        summary.year_key(),
        summary.year.records,
        summary.year.workouts,
        summary.target_year,
        summary.total_records,
        output.display()
    );

    Ok(())
}
