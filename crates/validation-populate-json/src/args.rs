//! CLI argument definitions for the validation generator.

use crate::writer::{StreamConfig, DEFAULT_BATCH_SIZE, DEFAULT_PROGRESS_INTERVAL};
use clap::{Args, ValueEnum};
use std::path::PathBuf;
use validation_generator::SamplingStrategy;

/// Sampling strategy as accepted on the command line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    /// Rush-hour and stop-popularity weighting
    #[default]
    #[value(name = "weighted")]
    Weighted,
    /// Every stop of the chosen trip equally likely
    #[value(name = "uniform")]
    Uniform,
}

impl From<StrategyArg> for SamplingStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Weighted => SamplingStrategy::Weighted,
            StrategyArg::Uniform => SamplingStrategy::Uniform,
        }
    }
}

/// Arguments for generating a validation document.
#[derive(Args, Clone, Debug)]
pub struct GenerateArgs {
    /// Path to the GTFS stop_times file (CSV with a header row)
    #[arg(long, short = 'i', env = "VALIDATION_STOP_TIMES")]
    pub stop_times: PathBuf,

    /// Output JSON file
    #[arg(
        long,
        short = 'o',
        default_value = "validations.json",
        env = "VALIDATION_OUTPUT"
    )]
    pub output: PathBuf,

    /// Number of generation attempts
    #[arg(long, default_value = "100000000", env = "VALIDATION_COUNT")]
    pub count: u64,

    /// Serialized validations buffered before each flush to disk
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE, env = "VALIDATION_BATCH_SIZE")]
    pub batch_size: usize,

    /// Validations between progress log lines
    #[arg(long, default_value_t = DEFAULT_PROGRESS_INTERVAL, env = "VALIDATION_PROGRESS_INTERVAL")]
    pub progress_interval: u64,

    /// Random seed for deterministic generation (same seed = same data)
    #[arg(long, env = "VALIDATION_SEED")]
    pub seed: Option<u64>,

    /// How a stop is chosen within the sampled trip
    #[arg(long, value_enum, default_value_t = StrategyArg::Weighted, env = "VALIDATION_STRATEGY")]
    pub strategy: StrategyArg,

    /// Add a `validation_date` field (YYYY-MM-DD) to every record
    #[arg(long, env = "VALIDATION_DATE")]
    pub validation_date: Option<String>,

    /// Parse the schedule and validate settings without writing output
    #[arg(long)]
    pub dry_run: bool,
}

impl GenerateArgs {
    pub fn stream_config(&self) -> StreamConfig {
        StreamConfig {
            batch_size: self.batch_size,
            progress_interval: self.progress_interval,
            validation_date: self.validation_date.clone(),
        }
    }

    pub fn sampling_strategy(&self) -> SamplingStrategy {
        self.strategy.into()
    }
}

/// Arguments for summarising a schedule without generating.
#[derive(Args, Clone, Debug)]
pub struct InspectArgs {
    /// Path to the GTFS stop_times file (CSV with a header row)
    #[arg(long, short = 'i', env = "VALIDATION_STOP_TIMES")]
    pub stop_times: PathBuf,

    /// Number of most visited stops to list
    #[arg(long, default_value = "10")]
    pub top: usize,
}
