//! JSON file populator for synthetic validations.

use crate::error::JsonPopulatorError;
use crate::writer::{StreamConfig, StreamWriter};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{info, warn};
use transit_schedule::ScheduleIndex;
use validation_generator::{SamplingStrategy, ValidationGenerator};

/// Default buffer size between the batch buffer and the output file.
pub const DEFAULT_BUFFER_SIZE: usize = 8192;

/// Metrics from a populate operation.
#[derive(Debug, Clone, Default)]
pub struct PopulateMetrics {
    /// Number of generation attempts requested.
    pub attempts: u64,
    /// Number of validations written.
    pub rows_written: u64,
    /// Attempts that produced no validation.
    pub skipped_attempts: u64,
    /// Number of batches flushed to the file.
    pub batch_count: u64,
    /// Total time taken.
    pub total_duration: Duration,
    /// Time spent generating data.
    pub generation_duration: Duration,
    /// Time spent writing data.
    pub write_duration: Duration,
    /// Output file size in bytes.
    pub file_size_bytes: u64,
}

impl PopulateMetrics {
    /// Calculate rows per second.
    pub fn rows_per_second(&self) -> f64 {
        if self.total_duration.as_secs_f64() > 0.0 {
            self.rows_written as f64 / self.total_duration.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Calculate bytes per second.
    pub fn bytes_per_second(&self) -> f64 {
        if self.total_duration.as_secs_f64() > 0.0 {
            self.file_size_bytes as f64 / self.total_duration.as_secs_f64()
        } else {
            0.0
        }
    }
}

/// Writes a JSON array of synthetic validations to a file.
pub struct JsonPopulator<'a> {
    index: &'a ScheduleIndex,
    generator: ValidationGenerator<'a>,
    config: StreamConfig,
}

impl<'a> JsonPopulator<'a> {
    /// Create a new JSON populator.
    ///
    /// # Arguments
    ///
    /// * `index` - Schedule index to sample from
    /// * `seed` - Random seed for deterministic generation; `None` seeds from OS entropy
    pub fn new(index: &'a ScheduleIndex, seed: Option<u64>) -> Self {
        let generator = match seed {
            Some(seed) => ValidationGenerator::new(index, seed),
            None => ValidationGenerator::from_entropy(index),
        };
        Self {
            index,
            generator,
            config: StreamConfig::default(),
        }
    }

    /// Set the visit selection strategy.
    pub fn with_strategy(mut self, strategy: SamplingStrategy) -> Self {
        self.generator = self.generator.with_strategy(strategy);
        self
    }

    /// Set batch size, progress cadence and the optional validation date.
    pub fn with_stream_config(mut self, config: StreamConfig) -> Self {
        self.config = config;
        self
    }

    pub fn stream_config(&self) -> &StreamConfig {
        &self.config
    }

    pub fn strategy(&self) -> SamplingStrategy {
        self.generator.strategy()
    }

    /// Generate the JSON document with `count` generation attempts.
    ///
    /// The configuration is validated before the output file is created. On a
    /// mid-stream failure the partially written file is left in place.
    pub fn populate<P: AsRef<Path>>(
        &mut self,
        output_path: P,
        count: u64,
    ) -> Result<PopulateMetrics, JsonPopulatorError> {
        let start_time = Instant::now();
        self.config.validate()?;

        let output_path = output_path.as_ref();
        info!(
            "Generating {} validations into '{}' from {} trips (strategy={}, batch_size={})",
            count,
            output_path.display(),
            self.index.trip_count(),
            self.generator.strategy(),
            self.config.batch_size
        );
        if self.index.is_empty() {
            warn!("Schedule index has no trips; the output will be an empty array");
        }

        let file = File::create(output_path)?;
        let writer = StreamWriter::new(
            BufWriter::with_capacity(DEFAULT_BUFFER_SIZE, file),
            self.config.clone(),
        )?;
        let summary = writer.write_attempts(self.generator.events(count))?;

        let metrics = PopulateMetrics {
            attempts: summary.attempts,
            rows_written: summary.written,
            skipped_attempts: summary.skipped,
            batch_count: summary.batches,
            total_duration: start_time.elapsed(),
            generation_duration: summary.generation_duration,
            write_duration: summary.write_duration,
            file_size_bytes: std::fs::metadata(output_path)?.len(),
        };

        info!(
            "Total validations generated: {} ({} bytes in {:?}, {:.2} rows/sec)",
            metrics.rows_written,
            metrics.file_size_bytes,
            metrics.total_duration,
            metrics.rows_per_second()
        );

        Ok(metrics)
    }
}
