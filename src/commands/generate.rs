//! Generate command runner.

use anyhow::Context;
use transit_schedule::ScheduleIndex;
use validation_populate_json::{GenerateArgs, JsonPopulator, PopulateMetrics};

/// Build the schedule index and stream the requested validations to disk.
///
/// Returns `None` for a dry run, which stops after the index is built.
pub fn run_generate(args: &GenerateArgs) -> anyhow::Result<Option<PopulateMetrics>> {
    let stream_config = args.stream_config();
    stream_config
        .validate()
        .context("Invalid generation settings")?;

    let index = ScheduleIndex::from_path(&args.stop_times).with_context(|| {
        format!(
            "Failed to build schedule index from {}",
            args.stop_times.display()
        )
    })?;

    if args.dry_run {
        tracing::info!(
            "[DRY-RUN] Would generate {} validations into '{}' (strategy={}, seed={:?})",
            args.count,
            args.output.display(),
            args.sampling_strategy(),
            args.seed
        );
        tracing::info!(
            "[DRY-RUN] Schedule validated: {} trips, {} stops",
            index.trip_count(),
            index.stop_count()
        );
        return Ok(None);
    }

    let mut populator = JsonPopulator::new(&index, args.seed)
        .with_strategy(args.sampling_strategy())
        .with_stream_config(stream_config);

    let metrics = populator
        .populate(&args.output, args.count)
        .with_context(|| format!("Failed to write validations to {}", args.output.display()))?;

    if metrics.skipped_attempts > 0 {
        tracing::warn!(
            "{} of {} attempts produced no validation",
            metrics.skipped_attempts,
            metrics.attempts
        );
    }

    Ok(Some(metrics))
}
