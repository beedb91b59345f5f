//! Inspect command runner.

use anyhow::Context;
use std::fmt;
use transit_schedule::{ScheduleIndex, ScheduleStats};
use validation_populate_json::InspectArgs;

/// Summary of a schedule source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InspectReport {
    pub stats: ScheduleStats,
    /// Most visited stops, highest count first.
    pub top_stops: Vec<(String, u64)>,
}

impl fmt::Display for InspectReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "trips:        {}", self.stats.trips)?;
        writeln!(f, "stops:        {}", self.stats.stops)?;
        writeln!(f, "visits:       {}", self.stats.visits)?;
        writeln!(f, "skipped rows: {}", self.stats.skipped_rows)?;
        if !self.top_stops.is_empty() {
            writeln!(f, "most visited stops:")?;
            for (stop_id, count) in &self.top_stops {
                writeln!(f, "  {stop_id:<20} {count}")?;
            }
        }
        Ok(())
    }
}

/// Build the schedule index and summarise it without generating anything.
pub fn run_inspect(args: &InspectArgs) -> anyhow::Result<InspectReport> {
    let index = ScheduleIndex::from_path(&args.stop_times).with_context(|| {
        format!(
            "Failed to build schedule index from {}",
            args.stop_times.display()
        )
    })?;

    Ok(InspectReport {
        stats: index.stats(),
        top_stops: index
            .most_frequent_stops(args.top)
            .into_iter()
            .map(|(stop_id, count)| (stop_id.to_string(), count))
            .collect(),
    })
}
