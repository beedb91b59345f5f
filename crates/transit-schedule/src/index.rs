//! In-memory schedule index built from a `stop_times` table.
//!
//! The index is built once per run and is read-only afterwards. Trip ids are
//! kept in first-seen order in a plain `Vec` so random selection indexes a
//! stable list instead of iterating a hash map.

use crate::clock::parse_clock_time;
use crate::error::ScheduleError;
use crate::types::StopVisit;
use csv::ByteRecord;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

const TRIP_ID_COLUMN: &str = "trip_id";
const ARRIVAL_TIME_COLUMN: &str = "arrival_time";
const STOP_ID_COLUMN: &str = "stop_id";

/// Positions of the required columns within a schedule row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLayout {
    pub trip_id: usize,
    pub arrival_time: usize,
    pub stop_id: usize,
}

impl ColumnLayout {
    /// Locate the required columns in a header row.
    ///
    /// Names are matched case-insensitively after trimming; extra columns and
    /// column order are irrelevant. When a name repeats, the last one wins.
    pub fn resolve<'a, I>(headers: I) -> Result<Self, ScheduleError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut trip_id = None;
        let mut arrival_time = None;
        let mut stop_id = None;

        for (position, name) in headers.into_iter().enumerate() {
            // A UTF-8 byte order mark can survive on the first header cell.
            let name = name.trim_start_matches('\u{feff}').trim();
            if name.eq_ignore_ascii_case(TRIP_ID_COLUMN) {
                trip_id = Some(position);
            } else if name.eq_ignore_ascii_case(ARRIVAL_TIME_COLUMN) {
                arrival_time = Some(position);
            } else if name.eq_ignore_ascii_case(STOP_ID_COLUMN) {
                stop_id = Some(position);
            }
        }

        Ok(Self {
            trip_id: trip_id.ok_or(ScheduleError::MissingColumn {
                column: TRIP_ID_COLUMN,
            })?,
            arrival_time: arrival_time.ok_or(ScheduleError::MissingColumn {
                column: ARRIVAL_TIME_COLUMN,
            })?,
            stop_id: stop_id.ok_or(ScheduleError::MissingColumn {
                column: STOP_ID_COLUMN,
            })?,
        })
    }
}

/// Summary counters for a built index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScheduleStats {
    /// Trips with at least one accepted visit.
    pub trips: usize,
    /// Distinct stop ids across all accepted visits.
    pub stops: usize,
    /// Accepted (trip, visit) rows.
    pub visits: u64,
    /// Rows dropped because they were too short or had an empty required field.
    pub skipped_rows: u64,
}

/// Accumulates rows into a [`ScheduleIndex`].
#[derive(Debug)]
pub struct ScheduleIndexBuilder {
    layout: ColumnLayout,
    trips: Vec<(Arc<str>, Vec<StopVisit>)>,
    trip_positions: HashMap<Arc<str>, usize>,
    stop_frequency: HashMap<Arc<str>, u64>,
    visits: u64,
    skipped_rows: u64,
}

impl ScheduleIndexBuilder {
    pub fn new(layout: ColumnLayout) -> Self {
        Self {
            layout,
            trips: Vec::new(),
            trip_positions: HashMap::new(),
            stop_frequency: HashMap::new(),
            visits: 0,
            skipped_rows: 0,
        }
    }

    /// Add one CSV record. Returns `false` if the row was dropped.
    ///
    /// Rows are taken as raw bytes; a required field that is not valid UTF-8
    /// drops the row like a missing or empty field would.
    pub fn push_record(&mut self, record: &ByteRecord) -> bool {
        let field = move |position: usize| {
            record
                .get(position)
                .and_then(|raw| std::str::from_utf8(raw).ok())
                .map(str::trim)
                .filter(|value| !value.is_empty())
        };

        let (Some(trip_id), Some(arrival_time), Some(stop_id)) = (
            field(self.layout.trip_id),
            field(self.layout.arrival_time),
            field(self.layout.stop_id),
        ) else {
            self.skipped_rows += 1;
            return false;
        };

        let stop_id = self.intern_stop(stop_id);
        let visit = StopVisit::new(parse_clock_time(arrival_time), stop_id);

        match self.trip_positions.get(trip_id).copied() {
            Some(position) => self.trips[position].1.push(visit),
            None => {
                let trip_id: Arc<str> = Arc::from(trip_id);
                self.trip_positions.insert(trip_id.clone(), self.trips.len());
                self.trips.push((trip_id, vec![visit]));
            }
        }
        self.visits += 1;
        true
    }

    /// Count the visit against the stop and return the shared id.
    fn intern_stop(&mut self, stop_id: &str) -> Arc<str> {
        let shared = match self.stop_frequency.get_key_value(stop_id) {
            Some((shared, _)) => shared.clone(),
            None => Arc::from(stop_id),
        };
        *self.stop_frequency.entry(shared.clone()).or_insert(0) += 1;
        shared
    }

    pub fn build(self) -> ScheduleIndex {
        let stats = ScheduleStats {
            trips: self.trips.len(),
            stops: self.stop_frequency.len(),
            visits: self.visits,
            skipped_rows: self.skipped_rows,
        };
        ScheduleIndex {
            trips: self.trips,
            trip_positions: self.trip_positions,
            stop_frequency: self.stop_frequency,
            stats,
        }
    }
}

/// Trip schedules and stop visit frequencies.
#[derive(Debug, Clone)]
pub struct ScheduleIndex {
    /// Trips in first-seen order; each has at least one visit.
    trips: Vec<(Arc<str>, Vec<StopVisit>)>,
    trip_positions: HashMap<Arc<str>, usize>,
    stop_frequency: HashMap<Arc<str>, u64>,
    stats: ScheduleStats,
}

impl ScheduleIndex {
    /// Build an index from CSV data with a header row.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ScheduleError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let layout = ColumnLayout::resolve(csv_reader.headers()?.iter())?;
        let mut builder = ScheduleIndexBuilder::new(layout);

        let mut record = ByteRecord::new();
        while csv_reader.read_byte_record(&mut record)? {
            builder.push_record(&record);
        }

        let index = builder.build();
        info!(
            "Found {} trips and {} unique stops ({} visits, {} rows skipped)",
            index.stats.trips, index.stats.stops, index.stats.visits, index.stats.skipped_rows
        );
        Ok(index)
    }

    /// Build an index from a CSV file on disk.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ScheduleError> {
        let path = path.as_ref();
        info!("Parsing schedule from '{}'", path.display());
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }

    pub fn trip_count(&self) -> usize {
        self.trips.len()
    }

    pub fn stop_count(&self) -> usize {
        self.stop_frequency.len()
    }

    pub fn stats(&self) -> ScheduleStats {
        self.stats
    }

    /// Trip ids in the stable order used for random selection.
    pub fn trip_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.trips.iter().map(|(trip_id, _)| trip_id.as_ref())
    }

    /// Trip at `position` in [`Self::trip_ids`] order.
    pub fn trip_at(&self, position: usize) -> Option<(&Arc<str>, &[StopVisit])> {
        self.trips
            .get(position)
            .map(|(trip_id, visits)| (trip_id, visits.as_slice()))
    }

    /// Visits of a trip in source-row order.
    pub fn visits(&self, trip_id: &str) -> Option<&[StopVisit]> {
        self.trip_positions
            .get(trip_id)
            .map(|&position| self.trips[position].1.as_slice())
    }

    /// Number of accepted rows referencing `stop_id`; `0` for unknown stops.
    pub fn frequency(&self, stop_id: &str) -> u64 {
        self.stop_frequency.get(stop_id).copied().unwrap_or(0)
    }

    /// The `limit` most visited stops, highest count first, ties by stop id.
    pub fn most_frequent_stops(&self, limit: usize) -> Vec<(&str, u64)> {
        let mut stops: Vec<(&str, u64)> = self
            .stop_frequency
            .iter()
            .map(|(stop_id, count)| (stop_id.as_ref(), *count))
            .collect();
        stops.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        stops.truncate(limit);
        stops
    }
}
