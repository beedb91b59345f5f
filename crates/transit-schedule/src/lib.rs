//! Static schedule index for the validation-synth generator.
//!
//! This crate turns a GTFS-style `stop_times` table into an immutable,
//! in-memory index that the sampling crates read from:
//!
//! - [`ScheduleIndex`] - trip id → ordered stop visits, plus per-stop visit counts
//! - [`StopVisit`] - one scheduled stop on a trip
//! - [`ValidationEvent`] - one synthesized fare-tap record
//! - [`parse_clock_time`] / [`format_clock_time`] - `HH:MM:SS` ↔ seconds since midnight
//!
//! # Architecture
//!
//! ```text
//! transit-schedule (this crate)
//!    │
//!    ├─── validation-generator      (samples events from a ScheduleIndex)
//!    │
//!    └─── validation-populate-json  (streams sampled events to a JSON array)
//! ```
//!
//! # Example
//!
//! ```rust
//! use transit_schedule::ScheduleIndex;
//!
//! let csv = "trip_id,arrival_time,stop_id\nT1,08:00:00,A\nT1,08:10:00,B\n";
//! let index = ScheduleIndex::from_reader(csv.as_bytes()).unwrap();
//! assert_eq!(index.trip_count(), 1);
//! assert_eq!(index.frequency("A"), 1);
//! ```

pub mod clock;
pub mod error;
pub mod index;
pub mod types;

pub use clock::{format_clock_time, parse_clock_time};
pub use error::ScheduleError;
pub use index::{ColumnLayout, ScheduleIndex, ScheduleIndexBuilder, ScheduleStats};
pub use types::{StopVisit, ValidationEvent};
