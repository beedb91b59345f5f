//! JSON populator for synthetic fare validations.
//!
//! This crate streams validation events into a single JSON array document
//! without ever holding more than one batch of serialized elements in
//! memory, so the requested count can run into the hundreds of millions.
//!
//! # Example
//!
//! ```ignore
//! use transit_schedule::ScheduleIndex;
//! use validation_populate_json::JsonPopulator;
//!
//! let index = ScheduleIndex::from_path("stop_times.txt")?;
//! let mut populator = JsonPopulator::new(&index, Some(42));
//!
//! let metrics = populator.populate("validations.json", 1_000_000)?;
//! println!("Generated {} rows in {:?}", metrics.rows_written, metrics.total_duration);
//! ```

pub mod args;
pub mod error;
pub mod populator;
pub mod writer;

pub use args::{GenerateArgs, InspectArgs, StrategyArg};
pub use error::JsonPopulatorError;
pub use populator::{JsonPopulator, PopulateMetrics};
pub use writer::{StreamConfig, StreamSummary, StreamWriter, DEFAULT_BATCH_SIZE};
