//! validation-synth library
//!
//! Generates large volumes of synthetic fare-validation events from a static
//! GTFS schedule, for load tests and analytics pipelines.
//!
//! # Crates
//!
//! - `transit_schedule` - builds the immutable schedule index from `stop_times`
//! - `validation_generator` - weighted, rush-hour aware event sampling
//! - `validation_populate_json` - bounded-memory JSON array writer
//!
//! # CLI Usage
//!
//! ```bash
//! # Ten million validations, reproducible
//! validation-synth generate --stop-times stop_times.txt \
//!   --output validations.json --count 10000000 --seed 42
//!
//! # Schedule summary
//! validation-synth inspect --stop-times stop_times.txt --top 5
//! ```

pub mod commands;

// Re-export the pipeline crates for convenience
pub use transit_schedule as schedule;
pub use validation_generator as generator;
pub use validation_populate_json as populate;
