//! Synthetic fare-validation sampler.
//!
//! This crate provides the [`SamplingEngine`], a stateless mapping from a
//! [`transit_schedule::ScheduleIndex`] plus a random source to one plausible
//! [`transit_schedule::ValidationEvent`], and the [`ValidationGenerator`],
//! which owns a seeded RNG so repeated runs reproduce the same events.
//!
//! # Architecture
//!
//! ```text
//! ScheduleIndex (read-only)
//!        │
//!        ▼
//! ┌──────────────────────┐
//! │ ValidationGenerator  │
//! │                      │
//! │  - engine            │──▶ SamplingEngine::generate_one(rng)
//! │  - rng (StdRng)      │
//! │  - attempts          │
//! └──────────┬───────────┘
//!            │
//!            ▼
//!   Option<ValidationEvent> per attempt
//! ```
//!
//! # Weighting
//!
//! With [`SamplingStrategy::Weighted`] a trip is picked uniformly, then one
//! of its visits is picked with weight `peak_multiplier(time) * max(freq, 1)`
//! where the multiplier is `5.0` in the rush-hour windows `[07:00, 09:30)`
//! and `[16:30, 19:00)` and `1.0` otherwise.
//!
//! # Example
//!
//! ```rust
//! use transit_schedule::ScheduleIndex;
//! use validation_generator::ValidationGenerator;
//!
//! let csv = "trip_id,arrival_time,stop_id\nT1,08:00:00,A\nT1,08:10:00,B\n";
//! let index = ScheduleIndex::from_reader(csv.as_bytes()).unwrap();
//!
//! let mut generator = ValidationGenerator::new(&index, 42);
//! let event = generator.next_event().unwrap();
//! assert_eq!(event.trip_id.as_ref(), "T1");
//! ```

pub mod generator;
pub mod sampling;

// Re-exports for convenience
pub use generator::{ValidationEventIterator, ValidationGenerator};
pub use sampling::{
    is_peak_hour, peak_multiplier, weighted_random_index, SamplingEngine, SamplingStrategy,
    OFF_PEAK_MULTIPLIER, PEAK_MULTIPLIER,
};
