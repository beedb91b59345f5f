//! Command handlers.
//!
//! This module contains handlers for the generate and inspect commands.

pub mod generate;
pub mod inspect;

pub use generate::run_generate;
pub use inspect::{run_inspect, InspectReport};
