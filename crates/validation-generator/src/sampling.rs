//! Schedule-aware event sampling.

use rand::Rng;
use std::fmt;
use std::ops::Range;
use transit_schedule::{format_clock_time, ScheduleIndex, StopVisit, ValidationEvent};

/// Weight multiplier for visits inside a rush-hour window.
pub const PEAK_MULTIPLIER: f64 = 5.0;

/// Weight multiplier for every other visit.
pub const OFF_PEAK_MULTIPLIER: f64 = 1.0;

/// Rush-hour windows in seconds since midnight: 07:00-09:30 and 16:30-19:00.
const PEAK_WINDOWS: [Range<u32>; 2] = [25_200..34_200, 59_400..68_400];

/// Whether `time` (seconds since midnight) falls in a rush-hour window.
///
/// Windows are half-open and are not repeated after midnight, so `31:00:00`
/// is off-peak.
pub fn is_peak_hour(time: u32) -> bool {
    PEAK_WINDOWS.iter().any(|window| window.contains(&time))
}

pub fn peak_multiplier(time: u32) -> f64 {
    if is_peak_hour(time) {
        PEAK_MULTIPLIER
    } else {
        OFF_PEAK_MULTIPLIER
    }
}

/// Pick an index with probability proportional to its weight.
///
/// Draws `r` in `[0, total)` and returns the first index whose running sum
/// strictly exceeds `r`. If rounding leaves no such index, the last index is
/// returned. Returns `None` only for an empty slice.
pub fn weighted_random_index<R: Rng>(weights: &[f64], rng: &mut R) -> Option<usize> {
    let last = weights.len().checked_sub(1)?;
    let total: f64 = weights.iter().sum();
    let r = rng.gen::<f64>() * total;

    let mut sum = 0.0;
    for (i, weight) in weights.iter().enumerate() {
        sum += weight;
        if r < sum {
            return Some(i);
        }
    }
    Some(last)
}

/// How a visit is chosen once a trip has been picked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SamplingStrategy {
    /// Weight visits by rush hour and stop popularity.
    #[default]
    Weighted,
    /// Every visit of the trip is equally likely.
    Uniform,
}

impl SamplingStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SamplingStrategy::Weighted => "weighted",
            SamplingStrategy::Uniform => "uniform",
        }
    }
}

impl fmt::Display for SamplingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Turns a schedule index and a random source into validation events.
///
/// The engine keeps no state between calls; all randomness comes from the
/// RNG passed to [`SamplingEngine::generate_one`].
#[derive(Debug, Clone, Copy)]
pub struct SamplingEngine<'a> {
    index: &'a ScheduleIndex,
    strategy: SamplingStrategy,
}

impl<'a> SamplingEngine<'a> {
    pub fn new(index: &'a ScheduleIndex, strategy: SamplingStrategy) -> Self {
        Self { index, strategy }
    }

    pub fn index(&self) -> &'a ScheduleIndex {
        self.index
    }

    pub fn strategy(&self) -> SamplingStrategy {
        self.strategy
    }

    /// Selection weight of a visit under [`SamplingStrategy::Weighted`].
    pub fn visit_weight(&self, visit: &StopVisit) -> f64 {
        let frequency = self.index.frequency(&visit.stop_id).max(1);
        peak_multiplier(visit.time) * frequency as f64
    }

    /// Produce one event, or `None` when the index has no trips.
    pub fn generate_one<R: Rng>(&self, rng: &mut R) -> Option<ValidationEvent> {
        if self.index.is_empty() {
            return None;
        }

        let position = rng.gen_range(0..self.index.trip_count());
        let (trip_id, visits) = self.index.trip_at(position)?;
        if visits.is_empty() {
            return None;
        }

        let visit = match self.strategy {
            SamplingStrategy::Weighted => {
                let weights: Vec<f64> = visits.iter().map(|v| self.visit_weight(v)).collect();
                &visits[weighted_random_index(&weights, rng)?]
            }
            SamplingStrategy::Uniform => &visits[rng.gen_range(0..visits.len())],
        };

        Some(ValidationEvent::new(
            trip_id.clone(),
            visit.stop_id.clone(),
            format_clock_time(visit.time),
        ))
    }
}
