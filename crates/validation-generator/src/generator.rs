//! Seeded generator producing a lazy stream of validation events.

use crate::sampling::{SamplingEngine, SamplingStrategy};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;
use transit_schedule::{ScheduleIndex, ValidationEvent};

/// Produces validation events from a schedule index.
///
/// With a fixed seed the generator yields the same events for the same
/// index, which keeps generated files reproducible across runs.
pub struct ValidationGenerator<'a> {
    engine: SamplingEngine<'a>,
    rng: StdRng,
    /// Generation attempts so far, including ones that produced no event.
    attempts: u64,
}

impl<'a> ValidationGenerator<'a> {
    /// Create a generator with a deterministic RNG.
    pub fn new(index: &'a ScheduleIndex, seed: u64) -> Self {
        debug!("Seeding validation generator with {seed}");
        Self::with_rng(index, StdRng::seed_from_u64(seed))
    }

    /// Create a generator seeded from OS entropy.
    pub fn from_entropy(index: &'a ScheduleIndex) -> Self {
        debug!("Seeding validation generator from OS entropy");
        Self::with_rng(index, StdRng::from_entropy())
    }

    fn with_rng(index: &'a ScheduleIndex, rng: StdRng) -> Self {
        Self {
            engine: SamplingEngine::new(index, SamplingStrategy::default()),
            rng,
            attempts: 0,
        }
    }

    /// Set the visit selection strategy.
    pub fn with_strategy(mut self, strategy: SamplingStrategy) -> Self {
        debug!(
            "Sampling {} trips with the {} strategy",
            self.engine.index().trip_count(),
            strategy
        );
        self.engine = SamplingEngine::new(self.engine.index(), strategy);
        self
    }

    pub fn strategy(&self) -> SamplingStrategy {
        self.engine.strategy()
    }

    pub fn attempts(&self) -> u64 {
        self.attempts
    }

    /// Run one generation attempt.
    pub fn next_event(&mut self) -> Option<ValidationEvent> {
        self.attempts += 1;
        self.engine.generate_one(&mut self.rng)
    }

    /// Lazily run `count` attempts.
    ///
    /// The iterator yields one item per attempt; attempts that produce no
    /// event yield `None` rather than being skipped, so the caller sees the
    /// exact number of attempts requested.
    pub fn events(&mut self, count: u64) -> ValidationEventIterator<'_, 'a> {
        ValidationEventIterator {
            generator: self,
            remaining: count,
        }
    }
}

/// Iterator over generation attempts. See [`ValidationGenerator::events`].
pub struct ValidationEventIterator<'g, 'a> {
    generator: &'g mut ValidationGenerator<'a>,
    remaining: u64,
}

impl Iterator for ValidationEventIterator<'_, '_> {
    type Item = Option<ValidationEvent>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        Some(self.generator.next_event())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match usize::try_from(self.remaining) {
            Ok(remaining) => (remaining, Some(remaining)),
            Err(_) => (usize::MAX, None),
        }
    }
}
