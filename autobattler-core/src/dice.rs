//! Random source for the battle engine.
//!
//! Every random draw the engine makes goes through the [`Dice`] trait:
//! attribute rolls at character creation, the hit-chance roll each turn,
//! monster selection, and the session's reward coin flips. Production code
//! uses [`RandomDice`] over any `rand` generator; tests either seed it with
//! [`RandomDice::seeded`] for replayable runs or script exact rolls with
//! [`crate::testing::ScriptedDice`].

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A source of uniform integer rolls.
pub trait Dice {
    /// Roll a uniform integer in `low..=high`.
    ///
    /// An empty range (`high < low`) yields `low`.
    fn roll(&mut self, low: i32, high: i32) -> i32;

    /// Fair coin flip.
    fn coin_flip(&mut self) -> bool {
        self.roll(0, 1) == 1
    }

    /// Pick an index into a collection of `len` items.
    ///
    /// `len` must be non-zero; zero yields index 0.
    fn pick(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        let high = i32::try_from(len - 1).unwrap_or(i32::MAX);
        self.roll(0, high).max(0) as usize
    }
}

/// Dice backed by a `rand` generator.
#[derive(Debug, Clone)]
pub struct RandomDice<R: Rng = StdRng> {
    rng: R,
}

impl<R: Rng> RandomDice<R> {
    /// Wrap an existing generator.
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandomDice<StdRng> {
    /// Deterministic dice: identical seeds produce identical roll streams.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Dice seeded from operating system entropy.
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl Default for RandomDice<StdRng> {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl<R: Rng> Dice for RandomDice<R> {
    fn roll(&mut self, low: i32, high: i32) -> i32 {
        if high <= low {
            return low;
        }
        self.rng.gen_range(low..=high)
    }
}
