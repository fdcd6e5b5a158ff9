//! Random-choice source used for the technology draw and acknowledgment phrases.
//!
//! Production sessions use `RandomChooser`; tests inject a fixed chooser so
//! bank contents and replies can be asserted exactly.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Picks an index in `0..len`. Callers never pass `len == 0`.
pub trait Chooser {
    fn pick(&mut self, len: usize) -> usize;
}

/// Uniform chooser backed by a `StdRng` (entropy-seeded or fixed seed).
#[derive(Debug, Clone)]
pub struct RandomChooser {
    rng: StdRng,
}

impl RandomChooser {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Seeded when a seed is configured, entropy otherwise.
    pub fn from_seed_option(seed: Option<u64>) -> Self {
        seed.map(Self::seeded).unwrap_or_else(Self::from_entropy)
    }
}

impl Chooser for RandomChooser {
    fn pick(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }
}

/// Always picks the same index, clamped to the last valid one.
#[cfg(test)]
#[derive(Debug, Clone, Copy)]
pub struct FixedChooser(pub usize);

#[cfg(test)]
impl Chooser for FixedChooser {
    fn pick(&mut self, len: usize) -> usize {
        self.0.min(len.saturating_sub(1))
    }
}
