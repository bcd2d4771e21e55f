//! Random search: i.i.d. uniform draws from the search space
//!
//! Surprisingly strong as a baseline (Bergstra & Bengio 2012); the
//! budget lives entirely in the terminator, so the strategy itself can
//! propose an unbounded number of distinct points.

use rand::rngs::StdRng;

use crate::space::{Config, SearchSpace};

/// Random search
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomSearch;

impl RandomSearch {
    /// Create a random search
    pub fn new() -> Self {
        Self
    }

    pub(crate) fn propose(
        &mut self,
        space: &SearchSpace,
        n: usize,
        rng: &mut StdRng,
    ) -> Vec<Config> {
        (0..n).map(|_| space.sample_random(rng)).collect()
    }
}
