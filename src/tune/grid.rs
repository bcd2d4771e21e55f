//! Grid search: precomputed grid, proposed in shuffled order

use rand::rngs::StdRng;
use rand::Rng;

use crate::space::{Config, SearchSpace};

/// Exhaustive grid search
///
/// The full grid is computed once, then shuffled with the run seed so an
/// early-terminated run still evaluates an unbiased sample of the space
/// rather than walking it in parameter order. Points are never repeated.
#[derive(Debug, Clone)]
pub struct GridSearch {
    resolution: usize,
    queue: Vec<Config>,
    cursor: usize,
    built: bool,
}

impl GridSearch {
    /// Create a grid search; resolution is clamped to at least 2
    pub fn new(resolution: usize) -> Self {
        Self { resolution: resolution.max(2), queue: Vec::new(), cursor: 0, built: false }
    }

    /// Grid points per continuous dimension
    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// Un-proposed grid points remaining (0 before the first propose)
    pub fn remaining(&self) -> usize {
        self.queue.len().saturating_sub(self.cursor)
    }

    pub(crate) fn propose(
        &mut self,
        space: &SearchSpace,
        n: usize,
        rng: &mut StdRng,
    ) -> Vec<Config> {
        if !self.built {
            self.queue = space.grid(self.resolution);
            shuffle(&mut self.queue, rng);
            self.built = true;
        }

        let n = n.min(self.remaining());
        let batch = self.queue[self.cursor..self.cursor + n].to_vec();
        self.cursor += n;
        batch
    }
}

/// Fisher-Yates driven by the run RNG
fn shuffle(configs: &mut [Config], rng: &mut StdRng) {
    for i in (1..configs.len()).rev() {
        let j = (rng.random::<f64>() * (i + 1) as f64).floor() as usize;
        configs.swap(i, j.min(i));
    }
}
