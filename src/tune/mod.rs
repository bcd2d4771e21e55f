//! Search strategies and the tuning loop
//!
//! A [`Strategy`] proposes configurations and observes archived results
//! behind one contract; variants are explicit tags dispatched by match.
//! The [`Tuner`] drives the loop: propose a batch, evaluate it, append
//! records, update budget state, consult the terminator. The batch is
//! the unit of cancellation: the terminator is only consulted between
//! batches, and no partially scored configuration is ever promoted.

mod anneal;
mod grid;
mod random;


use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::archive::{Archive, EvalRecord, RecordStatus};
use crate::data::Dataset;
use crate::error::{Error, Result};
use crate::eval::Evaluator;
use crate::learner::Learner;
use crate::measure::Measure;
use crate::space::{Config, SearchSpace};
use crate::terminate::{BudgetState, Terminator};

pub use anneal::AnnealSearch;
pub use grid::GridSearch;
pub use random::RandomSearch;

/// Search strategy (tagged variant, dispatch by match)
#[derive(Debug, Clone)]
pub enum Strategy {
    /// Exhaustive grid, proposed in seed-shuffled order without repeats
    Grid(GridSearch),
    /// I.i.d. uniform sampling from the search space
    Random(RandomSearch),
    /// Simulated annealing around the incumbent best
    Anneal(AnnealSearch),
}

impl Strategy {
    /// Grid search at the given per-dimension resolution
    pub fn grid(resolution: usize) -> Self {
        Strategy::Grid(GridSearch::new(resolution))
    }

    /// Random search
    pub fn random() -> Self {
        Strategy::Random(RandomSearch::new())
    }

    /// Simulated annealing with default schedule
    pub fn anneal() -> Self {
        Strategy::Anneal(AnnealSearch::new())
    }

    /// Strategy name for records and display
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Grid(_) => "grid",
            Strategy::Random(_) => "random",
            Strategy::Anneal(_) => "anneal",
        }
    }

    /// Propose up to `n` configurations to evaluate next
    ///
    /// Grid search returns fewer than `n` once the grid is nearly
    /// exhausted, and an empty batch when it is done.
    pub fn propose(&mut self, space: &SearchSpace, n: usize, rng: &mut StdRng) -> Vec<Config> {
        match self {
            Strategy::Grid(s) => s.propose(space, n, rng),
            Strategy::Random(s) => s.propose(space, n, rng),
            Strategy::Anneal(s) => s.propose(space, n, rng),
        }
    }

    /// Feed a batch of archived results back to the strategy
    pub fn observe(&mut self, records: &[EvalRecord], measure: Measure, rng: &mut StdRng) {
        match self {
            Strategy::Grid(_) | Strategy::Random(_) => {}
            Strategy::Anneal(s) => s.observe(records, measure, rng),
        }
    }
}

/// Outcome of a tuning run
#[derive(Debug, Clone)]
pub struct TuneResult {
    /// Best configuration found
    pub best_config: Config,
    /// Its aggregated score
    pub best_score: f64,
    /// Full evaluation log
    pub archive: Archive,
    /// Batches executed
    pub n_batches: usize,
}

/// Drives the propose / evaluate / archive / terminate loop
#[derive(Debug, Clone)]
pub struct Tuner {
    strategy: Strategy,
    terminator: Terminator,
    batch_size: usize,
    seed: u64,
}

impl Tuner {
    /// Create a tuner; fails on a misconfigured terminator
    pub fn new(strategy: Strategy, terminator: Terminator) -> Result<Self> {
        terminator.validate()?;
        Ok(Self { strategy, terminator, batch_size: 1, seed: 42 })
    }

    /// Configurations proposed per round (default 1)
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Seed for proposal order, sampling, and acceptance draws
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Run the tuning loop until the budget is exhausted
    ///
    /// Returns the best configuration with its score and the full
    /// archive. Fails with [`Error::Evaluation`] when no configuration
    /// ever produced a usable score.
    pub fn optimize(
        &mut self,
        space: &SearchSpace,
        learner: &dyn Learner,
        evaluator: &Evaluator,
        data: &Dataset,
        rows: &[usize],
    ) -> Result<TuneResult> {
        if space.is_empty() {
            return Err(Error::InvalidSearchSpace("no parameters to tune".to_string()));
        }
        if rows.is_empty() {
            return Err(Error::InvalidParameter("cannot tune on zero rows".to_string()));
        }

        let measure = evaluator.measure();
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut archive = Archive::new(measure);
        let mut state = BudgetState::new();
        let start = Instant::now();
        let mut n_batches = 0;

        while !self.terminator.is_exhausted(&state, measure) {
            let proposals = self.strategy.propose(space, self.batch_size, &mut rng);
            if proposals.is_empty() {
                break;
            }
            for config in &proposals {
                space.validate(config)?;
            }

            // Blocks until the whole batch is scored; records are
            // appended in proposal order afterwards.
            let outcomes = evaluator.evaluate_batch(learner, data, rows, &proposals)?;

            let batch_start = archive.len();
            for (config, scores) in proposals.into_iter().zip(&outcomes) {
                let record = EvalRecord::from_scores(archive.next_id(), config, scores, n_batches);
                if record.status == RecordStatus::Failed {
                    eprintln!(
                        "tuning: configuration {} failed on all {} folds",
                        record.id,
                        record.fold_scores.len()
                    );
                }
                state.record_eval(record.aggregate);
                archive.push(record);
            }

            self.strategy.observe(&archive.records()[batch_start..], measure, &mut rng);
            state.elapsed = start.elapsed();
            n_batches += 1;
        }

        let best = archive.best().ok_or_else(|| {
            Error::Evaluation("no configuration produced a usable score".to_string())
        })?;
        let best_config = best.config.clone();
        let best_score = best
            .aggregate
            .ok_or_else(|| Error::Archive("best record has no aggregate score".to_string()))?;

        Ok(TuneResult { best_config, best_score, archive, n_batches })
    }
}
