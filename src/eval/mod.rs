//! Resampled evaluation of configurations
//!
//! The [`Evaluator`] scores one configuration by cloning the learner
//! template per fold, training on each fold's train split, and scoring
//! predictions on the held-out split. A fold whose fit or scoring fails
//! is recorded as missing and excluded from the aggregate; a
//! configuration only fails outright when every fold failed.
//!
//! Batch evaluation runs configurations concurrently on a bounded rayon
//! pool. The batch is the synchronization unit: results come back in
//! proposal order once the whole batch has completed.

#[cfg(test)]
mod tests;

use rayon::prelude::*;

use crate::data::Dataset;
use crate::error::{Error, Result};
use crate::learner::Learner;
use crate::measure::Measure;
use crate::resample::Resampling;
use crate::space::Config;

/// Evaluation settings
#[derive(Debug, Clone, Copy)]
pub struct EvalConfig {
    /// Worker threads for batch evaluation: 1 = sequential, 0 = rayon default
    pub workers: usize,
    /// Seed for resampling splits
    pub seed: u64,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self { workers: 1, seed: 42 }
    }
}

/// Per-fold scores and their aggregate for one configuration
#[derive(Debug, Clone)]
pub struct FoldScores {
    /// Score per fold; `None` where the fold's fit or scoring failed
    pub per_fold: Vec<Option<f64>>,
    /// Mean over non-missing folds; `None` when every fold failed
    pub aggregate: Option<f64>,
}

impl FoldScores {
    pub(crate) fn from_folds(per_fold: Vec<Option<f64>>) -> Self {
        let present: Vec<f64> = per_fold.iter().flatten().copied().collect();
        let aggregate = if present.is_empty() {
            None
        } else {
            Some(present.iter().sum::<f64>() / present.len() as f64)
        };
        Self { per_fold, aggregate }
    }

    /// Number of folds that failed
    pub fn n_failed(&self) -> usize {
        self.per_fold.iter().filter(|s| s.is_none()).count()
    }
}

/// Scores configurations by resampled training and prediction
#[derive(Debug, Clone, Copy)]
pub struct Evaluator {
    resampling: Resampling,
    measure: Measure,
    config: EvalConfig,
}

impl Evaluator {
    /// Create an evaluator; fails on a degenerate resampling strategy
    pub fn new(resampling: Resampling, measure: Measure) -> Result<Self> {
        resampling.validate()?;
        Ok(Self { resampling, measure, config: EvalConfig::default() })
    }

    /// Override worker count and split seed
    pub fn with_config(mut self, config: EvalConfig) -> Self {
        self.config = config;
        self
    }

    /// The performance measure in use
    pub fn measure(&self) -> Measure {
        self.measure
    }

    /// The resampling strategy in use
    pub fn resampling(&self) -> Resampling {
        self.resampling
    }

    /// Evaluate one configuration
    ///
    /// Fails with [`Error::Evaluation`] when every fold failed; partial
    /// fold failures are reported in the returned [`FoldScores`].
    pub fn evaluate(
        &self,
        learner: &dyn Learner,
        data: &Dataset,
        rows: &[usize],
        config: &Config,
    ) -> Result<FoldScores> {
        let scores = self.run_folds(learner, data, rows, config)?;
        if scores.aggregate.is_none() {
            return Err(Error::Evaluation(format!(
                "all {} folds failed for {}",
                scores.per_fold.len(),
                learner.name()
            )));
        }
        Ok(scores)
    }

    /// Evaluate a batch of configurations concurrently
    ///
    /// Runs on a rayon pool bounded by `workers`; results preserve the
    /// proposal order. Per-configuration failures surface as all-missing
    /// [`FoldScores`], not errors, so callers can archive them;
    /// structural errors (degenerate splits) propagate.
    pub fn evaluate_batch(
        &self,
        learner: &dyn Learner,
        data: &Dataset,
        rows: &[usize],
        configs: &[Config],
    ) -> Result<Vec<FoldScores>> {
        if self.config.workers == 1 || configs.len() <= 1 {
            return configs.iter().map(|c| self.run_folds(learner, data, rows, c)).collect();
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.workers)
            .build()
            .map_err(|e| Error::InvalidParameter(format!("worker pool: {e}")))?;

        pool.install(|| {
            configs.par_iter().map(|c| self.run_folds(learner, data, rows, c)).collect()
        })
    }

    /// Run all folds for one configuration, recording failures as missing
    pub(crate) fn run_folds(
        &self,
        learner: &dyn Learner,
        data: &Dataset,
        rows: &[usize],
        config: &Config,
    ) -> Result<FoldScores> {
        let splits = self.resampling.split(rows.len(), self.config.seed)?;

        let mut per_fold = Vec::with_capacity(splits.len());
        for (train_local, test_local) in &splits {
            let train_rows: Vec<usize> = train_local.iter().map(|&i| rows[i]).collect();
            let test_rows: Vec<usize> = test_local.iter().map(|&i| rows[i]).collect();
            per_fold.push(self.score_fold(learner, data, &train_rows, &test_rows, config));
        }

        Ok(FoldScores::from_folds(per_fold))
    }

    /// One fold: clone template, fit, predict, score; `None` on failure
    fn score_fold(
        &self,
        learner: &dyn Learner,
        data: &Dataset,
        train_rows: &[usize],
        test_rows: &[usize],
        config: &Config,
    ) -> Option<f64> {
        let template = learner.clone_box();
        let model = template.fit(data, train_rows, config).ok()?;
        let predictions = model.predict(data, test_rows);
        let truth = data.targets(test_rows);
        self.measure.score(&predictions, &truth).ok()
    }
}
