//! Nested resampling: tuning wrapped behind a plain fit/predict contract
//!
//! [`AutoTuner`] bundles a learner template with a search space, an inner
//! evaluator, a strategy, and a terminator. Its `fit` runs the entire
//! inner tuning loop using only the rows it is given, then trains one
//! final model on all of those rows with the best configuration. Because
//! the wrapper never sees rows outside its training split, nesting it
//! inside an outer resampling loop cannot leak outer test data into
//! hyperparameter selection; [`check_disjoint`] turns any violation of
//! that contract into a fatal [`Error::Leakage`].


use std::collections::HashSet;

use crate::data::Dataset;
use crate::error::{Error, Result};
use crate::eval::Evaluator;
use crate::learner::{Learner, Model};
use crate::measure::Measure;
use crate::resample::Resampling;
use crate::space::{Config, SearchSpace};
use crate::terminate::Terminator;
use crate::tune::{Strategy, TuneResult, Tuner};

/// Learner-shaped wrapper around the whole inner tuning loop
#[derive(Clone)]
pub struct AutoTuner {
    learner: Box<dyn Learner>,
    space: SearchSpace,
    evaluator: Evaluator,
    strategy: Strategy,
    terminator: Terminator,
    batch_size: usize,
    seed: u64,
}

impl AutoTuner {
    /// Bundle a learner with its tuning setup
    ///
    /// Fails on an empty search space or a misconfigured terminator.
    pub fn new(
        learner: Box<dyn Learner>,
        space: SearchSpace,
        evaluator: Evaluator,
        strategy: Strategy,
        terminator: Terminator,
    ) -> Result<Self> {
        if space.is_empty() {
            return Err(Error::InvalidSearchSpace("no parameters to tune".to_string()));
        }
        terminator.validate()?;
        Ok(Self { learner, space, evaluator, strategy, terminator, batch_size: 1, seed: 42 })
    }

    /// Configurations proposed per inner round (default 1)
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Seed for the inner tuning loop
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// The inner evaluator's performance measure
    pub fn measure(&self) -> Measure {
        self.evaluator.measure()
    }

    /// Tune on the given rows only, then refit with the best configuration
    ///
    /// The inner loop resamples strictly within `rows`; the returned
    /// [`TunedModel`] is trained on all of `rows`.
    pub fn fit(&self, data: &Dataset, rows: &[usize]) -> Result<TunedModel> {
        let mut tuner = Tuner::new(self.strategy.clone(), self.terminator.clone())?
            .with_batch_size(self.batch_size)
            .with_seed(self.seed);
        let tune_result =
            tuner.optimize(&self.space, self.learner.as_ref(), &self.evaluator, data, rows)?;

        let model = self.learner.fit(data, rows, &tune_result.best_config)?;
        Ok(TunedModel { model, tune_result })
    }
}

impl Learner for AutoTuner {
    fn name(&self) -> &'static str {
        "auto_tuner"
    }

    fn clone_box(&self) -> Box<dyn Learner> {
        Box::new(self.clone())
    }

    /// The wrapper has no tunable parameters of its own; `config` is
    /// ignored and the inner loop selects the hyperparameters.
    fn fit(&self, data: &Dataset, rows: &[usize], _config: &Config) -> Result<Box<dyn Model>> {
        let tuned = AutoTuner::fit(self, data, rows)?;
        Ok(Box::new(tuned))
    }
}

/// Final model trained with the best configuration, plus the inner log
pub struct TunedModel {
    model: Box<dyn Model>,
    /// Result of the inner tuning loop that selected the configuration
    pub tune_result: TuneResult,
}

impl TunedModel {
    /// The selected configuration
    pub fn best_config(&self) -> &Config {
        &self.tune_result.best_config
    }

    /// Predict with the final refitted model
    pub fn predict(&self, data: &Dataset, rows: &[usize]) -> Vec<f64> {
        self.model.predict(data, rows)
    }
}

impl Model for TunedModel {
    fn predict(&self, data: &Dataset, rows: &[usize]) -> Vec<f64> {
        self.model.predict(data, rows)
    }
}

/// Fail with [`Error::Leakage`] when two row sets intersect
pub fn check_disjoint(train_rows: &[usize], test_rows: &[usize]) -> Result<()> {
    let train: HashSet<usize> = train_rows.iter().copied().collect();
    let shared: Vec<usize> = test_rows.iter().copied().filter(|r| train.contains(r)).collect();
    if !shared.is_empty() {
        return Err(Error::Leakage(format!(
            "{} rows shared between train and test splits",
            shared.len()
        )));
    }
    Ok(())
}

/// One outer fold of a nested resampling run
#[derive(Debug, Clone)]
pub struct NestedFold {
    /// Outer training rows (the inner loop saw only these)
    pub outer_train: Vec<usize>,
    /// Outer test rows (never visible to the inner loop)
    pub outer_test: Vec<usize>,
    /// Outer score of the tuned model; `None` when the fold failed
    pub score: Option<f64>,
    /// Configuration the inner loop selected for this fold
    pub best_config: Option<Config>,
    /// Inner resampled score of that configuration
    pub inner_best_score: Option<f64>,
}

/// Outcome of a nested resampling run
#[derive(Debug, Clone)]
pub struct NestedResult {
    /// Per-outer-fold results
    pub folds: Vec<NestedFold>,
    /// Mean outer score over non-missing folds
    pub aggregate: Option<f64>,
    /// The measure both loops were scored with
    pub measure: Measure,
}

/// Run the AutoTuner inside every outer fold
///
/// This is the unbiased performance estimate for the tuned learner: the
/// inner loop tunes on each outer training split, the tuned model is
/// scored on the corresponding outer test split. Fold-level evaluation
/// failures are recorded as missing; leakage and setup errors are fatal.
pub fn nested_resample(
    autotuner: &AutoTuner,
    data: &Dataset,
    outer: Resampling,
    seed: u64,
) -> Result<NestedResult> {
    let splits = outer.split(data.n_rows(), seed)?;
    let measure = autotuner.measure();

    let mut folds = Vec::with_capacity(splits.len());
    for (outer_train, outer_test) in splits {
        check_disjoint(&outer_train, &outer_test)?;

        match autotuner.fit(data, &outer_train) {
            Ok(tuned) => {
                let predictions = tuned.predict(data, &outer_test);
                let truth = data.targets(&outer_test);
                let score = measure.score(&predictions, &truth).ok();
                folds.push(NestedFold {
                    outer_train,
                    outer_test,
                    score,
                    best_config: Some(tuned.tune_result.best_config.clone()),
                    inner_best_score: Some(tuned.tune_result.best_score),
                });
            }
            // Every inner configuration failed on this fold: record and go on
            Err(Error::Evaluation(_)) => folds.push(NestedFold {
                outer_train,
                outer_test,
                score: None,
                best_config: None,
                inner_best_score: None,
            }),
            Err(e) => return Err(e),
        }
    }

    let present: Vec<f64> = folds.iter().filter_map(|f| f.score).collect();
    let aggregate = if present.is_empty() {
        None
    } else {
        Some(present.iter().sum::<f64>() / present.len() as f64)
    };

    Ok(NestedResult { folds, aggregate, measure })
}
