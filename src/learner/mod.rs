//! Learner and model abstractions plus reference implementations
//!
//! A [`Learner`] is an immutable template: `fit` never mutates it, so one
//! template can be cloned per resampling fold and shared across worker
//! threads. A [`Model`] is the trained artifact that predicts.

mod knn;


use crate::data::Dataset;
use crate::error::{Error, Result};
use crate::space::Config;

pub use knn::KnnRegressor;

/// Learning algorithm template: train on a row subset under one configuration
pub trait Learner: Send + Sync {
    /// Learner name for records and display
    fn name(&self) -> &'static str;

    /// Clone into a boxed template (per-fold copy-on-use)
    fn clone_box(&self) -> Box<dyn Learner>;

    /// Train on the given rows of `data` with hyperparameters from `config`
    ///
    /// The template itself is never mutated; implementations return a
    /// fresh [`Model`].
    fn fit(&self, data: &Dataset, rows: &[usize], config: &Config) -> Result<Box<dyn Model>>;
}

impl Clone for Box<dyn Learner> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Trained model: predicts targets for a row subset
pub trait Model: Send {
    /// Predict targets for the given rows of `data`
    fn predict(&self, data: &Dataset, rows: &[usize]) -> Vec<f64>;
}

/// Baseline learner predicting the training-target mean
///
/// Has no tunable parameters; useful as a sanity floor in comparisons.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanBaseline;

impl MeanBaseline {
    /// Create a mean baseline learner
    pub fn new() -> Self {
        Self
    }
}

impl Learner for MeanBaseline {
    fn name(&self) -> &'static str {
        "mean_baseline"
    }

    fn clone_box(&self) -> Box<dyn Learner> {
        Box::new(*self)
    }

    fn fit(&self, data: &Dataset, rows: &[usize], _config: &Config) -> Result<Box<dyn Model>> {
        if rows.is_empty() {
            return Err(Error::InvalidParameter("cannot fit on zero rows".to_string()));
        }
        let mean = rows.iter().map(|&i| data.target(i)).sum::<f64>() / rows.len() as f64;
        Ok(Box::new(ConstantModel { value: mean }))
    }
}

/// Model that predicts one constant value
#[derive(Debug, Clone, Copy)]
struct ConstantModel {
    value: f64,
}

impl Model for ConstantModel {
    fn predict(&self, _data: &Dataset, rows: &[usize]) -> Vec<f64> {
        vec![self.value; rows.len()]
    }
}
