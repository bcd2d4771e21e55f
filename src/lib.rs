//! afinar: hyperparameter tuning and nested resampling harness
//!
//! Provides the building blocks for budgeted hyperparameter search over
//! arbitrary learners:
//!
//! - **Search space**: typed parameter domains (continuous, discrete,
//!   categorical) with validation, sampling, and grid enumeration
//! - **Evaluator**: resampled scoring of one configuration with per-fold
//!   failure recovery and bounded parallel batch evaluation
//! - **Terminator**: composable stopping rules (evaluation count,
//!   wall-clock, performance threshold, stagnation)
//! - **Search strategies**: grid, random, and simulated-annealing search
//!   behind one propose/observe contract
//! - **Archive**: append-only evaluation log with direction-aware
//!   best-tracking and JSON persistence
//! - **AutoTuner**: wraps the whole inner loop behind a plain fit/predict
//!   contract so it can be nested inside an outer resampling loop without
//!   leaking test data into tuning
//!
//! # Example
//!
//! ```
//! use afinar::prelude::*;
//!
//! # fn main() -> afinar::Result<()> {
//! let data = Dataset::synthetic_regression(60, 3, 42)?;
//! let rows: Vec<usize> = (0..data.n_rows()).collect();
//!
//! let mut space = SearchSpace::new();
//! space.add("k", ParamDomain::Discrete { low: 1, high: 9 })?;
//!
//! let evaluator = Evaluator::new(Resampling::KFold { k: 3 }, Measure::Mse)?;
//! let mut tuner = Tuner::new(
//!     Strategy::grid(5),
//!     Terminator::EvalCount { limit: 20 },
//! )?
//! .with_seed(7);
//!
//! let result = tuner.optimize(&space, &KnnRegressor::new(), &evaluator, &data, &rows)?;
//! assert!(result.best_config.contains_key("k"));
//! # Ok(())
//! # }
//! ```
//!
//! # References
//!
//! \[1\] Bergstra & Bengio (2012) - Random Search for Hyper-Parameter Optimization
//! \[2\] Kirkpatrick et al. (1983) - Optimization by Simulated Annealing
//! \[3\] Bischl et al. (2023) - Hyperparameter Optimization: Foundations and Best Practices

pub mod archive;
pub mod autotune;
pub mod data;
pub mod error;
pub mod eval;
pub mod learner;
pub mod measure;
pub mod resample;
pub mod space;
pub mod terminate;
pub mod tune;

pub use error::{Error, Result};

/// Convenience re-exports for the common tuning workflow
pub mod prelude {
    pub use crate::archive::{Archive, EvalRecord, RecordStatus};
    pub use crate::autotune::{
        check_disjoint, nested_resample, AutoTuner, NestedFold, NestedResult, TunedModel,
    };
    pub use crate::data::Dataset;
    pub use crate::error::{Error, Result};
    pub use crate::eval::{EvalConfig, Evaluator, FoldScores};
    pub use crate::learner::{KnnRegressor, Learner, MeanBaseline, Model};
    pub use crate::measure::Measure;
    pub use crate::resample::Resampling;
    pub use crate::space::{Config, ParamDomain, ParamValue, SearchSpace};
    pub use crate::terminate::{BudgetState, Terminator};
    pub use crate::tune::{Strategy, TuneResult, Tuner};
}
