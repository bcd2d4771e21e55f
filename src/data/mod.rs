//! In-memory dataset: rows of named feature columns plus a target column
//!
//! All evaluation plumbing addresses rows by index (`&[usize]` subsets),
//! so resampling splits, leakage checks, and fold evaluation never copy
//! the underlying data.

use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Row-major dataset with named feature columns and one target column
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    feature_names: Vec<String>,
    rows: Vec<Vec<f64>>,
    target: Vec<f64>,
}

impl Dataset {
    /// Create a dataset from row-major features and a target column
    ///
    /// Fails when row widths disagree with the feature names or the
    /// target length disagrees with the row count.
    pub fn new(
        feature_names: Vec<String>,
        rows: Vec<Vec<f64>>,
        target: Vec<f64>,
    ) -> Result<Self> {
        if rows.len() != target.len() {
            return Err(Error::InvalidParameter(format!(
                "{} rows but {} target values",
                rows.len(),
                target.len()
            )));
        }
        for (i, row) in rows.iter().enumerate() {
            if row.len() != feature_names.len() {
                return Err(Error::InvalidParameter(format!(
                    "row {i} has {} features, expected {}",
                    row.len(),
                    feature_names.len()
                )));
            }
        }
        Ok(Self { feature_names, rows, target })
    }

    /// Number of rows
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of feature columns
    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    /// Feature column names
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// One feature row
    pub fn row(&self, idx: usize) -> &[f64] {
        &self.rows[idx]
    }

    /// One target value
    pub fn target(&self, idx: usize) -> f64 {
        self.target[idx]
    }

    /// Gather target values for a row subset
    pub fn targets(&self, rows: &[usize]) -> Vec<f64> {
        rows.iter().map(|&i| self.target[i]).collect()
    }

    /// Seeded synthetic regression data for demos and tests
    ///
    /// Features are uniform in [0, 1]; the target is a fixed linear
    /// combination plus small uniform noise, so nearest-neighbour and
    /// mean baselines produce stable, comparable scores.
    pub fn synthetic_regression(n_rows: usize, n_features: usize, seed: u64) -> Result<Self> {
        if n_rows == 0 || n_features == 0 {
            return Err(Error::InvalidParameter(
                "synthetic dataset needs at least one row and one feature".to_string(),
            ));
        }
        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        let feature_names = (0..n_features).map(|j| format!("x{j}")).collect();
        let mut rows = Vec::with_capacity(n_rows);
        let mut target = Vec::with_capacity(n_rows);
        for _ in 0..n_rows {
            let row: Vec<f64> = (0..n_features).map(|_| rng.random::<f64>()).collect();
            let signal: f64 =
                row.iter().enumerate().map(|(j, v)| (j + 1) as f64 * v).sum();
            let noise = 0.05 * (rng.random::<f64>() - 0.5);
            target.push(signal + noise);
            rows.push(row);
        }
        Ok(Self { feature_names, rows, target })
    }
}
