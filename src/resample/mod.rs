//! Resampling strategies: repeated train/test partitions of row indices
//!
//! Splits are expressed in an abstract index space `0..n_rows`; callers
//! map them onto their own row subsets. Shuffling uses a fixed LCG so
//! splits are reproducible from the seed alone, with no RNG dependency.


use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One train/test partition of `0..n_rows`
pub type Split = (Vec<usize>, Vec<usize>);

/// Resampling strategy (tagged variant, dispatch by match)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Resampling {
    /// Single split with the given train fraction
    Holdout { ratio: f64 },
    /// k-fold cross-validation
    KFold { k: usize },
    /// k-fold cross-validation repeated with different shuffles
    RepeatedKFold { k: usize, repeats: usize },
}

impl Resampling {
    /// Reject degenerate strategies at setup time
    pub fn validate(&self) -> Result<()> {
        match self {
            Resampling::Holdout { ratio } => {
                if !ratio.is_finite() || *ratio <= 0.0 || *ratio >= 1.0 {
                    return Err(Error::InvalidParameter(format!(
                        "holdout ratio must be in (0, 1), got {ratio}"
                    )));
                }
            }
            Resampling::KFold { k } => {
                if *k < 2 {
                    return Err(Error::InvalidParameter(format!("k-fold needs k >= 2, got {k}")));
                }
            }
            Resampling::RepeatedKFold { k, repeats } => {
                if *k < 2 {
                    return Err(Error::InvalidParameter(format!("k-fold needs k >= 2, got {k}")));
                }
                if *repeats == 0 {
                    return Err(Error::InvalidParameter("repeats must be >= 1".to_string()));
                }
            }
        }
        Ok(())
    }

    /// Number of train/test splits this strategy produces
    pub fn n_splits(&self) -> usize {
        match self {
            Resampling::Holdout { .. } => 1,
            Resampling::KFold { k } => *k,
            Resampling::RepeatedKFold { k, repeats } => k * repeats,
        }
    }

    /// Generate train/test index pairs over `0..n_rows`
    ///
    /// Deterministic for a given `(strategy, n_rows, seed)` triple.
    pub fn split(&self, n_rows: usize, seed: u64) -> Result<Vec<Split>> {
        self.validate()?;
        match self {
            Resampling::Holdout { ratio } => {
                if n_rows < 2 {
                    return Err(Error::InvalidParameter(format!(
                        "holdout needs at least 2 rows, got {n_rows}"
                    )));
                }
                let indices = shuffled_indices(n_rows, seed);
                let n_train = ((ratio * n_rows as f64).round() as usize).clamp(1, n_rows - 1);
                let train = indices[..n_train].to_vec();
                let test = indices[n_train..].to_vec();
                Ok(vec![(train, test)])
            }
            Resampling::KFold { k } => kfold_splits(n_rows, *k, seed),
            Resampling::RepeatedKFold { k, repeats } => {
                let mut splits = Vec::with_capacity(k * repeats);
                for r in 0..*repeats {
                    splits.extend(kfold_splits(n_rows, *k, seed.wrapping_add(r as u64))?);
                }
                Ok(splits)
            }
        }
    }
}

/// Fisher-Yates over `0..n` driven by a fixed LCG, reproducible by seed
fn shuffled_indices(n: usize, seed: u64) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng_state = seed;
    for i in (1..n).rev() {
        rng_state = rng_state.wrapping_mul(6364136223846793005).wrapping_add(1);
        let j = (rng_state >> 33) as usize % (i + 1);
        indices.swap(i, j);
    }
    indices
}

fn kfold_splits(n_rows: usize, k: usize, seed: u64) -> Result<Vec<Split>> {
    if n_rows < k {
        return Err(Error::InvalidParameter(format!(
            "{k}-fold needs at least {k} rows, got {n_rows}"
        )));
    }

    let indices = shuffled_indices(n_rows, seed);
    let fold_size = n_rows / k;
    let remainder = n_rows % k;

    let mut folds = Vec::with_capacity(k);
    let mut start = 0;
    for i in 0..k {
        let extra = usize::from(i < remainder);
        let end = start + fold_size + extra;

        let test: Vec<usize> = indices[start..end].to_vec();
        let train: Vec<usize> =
            indices[..start].iter().chain(indices[end..].iter()).copied().collect();

        folds.push((train, test));
        start = end;
    }
    Ok(folds)
}
