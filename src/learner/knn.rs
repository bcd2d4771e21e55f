//! k-nearest-neighbour regression with tunable k and weighting

use crate::data::Dataset;
use crate::error::{Error, Result};
use crate::space::Config;

use super::{Learner, Model};

/// k-nearest-neighbour regressor
///
/// Tunable configuration keys:
/// - `k` (int): neighbour count, default 5
/// - `weight` (categorical): `uniform` or `distance`, default `uniform`
#[derive(Debug, Clone, Copy, Default)]
pub struct KnnRegressor;

impl KnnRegressor {
    /// Create a kNN regressor template
    pub fn new() -> Self {
        Self
    }
}

impl Learner for KnnRegressor {
    fn name(&self) -> &'static str {
        "knn_regressor"
    }

    fn clone_box(&self) -> Box<dyn Learner> {
        Box::new(*self)
    }

    fn fit(&self, data: &Dataset, rows: &[usize], config: &Config) -> Result<Box<dyn Model>> {
        let k = match config.get("k") {
            Some(v) => v.as_int().ok_or_else(|| {
                Error::InvalidParameter(format!("k must be numeric, got {v}"))
            })?,
            None => 5,
        };
        if k < 1 {
            return Err(Error::InvalidParameter(format!("k must be >= 1, got {k}")));
        }
        let k = k as usize;
        if k > rows.len() {
            return Err(Error::InvalidParameter(format!(
                "k={k} exceeds {} training rows",
                rows.len()
            )));
        }

        let weighted = match config.get("weight").and_then(|v| v.as_str()) {
            None | Some("uniform") => false,
            Some("distance") => true,
            Some(other) => {
                return Err(Error::InvalidParameter(format!("unknown weight scheme: {other}")))
            }
        };

        let train: Vec<(Vec<f64>, f64)> =
            rows.iter().map(|&i| (data.row(i).to_vec(), data.target(i))).collect();

        Ok(Box::new(KnnModel { train, k, weighted }))
    }
}

/// Trained kNN model: the memorized training subset
#[derive(Debug, Clone)]
struct KnnModel {
    train: Vec<(Vec<f64>, f64)>,
    k: usize,
    weighted: bool,
}

impl KnnModel {
    fn predict_one(&self, query: &[f64]) -> f64 {
        let mut neighbours: Vec<(f64, f64)> = self
            .train
            .iter()
            .map(|(row, target)| (squared_distance(query, row), *target))
            .collect();
        neighbours.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
        neighbours.truncate(self.k);

        if self.weighted {
            let mut num = 0.0;
            let mut den = 0.0;
            for (d2, target) in &neighbours {
                let w = 1.0 / (d2.sqrt() + 1e-12);
                num += w * target;
                den += w;
            }
            num / den
        } else {
            neighbours.iter().map(|(_, t)| t).sum::<f64>() / self.k as f64
        }
    }
}

impl Model for KnnModel {
    fn predict(&self, data: &Dataset, rows: &[usize]) -> Vec<f64> {
        rows.iter().map(|&i| self.predict_one(data.row(i))).collect()
    }
}

fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum()
}
