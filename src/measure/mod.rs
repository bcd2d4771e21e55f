//! Performance measures with a known better-direction rule

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Scalar performance measure over predictions and ground truth
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Measure {
    /// Fraction of exact (rounded) label matches
    Accuracy,
    /// Mean Squared Error
    Mse,
    /// Root Mean Squared Error
    Rmse,
    /// Mean Absolute Error
    Mae,
    /// R² coefficient of determination
    R2,
}

impl Measure {
    /// Whether higher values are better for this measure
    pub fn higher_is_better(&self) -> bool {
        !matches!(self, Measure::Mse | Measure::Rmse | Measure::Mae)
    }

    /// Get measure name as string
    pub fn name(&self) -> &'static str {
        match self {
            Measure::Accuracy => "Accuracy",
            Measure::Mse => "MSE",
            Measure::Rmse => "RMSE",
            Measure::Mae => "MAE",
            Measure::R2 => "R²",
        }
    }

    /// Score predictions against ground truth
    ///
    /// Fails on empty or length-mismatched inputs. Accuracy rounds both
    /// sides to the nearest integer label before comparing.
    pub fn score(&self, y_pred: &[f64], y_true: &[f64]) -> Result<f64> {
        if y_pred.len() != y_true.len() {
            return Err(Error::InvalidParameter(format!(
                "predictions ({}) and targets ({}) must have same length",
                y_pred.len(),
                y_true.len()
            )));
        }
        if y_pred.is_empty() {
            return Err(Error::InvalidParameter("cannot score empty predictions".to_string()));
        }

        let n = y_pred.len() as f64;
        let score = match self {
            Measure::Accuracy => {
                let hits = y_pred
                    .iter()
                    .zip(y_true)
                    .filter(|(p, t)| (p.round() - t.round()).abs() < f64::EPSILON)
                    .count();
                hits as f64 / n
            }
            Measure::Mse => {
                y_pred.iter().zip(y_true).map(|(p, t)| (p - t).powi(2)).sum::<f64>() / n
            }
            Measure::Rmse => {
                (y_pred.iter().zip(y_true).map(|(p, t)| (p - t).powi(2)).sum::<f64>() / n).sqrt()
            }
            Measure::Mae => {
                y_pred.iter().zip(y_true).map(|(p, t)| (p - t).abs()).sum::<f64>() / n
            }
            Measure::R2 => {
                let mean = y_true.iter().sum::<f64>() / n;
                let ss_tot: f64 = y_true.iter().map(|t| (t - mean).powi(2)).sum();
                let ss_res: f64 =
                    y_pred.iter().zip(y_true).map(|(p, t)| (p - t).powi(2)).sum();
                if ss_tot == 0.0 {
                    if ss_res == 0.0 {
                        1.0
                    } else {
                        0.0
                    }
                } else {
                    1.0 - ss_res / ss_tot
                }
            }
        };

        if score.is_nan() {
            return Err(Error::Evaluation(format!("{} score is NaN", self.name())));
        }
        Ok(score)
    }

    /// Direction-aware strict comparison: is `candidate` better than `incumbent`?
    pub fn better(&self, candidate: f64, incumbent: f64) -> bool {
        if self.higher_is_better() {
            candidate > incumbent
        } else {
            candidate < incumbent
        }
    }

    /// Direction-aware improvement magnitude of `candidate` over `incumbent`
    ///
    /// Positive when `candidate` is better, regardless of direction.
    pub fn improvement(&self, candidate: f64, incumbent: f64) -> f64 {
        if self.higher_is_better() {
            candidate - incumbent
        } else {
            incumbent - candidate
        }
    }

    /// Direction-aware best over a score sequence
    pub fn best_of(&self, scores: &[f64]) -> Option<f64> {
        scores.iter().copied().reduce(|a, b| if self.better(b, a) { b } else { a })
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
