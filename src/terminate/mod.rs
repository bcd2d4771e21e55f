//! Stopping rules for tuning runs
//!
//! A [`Terminator`] is a pure predicate over the read-only
//! [`BudgetState`]: querying it any number of times has no side effects,
//! and the tuning loop is the only writer of the state. Rules compose
//! with [`Terminator::All`] / [`Terminator::Any`].


use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::measure::Measure;

/// Budget counters tracked across a tuning run
///
/// Updated by the tuning loop after each batch, never rolled back.
#[derive(Debug, Clone, Default)]
pub struct BudgetState {
    /// Cumulative evaluations (including failed configurations)
    pub n_evals: usize,
    /// Wall-clock time since the run started
    pub elapsed: Duration,
    /// Aggregated scores of successful evaluations, in evaluation order
    pub scores: Vec<f64>,
}

impl BudgetState {
    /// Fresh state at the start of a run
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one evaluation; failed configurations contribute no score
    pub fn record_eval(&mut self, score: Option<f64>) {
        self.n_evals += 1;
        if let Some(s) = score {
            self.scores.push(s);
        }
    }
}

/// Stopping rule (tagged variant, dispatch by match)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Terminator {
    /// Stop once cumulative evaluations reach the limit
    EvalCount { limit: usize },
    /// Stop once wall-clock time reaches the limit
    Clock { limit: Duration },
    /// Stop once the best score crosses the threshold (direction-aware)
    PerfReached { threshold: f64 },
    /// Stop once the best score has not improved by more than `tolerance`
    /// over the last `window` evaluations
    Stagnation { window: usize, tolerance: f64 },
    /// Stop when every sub-rule is exhausted
    All(Vec<Terminator>),
    /// Stop when at least one sub-rule is exhausted
    Any(Vec<Terminator>),
}

impl Terminator {
    /// Reject degenerate budgets at setup time
    pub fn validate(&self) -> Result<()> {
        match self {
            Terminator::EvalCount { limit } => {
                if *limit == 0 {
                    return Err(Error::BudgetMisconfigured(
                        "evaluation limit must be > 0".to_string(),
                    ));
                }
            }
            Terminator::Clock { limit } => {
                if limit.is_zero() {
                    return Err(Error::BudgetMisconfigured(
                        "clock limit must be > 0".to_string(),
                    ));
                }
            }
            Terminator::PerfReached { threshold } => {
                if !threshold.is_finite() {
                    return Err(Error::BudgetMisconfigured(format!(
                        "performance threshold must be finite, got {threshold}"
                    )));
                }
            }
            Terminator::Stagnation { window, tolerance } => {
                if *window == 0 {
                    return Err(Error::BudgetMisconfigured(
                        "stagnation window must be > 0".to_string(),
                    ));
                }
                if !tolerance.is_finite() || *tolerance < 0.0 {
                    return Err(Error::BudgetMisconfigured(format!(
                        "stagnation tolerance must be >= 0, got {tolerance}"
                    )));
                }
            }
            Terminator::All(subs) | Terminator::Any(subs) => {
                if subs.is_empty() {
                    return Err(Error::BudgetMisconfigured(
                        "combinator needs at least one sub-terminator".to_string(),
                    ));
                }
                for sub in subs {
                    sub.validate()?;
                }
            }
        }
        Ok(())
    }

    /// Is the budget exhausted? Pure and idempotent.
    pub fn is_exhausted(&self, state: &BudgetState, measure: Measure) -> bool {
        match self {
            Terminator::EvalCount { limit } => state.n_evals >= *limit,
            Terminator::Clock { limit } => state.elapsed >= *limit,
            Terminator::PerfReached { threshold } => match measure.best_of(&state.scores) {
                Some(best) => {
                    if measure.higher_is_better() {
                        best >= *threshold
                    } else {
                        best <= *threshold
                    }
                }
                None => false,
            },
            Terminator::Stagnation { window, tolerance } => {
                if state.scores.len() <= *window {
                    return false;
                }
                let cut = state.scores.len() - window;
                let before = match measure.best_of(&state.scores[..cut]) {
                    Some(b) => b,
                    None => return false,
                };
                let overall = match measure.best_of(&state.scores) {
                    Some(b) => b,
                    None => return false,
                };
                measure.improvement(overall, before) <= *tolerance
            }
            Terminator::All(subs) => subs.iter().all(|s| s.is_exhausted(state, measure)),
            Terminator::Any(subs) => subs.iter().any(|s| s.is_exhausted(state, measure)),
        }
    }
}
