//! Simulated annealing around the incumbent best configuration
//!
//! Proposes stochastic perturbations of the incumbent and accepts worse
//! candidates with a probability that decays as the temperature cools
//! (Metropolis criterion, Kirkpatrick et al. 1983), so the search can
//! escape local optima early and settles as the run progresses.

use rand::rngs::StdRng;
use rand::Rng;

use crate::archive::{EvalRecord, RecordStatus};
use crate::measure::Measure;
use crate::space::{Config, ParamDomain, ParamValue, SearchSpace};

/// Simulated-annealing search
#[derive(Debug, Clone)]
pub struct AnnealSearch {
    temperature: f64,
    cooling: f64,
    step: f64,
    incumbent: Option<(Config, f64)>,
}

impl Default for AnnealSearch {
    fn default() -> Self {
        Self::new()
    }
}

impl AnnealSearch {
    /// Annealing with temperature 1.0, cooling 0.95, step 0.15
    pub fn new() -> Self {
        Self { temperature: 1.0, cooling: 0.95, step: 0.15, incumbent: None }
    }

    /// Initial temperature (acceptance looseness)
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature.max(1e-9);
        self
    }

    /// Geometric cooling factor applied after each observed batch
    pub fn with_cooling(mut self, cooling: f64) -> Self {
        self.cooling = cooling.clamp(0.01, 0.9999);
        self
    }

    /// Perturbation scale as a fraction of each dimension's span
    pub fn with_step(mut self, step: f64) -> Self {
        self.step = step.clamp(1e-6, 1.0);
        self
    }

    /// Current temperature
    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Incumbent configuration and score, if any score has been observed
    pub fn incumbent(&self) -> Option<(&Config, f64)> {
        self.incumbent.as_ref().map(|(c, s)| (c, *s))
    }

    pub(crate) fn propose(
        &mut self,
        space: &SearchSpace,
        n: usize,
        rng: &mut StdRng,
    ) -> Vec<Config> {
        match &self.incumbent {
            // No feedback yet: explore uniformly
            None => (0..n).map(|_| space.sample_random(rng)).collect(),
            Some((config, _)) => {
                let base = config.clone();
                (0..n).map(|_| self.perturb(space, &base, rng)).collect()
            }
        }
    }

    pub(crate) fn observe(&mut self, records: &[EvalRecord], measure: Measure, rng: &mut StdRng) {
        for record in records {
            if record.status != RecordStatus::Completed {
                continue;
            }
            let score = match record.aggregate {
                Some(s) => s,
                None => continue,
            };
            let accept = match &self.incumbent {
                None => true,
                Some((_, incumbent_score)) => {
                    let delta = measure.improvement(score, *incumbent_score);
                    delta > 0.0 || rng.random::<f64>() < (delta / self.temperature).exp()
                }
            };
            if accept {
                self.incumbent = Some((record.config.clone(), score));
            }
        }
        self.temperature *= self.cooling;
    }

    /// One stochastic neighbour of `base`, within bounds
    fn perturb(&self, space: &SearchSpace, base: &Config, rng: &mut StdRng) -> Config {
        let mut next = Config::new();
        for (name, domain) in space.iter() {
            let current = base.get(name);
            let value = match (domain, current) {
                (ParamDomain::Continuous { low, high, log_scale }, Some(v)) => {
                    match v.as_float() {
                        Some(x) => {
                            let jitter = (rng.random::<f64>() * 2.0 - 1.0) * self.step;
                            let moved = if *log_scale {
                                let span = high.ln() - low.ln();
                                (x.ln() + jitter * span).exp()
                            } else {
                                x + jitter * (high - low)
                            };
                            ParamValue::Float(moved.clamp(*low, *high))
                        }
                        None => domain.sample(rng),
                    }
                }
                (ParamDomain::Discrete { low, high }, Some(v)) => match v.as_int() {
                    Some(x) => {
                        let span = (high - low) as f64;
                        let max_step = ((span * self.step).round() as i64).max(1);
                        let offset = (rng.random::<f64>() * (2 * max_step + 1) as f64).floor()
                            as i64
                            - max_step;
                        ParamValue::Int((x + offset).clamp(*low, *high))
                    }
                    None => domain.sample(rng),
                },
                (ParamDomain::Categorical { .. }, Some(v)) => {
                    // Re-draw with probability proportional to temperature
                    if rng.random::<f64>() < self.temperature.min(1.0) {
                        domain.sample(rng)
                    } else {
                        v.clone()
                    }
                }
                (_, None) => domain.sample(rng),
            };
            next.insert(name.to_string(), value);
        }
        next
    }
}
