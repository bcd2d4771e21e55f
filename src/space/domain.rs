//! Parameter domains: bounds, validation, sampling, grid points

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

use super::value::ParamValue;

/// Parameter domain (one dimension of the search space)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ParamDomain {
    /// Continuous range [low, high], optionally log-scaled
    Continuous { low: f64, high: f64, log_scale: bool },
    /// Discrete integer range [low, high]
    Discrete { low: i64, high: i64 },
    /// Categorical choices
    Categorical { choices: Vec<String> },
}

impl ParamDomain {
    /// Shorthand for a linear continuous domain
    pub fn continuous(low: f64, high: f64) -> Self {
        ParamDomain::Continuous { low, high, log_scale: false }
    }

    /// Shorthand for a log-scaled continuous domain
    pub fn log_continuous(low: f64, high: f64) -> Self {
        ParamDomain::Continuous { low, high, log_scale: true }
    }

    /// Reject degenerate domains at search-space construction time
    pub(crate) fn check(&self, name: &str) -> Result<()> {
        match self {
            ParamDomain::Continuous { low, high, log_scale } => {
                if !low.is_finite() || !high.is_finite() {
                    return Err(Error::InvalidSearchSpace(format!("{name}: non-finite bound")));
                }
                if low >= high {
                    return Err(Error::InvalidSearchSpace(format!(
                        "{name}: empty range [{low}, {high}]"
                    )));
                }
                if *log_scale && *low <= 0.0 {
                    return Err(Error::InvalidSearchSpace(format!(
                        "{name}: log scale requires positive lower bound, got {low}"
                    )));
                }
                Ok(())
            }
            ParamDomain::Discrete { low, high } => {
                if low > high {
                    return Err(Error::InvalidSearchSpace(format!(
                        "{name}: empty range [{low}, {high}]"
                    )));
                }
                Ok(())
            }
            ParamDomain::Categorical { choices } => {
                if choices.is_empty() {
                    return Err(Error::InvalidSearchSpace(format!("{name}: no choices")));
                }
                for (i, c) in choices.iter().enumerate() {
                    if choices[..i].contains(c) {
                        return Err(Error::InvalidSearchSpace(format!(
                            "{name}: duplicate choice {c}"
                        )));
                    }
                }
                Ok(())
            }
        }
    }

    /// Sample a random value from this domain
    ///
    /// Continuous domains sample uniformly (log-uniformly when
    /// log-scaled); discrete and categorical domains sample each point
    /// with equal probability.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> ParamValue {
        match self {
            ParamDomain::Continuous { low, high, log_scale } => {
                let value = if *log_scale {
                    let log_low = low.ln();
                    let log_high = high.ln();
                    let log_val = log_low + rng.random::<f64>() * (log_high - log_low);
                    log_val.exp()
                } else {
                    low + rng.random::<f64>() * (high - low)
                };
                ParamValue::Float(value.clamp(*low, *high))
            }
            ParamDomain::Discrete { low, high } => {
                let range = (*high - *low + 1) as usize;
                let offset = (rng.random::<f64>() * range as f64).floor() as i64;
                let value = (*low + offset).min(*high);
                ParamValue::Int(value)
            }
            ParamDomain::Categorical { choices } => {
                let idx = (rng.random::<f64>() * choices.len() as f64).floor() as usize;
                let idx = idx.min(choices.len() - 1);
                ParamValue::Categorical(choices[idx].clone())
            }
        }
    }

    /// Check if a value is valid for this domain
    pub fn is_valid(&self, value: &ParamValue) -> bool {
        match (self, value) {
            (ParamDomain::Continuous { low, high, .. }, ParamValue::Float(v)) => {
                *v >= *low && *v <= *high
            }
            (ParamDomain::Discrete { low, high }, ParamValue::Int(v)) => *v >= *low && *v <= *high,
            (ParamDomain::Categorical { choices }, ParamValue::Categorical(s)) => {
                choices.contains(s)
            }
            _ => false,
        }
    }

    /// Grid points for this domain at the given resolution
    ///
    /// Continuous: exactly `resolution` points including both bounds.
    /// Discrete: `resolution` equally spaced points, rounded and
    /// deduplicated. Categorical: every choice, ignoring the resolution.
    pub fn grid_values(&self, resolution: usize) -> Vec<ParamValue> {
        match self {
            ParamDomain::Continuous { low, high, log_scale } => {
                if resolution <= 1 {
                    return vec![ParamValue::Float(*low)];
                }
                let divisor = (resolution - 1) as f64;
                if *log_scale {
                    let log_low = low.ln();
                    let log_high = high.ln();
                    (0..resolution)
                        .map(|i| {
                            let t = i as f64 / divisor;
                            let v = (log_low + t * (log_high - log_low)).exp();
                            ParamValue::Float(v.clamp(*low, *high))
                        })
                        .collect()
                } else {
                    (0..resolution)
                        .map(|i| {
                            let t = i as f64 / divisor;
                            ParamValue::Float(low + t * (high - low))
                        })
                        .collect()
                }
            }
            ParamDomain::Discrete { low, high } => {
                if resolution <= 1 {
                    return vec![ParamValue::Int(*low)];
                }
                let divisor = (resolution - 1) as f64;
                let mut points: Vec<i64> = Vec::with_capacity(resolution);
                for i in 0..resolution {
                    let t = i as f64 / divisor;
                    let v = (*low as f64 + t * (*high - *low) as f64).round() as i64;
                    let v = v.clamp(*low, *high);
                    if !points.contains(&v) {
                        points.push(v);
                    }
                }
                points.into_iter().map(ParamValue::Int).collect()
            }
            ParamDomain::Categorical { choices } => {
                choices.iter().map(|c| ParamValue::Categorical(c.clone())).collect()
            }
        }
    }
}
