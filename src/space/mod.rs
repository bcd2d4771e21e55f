//! Search space: typed parameter domains and configurations
//!
//! A [`SearchSpace`] is an ordered set of named [`ParamDomain`]s. Order is
//! part of the contract: grid enumeration and strategy vectorization walk
//! entries in declaration order, so a space built the same way always
//! produces the same grid.

mod domain;
mod grid;
mod value;


use std::collections::HashMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub use domain::ParamDomain;
pub use value::ParamValue;

/// One concrete assignment of values to all tunable parameters
pub type Config = HashMap<String, ParamValue>;

/// Ordered set of named parameter domains
///
/// Invariants, enforced at [`add`](SearchSpace::add) time: names are
/// unique, every domain has a non-empty range.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchSpace {
    entries: Vec<(String, ParamDomain)>,
}

impl SearchSpace {
    /// Create an empty search space
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter to the search space
    ///
    /// Fails with [`Error::InvalidSearchSpace`] on a duplicate name or a
    /// degenerate domain (empty/inverted range, non-positive log bound,
    /// no categorical choices).
    pub fn add(&mut self, name: &str, domain: ParamDomain) -> Result<()> {
        if name.is_empty() {
            return Err(Error::InvalidSearchSpace("empty parameter name".to_string()));
        }
        if self.entries.iter().any(|(n, _)| n == name) {
            return Err(Error::InvalidSearchSpace(format!("duplicate parameter: {name}")));
        }
        domain.check(name)?;
        self.entries.push((name.to_string(), domain));
        Ok(())
    }

    /// Get a parameter domain by name
    pub fn get(&self, name: &str) -> Option<&ParamDomain> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, d)| d)
    }

    /// Number of parameters
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the space has no parameters
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over parameters in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamDomain)> {
        self.entries.iter().map(|(n, d)| (n.as_str(), d))
    }

    /// Sample a configuration uniformly at random
    ///
    /// Log-scaled continuous domains sample log-uniformly.
    pub fn sample_random<R: Rng>(&self, rng: &mut R) -> Config {
        self.entries.iter().map(|(name, domain)| (name.clone(), domain.sample(rng))).collect()
    }

    /// Validate a configuration against the declared domains
    ///
    /// Fails with [`Error::OutOfRange`] on a missing parameter or a value
    /// outside its domain. Extra keys not present in the space are
    /// ignored.
    pub fn validate(&self, config: &Config) -> Result<()> {
        for (name, domain) in &self.entries {
            match config.get(name) {
                Some(value) if domain.is_valid(value) => {}
                Some(value) => {
                    return Err(Error::OutOfRange {
                        name: name.clone(),
                        value: format!("{value}"),
                    })
                }
                None => {
                    return Err(Error::OutOfRange {
                        name: name.clone(),
                        value: "<missing>".to_string(),
                    })
                }
            }
        }
        Ok(())
    }

    /// Enumerate the full grid at the given per-dimension resolution
    ///
    /// Continuous domains contribute exactly `resolution` equally spaced
    /// points including both bounds (log-spaced when log-scaled);
    /// discrete domains are rounded and deduplicated; categorical domains
    /// enumerate every choice. The result is the cartesian product in
    /// declaration order.
    pub fn grid(&self, resolution: usize) -> Vec<Config> {
        let per_param: Vec<(&str, Vec<ParamValue>)> = self
            .entries
            .iter()
            .map(|(name, domain)| (name.as_str(), domain.grid_values(resolution)))
            .collect();
        grid::cartesian_product(&per_param)
    }
}
