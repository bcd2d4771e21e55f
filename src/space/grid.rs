//! Cartesian product of per-parameter grid values

use super::{Config, ParamValue};

/// Expand per-parameter grid values into full configurations
///
/// The first parameter varies slowest, so the output order is stable for
/// a given search space and resolution.
pub(crate) fn cartesian_product(param_values: &[(&str, Vec<ParamValue>)]) -> Vec<Config> {
    if param_values.is_empty() {
        return vec![Config::new()];
    }

    let (name, values) = &param_values[0];
    let rest = param_values.get(1..).unwrap_or_default();
    let rest_configs = cartesian_product(rest);

    values
        .iter()
        .flat_map(|v| {
            rest_configs.iter().map(move |config| {
                let mut new_config = config.clone();
                new_config.insert((*name).to_string(), v.clone());
                new_config
            })
        })
        .collect()
}
