//! Grid Tuning Demo
//!
//! Tunes a k-nearest-neighbour regressor over a two-parameter space:
//! 1. Build the search space (neighbour count + weighting scheme)
//! 2. Run grid search under an evaluation budget
//! 3. Display the archive leaderboard and the selected configuration
//!
//! # Usage
//!
//! ```bash
//! cargo run --example tune_grid
//! ```

use std::time::Instant;

use afinar::prelude::*;

fn main() -> Result<()> {
    let data = Dataset::synthetic_regression(120, 3, 42)?;
    let rows: Vec<usize> = (0..data.n_rows()).collect();

    let mut space = SearchSpace::new();
    space.add("k", ParamDomain::Discrete { low: 1, high: 15 })?;
    space.add(
        "weight",
        ParamDomain::Categorical {
            choices: vec!["uniform".to_string(), "distance".to_string()],
        },
    )?;

    let evaluator = Evaluator::new(Resampling::KFold { k: 5 }, Measure::Rmse)?
        .with_config(EvalConfig { workers: 4, seed: 42 });

    let mut tuner = Tuner::new(
        Strategy::grid(8),
        Terminator::Any(vec![
            Terminator::EvalCount { limit: 40 },
            Terminator::Stagnation { window: 10, tolerance: 1e-4 },
        ]),
    )?
    .with_batch_size(4)
    .with_seed(7);

    let start = Instant::now();
    let result = tuner.optimize(&space, &KnnRegressor::new(), &evaluator, &data, &rows)?;
    let elapsed = start.elapsed();

    println!("{}", result.archive);
    println!(
        "best: {} = {:.6} after {} evaluations in {} batches ({:.1?})",
        Measure::Rmse,
        result.best_score,
        result.archive.len(),
        result.n_batches,
        elapsed
    );
    let mut params: Vec<String> =
        result.best_config.iter().map(|(k, v)| format!("{k}={v}")).collect();
    params.sort();
    println!("config: {}", params.join(", "));

    Ok(())
}
