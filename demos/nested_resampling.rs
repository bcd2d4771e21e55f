//! Nested Resampling Demo
//!
//! Estimates the generalization performance of a *tuned* learner without
//! leaking test data into tuning: the inner loop selects hyperparameters
//! on each outer training split, the tuned model is scored on the
//! corresponding outer test split.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example nested_resampling
//! ```

use afinar::prelude::*;

fn main() -> Result<()> {
    let data = Dataset::synthetic_regression(150, 3, 7)?;

    let mut space = SearchSpace::new();
    space.add("k", ParamDomain::Discrete { low: 1, high: 15 })?;

    let inner = Evaluator::new(Resampling::KFold { k: 3 }, Measure::Mse)?;
    let autotuner = AutoTuner::new(
        Box::new(KnnRegressor::new()),
        space,
        inner,
        Strategy::random(),
        Terminator::EvalCount { limit: 12 },
    )?
    .with_batch_size(3)
    .with_seed(11);

    let result = nested_resample(&autotuner, &data, Resampling::KFold { k: 5 }, 42)?;

    println!("outer {} per fold:", result.measure);
    for (i, fold) in result.folds.iter().enumerate() {
        let config = fold
            .best_config
            .as_ref()
            .and_then(|c| c.get("k"))
            .map(|v| format!("k={v}"))
            .unwrap_or_else(|| "-".to_string());
        match fold.score {
            Some(score) => println!(
                "  fold {i}: {score:.6}  (inner best {:.6}, {config})",
                fold.inner_best_score.unwrap_or(f64::NAN)
            ),
            None => println!("  fold {i}: failed"),
        }
    }
    match result.aggregate {
        Some(outer) => println!("aggregated outer estimate: {outer:.6}"),
        None => println!("every outer fold failed"),
    }

    Ok(())
}
