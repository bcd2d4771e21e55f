//! Property tests for the tuning harness
//!
//! Ensures the structural invariants hold for arbitrary inputs:
//! - Grid enumeration has exactly r^d points, all within bounds
//! - Random proposals never leave the search space, for any seed
//! - The archive's best pointer equals a direction-correct full scan
//!   with earliest-index tie-breaking
//! - Stagnation termination respects its window and tolerance

use afinar::prelude::*;
use proptest::collection::vec;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

// =============================================================================
// Strategy Helpers
// =============================================================================

/// A continuous-only space with `d` unit-interval dimensions
fn unit_space(d: usize) -> SearchSpace {
    let mut space = SearchSpace::new();
    for i in 0..d {
        space
            .add(&format!("x{i}"), ParamDomain::Continuous { low: 0.0, high: 1.0, log_scale: false })
            .expect("unit space is valid");
    }
    space
}

/// A mixed space exercising every domain kind
fn mixed_space() -> SearchSpace {
    let mut space = SearchSpace::new();
    space
        .add("lr", ParamDomain::Continuous { low: 1e-5, high: 1e-1, log_scale: true })
        .expect("valid");
    space.add("k", ParamDomain::Discrete { low: 1, high: 31 }).expect("valid");
    space
        .add(
            "act",
            ParamDomain::Categorical {
                choices: vec!["relu".to_string(), "gelu".to_string(), "swish".to_string()],
            },
        )
        .expect("valid");
    space
}

fn record_with_score(id: usize, score: f64) -> EvalRecord {
    EvalRecord {
        id,
        config: Config::new(),
        fold_scores: vec![Some(score)],
        aggregate: Some(score),
        timestamp_ms: 0,
        batch: id,
        status: RecordStatus::Completed,
    }
}

// =============================================================================
// Grid Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_continuous_grid_has_r_pow_d_points(d in 1usize..4, r in 2usize..7) {
        let space = unit_space(d);
        let grid = space.grid(r);

        prop_assert_eq!(grid.len(), r.pow(d as u32));
        for config in &grid {
            prop_assert!(space.validate(config).is_ok());
        }
    }

    #[test]
    fn prop_grid_proposals_never_repeat(seed in any::<u64>(), batch in 1usize..7) {
        let space = unit_space(2);
        let mut strategy = Strategy::grid(3);
        let mut rng = StdRng::seed_from_u64(seed);

        let mut seen: Vec<Config> = Vec::new();
        loop {
            let proposals = strategy.propose(&space, batch, &mut rng);
            if proposals.is_empty() {
                break;
            }
            for config in proposals {
                prop_assert!(!seen.contains(&config), "grid repeated a point");
                seen.push(config);
            }
        }
        prop_assert_eq!(seen.len(), 9);
    }

    #[test]
    fn prop_random_proposals_in_bounds(seed in any::<u64>(), n in 1usize..50) {
        let space = mixed_space();
        let mut strategy = Strategy::random();
        let mut rng = StdRng::seed_from_u64(seed);

        for config in strategy.propose(&space, n, &mut rng) {
            prop_assert!(space.validate(&config).is_ok());
        }
    }

    #[test]
    fn prop_space_sampling_in_bounds(seed in any::<u64>()) {
        let space = mixed_space();
        let mut rng = StdRng::seed_from_u64(seed);
        let config = space.sample_random(&mut rng);
        prop_assert!(space.validate(&config).is_ok());
    }
}

// =============================================================================
// Archive Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn prop_archive_best_equals_full_scan(scores in vec(0.0f64..1.0, 1..40)) {
        for measure in [Measure::Mse, Measure::Accuracy] {
            let mut archive = Archive::new(measure);
            for (i, &s) in scores.iter().enumerate() {
                archive.push(record_with_score(i, s));
            }

            // Direction-correct extremum with earliest-index tie-break
            let mut scan_best = 0usize;
            for (i, &s) in scores.iter().enumerate() {
                if measure.better(s, scores[scan_best]) {
                    scan_best = i;
                }
            }
            prop_assert_eq!(archive.best().expect("non-empty").id, scan_best);
        }
    }

    #[test]
    fn prop_best_at_is_prefix_best(scores in vec(0.0f64..1.0, 2..30), cut in 1usize..29) {
        let cut = cut.min(scores.len());
        let mut full = Archive::new(Measure::Mse);
        let mut prefix = Archive::new(Measure::Mse);
        for (i, &s) in scores.iter().enumerate() {
            full.push(record_with_score(i, s));
            if i < cut {
                prefix.push(record_with_score(i, s));
            }
        }
        prop_assert_eq!(
            full.best_at(cut).map(|r| r.id),
            prefix.best().map(|r| r.id)
        );
    }
}

// =============================================================================
// Terminator Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_flat_sequence_stagnates(
        base in 0.1f64..10.0,
        window in 1usize..10,
        tolerance in 0.001f64..0.1,
    ) {
        let terminator = Terminator::Stagnation { window, tolerance };
        let mut state = BudgetState::new();
        // window + 1 identical scores: zero improvement over the window
        for _ in 0..=window {
            state.record_eval(Some(base));
        }
        prop_assert!(terminator.is_exhausted(&state, Measure::Mse));
    }

    #[test]
    fn prop_improving_sequence_stays_active(
        base in 1.0f64..10.0,
        window in 1usize..10,
        tolerance in 0.001f64..0.1,
    ) {
        let terminator = Terminator::Stagnation { window, tolerance };
        let mut state = BudgetState::new();
        for _ in 0..window {
            state.record_eval(Some(base));
        }
        // Final step improves by clearly more than the tolerance
        state.record_eval(Some(base - 2.0 * tolerance));
        prop_assert!(!terminator.is_exhausted(&state, Measure::Mse));
    }

    #[test]
    fn prop_eval_count_never_early(limit in 1usize..100, evals in 0usize..100) {
        let terminator = Terminator::EvalCount { limit };
        let mut state = BudgetState::new();
        for _ in 0..evals {
            state.record_eval(Some(0.5));
        }
        prop_assert_eq!(terminator.is_exhausted(&state, Measure::Mse), evals >= limit);
    }
}

// =============================================================================
// Tuning Loop Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_budget_overshoot_bounded(limit in 1usize..12, batch in 1usize..5) {
        let data = Dataset::synthetic_regression(30, 1, 3).expect("valid");
        let rows: Vec<usize> = (0..data.n_rows()).collect();
        let space = unit_space(2);
        let evaluator =
            Evaluator::new(Resampling::KFold { k: 3 }, Measure::Mse).expect("valid");

        let mut tuner = Tuner::new(Strategy::grid(3), Terminator::EvalCount { limit })
            .expect("valid")
            .with_batch_size(batch)
            .with_seed(1);
        let result =
            tuner.optimize(&space, &MeanBaseline::new(), &evaluator, &data, &rows).expect("runs");

        // Never more than batch - 1 beyond the budget, never more than the grid
        prop_assert!(result.archive.len() <= (limit + batch - 1).min(9));
    }
}
