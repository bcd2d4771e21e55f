use super::*;
use crate::data::Dataset;
use crate::learner::{KnnRegressor, Learner, MeanBaseline, Model};
use crate::space::ParamValue;

/// Learner that fails to fit whenever the training split is smaller than
/// its configured threshold; used to exercise fold-failure recovery.
#[derive(Debug, Clone, Copy)]
struct BrittleLearner {
    min_rows: usize,
}

impl Learner for BrittleLearner {
    fn name(&self) -> &'static str {
        "brittle"
    }

    fn clone_box(&self) -> Box<dyn Learner> {
        Box::new(*self)
    }

    fn fit(&self, data: &Dataset, rows: &[usize], config: &Config) -> Result<Box<dyn Model>> {
        if rows.len() < self.min_rows {
            return Err(Error::InvalidParameter("not enough rows".to_string()));
        }
        MeanBaseline::new().fit(data, rows, config)
    }
}

fn toy_data(n: usize) -> Dataset {
    let rows: Vec<Vec<f64>> = (0..n).map(|i| vec![i as f64 / n as f64]).collect();
    let target: Vec<f64> = (0..n).map(|i| i as f64 / n as f64).collect();
    Dataset::new(vec!["x".to_string()], rows, target).unwrap()
}

#[test]
fn test_evaluate_produces_fold_scores() {
    let data = toy_data(30);
    let rows: Vec<usize> = (0..30).collect();
    let evaluator = Evaluator::new(Resampling::KFold { k: 5 }, Measure::Mse).unwrap();

    let scores = evaluator.evaluate(&MeanBaseline::new(), &data, &rows, &Config::new()).unwrap();
    assert_eq!(scores.per_fold.len(), 5);
    assert_eq!(scores.n_failed(), 0);
    assert!(scores.aggregate.is_some());
}

#[test]
fn test_aggregate_is_mean_of_folds() {
    let data = toy_data(20);
    let rows: Vec<usize> = (0..20).collect();
    let evaluator = Evaluator::new(Resampling::KFold { k: 4 }, Measure::Mae).unwrap();

    let scores = evaluator.evaluate(&MeanBaseline::new(), &data, &rows, &Config::new()).unwrap();
    let folds: Vec<f64> = scores.per_fold.iter().flatten().copied().collect();
    let mean = folds.iter().sum::<f64>() / folds.len() as f64;
    assert!((scores.aggregate.unwrap() - mean).abs() < 1e-12);
}

#[test]
fn test_knn_beats_baseline_on_smooth_target() {
    let data = toy_data(40);
    let rows: Vec<usize> = (0..40).collect();
    let evaluator = Evaluator::new(Resampling::KFold { k: 5 }, Measure::Mse).unwrap();

    let mut knn_config = Config::new();
    knn_config.insert("k".to_string(), ParamValue::Int(3));

    let knn = evaluator.evaluate(&KnnRegressor::new(), &data, &rows, &knn_config).unwrap();
    let base = evaluator.evaluate(&MeanBaseline::new(), &data, &rows, &Config::new()).unwrap();
    assert!(
        knn.aggregate.unwrap() < base.aggregate.unwrap(),
        "kNN should beat the mean baseline on a smooth target"
    );
}

#[test]
fn test_partial_fold_failure_is_recovered() {
    let data = toy_data(10);
    let rows: Vec<usize> = (0..10).collect();
    let evaluator = Evaluator::new(Resampling::KFold { k: 5 }, Measure::Mse).unwrap();

    // 5-fold on 10 rows: every train split has 8 rows, so min_rows = 9
    // fails every fold
    let brittle = BrittleLearner { min_rows: 9 };
    let result = evaluator.evaluate(&brittle, &data, &rows, &Config::new());
    assert!(matches!(result, Err(Error::Evaluation(_))));

    // run_folds still reports the per-fold shape for archiving
    let scores = evaluator.run_folds(&brittle, &data, &rows, &Config::new()).unwrap();
    assert_eq!(scores.per_fold.len(), 5);
    assert_eq!(scores.n_failed(), 5);
    assert!(scores.aggregate.is_none());
}

#[test]
fn test_mixed_fold_failure_excluded_from_mean() {
    let data = toy_data(11);
    let rows: Vec<usize> = (0..11).collect();
    // 2-fold on 11 rows: train splits have 5 and 6 rows
    let evaluator = Evaluator::new(Resampling::KFold { k: 2 }, Measure::Mse).unwrap();

    let brittle = BrittleLearner { min_rows: 6 };
    let scores = evaluator.evaluate(&brittle, &data, &rows, &Config::new()).unwrap();
    assert_eq!(scores.per_fold.len(), 2);
    assert_eq!(scores.n_failed(), 1);
    assert!(scores.aggregate.is_some());
}

#[test]
fn test_evaluate_batch_preserves_order() {
    let data = toy_data(30);
    let rows: Vec<usize> = (0..30).collect();
    let evaluator = Evaluator::new(Resampling::KFold { k: 3 }, Measure::Mse).unwrap();

    let configs: Vec<Config> = (1..=4)
        .map(|k| {
            let mut c = Config::new();
            c.insert("k".to_string(), ParamValue::Int(k));
            c
        })
        .collect();

    let sequential = evaluator.evaluate_batch(&KnnRegressor::new(), &data, &rows, &configs).unwrap();

    let parallel = evaluator
        .with_config(EvalConfig { workers: 4, seed: 42 })
        .evaluate_batch(&KnnRegressor::new(), &data, &rows, &configs)
        .unwrap();

    assert_eq!(sequential.len(), 4);
    assert_eq!(parallel.len(), 4);
    for (s, p) in sequential.iter().zip(&parallel) {
        assert_eq!(s.aggregate, p.aggregate, "parallel batch must preserve proposal order");
    }
}

#[test]
fn test_evaluate_batch_carries_failures_in_band() {
    let data = toy_data(10);
    let rows: Vec<usize> = (0..10).collect();
    let evaluator = Evaluator::new(Resampling::KFold { k: 5 }, Measure::Mse).unwrap();

    let brittle = BrittleLearner { min_rows: 9 };
    let configs = vec![Config::new(), Config::new()];
    let scores = evaluator.evaluate_batch(&brittle, &data, &rows, &configs).unwrap();
    assert_eq!(scores.len(), 2);
    assert!(scores.iter().all(|s| s.aggregate.is_none()));
}

#[test]
fn test_evaluator_subset_rows_only() {
    let data = toy_data(30);
    // Evaluate on a strict subset; splits index into the subset
    let rows: Vec<usize> = (10..25).collect();
    let evaluator = Evaluator::new(Resampling::KFold { k: 3 }, Measure::Mse).unwrap();
    let scores = evaluator.evaluate(&MeanBaseline::new(), &data, &rows, &Config::new()).unwrap();
    assert_eq!(scores.per_fold.len(), 3);
}

#[test]
fn test_evaluator_rejects_bad_resampling() {
    assert!(Evaluator::new(Resampling::KFold { k: 1 }, Measure::Mse).is_err());
}

#[test]
fn test_split_seed_changes_folds() {
    let data = toy_data(30);
    let rows: Vec<usize> = (0..30).collect();
    let base = Evaluator::new(Resampling::KFold { k: 3 }, Measure::Mse).unwrap();

    let mut config = Config::new();
    config.insert("k".to_string(), ParamValue::Int(1));

    let a = base.evaluate(&KnnRegressor::new(), &data, &rows, &config).unwrap();
    let b = base
        .with_config(EvalConfig { workers: 1, seed: 7 })
        .evaluate(&KnnRegressor::new(), &data, &rows, &config)
        .unwrap();
    // Different split seeds generally shuffle rows into different folds
    assert_ne!(a.per_fold, b.per_fold);
}
