//! End-to-end training and evaluation tests on synthetic listings.

mod common;

use otoprice::plot::RegressionLine;
use otoprice::{TrainerConfig, TrainingSession};

#[test]
fn training_then_evaluation_recovers_a_linear_signal() {
    let table = common::synthetic_listings(1000, 42);
    let session = TrainingSession::new(7);
    let model = session
        .fit(&table, &common::test_columns(), &TrainerConfig::default())
        .unwrap();
    let metrics = session.evaluate(&model, &table).unwrap();

    // Sanity bound, not an exact score: price is linear in mileage
    // with small noise, so the held-out fit must clearly beat the
    // mean predictor.
    assert!(
        metrics.r_squared > 0.5,
        "expected r² > 0.5, got {}",
        metrics.r_squared
    );
    assert!(metrics.mean_absolute_error >= 0.0);
    assert!(metrics.root_mean_squared_error >= metrics.mean_absolute_error);
}

#[test]
fn single_iteration_is_valid_just_weaker() {
    let table = common::synthetic_listings(600, 9);
    let session = TrainingSession::new(3);

    let one_round = TrainerConfig::builder().number_of_iterations(1).build().unwrap();
    let model = session
        .fit(&table, &common::test_columns(), &one_round)
        .unwrap();
    let metrics = session.evaluate(&model, &table).unwrap();

    // One round must not error and must produce well-defined metrics.
    assert!(metrics.r_squared.is_finite());
    assert!(metrics.mean_squared_error.is_finite());
    assert_eq!(model.forest().n_trees(), 1);
}

#[test]
fn evaluation_is_idempotent() {
    let table = common::synthetic_listings(400, 5);
    let session = TrainingSession::new(11);
    let config = TrainerConfig::builder().number_of_iterations(10).build().unwrap();
    let model = session
        .fit(&table, &common::test_columns(), &config)
        .unwrap();

    let first = session.evaluate(&model, &table).unwrap();
    let second = session.evaluate(&model, &table).unwrap();
    assert_eq!(first, second);
}

#[test]
fn regression_line_fits_the_holdout_pairs() {
    let table = common::synthetic_listings(800, 21);
    let session = TrainingSession::new(2);
    let model = session
        .fit(&table, &common::test_columns(), &TrainerConfig::default())
        .unwrap();

    let pairs = session.holdout_pairs(&model, &table);
    assert!(!pairs.is_empty());

    let line = RegressionLine::fit(&pairs).unwrap();
    // A model that tracks the signal puts the diagnostic line close to
    // the identity diagonal.
    assert!(line.slope > 0.5 && line.slope < 1.5, "slope {}", line.slope);
}

#[test]
fn hash_encoding_pipeline_trains_too() {
    use otoprice::{ColumnSpec, Transform};

    let table = common::synthetic_listings(500, 13);
    let columns = vec![
        ColumnSpec::new("mileage", Transform::NormalizeMeanVariance),
        ColumnSpec::new("model", Transform::OneHotHashEncoding),
    ];
    let config = TrainerConfig::builder().number_of_iterations(20).build().unwrap();
    let session = TrainingSession::new(17);
    let model = session.fit(&table, &columns, &config).unwrap();
    let metrics = session.evaluate(&model, &table).unwrap();
    assert!(metrics.r_squared > 0.5, "r² = {}", metrics.r_squared);
}

#[test]
fn categorical_split_toggle_changes_feature_layout_not_validity() {
    let table = common::synthetic_listings(500, 19);
    let session = TrainingSession::new(23);

    let subsets = TrainerConfig::default();
    let indicators = TrainerConfig::builder()
        .use_categorical_split(false)
        .build()
        .unwrap();

    let model_subsets = session
        .fit(&table, &common::test_columns(), &subsets)
        .unwrap();
    let model_indicators = session
        .fit(&table, &common::test_columns(), &indicators)
        .unwrap();

    // Category-subset mode keeps one feature per categorical column;
    // indicator mode expands each category into its own feature.
    assert!(model_indicators.n_features() > model_subsets.n_features());

    for model in [&model_subsets, &model_indicators] {
        let metrics = session.evaluate(model, &table).unwrap();
        assert!(metrics.r_squared.is_finite());
    }
}
