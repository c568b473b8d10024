//! Integration tests for featurizer-rolling.
//!
//! These tests drive featurizers through their estimators and check state
//! persistence across the public API.

use approx::assert_relative_eq;

use featurizer_core::{FeaturizerError, StateRestoreError};
use featurizer_rolling::prelude::*;
use featurizer_rolling::{AnalyticalRollingWindowState, SimpleRollingWindowState};

// ============================================================================
// Test Utilities
// ============================================================================

/// Run an estimator through the inference-only lifecycle.
fn train<E: Estimator>(mut estimator: E) -> E::Transformer {
    estimator.begin_training().unwrap();
    assert_eq!(estimator.training_state(), TrainingState::Finished);
    estimator.complete_training().unwrap();
    estimator.create_transformer().unwrap()
}

/// Assert a row of outputs, treating NaN as equal to NaN.
fn assert_row(actual: &[f64], expected: &[f64]) {
    assert_eq!(actual.len(), expected.len(), "row length");
    for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
        if e.is_nan() {
            assert!(a.is_nan(), "slot {i}: expected NaN, got {a}");
        } else {
            assert_relative_eq!(*a, *e, epsilon = 1e-12);
        }
    }
}

const NAN: f64 = f64::NAN;

// ============================================================================
// Analytical Tests
// ============================================================================

#[test]
fn test_mean_window_three_horizon_one() {
    let mut t = train(
        AnalyticalRollingWindowEstimator::<i32>::new(AnalyticalRollingWindowCalculation::Mean, 1, 3, 1)
            .unwrap(),
    );

    let rows: Vec<Vec<f64>> = (1..=5).map(|v| t.execute(v)).collect();
    assert_row(&rows[0], &[NAN]);
    assert_row(&rows[1], &[1.0]);
    assert_row(&rows[2], &[1.5]);
    assert_row(&rows[3], &[2.0]);
    assert_row(&rows[4], &[3.0]);
}

#[test]
fn test_mean_long_stream_matches_naive() {
    let horizon = 3;
    let max = 4;
    let min = 2;
    let mut t = train(
        AnalyticalRollingWindowEstimator::<f64>::new(AnalyticalRollingWindowCalculation::Mean, horizon, max, min)
            .unwrap(),
    );

    let inputs: Vec<f64> = (0..40).map(|i| ((i * 7) % 11) as f64 - 5.0).collect();
    for (k, &value) in inputs.iter().enumerate() {
        let row = t.execute(value);
        assert_eq!(row.len(), horizon);

        // History before the current value, newest last.
        for (offset, &actual) in row.iter().enumerate() {
            let lead = horizon - offset;
            let seen = k + 1;
            if seen < lead + min {
                assert!(actual.is_nan(), "input {k} offset {offset}");
                continue;
            }
            let stop = seen - lead;
            let start = stop.saturating_sub(max);
            let window = &inputs[start..stop];
            let expected = window.iter().sum::<f64>() / window.len() as f64;
            assert_relative_eq!(actual, expected, epsilon = 1e-12);
        }
    }
}

// ============================================================================
// Simple Tests
// ============================================================================

#[test]
fn test_min_and_max_side_by_side() {
    let mut min = train(
        SimpleRollingWindowEstimator::<i32>::new(SimpleRollingWindowCalculation::Min, 1, 2, 1).unwrap(),
    );
    let mut max = train(
        SimpleRollingWindowEstimator::<i32>::new(SimpleRollingWindowCalculation::Max, 1, 2, 1).unwrap(),
    );

    let inputs = [3, 1, 4, 1, 5, 9, 2, 6];
    let mins: Vec<Option<i32>> = inputs.iter().map(|&v| min.execute(v)[0]).collect();
    let maxs: Vec<Option<i32>> = inputs.iter().map(|&v| max.execute(v)[0]).collect();

    assert_eq!(mins, vec![None, Some(3), Some(1), Some(1), Some(1), Some(1), Some(5), Some(2)]);
    assert_eq!(maxs, vec![None, Some(3), Some(3), Some(4), Some(4), Some(5), Some(9), Some(9)]);
}

// ============================================================================
// Grained Tests
// ============================================================================

#[test]
fn test_grained_mean_per_store() {
    let mut t = train(
        GrainedAnalyticalRollingWindowEstimator::<i32>::new(AnalyticalRollingWindowCalculation::Mean, 1, 2, 1)
            .unwrap(),
    );

    let store = |name: &str| -> Grain { vec![name.to_string()] };

    let rows = vec![
        (store("north"), 10),
        (store("south"), 1),
        (store("north"), 20),
        (store("south"), 3),
        (store("north"), 30),
    ];

    let outputs: Vec<Vec<f64>> = rows.into_iter().map(|row| t.execute(row)).collect();
    assert_row(&outputs[0], &[NAN]);
    assert_row(&outputs[1], &[NAN]);
    assert_row(&outputs[2], &[10.0]);
    assert_row(&outputs[3], &[1.0]);
    assert_row(&outputs[4], &[15.0]);
    assert_eq!(t.grain_count(), 2);
}

// ============================================================================
// State Tests
// ============================================================================

#[test]
fn test_state_restores_equal_transformer() {
    let mut original = train(
        AnalyticalRollingWindowEstimator::<i32>::new(AnalyticalRollingWindowCalculation::Mean, 2, 3, 2)
            .unwrap(),
    );
    original.execute(5);

    let restored = AnalyticalRollingWindowTransformer::<i32>::from_state(original.get_state()).unwrap();
    assert_eq!(restored, original);

    // Restored transformers start without history.
    let mut restored = restored;
    assert_row(&restored.execute(1), &[NAN, NAN]);
}

#[cfg(feature = "serde")]
#[test]
fn test_state_json_round_trip() {
    let t = SimpleRollingWindowTransformer::<i64>::new(SimpleRollingWindowCalculation::Max, 4, 6, 3).unwrap();

    let json = t.get_state().to_json().unwrap();
    let state = SimpleRollingWindowState::from_json(&json).unwrap();
    assert_eq!(state, t.get_state());

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["version"], 1);
    assert_eq!(value["calculation"], "Max");
    assert_eq!(value["horizon"], 4);
}

#[cfg(feature = "serde")]
#[test]
fn test_state_json_rejects_garbage() {
    let err = AnalyticalRollingWindowState::from_json("{\"version\": 1}").unwrap_err();
    assert!(matches!(
        err,
        FeaturizerError::StateError(StateRestoreError::DeserializationError(_))
    ));

    let json = r#"{"version":2,"calculation":"Mean","horizon":1,"max_window_size":1,"min_window_size":1}"#;
    let state = AnalyticalRollingWindowState::from_json(json).unwrap();
    assert!(matches!(
        AnalyticalRollingWindowTransformer::<i32>::from_state(state),
        Err(FeaturizerError::StateError(StateRestoreError::VersionMismatch { .. }))
    ));
}

// ============================================================================
// Custom Reducer Tests
// ============================================================================

#[test]
fn test_custom_reducer_range() {
    let mut spread = RollingWindowTransformer::new(
        |begin, _end| {
            let values: Vec<f64> = begin.copied().collect();
            let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
            hi - lo
        },
        RollingWindowConfig::new(1, 3).with_min_window_size(2),
    )
    .unwrap();

    assert!(spread.execute(1.0)[0].is_nan());
    assert!(spread.execute(4.0)[0].is_nan());
    assert_relative_eq!(spread.execute(2.0)[0], 3.0);
    assert_relative_eq!(spread.execute(8.0)[0], 3.0);
    assert_relative_eq!(spread.execute(0.0)[0], 6.0);
}
