//! Common test utilities for rolling-featurizers.
//!
//! This module provides NaN-aware float comparison, JSON fixture loading and
//! synthetic series generation.

#![allow(dead_code)]

use std::collections::HashMap;

/// Tiered float comparison with tolerance levels.
///
/// NaN only matches NaN. Values near zero are compared with an absolute
/// tolerance, everything else with a relative one.
pub fn assert_float_eq(actual: f64, expected: f64, epsilon: f64, context: &str) {
    if expected.is_nan() {
        assert!(
            actual.is_nan(),
            "{}: Expected NaN but got {}",
            context,
            actual
        );
        return;
    }

    if actual.is_nan() {
        panic!("{}: Got NaN but expected {}", context, expected);
    }

    if expected.abs() < 1e-10 {
        let diff = (actual - expected).abs();
        assert!(
            diff < epsilon,
            "{}: Expected {} but got {} (diff: {})",
            context,
            expected,
            actual,
            diff
        );
        return;
    }

    let rel_diff = ((actual - expected) / expected).abs();
    assert!(
        rel_diff < epsilon,
        "{}: Expected {} but got {} (rel diff: {:.2e})",
        context,
        expected,
        actual,
        rel_diff
    );
}

/// Assert two rows are equal with tolerance.
pub fn assert_row_eq(actual: &[f64], expected: &[f64], epsilon: f64, name: &str) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "{}: Length mismatch: {} vs {}",
        name,
        actual.len(),
        expected.len()
    );

    for (i, (&a, &e)) in actual.iter().zip(expected.iter()).enumerate() {
        let context = format!("{}[{}]", name, i);
        assert_float_eq(a, e, epsilon, &context);
    }
}

/// Fixture with an input series and expected output rows per featurizer.
///
/// In JSON, `null` stands for a NaN slot:
///
/// ```json
/// {"input": [1, 2], "expected": {"mean": [[null], [1.0]]}}
/// ```
#[derive(Debug, Clone, Default)]
pub struct Fixture {
    /// Input values.
    pub input: Vec<f64>,
    /// Expected rows keyed by featurizer name.
    pub expected: HashMap<String, Vec<Vec<f64>>>,
}

impl Fixture {
    /// Parse a fixture from JSON text.
    pub fn from_json(json: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let data: serde_json::Value = serde_json::from_str(json)?;

        let mut fixture = Fixture {
            input: parse_array(data.get("input"))?,
            ..Fixture::default()
        };

        if let Some(expected) = data.get("expected").and_then(|e| e.as_object()) {
            for (key, rows) in expected {
                let rows = rows
                    .as_array()
                    .ok_or_else(|| format!("expected rows for {key}"))?
                    .iter()
                    .map(|row| parse_array(Some(row)))
                    .collect::<Result<Vec<_>, _>>()?;
                fixture.expected.insert(key.clone(), rows);
            }
        }

        Ok(fixture)
    }
}

fn parse_array(value: Option<&serde_json::Value>) -> Result<Vec<f64>, Box<dyn std::error::Error>> {
    match value {
        Some(serde_json::Value::Array(arr)) => arr
            .iter()
            .map(|v| {
                if v.is_null() {
                    Ok(f64::NAN)
                } else {
                    v.as_f64()
                        .ok_or_else(|| format!("Invalid number: {:?}", v).into())
                }
            })
            .collect(),
        _ => Ok(Vec::new()),
    }
}

// ============================================================================
// Synthetic Data Generators
// ============================================================================

/// Generate linear series.
pub fn generate_linear(start: f64, step: f64, len: usize) -> Vec<f64> {
    (0..len).map(|i| start + step * i as f64).collect()
}

/// Generate random walk series with deterministic seed.
pub fn generate_random_walk(start: f64, volatility: f64, len: usize, seed: u64) -> Vec<f64> {
    // Simple LCG for deterministic random numbers
    let mut state = seed;
    let mut next = || {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (state as f64 / u64::MAX as f64) * 2.0 - 1.0
    };

    let mut values = Vec::with_capacity(len);
    let mut last = start;
    for _ in 0..len {
        values.push(last);
        last += next() * volatility;
    }
    values
}

/// Trailing window means computed directly from the input history.
///
/// Row `k` holds one slot per horizon offset for the `k`-th input.
pub fn naive_rolling_mean(input: &[f64], horizon: usize, max: usize, min: usize) -> Vec<Vec<f64>> {
    (1..=input.len())
        .map(|seen| {
            (0..horizon)
                .map(|offset| {
                    let lead = horizon - offset;
                    if seen < lead + min {
                        return f64::NAN;
                    }
                    let stop = seen - lead;
                    let window = &input[stop.saturating_sub(max)..stop];
                    window.iter().sum::<f64>() / window.len() as f64
                })
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assert_float_eq_normal() {
        assert_float_eq(1.0, 1.0, 1e-10, "test");
        assert_float_eq(100.0, 100.0000001, 1e-6, "test");
    }

    #[test]
    fn test_assert_float_eq_nan() {
        assert_float_eq(f64::NAN, f64::NAN, 1e-10, "test");
    }

    #[test]
    #[should_panic]
    fn test_assert_float_eq_nan_mismatch() {
        assert_float_eq(1.0, f64::NAN, 1e-10, "test");
    }

    #[test]
    fn test_generate_random_walk_deterministic() {
        let a = generate_random_walk(100.0, 1.0, 10, 12345);
        let b = generate_random_walk(100.0, 1.0, 10, 12345);
        assert_eq!(a, b);
        assert_eq!(a[0], 100.0);
    }

    #[test]
    fn test_naive_rolling_mean() {
        let rows = naive_rolling_mean(&[1.0, 2.0, 3.0], 1, 2, 1);
        assert!(rows[0][0].is_nan());
        assert_eq!(rows[1], vec![1.0]);
        assert_eq!(rows[2], vec![1.5]);
    }
}
