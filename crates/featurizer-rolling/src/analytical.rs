//! Analytical rolling windows.
//!
//! Analytical calculations always produce `f64`, whatever the input type.
//! Windows without enough history yield NaN.

use std::sync::Arc;

use featurizer_core::{error::Result, traits::Transformer, window::CircularIterator};
use num_traits::ToPrimitive;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::calculators::{Calculator, MeanCalculator};
use crate::estimator::{RollingWindowEstimator, WindowFeaturizer};
use crate::rolling_window::{Reducer, RollingWindowConfig, RollingWindowState, RollingWindowTransformer};

/// Calculations supported by [`AnalyticalRollingWindowTransformer`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum AnalyticalRollingWindowCalculation {
    /// Arithmetic mean of the window.
    #[default]
    Mean = 1,
}

/// Persisted state of an analytical rolling window.
pub type AnalyticalRollingWindowState = RollingWindowState<AnalyticalRollingWindowCalculation>;

fn mean<T: ToPrimitive>(begin: CircularIterator<'_, T>, end: CircularIterator<'_, T>) -> f64 {
    MeanCalculator::execute(begin, end)
}

/// Rolling window emitting an `f64` summary per horizon offset.
///
/// # Example
///
/// ```rust
/// use featurizer_rolling::{AnalyticalRollingWindowCalculation, AnalyticalRollingWindowTransformer};
///
/// let mut transformer = AnalyticalRollingWindowTransformer::<i32>::with_defaults(
///     AnalyticalRollingWindowCalculation::Mean,
///     1,
///     3,
/// )
/// .unwrap();
///
/// let outputs: Vec<f64> = [1, 2, 3, 4, 5]
///     .into_iter()
///     .map(|value| transformer.execute(value)[0])
///     .collect();
///
/// assert!(outputs[0].is_nan());
/// assert_eq!(&outputs[1..], &[1.0, 1.5, 2.0, 3.0]);
/// ```
#[derive(Debug, Clone)]
pub struct AnalyticalRollingWindowTransformer<T> {
    calculation: AnalyticalRollingWindowCalculation,
    window: RollingWindowTransformer<T, f64>,
}

impl<T> AnalyticalRollingWindowTransformer<T>
where
    T: ToPrimitive + Copy + Send + Sync + 'static,
{
    /// Create a transformer.
    ///
    /// # Errors
    ///
    /// Returns an invalid-argument error if any size is 0 or if
    /// `min_window_size > max_window_size`.
    pub fn new(
        calculation: AnalyticalRollingWindowCalculation,
        horizon: usize,
        max_window_size: usize,
        min_window_size: usize,
    ) -> Result<Self> {
        Self::from_config(
            calculation,
            RollingWindowConfig::new(horizon, max_window_size).with_min_window_size(min_window_size),
        )
    }

    /// Create a transformer with `min_window_size = 1`.
    ///
    /// # Errors
    ///
    /// Returns an invalid-argument error if `horizon` or `max_window_size` is 0.
    pub fn with_defaults(
        calculation: AnalyticalRollingWindowCalculation,
        horizon: usize,
        max_window_size: usize,
    ) -> Result<Self> {
        Self::new(calculation, horizon, max_window_size, 1)
    }

    /// Push `input` and return one value per horizon offset.
    pub fn execute(&mut self, input: T) -> Vec<f64> {
        self.window.execute(input)
    }

    /// Underlying generic window.
    pub fn window(&self) -> &RollingWindowTransformer<T, f64> {
        &self.window
    }
}

impl<T> WindowFeaturizer for AnalyticalRollingWindowTransformer<T>
where
    T: ToPrimitive + Copy + Send + Sync + 'static,
{
    type Calculation = AnalyticalRollingWindowCalculation;

    fn from_config(calculation: Self::Calculation, config: RollingWindowConfig) -> Result<Self> {
        let reducer: Reducer<T, f64> = match calculation {
            AnalyticalRollingWindowCalculation::Mean => Arc::new(mean::<T>),
        };

        Ok(Self {
            calculation,
            window: RollingWindowTransformer::with_shared_reducer(reducer, config)?,
        })
    }

    fn calculation(&self) -> Self::Calculation {
        self.calculation
    }

    fn config(&self) -> &RollingWindowConfig {
        self.window.config()
    }
}

impl<T> Transformer<T> for AnalyticalRollingWindowTransformer<T>
where
    T: ToPrimitive + Copy + Send + Sync + 'static,
{
    type Output = Vec<f64>;
    type State = AnalyticalRollingWindowState;

    fn execute(&mut self, input: T) -> Vec<f64> {
        self.window.execute(input)
    }

    fn get_state(&self) -> Self::State {
        self.to_state()
    }

    fn reset(&mut self) {
        self.window.reset();
    }
}

impl<T> PartialEq for AnalyticalRollingWindowTransformer<T> {
    fn eq(&self, other: &Self) -> bool {
        self.calculation == other.calculation && self.window.config() == other.window.config()
    }
}

/// Estimator for [`AnalyticalRollingWindowTransformer`].
pub type AnalyticalRollingWindowEstimator<T> =
    RollingWindowEstimator<AnalyticalRollingWindowTransformer<T>>;
