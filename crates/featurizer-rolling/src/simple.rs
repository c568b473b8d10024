//! Simple rolling windows.
//!
//! Simple calculations return a value of the input's own type, wrapped in its
//! nullable form: floats stay floats with NaN for missing windows, integers
//! become `Option`.

use std::sync::Arc;

use featurizer_core::{error::Result, num::HasNullable, traits::Transformer, window::CircularIterator};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::calculators::{Calculator, MaxCalculator, MinCalculator};
use crate::estimator::{RollingWindowEstimator, WindowFeaturizer};
use crate::rolling_window::{Reducer, RollingWindowConfig, RollingWindowState, RollingWindowTransformer};

/// Calculations supported by [`SimpleRollingWindowTransformer`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum SimpleRollingWindowCalculation {
    /// Smallest value in the window.
    #[default]
    Min = 1,
    /// Largest value in the window.
    Max = 2,
}

/// Persisted state of a simple rolling window.
pub type SimpleRollingWindowState = RollingWindowState<SimpleRollingWindowCalculation>;

fn min<T: HasNullable>(begin: CircularIterator<'_, T>, end: CircularIterator<'_, T>) -> T::Nullable {
    MinCalculator::execute(begin, end)
}

fn max<T: HasNullable>(begin: CircularIterator<'_, T>, end: CircularIterator<'_, T>) -> T::Nullable {
    MaxCalculator::execute(begin, end)
}

/// Rolling window emitting the window minimum or maximum per horizon offset.
///
/// # Example
///
/// ```rust
/// use featurizer_rolling::{SimpleRollingWindowCalculation, SimpleRollingWindowTransformer};
///
/// let mut transformer = SimpleRollingWindowTransformer::<u32>::with_defaults(
///     SimpleRollingWindowCalculation::Max,
///     1,
///     2,
/// )
/// .unwrap();
///
/// assert_eq!(transformer.execute(4), vec![None]);
/// assert_eq!(transformer.execute(9), vec![Some(4)]);
/// assert_eq!(transformer.execute(1), vec![Some(9)]);
/// assert_eq!(transformer.execute(2), vec![Some(9)]);
/// ```
#[derive(Debug, Clone)]
pub struct SimpleRollingWindowTransformer<T: HasNullable> {
    calculation: SimpleRollingWindowCalculation,
    window: RollingWindowTransformer<T, T::Nullable>,
}

impl<T: HasNullable> SimpleRollingWindowTransformer<T> {
    /// Create a transformer.
    ///
    /// # Errors
    ///
    /// Returns an invalid-argument error if any size is 0 or if
    /// `min_window_size > max_window_size`.
    pub fn new(
        calculation: SimpleRollingWindowCalculation,
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
        calculation: SimpleRollingWindowCalculation,
        horizon: usize,
        max_window_size: usize,
    ) -> Result<Self> {
        Self::new(calculation, horizon, max_window_size, 1)
    }

    /// Push `input` and return one value per horizon offset.
    pub fn execute(&mut self, input: T) -> Vec<T::Nullable> {
        self.window.execute(input)
    }

    /// Underlying generic window.
    pub fn window(&self) -> &RollingWindowTransformer<T, T::Nullable> {
        &self.window
    }
}

impl<T: HasNullable> WindowFeaturizer for SimpleRollingWindowTransformer<T> {
    type Calculation = SimpleRollingWindowCalculation;

    fn from_config(calculation: Self::Calculation, config: RollingWindowConfig) -> Result<Self> {
        let reducer: Reducer<T, T::Nullable> = match calculation {
            SimpleRollingWindowCalculation::Min => Arc::new(min::<T>),
            SimpleRollingWindowCalculation::Max => Arc::new(max::<T>),
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

impl<T: HasNullable> Transformer<T> for SimpleRollingWindowTransformer<T> {
    type Output = Vec<T::Nullable>;
    type State = SimpleRollingWindowState;

    fn execute(&mut self, input: T) -> Self::Output {
        self.window.execute(input)
    }

    fn get_state(&self) -> Self::State {
        self.to_state()
    }

    fn reset(&mut self) {
        self.window.reset();
    }
}

impl<T: HasNullable> PartialEq for SimpleRollingWindowTransformer<T> {
    fn eq(&self, other: &Self) -> bool {
        self.calculation == other.calculation && self.window.config() == other.window.config()
    }
}

/// Estimator for [`SimpleRollingWindowTransformer`].
pub type SimpleRollingWindowEstimator<T> = RollingWindowEstimator<SimpleRollingWindowTransformer<T>>;
