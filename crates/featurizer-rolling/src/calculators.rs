//! Incremental window calculators.
//!
//! A calculator folds the values of one window with [`Calculator::update`]
//! and reports the result with [`Calculator::commit`]. The rolling
//! featurizers run a fresh calculator over every window they hand out.

use std::marker::PhantomData;

use featurizer_core::{num::HasNullable, window::CircularIterator, Nullable};
use num_traits::ToPrimitive;

/// Folds a window of values into a single output.
pub trait Calculator<T>: Default {
    /// Result of a finished window.
    type Output;

    /// Fold one value into the running result.
    fn update(&mut self, value: &T);

    /// Result for the values seen since the last reset.
    fn commit(&self) -> Self::Output;

    /// Forget every value seen so far.
    fn reset(&mut self);

    /// Run a fresh calculator over `[begin, end)`.
    fn execute(begin: CircularIterator<'_, T>, end: CircularIterator<'_, T>) -> Self::Output {
        let mut calculator = Self::default();
        let mut cursor = begin;
        while cursor != end {
            calculator.update(cursor.post_advance().get());
        }
        calculator.commit()
    }
}

/// Arithmetic mean. An empty window yields NaN.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeanCalculator<T> {
    sum: f64,
    count: u64,
    _marker: PhantomData<T>,
}

impl<T> Default for MeanCalculator<T> {
    fn default() -> Self {
        Self {
            sum: 0.0,
            count: 0,
            _marker: PhantomData,
        }
    }
}

impl<T: ToPrimitive> Calculator<T> for MeanCalculator<T> {
    type Output = f64;

    #[inline]
    fn update(&mut self, value: &T) {
        self.sum += value.to_f64().unwrap_or(f64::NAN);
        self.count += 1;
    }

    #[inline]
    fn commit(&self) -> f64 {
        if self.count == 0 {
            return f64::NAN;
        }
        self.sum / self.count as f64
    }

    fn reset(&mut self) {
        self.sum = 0.0;
        self.count = 0;
    }
}

/// Smallest value in the window. An empty window yields null.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinCalculator<T> {
    current: Option<T>,
}

impl<T> Default for MinCalculator<T> {
    fn default() -> Self {
        Self { current: None }
    }
}

impl<T: HasNullable> Calculator<T> for MinCalculator<T> {
    type Output = T::Nullable;

    #[inline]
    fn update(&mut self, value: &T) {
        match self.current {
            Some(current) if current <= *value => {}
            _ => self.current = Some(*value),
        }
    }

    #[inline]
    fn commit(&self) -> T::Nullable {
        self.current
            .map_or_else(T::Nullable::null, HasNullable::into_nullable)
    }

    fn reset(&mut self) {
        self.current = None;
    }
}

/// Largest value in the window. An empty window yields null.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaxCalculator<T> {
    current: Option<T>,
}

impl<T> Default for MaxCalculator<T> {
    fn default() -> Self {
        Self { current: None }
    }
}

impl<T: HasNullable> Calculator<T> for MaxCalculator<T> {
    type Output = T::Nullable;

    #[inline]
    fn update(&mut self, value: &T) {
        match self.current {
            Some(current) if current >= *value => {}
            _ => self.current = Some(*value),
        }
    }

    #[inline]
    fn commit(&self) -> T::Nullable {
        self.current
            .map_or_else(T::Nullable::null, HasNullable::into_nullable)
    }

    fn reset(&mut self) {
        self.current = None;
    }
}
