//! Per-grain rolling windows.
//!
//! A grain is the key of one independent series, for example
//! `["store-7", "sku-42"]`. Each grain gets its own window history, created
//! the first time the grain is seen.

use std::collections::BTreeMap;
use std::fmt;

use featurizer_core::{
    error::Result,
    traits::{Estimator, TrainingState, Transformer},
};

use crate::analytical::AnalyticalRollingWindowTransformer;
use crate::estimator::{RollingWindowEstimator, WindowFeaturizer};
use crate::rolling_window::RollingWindowConfig;
use crate::simple::SimpleRollingWindowTransformer;

/// Key identifying one series.
pub type Grain = Vec<String>;

/// Runs an independent copy of a transformer for every grain.
///
/// The input is a `(grain, value)` pair and the output is the inner
/// transformer's output for that grain. New grains start from a clone of the
/// prototype, which never sees any data.
#[derive(Clone)]
pub struct GrainedTransformer<Tr> {
    prototype: Tr,
    transformers: BTreeMap<Grain, Tr>,
}

impl<Tr: Clone> GrainedTransformer<Tr> {
    /// Create a grained transformer from a freshly built prototype.
    pub fn new(prototype: Tr) -> Self {
        Self {
            prototype,
            transformers: BTreeMap::new(),
        }
    }

    /// Number of grains seen since creation or the last reset.
    pub fn grain_count(&self) -> usize {
        self.transformers.len()
    }

    /// Grains seen so far, in sorted order.
    pub fn grains(&self) -> impl Iterator<Item = &Grain> {
        self.transformers.keys()
    }

    /// Transformer serving `grain`, if the grain has been seen.
    pub fn transformer(&self, grain: &[String]) -> Option<&Tr> {
        self.transformers.get(grain)
    }

    /// Prototype used for new grains.
    pub fn prototype(&self) -> &Tr {
        &self.prototype
    }
}

impl<I, Tr> Transformer<(Grain, I)> for GrainedTransformer<Tr>
where
    Tr: Transformer<I> + Clone,
{
    type Output = Tr::Output;
    type State = Tr::State;

    fn execute(&mut self, (grain, input): (Grain, I)) -> Self::Output {
        let prototype = &self.prototype;
        self.transformers
            .entry(grain)
            .or_insert_with_key(|grain| {
                log::trace!("new grain {:?}", grain);
                prototype.clone()
            })
            .execute(input)
    }

    fn flush(&mut self) -> Vec<Self::Output> {
        self.transformers
            .values_mut()
            .flat_map(Transformer::flush)
            .collect()
    }

    fn get_state(&self) -> Self::State {
        self.prototype.get_state()
    }

    fn reset(&mut self) {
        self.transformers.clear();
    }
}

impl<Tr: fmt::Debug> fmt::Debug for GrainedTransformer<Tr> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GrainedTransformer")
            .field("prototype", &self.prototype)
            .field("grains", &self.transformers.len())
            .finish()
    }
}

/// Estimator producing a [`GrainedTransformer`] over a [`WindowFeaturizer`].
#[derive(Debug)]
pub struct GrainedRollingWindowEstimator<F: WindowFeaturizer> {
    inner: RollingWindowEstimator<F>,
}

impl<F: WindowFeaturizer> GrainedRollingWindowEstimator<F> {
    /// Create an estimator.
    ///
    /// # Errors
    ///
    /// Returns an invalid-argument error if any size is 0 or if
    /// `min_window_size > max_window_size`.
    pub fn new(
        calculation: F::Calculation,
        horizon: usize,
        max_window_size: usize,
        min_window_size: usize,
    ) -> Result<Self> {
        Ok(Self {
            inner: RollingWindowEstimator::new(calculation, horizon, max_window_size, min_window_size)?,
        })
    }

    /// Create an estimator from a configuration.
    ///
    /// # Errors
    ///
    /// Returns an invalid-argument error if `config` is invalid.
    pub fn with_config(calculation: F::Calculation, config: RollingWindowConfig) -> Result<Self> {
        Ok(Self {
            inner: RollingWindowEstimator::with_config(calculation, config)?,
        })
    }

    /// Calculation the produced featurizer applies.
    pub fn calculation(&self) -> F::Calculation {
        self.inner.calculation()
    }

    /// Configuration the produced featurizer uses.
    pub fn config(&self) -> &RollingWindowConfig {
        self.inner.config()
    }
}

impl<F: WindowFeaturizer + Clone> Estimator for GrainedRollingWindowEstimator<F> {
    type Transformer = GrainedTransformer<F>;

    fn training_state(&self) -> TrainingState {
        self.inner.training_state()
    }

    fn begin_training(&mut self) -> Result<()> {
        self.inner.begin_training()
    }

    fn complete_training(&mut self) -> Result<()> {
        self.inner.complete_training()
    }

    fn create_transformer(&mut self) -> Result<Self::Transformer> {
        Ok(GrainedTransformer::new(self.inner.create_transformer()?))
    }
}

/// Grained estimator for analytical rolling windows.
pub type GrainedAnalyticalRollingWindowEstimator<T> =
    GrainedRollingWindowEstimator<AnalyticalRollingWindowTransformer<T>>;

/// Grained estimator for simple rolling windows.
pub type GrainedSimpleRollingWindowEstimator<T> =
    GrainedRollingWindowEstimator<SimpleRollingWindowTransformer<T>>;
