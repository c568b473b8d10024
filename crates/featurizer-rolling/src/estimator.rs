//! Estimators for the calculation-based rolling-window featurizers.
//!
//! Rolling windows learn nothing from training data, so every estimator here
//! goes from `Pending` straight to `Finished` when training begins.

use std::fmt;
use std::marker::PhantomData;

use featurizer_core::{
    error::{Result, StateRestoreError},
    traits::{Estimator, TrainingLifecycle, TrainingState},
};

use crate::rolling_window::{RollingWindowConfig, RollingWindowState};

/// A rolling-window featurizer defined by a calculation and a configuration.
pub trait WindowFeaturizer: Sized {
    /// Calculation applied to every window.
    type Calculation: Copy + PartialEq + fmt::Debug + Send + Sync + 'static;

    /// Build a featurizer.
    ///
    /// # Errors
    ///
    /// Returns an invalid-argument error if `config` is invalid.
    fn from_config(calculation: Self::Calculation, config: RollingWindowConfig) -> Result<Self>;

    /// Calculation applied to every window.
    fn calculation(&self) -> Self::Calculation;

    /// Window configuration.
    fn config(&self) -> &RollingWindowConfig;

    /// Export the persisted state.
    fn to_state(&self) -> RollingWindowState<Self::Calculation> {
        RollingWindowState::new(self.calculation(), self.config())
    }

    /// Rebuild a featurizer from persisted state.
    ///
    /// # Errors
    ///
    /// Returns a state error if the version differs or the stored sizes are
    /// invalid.
    fn from_state(state: RollingWindowState<Self::Calculation>) -> Result<Self> {
        state.check_version()?;
        log::debug!("restoring {:?} rolling window from state", state.calculation);

        Self::from_config(state.calculation, state.config())
            .map_err(|e| StateRestoreError::InvalidData(e.to_string()).into())
    }
}

/// Estimator producing one [`WindowFeaturizer`].
pub struct RollingWindowEstimator<F: WindowFeaturizer> {
    calculation: F::Calculation,
    config: RollingWindowConfig,
    lifecycle: TrainingLifecycle,
    _marker: PhantomData<fn() -> F>,
}

impl<F: WindowFeaturizer> RollingWindowEstimator<F> {
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
        Self::with_config(
            calculation,
            RollingWindowConfig::new(horizon, max_window_size).with_min_window_size(min_window_size),
        )
    }

    /// Create an estimator from a configuration.
    ///
    /// # Errors
    ///
    /// Returns an invalid-argument error if `config` is invalid.
    pub fn with_config(calculation: F::Calculation, config: RollingWindowConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            calculation,
            config,
            lifecycle: TrainingLifecycle::new(),
            _marker: PhantomData,
        })
    }

    /// Calculation the produced featurizer applies.
    pub fn calculation(&self) -> F::Calculation {
        self.calculation
    }

    /// Configuration the produced featurizer uses.
    pub fn config(&self) -> &RollingWindowConfig {
        &self.config
    }
}

impl<F: WindowFeaturizer> fmt::Debug for RollingWindowEstimator<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RollingWindowEstimator")
            .field("calculation", &self.calculation)
            .field("config", &self.config)
            .field("state", &self.lifecycle.state())
            .finish()
    }
}

impl<F: WindowFeaturizer> Estimator for RollingWindowEstimator<F> {
    type Transformer = F;

    fn training_state(&self) -> TrainingState {
        self.lifecycle.state()
    }

    fn begin_training(&mut self) -> Result<()> {
        self.lifecycle.begin_training(false)
    }

    fn complete_training(&mut self) -> Result<()> {
        self.lifecycle.complete_training()
    }

    fn create_transformer(&mut self) -> Result<F> {
        self.lifecycle.claim_transformer()?;
        F::from_config(self.calculation, self.config.clone())
    }
}
