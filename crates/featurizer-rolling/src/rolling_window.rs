//! Generic rolling-window transformer.
//!
//! Every input is pushed into a [`CircularBuffer`] of capacity
//! `horizon + max_window_size`. For each horizon offset the transformer picks
//! the window of history that ends `horizon - offset` positions before the
//! newest value and hands it to a reducer as a `[begin, end)` iterator pair.

use std::fmt;
use std::sync::Arc;

use featurizer_core::{
    error::{FeaturizerError, Result, StateRestoreError},
    num::Nullable,
    traits::Transformer,
    window::{CircularBuffer, CircularIterator},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Version tag written into every [`RollingWindowState`].
pub const STATE_VERSION: u32 = 1;

/// Reducer applied to one window: receives `[begin, end)` and returns one value.
pub type Reducer<I, O> =
    Arc<dyn for<'a> Fn(CircularIterator<'a, I>, CircularIterator<'a, I>) -> O + Send + Sync>;

/// Configuration for a rolling-window transformer.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RollingWindowConfig {
    /// Number of forecast offsets; one output per offset.
    pub horizon: usize,
    /// Largest number of values fed to the reducer.
    pub max_window_size: usize,
    /// Smallest number of values required before a non-null output.
    pub min_window_size: usize,
}

impl Default for RollingWindowConfig {
    fn default() -> Self {
        Self {
            horizon: 1,
            max_window_size: 1,
            min_window_size: 1,
        }
    }
}

impl RollingWindowConfig {
    /// Create a configuration with `min_window_size = 1`.
    pub fn new(horizon: usize, max_window_size: usize) -> Self {
        Self {
            horizon,
            max_window_size,
            min_window_size: 1,
        }
    }

    /// Set the minimum window size.
    pub fn with_min_window_size(mut self, min_window_size: usize) -> Self {
        self.min_window_size = min_window_size;
        self
    }

    /// Capacity of the history buffer needed to serve every offset.
    ///
    /// Saturates at `usize::MAX`; [`validate`](Self::validate) rejects
    /// configurations where the sum overflows.
    pub fn buffer_capacity(&self) -> usize {
        self.horizon.saturating_add(self.max_window_size)
    }

    /// Check the parameter constraints.
    ///
    /// # Errors
    ///
    /// Returns [`FeaturizerError::InvalidArgument`] if any size is 0, if
    /// `min_window_size > max_window_size`, or if `horizon + max_window_size`
    /// overflows.
    pub fn validate(&self) -> Result<()> {
        if self.max_window_size < 1 {
            return Err(FeaturizerError::invalid_argument(
                "maxWindowSize",
                "must be >= 1",
            ));
        }
        if self.horizon < 1 {
            return Err(FeaturizerError::invalid_argument("horizon", "must be >= 1"));
        }
        if self.min_window_size < 1 {
            return Err(FeaturizerError::invalid_argument(
                "minWindowSize",
                "must be >= 1",
            ));
        }
        if self.min_window_size > self.max_window_size {
            return Err(FeaturizerError::invalid_argument(
                "minWindowSize",
                "minWindowSize must be smaller than maxWindowSize",
            ));
        }
        if self.horizon.checked_add(self.max_window_size).is_none() {
            return Err(FeaturizerError::invalid_argument(
                "maxWindowSize",
                "horizon + maxWindowSize overflows",
            ));
        }
        Ok(())
    }
}

/// Persisted state of a rolling-window featurizer.
///
/// Only configuration is stored. The window history is rebuilt from the live
/// input stream.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RollingWindowState<C> {
    /// Version tag for state compatibility.
    pub version: u32,
    /// Calculation applied to each window.
    pub calculation: C,
    /// Number of forecast offsets.
    pub horizon: usize,
    /// Largest window size.
    pub max_window_size: usize,
    /// Smallest window size.
    pub min_window_size: usize,
}

impl<C> RollingWindowState<C> {
    /// Build the current-version state for a calculation and configuration.
    pub fn new(calculation: C, config: &RollingWindowConfig) -> Self {
        Self {
            version: STATE_VERSION,
            calculation,
            horizon: config.horizon,
            max_window_size: config.max_window_size,
            min_window_size: config.min_window_size,
        }
    }

    /// Configuration stored in this state.
    pub fn config(&self) -> RollingWindowConfig {
        RollingWindowConfig {
            horizon: self.horizon,
            max_window_size: self.max_window_size,
            min_window_size: self.min_window_size,
        }
    }

    /// Fail unless the state was written by the current version.
    ///
    /// # Errors
    ///
    /// Returns [`StateRestoreError::VersionMismatch`] wrapped in
    /// [`FeaturizerError::StateError`].
    pub fn check_version(&self) -> Result<()> {
        if self.version != STATE_VERSION {
            return Err(StateRestoreError::VersionMismatch {
                expected: STATE_VERSION.to_string(),
                actual: self.version.to_string(),
            }
            .into());
        }
        Ok(())
    }
}

#[cfg(feature = "serde")]
impl<C> RollingWindowState<C>
where
    C: Serialize + serde::de::DeserializeOwned,
{
    /// Serialize the state to JSON.
    ///
    /// # Errors
    ///
    /// Returns [`FeaturizerError::Serialization`] if encoding fails.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| FeaturizerError::serialization("saving rolling window state", e))
    }

    /// Deserialize a state from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`StateRestoreError::DeserializationError`] if decoding fails.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| StateRestoreError::DeserializationError(e.to_string()).into())
    }
}

/// Rolling-window transformer with a caller-supplied reducer.
///
/// For each input the transformer emits `horizon` values. The value at
/// `offset` summarizes the window ending `horizon - offset` positions before
/// the newest input, so offset 0 looks furthest back. A slot holds
/// [`Nullable::null`] while fewer than `min_window_size` values are
/// available for it.
///
/// # Example
///
/// ```rust
/// use featurizer_rolling::{RollingWindowConfig, RollingWindowTransformer};
///
/// let mut sum = RollingWindowTransformer::new(
///     |begin, _end| begin.map(|v: &i32| f64::from(*v)).sum::<f64>(),
///     RollingWindowConfig::new(1, 2),
/// )
/// .unwrap();
///
/// assert!(sum.execute(10)[0].is_nan());
/// assert_eq!(sum.execute(20), vec![10.0]);
/// assert_eq!(sum.execute(30), vec![30.0]);
/// ```
pub struct RollingWindowTransformer<I, O> {
    config: RollingWindowConfig,
    reducer: Reducer<I, O>,
    buffer: CircularBuffer<I>,
}

impl<I, O> RollingWindowTransformer<I, O>
where
    O: Nullable,
{
    /// Create a transformer from a reducer closure.
    ///
    /// # Errors
    ///
    /// Returns [`FeaturizerError::InvalidArgument`] if the configuration is
    /// invalid.
    pub fn new<F>(reducer: F, config: RollingWindowConfig) -> Result<Self>
    where
        F: for<'a> Fn(CircularIterator<'a, I>, CircularIterator<'a, I>) -> O + Send + Sync + 'static,
    {
        Self::with_shared_reducer(Arc::new(reducer), config)
    }

    /// Create a transformer from a shared reducer.
    ///
    /// Transformers built from clones of the same [`Reducer`] compare equal
    /// when their configurations match.
    ///
    /// # Errors
    ///
    /// Returns [`FeaturizerError::InvalidArgument`] if the configuration is
    /// invalid.
    pub fn with_shared_reducer(reducer: Reducer<I, O>, config: RollingWindowConfig) -> Result<Self> {
        config.validate()?;
        let buffer = CircularBuffer::new(config.buffer_capacity())?;

        log::debug!(
            "rolling window transformer: horizon={}, max_window_size={}, min_window_size={}",
            config.horizon,
            config.max_window_size,
            config.min_window_size
        );

        Ok(Self {
            config,
            reducer,
            buffer,
        })
    }

    /// Number of forecast offsets.
    pub fn horizon(&self) -> usize {
        self.config.horizon
    }

    /// Largest window size.
    pub fn max_window_size(&self) -> usize {
        self.config.max_window_size
    }

    /// Smallest window size.
    pub fn min_window_size(&self) -> usize {
        self.config.min_window_size
    }

    /// Get a reference to the current configuration.
    pub fn config(&self) -> &RollingWindowConfig {
        &self.config
    }

    /// Number of values currently retained.
    pub fn history_len(&self) -> usize {
        self.buffer.size()
    }

    /// Window length and offset from the oldest retained value for `offset`,
    /// or `None` if the minimum window is not yet available.
    fn window_for(&self, offset: usize) -> Option<(usize, usize)> {
        let size = self.buffer.size();
        let lead = self.config.horizon - offset;

        if size < lead + self.config.min_window_size {
            return None;
        }

        if size < self.config.max_window_size + lead {
            Some((size - lead, 0))
        } else {
            // size >= capacity - offset here, so the subtraction cannot wrap.
            let slack = self.buffer.capacity() - size;
            Some((self.config.max_window_size, offset - slack))
        }
    }

    /// Push `input` and compute one value per horizon offset.
    pub fn execute(&mut self, input: I) -> Vec<O> {
        self.buffer.push(input);

        (0..self.config.horizon)
            .map(|offset| match self.window_for(offset) {
                Some((n, start)) => {
                    let (begin, end) = self.buffer.range(n, start);
                    (self.reducer)(begin, end)
                }
                None => O::null(),
            })
            .collect()
    }

    /// Drop the accumulated history.
    pub fn reset(&mut self) {
        self.buffer.clear();
    }
}

impl<I, O> Transformer<I> for RollingWindowTransformer<I, O>
where
    I: Send + Sync,
    O: Nullable,
{
    type Output = Vec<O>;
    type State = RollingWindowConfig;

    fn execute(&mut self, input: I) -> Vec<O> {
        RollingWindowTransformer::execute(self, input)
    }

    fn get_state(&self) -> Self::State {
        self.config.clone()
    }

    fn reset(&mut self) {
        RollingWindowTransformer::reset(self);
    }
}

impl<I: Clone, O> Clone for RollingWindowTransformer<I, O> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            reducer: Arc::clone(&self.reducer),
            buffer: self.buffer.clone(),
        }
    }
}

impl<I, O> fmt::Debug for RollingWindowTransformer<I, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RollingWindowTransformer")
            .field("config", &self.config)
            .field("history_len", &self.buffer.size())
            .finish()
    }
}

impl<I, O> PartialEq for RollingWindowTransformer<I, O> {
    /// Compares configuration and reducer identity, never the history.
    fn eq(&self, other: &Self) -> bool {
        self.config == other.config && Arc::ptr_eq(&self.reducer, &other.reducer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn mean(begin: CircularIterator<'_, i32>, end: CircularIterator<'_, i32>) -> f64 {
        let mut cursor = begin;
        let mut sum = 0.0;
        let mut count = 0usize;
        while cursor != end {
            sum += f64::from(*cursor.post_advance().get());
            count += 1;
        }
        if count == 0 {
            f64::NAN
        } else {
            sum / count as f64
        }
    }

    fn transformer(horizon: usize, max: usize, min: usize) -> RollingWindowTransformer<i32, f64> {
        RollingWindowTransformer::new(
            mean,
            RollingWindowConfig::new(horizon, max).with_min_window_size(min),
        )
        .unwrap()
    }

    #[test]
    fn test_config_default() {
        let config = RollingWindowConfig::default();
        assert_eq!(config.horizon, 1);
        assert_eq!(config.max_window_size, 1);
        assert_eq!(config.min_window_size, 1);
        assert_eq!(config.buffer_capacity(), 2);
    }

    #[test]
    fn test_config_validation() {
        assert!(RollingWindowConfig::new(1, 1).validate().is_ok());

        let err = RollingWindowConfig::new(1, 0).validate().unwrap_err();
        assert!(err.to_string().contains("maxWindowSize"));

        let err = RollingWindowConfig::new(0, 1).validate().unwrap_err();
        assert!(err.to_string().contains("horizon"));

        let err = RollingWindowConfig::new(1, 1)
            .with_min_window_size(0)
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("minWindowSize"));

        let err = RollingWindowConfig::new(1, 2)
            .with_min_window_size(3)
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("smaller than maxWindowSize"));
    }

    #[test]
    fn test_oversized_config_is_rejected() {
        let config = RollingWindowConfig::new(2, usize::MAX - 1);
        assert!(matches!(
            config.validate(),
            Err(FeaturizerError::InvalidArgument { name: "maxWindowSize", .. })
        ));
        assert_eq!(config.buffer_capacity(), usize::MAX);

        let err = RollingWindowTransformer::new(mean, config).unwrap_err();
        assert!(matches!(err, FeaturizerError::InvalidArgument { name: "maxWindowSize", .. }));

        let err = RollingWindowTransformer::new(mean, RollingWindowConfig::new(usize::MAX, 1)).unwrap_err();
        assert!(err.to_string().contains("overflows"));
    }

    #[test]
    fn test_buffer_capacity_is_horizon_plus_window() {
        let mut t = transformer(3, 4, 1);
        for value in 0..20 {
            t.execute(value);
        }
        assert_eq!(t.history_len(), 7);
    }

    #[test]
    fn test_window_three_horizon_one() {
        let mut t = transformer(1, 3, 1);

        assert!(t.execute(1)[0].is_nan());
        assert_relative_eq!(t.execute(2)[0], 1.0);
        assert_relative_eq!(t.execute(3)[0], 1.5);
        assert_relative_eq!(t.execute(4)[0], 2.0);
        assert_relative_eq!(t.execute(5)[0], 3.0);
        assert_relative_eq!(t.execute(6)[0], 4.0);
    }

    #[test]
    fn test_window_two_horizon_two() {
        let mut t = transformer(2, 2, 1);

        let out = t.execute(1);
        assert_eq!(out.len(), 2);
        assert!(out[0].is_nan());
        assert!(out[1].is_nan());

        let out = t.execute(2);
        assert!(out[0].is_nan());
        assert_relative_eq!(out[1], 1.0);

        let out = t.execute(3);
        assert_relative_eq!(out[0], 1.0);
        assert_relative_eq!(out[1], 1.5);

        let out = t.execute(4);
        assert_relative_eq!(out[0], 1.5);
        assert_relative_eq!(out[1], 2.5);

        let out = t.execute(5);
        assert_relative_eq!(out[0], 2.5);
        assert_relative_eq!(out[1], 3.5);
    }

    #[test]
    fn test_min_window_gates_output() {
        let mut t = transformer(2, 2, 2);

        let out = t.execute(1);
        assert!(out[0].is_nan() && out[1].is_nan());

        let out = t.execute(2);
        assert!(out[0].is_nan() && out[1].is_nan());

        let out = t.execute(3);
        assert!(out[0].is_nan());
        assert_relative_eq!(out[1], 1.5);

        let out = t.execute(4);
        assert_relative_eq!(out[0], 1.5);
        assert_relative_eq!(out[1], 2.5);
    }

    #[test]
    fn test_reset_clears_history() {
        let mut t = transformer(1, 2, 1);
        t.execute(1);
        t.execute(2);
        t.reset();

        assert_eq!(t.history_len(), 0);
        assert!(t.execute(10)[0].is_nan());
        assert_relative_eq!(t.execute(20)[0], 10.0);
    }

    #[test]
    fn test_flush_is_empty() {
        let mut t = transformer(1, 2, 1);
        t.execute(1);
        assert!(Transformer::flush(&mut t).is_empty());
    }

    #[test]
    fn test_equality_ignores_history() {
        let reducer: Reducer<i32, f64> = Arc::new(mean);
        let config = RollingWindowConfig::new(2, 3);

        let mut a = RollingWindowTransformer::with_shared_reducer(Arc::clone(&reducer), config.clone()).unwrap();
        let b = RollingWindowTransformer::with_shared_reducer(Arc::clone(&reducer), config.clone()).unwrap();
        for value in 0..10 {
            a.execute(value);
        }
        assert_eq!(a, b);

        let c = RollingWindowTransformer::with_shared_reducer(reducer, RollingWindowConfig::new(2, 4)).unwrap();
        assert_ne!(a, c);

        // Separate reducer allocations are different reducers.
        let d = RollingWindowTransformer::new(mean, config).unwrap();
        assert_ne!(a, d);
    }

    #[test]
    fn test_get_state_is_config() {
        let t = transformer(3, 5, 2);
        let state = Transformer::get_state(&t);
        assert_eq!(state, RollingWindowConfig::new(3, 5).with_min_window_size(2));
    }

    #[test]
    fn test_state_version_check() {
        let config = RollingWindowConfig::new(1, 2);
        let mut state = RollingWindowState::new("mean", &config);
        assert!(state.check_version().is_ok());
        assert_eq!(state.config(), config);

        state.version = 2;
        assert!(matches!(
            state.check_version(),
            Err(FeaturizerError::StateError(StateRestoreError::VersionMismatch { .. }))
        ));
    }
}
