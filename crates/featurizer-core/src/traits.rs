//! Core trait definitions for transformers and estimators.
//!
//! A [`Transformer`] consumes one input at a time and produces one output per
//! input. An [`Estimator`] walks through a training lifecycle and then
//! creates exactly one transformer.

#[cfg(feature = "serde")]
use serde::{de::DeserializeOwned, Serialize};

use crate::error::{FeaturizerError, Result};

/// Persisted state trait bounds.
#[cfg(feature = "serde")]
pub trait TransformerState: Clone + Serialize + DeserializeOwned + Send + Sync {}

/// Persisted state trait bounds.
#[cfg(not(feature = "serde"))]
pub trait TransformerState: Clone + Send + Sync {}

#[cfg(feature = "serde")]
impl<T> TransformerState for T where T: Clone + Serialize + DeserializeOwned + Send + Sync {}

#[cfg(not(feature = "serde"))]
impl<T> TransformerState for T where T: Clone + Send + Sync {}

/// Core trait for streaming transformers.
///
/// Transformers are applied record by record. Any history they need is kept
/// as working state inside the transformer and is not part of
/// [`State`](Self::State), which only carries configuration.
///
/// # Example
///
/// ```rust,ignore
/// use featurizer_core::Transformer;
///
/// let mut transformer = AnalyticalRollingWindowTransformer::<i32>::with_defaults(
///     AnalyticalRollingWindowCalculation::Mean,
///     1,
///     3,
/// )?;
///
/// for value in [1, 2, 3, 4] {
///     let features = transformer.execute(value);
///     println!("{:?}", features);
/// }
/// ```
pub trait Transformer<I>: Send + Sync {
    /// Output produced for each input.
    type Output;

    /// Serializable configuration state.
    type State: TransformerState;

    /// Process one input and return its output.
    fn execute(&mut self, input: I) -> Self::Output;

    /// Emit any outputs still pending once the input stream has ended.
    ///
    /// Transformers that answer every input immediately have nothing to emit.
    fn flush(&mut self) -> Vec<Self::Output> {
        Vec::new()
    }

    /// Export the configuration state.
    fn get_state(&self) -> Self::State;

    /// Drop all working state, keeping the configuration.
    fn reset(&mut self);
}

/// Training lifecycle of an [`Estimator`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TrainingState {
    /// `begin_training` has not been called.
    #[default]
    Pending,
    /// The estimator accepts training data.
    Training,
    /// The estimator needs no more data and should be completed.
    Finished,
    /// `complete_training` has been called; a transformer may be created.
    Completed,
}

/// Core trait for estimators that produce a [`Transformer`].
pub trait Estimator: Send + Sync {
    /// Transformer produced once training is complete.
    type Transformer;

    /// Current lifecycle state.
    fn training_state(&self) -> TrainingState;

    /// Start training.
    ///
    /// # Errors
    ///
    /// Returns [`FeaturizerError::InvalidState`] unless the estimator is
    /// [`TrainingState::Pending`].
    fn begin_training(&mut self) -> Result<()>;

    /// Finish training.
    ///
    /// # Errors
    ///
    /// Returns [`FeaturizerError::InvalidState`] unless the estimator is
    /// training or finished.
    fn complete_training(&mut self) -> Result<()>;

    /// Create the transformer.
    ///
    /// # Errors
    ///
    /// Returns [`FeaturizerError::InvalidState`] if training is not complete
    /// or a transformer was already created.
    fn create_transformer(&mut self) -> Result<Self::Transformer>;
}

/// Shared bookkeeping for the [`Estimator`] lifecycle.
#[derive(Clone, Debug, Default)]
pub struct TrainingLifecycle {
    state: TrainingState,
    created_transformer: bool,
}

impl TrainingLifecycle {
    /// Create a lifecycle in [`TrainingState::Pending`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> TrainingState {
        self.state
    }

    /// Returns `true` once a transformer has been handed out.
    #[must_use]
    pub fn has_created_transformer(&self) -> bool {
        self.created_transformer
    }

    /// Move out of `Pending`.
    ///
    /// Estimators that need no training data pass `needs_data = false` and
    /// go straight to [`TrainingState::Finished`].
    ///
    /// # Errors
    ///
    /// Returns [`FeaturizerError::InvalidState`] if training already began.
    pub fn begin_training(&mut self, needs_data: bool) -> Result<()> {
        if self.state != TrainingState::Pending {
            return Err(FeaturizerError::InvalidState(
                "begin_training should not be invoked on an estimator that is already training or completed",
            ));
        }

        self.state = if needs_data {
            TrainingState::Training
        } else {
            TrainingState::Finished
        };
        Ok(())
    }

    /// Move to [`TrainingState::Completed`].
    ///
    /// # Errors
    ///
    /// Returns [`FeaturizerError::InvalidState`] unless training or finished.
    pub fn complete_training(&mut self) -> Result<()> {
        if self.state != TrainingState::Training && self.state != TrainingState::Finished {
            return Err(FeaturizerError::InvalidState(
                "complete_training should not be invoked on an estimator that is not training or is already complete",
            ));
        }

        self.state = TrainingState::Completed;
        Ok(())
    }

    /// Record that a transformer is being created.
    ///
    /// # Errors
    ///
    /// Returns [`FeaturizerError::InvalidState`] if training is not complete
    /// or a transformer was already created.
    pub fn claim_transformer(&mut self) -> Result<()> {
        if self.state != TrainingState::Completed {
            return Err(FeaturizerError::InvalidState(
                "create_transformer should not be invoked on an estimator that is not yet complete",
            ));
        }
        if self.created_transformer {
            return Err(FeaturizerError::InvalidState(
                "create_transformer should not be invoked on an estimator that has already created a transformer",
            ));
        }

        self.created_transformer = true;
        Ok(())
    }
}
