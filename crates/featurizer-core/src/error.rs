//! Error types for featurizer construction and state handling.
//!
//! Only construction, lifecycle and state restoration can fail. Executing a
//! featurizer never returns an error: missing history is reported through the
//! output type's null value instead.

use thiserror::Error;

/// Result type alias for featurizer operations that may fail.
pub type Result<T> = core::result::Result<T, FeaturizerError>;

/// Errors that can occur while building or driving a featurizer.
#[derive(Debug, Error)]
pub enum FeaturizerError {
    /// A constructor argument is out of range.
    #[error("Invalid argument '{name}': {reason}")]
    InvalidArgument {
        /// Name of the offending parameter.
        name: &'static str,
        /// Description of the violated constraint.
        reason: &'static str,
    },

    /// An estimator method was called out of order.
    #[error("Invalid state: {0}")]
    InvalidState(&'static str),

    /// State restoration failed.
    #[error("State restoration failed")]
    StateError(#[from] StateRestoreError),

    /// Serialization or deserialization failed.
    #[error("Serialization failed: {context}")]
    Serialization {
        /// Context describing the serialization operation.
        context: String,
        /// Underlying serialization error message.
        source_message: String,
    },
}

impl FeaturizerError {
    /// Create an invalid-argument error.
    #[must_use]
    pub fn invalid_argument(name: &'static str, reason: &'static str) -> Self {
        Self::InvalidArgument { name, reason }
    }

    /// Create a serialization error with context.
    #[must_use]
    pub fn serialization(context: impl Into<String>, source: impl core::fmt::Display) -> Self {
        Self::Serialization {
            context: context.into(),
            source_message: source.to_string(),
        }
    }
}

/// Errors that can occur when restoring featurizer state.
#[derive(Debug, Error)]
pub enum StateRestoreError {
    /// State version mismatch.
    #[error("State version mismatch: expected {expected}, got {actual}")]
    VersionMismatch {
        /// Expected version.
        expected: String,
        /// Actual version found.
        actual: String,
    },

    /// State data is corrupted or invalid.
    #[error("Invalid state data: {0}")]
    InvalidData(String),

    /// Deserialization failed.
    #[error("Deserialization failed: {0}")]
    DeserializationError(String),
}
