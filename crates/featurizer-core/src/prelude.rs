//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and traits from
//! featurizer-core.
//!
//! # Example
//!
//! ```rust
//! use featurizer_core::prelude::*;
//!
//! let buffer: CircularBuffer<i32> = CircularBuffer::new(8).unwrap();
//! assert_eq!(buffer.begin(), buffer.end());
//! ```

// Core types
pub use crate::num::{HasNullable, Nullable};
pub use crate::window::{collect_range, CircularBuffer, CircularIterator};

// Error types
pub use crate::error::{FeaturizerError, Result, StateRestoreError};

// Traits
pub use crate::traits::{Estimator, TrainingLifecycle, TrainingState, Transformer};
