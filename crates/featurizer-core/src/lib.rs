//! # featurizer-core
//!
//! Core types and traits for the rolling-featurizers library.
//!
//! This crate provides the foundational abstractions used by the featurizers:
//!
//! - [`CircularBuffer`] and [`CircularIterator`] - Fixed-capacity ring buffer
//!   with wrap-aware `[begin, end)` windows
//! - [`Nullable`] and [`HasNullable`] - Null sentinels for missing outputs
//! - [`Transformer`] and [`Estimator`] - Streaming transform and training traits
//!
//! ## Feature Flags
//!
//! - `serde` (default) - Enable serialization of persisted state
//!
//! ## Example
//!
//! ```rust
//! use featurizer_core::prelude::*;
//!
//! let mut buffer = CircularBuffer::new(4).unwrap();
//! for value in [1.0, 2.0, 3.0, 4.0, 5.0] {
//!     buffer.push(value);
//! }
//!
//! // Mean of the three oldest retained values.
//! let (begin, end) = buffer.range(3, 0);
//! let window = collect_range(begin, &end);
//! let mean = window.iter().sum::<f64>() / window.len() as f64;
//! assert_eq!(mean, 3.0);
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod error;
pub mod num;
pub mod prelude;
pub mod traits;
pub mod window;

// Re-export core types at crate root
pub use error::{FeaturizerError, Result, StateRestoreError};
pub use num::{HasNullable, Nullable};
pub use traits::{Estimator, TrainingLifecycle, TrainingState, Transformer, TransformerState};
pub use window::{collect_range, CircularBuffer, CircularIterator};
