//! # featurizer-rolling
//!
//! Rolling-window featurizers for the rolling-featurizers library.
//!
//! Each featurizer keeps a bounded history of its inputs and, for every new
//! input, emits one value per forecast horizon offset:
//!
//! - [`RollingWindowTransformer`]: Generic window driver with a custom reducer
//! - [`AnalyticalRollingWindowTransformer`]: Window mean as `f64`
//! - [`SimpleRollingWindowTransformer`]: Window minimum or maximum
//! - [`GrainedTransformer`]: One independent window per grain key
//!
//! # Example
//!
//! ```rust
//! use featurizer_rolling::prelude::*;
//!
//! let mut estimator = AnalyticalRollingWindowEstimator::<i32>::new(
//!     AnalyticalRollingWindowCalculation::Mean,
//!     2,
//!     2,
//!     1,
//! )?;
//! estimator.begin_training()?;
//! estimator.complete_training()?;
//! let mut transformer = estimator.create_transformer()?;
//!
//! transformer.execute(1);
//! transformer.execute(2);
//! assert_eq!(transformer.execute(3), vec![1.0, 1.5]);
//! # Ok::<(), featurizer_core::FeaturizerError>(())
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

mod analytical;
mod calculators;
mod estimator;
mod grained;
mod rolling_window;
mod simple;

pub mod prelude;

pub use analytical::{
    AnalyticalRollingWindowCalculation, AnalyticalRollingWindowEstimator, AnalyticalRollingWindowState,
    AnalyticalRollingWindowTransformer,
};
pub use calculators::{Calculator, MaxCalculator, MeanCalculator, MinCalculator};
pub use estimator::{RollingWindowEstimator, WindowFeaturizer};
pub use grained::{
    Grain, GrainedAnalyticalRollingWindowEstimator, GrainedRollingWindowEstimator,
    GrainedSimpleRollingWindowEstimator, GrainedTransformer,
};
pub use rolling_window::{
    Reducer, RollingWindowConfig, RollingWindowState, RollingWindowTransformer, STATE_VERSION,
};
pub use simple::{
    SimpleRollingWindowCalculation, SimpleRollingWindowEstimator, SimpleRollingWindowState,
    SimpleRollingWindowTransformer,
};
