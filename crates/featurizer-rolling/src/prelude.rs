//! Prelude for featurizer-rolling.
//!
//! This module re-exports all commonly used types and traits.

pub use crate::analytical::{
    AnalyticalRollingWindowCalculation, AnalyticalRollingWindowEstimator, AnalyticalRollingWindowTransformer,
};
pub use crate::estimator::{RollingWindowEstimator, WindowFeaturizer};
pub use crate::grained::{
    Grain, GrainedAnalyticalRollingWindowEstimator, GrainedSimpleRollingWindowEstimator, GrainedTransformer,
};
pub use crate::rolling_window::{RollingWindowConfig, RollingWindowState, RollingWindowTransformer};
pub use crate::simple::{
    SimpleRollingWindowCalculation, SimpleRollingWindowEstimator, SimpleRollingWindowTransformer,
};

// Re-export core traits
pub use featurizer_core::traits::{Estimator, TrainingState, Transformer};
