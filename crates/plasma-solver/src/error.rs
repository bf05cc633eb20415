//! Error types for plasma-solver.

use thiserror::Error;

use crate::transient::TimePoint;

#[derive(Debug, Error)]
pub enum Error {
    /// LU elimination found no usable pivot at position `row`. Columns are
    /// not permuted, so `row` is also the unknown the system cannot fix.
    #[error("singular matrix at pivot {row}")]
    SingularMatrix { row: usize },

    #[error("invalid matrix dimensions: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("integration failed at t = {time:e} after {steps} steps: {reason}")]
    IntegrationFailed {
        time: f64,
        steps: usize,
        reason: String,
        /// Last accepted point.
        last_state: Option<TimePoint>,
    },

    #[error("initial state violates algebraic row {row} (residual {residual:e})")]
    InconsistentInitialCondition { row: usize, residual: f64 },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Core(#[from] plasma_core::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
