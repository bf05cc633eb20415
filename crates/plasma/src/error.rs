//! Error types for circuit construction and analysis.

use thiserror::Error;

use crate::solution::OperatingPoint;

/// Errors raised while building a circuit.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("element {name} has both terminals at ground")]
    NoTerminals { name: String },

    #[error("duplicate element name: {0}")]
    DuplicateName(String),

    #[error(transparent)]
    Label(#[from] plasma_core::Error),

    #[error(transparent)]
    Element(#[from] plasma_devices::Error),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("topology error: {0}")]
    Topology(#[from] TopologyError),

    #[error(
        "singular system{}",
        .node.as_ref().map(|n| format!(" at node {n}")).unwrap_or_default()
    )]
    SingularSystem {
        /// Label of the node that cannot be determined, when known.
        node: Option<String>,
        #[source]
        source: plasma_solver::Error,
    },

    #[error("integration failed at t = {time:e} after {steps} steps: {reason}")]
    IntegrationFailure {
        time: f64,
        steps: usize,
        reason: String,
        /// Last valid state, labeled.
        last_state: Option<OperatingPoint>,
    },

    #[error("inconsistent initial conditions: {source}")]
    InconsistentInitialCondition {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("solver error: {0}")]
    Solver(#[source] plasma_solver::Error),
}

impl From<plasma_core::Error> for Error {
    fn from(err: plasma_core::Error) -> Self {
        Error::Topology(TopologyError::Label(err))
    }
}

impl From<plasma_devices::Error> for Error {
    fn from(err: plasma_devices::Error) -> Self {
        Error::Topology(TopologyError::Element(err))
    }
}

impl From<plasma_solver::Error> for Error {
    fn from(err: plasma_solver::Error) -> Self {
        match err {
            plasma_solver::Error::InvalidConfig(msg) => Error::InvalidConfig(msg),
            plasma_solver::Error::SingularMatrix { .. } => Error::SingularSystem {
                node: None,
                source: err,
            },
            plasma_solver::Error::IntegrationFailed {
                time,
                steps,
                reason,
                ..
            } => Error::IntegrationFailure {
                time,
                steps,
                reason,
                last_state: None,
            },
            plasma_solver::Error::InconsistentInitialCondition { .. } => {
                Error::InconsistentInitialCondition {
                    source: Box::new(err),
                }
            }
            other => Error::Solver(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
