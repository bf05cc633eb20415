//! The integration-driver boundary.

use nalgebra::DVector;
use plasma_core::dae::DaeSystem;

use crate::error::{Error, Result};
use crate::initial::InitialState;
use crate::transient::result::RawTrajectory;
use crate::transient::types::{IntegratorConfig, TimeSpan};

/// An initial value problem for `A·dx/dt = B·x + c`.
#[derive(Debug, Clone)]
pub struct DaeProblem<'a> {
    pub system: &'a DaeSystem,
    pub x0: DVector<f64>,
    pub xdot0: DVector<f64>,
}

impl<'a> DaeProblem<'a> {
    /// Pair a system with a consistent initial state.
    pub fn new(system: &'a DaeSystem, initial: InitialState) -> Result<Self> {
        for len in [initial.x0.len(), initial.xdot0.len()] {
            if len != system.size() {
                return Err(Error::DimensionMismatch {
                    expected: system.size(),
                    actual: len,
                });
            }
        }
        Ok(Self {
            system,
            x0: initial.x0,
            xdot0: initial.xdot0,
        })
    }

    pub fn size(&self) -> usize {
        self.system.size()
    }
}

/// A time-stepping integrator for [`DaeProblem`]s.
///
/// Implementations return the state at every accepted (or resampled) time,
/// including `span.start`, and fail with [`Error::IntegrationFailed`]
/// carrying the last accepted point when they cannot reach `span.stop`.
pub trait DaeIntegrator {
    fn integrate(
        &self,
        problem: &DaeProblem<'_>,
        span: TimeSpan,
        config: &IntegratorConfig,
    ) -> Result<RawTrajectory>;
}
