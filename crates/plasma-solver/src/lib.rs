//! Linear and transient solvers for Plasma.
//!
//! This crate provides:
//! - Dense linear solves with singularity detection
//! - DC operating point of an assembled MNA system
//! - Consistent initial conditions for a DAE system
//! - The integration-driver boundary ([`DaeIntegrator`]) and a built-in
//!   variable-step, variable-order BDF integrator

pub mod dc;
pub mod error;
pub mod initial;
pub mod linear;
pub mod transient;

pub use dc::{DcSolution, solve_dc};
pub use error::{Error, Result};
pub use initial::{CONSISTENCY_TOLERANCE, InitialState, consistent_initial_state};
pub use linear::solve_dense;
pub use transient::{
    BdfIntegrator, DaeIntegrator, DaeProblem, IntegrationStats, IntegratorConfig, RawTrajectory,
    TimePoint, TimeSpan,
};
