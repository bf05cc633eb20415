//! Transient analysis of `A·dx/dt = B·x + c`.
//!
//! # Module Structure
//!
//! - [`types`] - Time span and integrator configuration
//! - [`result`] - Raw trajectories with interpolation support
//! - [`integrator`] - The [`DaeIntegrator`] boundary and its problem type
//! - [`bdf`] - Built-in variable-step, variable-order BDF integrator

pub mod bdf;
pub mod integrator;
pub mod result;
pub mod types;

pub use bdf::BdfIntegrator;
pub use integrator::{DaeIntegrator, DaeProblem};
pub use result::{IntegrationStats, RawTrajectory, TimePoint};
pub use types::{IntegratorConfig, TimeSpan};
