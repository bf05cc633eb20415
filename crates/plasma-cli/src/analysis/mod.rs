//! Analysis runners for DC operating point and transient simulation.

pub mod dc;
pub mod transient;

pub use dc::run_dc_op;
pub use transient::{TransientOptions, run_transient};
