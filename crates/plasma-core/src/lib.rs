//! Core circuit structures for Plasma.
//!
//! This crate provides the data structures shared by every analysis:
//! the node label table that fixes the unknown-vector layout, and the
//! dense Modified Nodal Analysis (MNA) and Differential-Algebraic Equation
//! (DAE) systems that elements stamp into.

pub mod dae;
pub mod error;
pub mod layout;
pub mod mna;
pub mod node;
pub mod units;

pub use dae::DaeSystem;
pub use error::{Error, Result};
pub use layout::{BranchKind, Unknown, UnknownLayout};
pub use mna::MnaSystem;
pub use node::{NodeIndex, NodeLabel, NodeSlot};
