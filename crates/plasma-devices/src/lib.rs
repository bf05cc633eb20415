//! Element models and MNA/DAE stamps for Plasma.
//!
//! This crate provides the five linear two-terminal elements:
//! - Passive elements: R, C, L
//! - Independent sources: V, I
//!
//! Elements are a closed tagged variant ([`ElementKind`]); each kind maps to
//! one DC stamp and one DAE stamp through [`ElementKind::dc_stamp`] and
//! [`ElementKind::dae_stamp`].

pub mod element;
pub mod error;
pub mod passive;
pub mod sources;
pub mod stamp;

pub use element::{Element, ElementKind};
pub use error::{Error, Result};
pub use stamp::{DaeStampFn, DcStampFn, Terminals};
