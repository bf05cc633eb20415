//! Error types for plasma-devices.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("element name must not be empty")]
    EmptyName,

    #[error("element {name} has invalid value {value}: {reason}")]
    InvalidValue {
        name: String,
        value: f64,
        reason: &'static str,
    },

    #[error("unknown element kind: {0:?}")]
    UnknownKind(char),

    #[error("element {name} was stamped without a branch-current slot")]
    MissingBranch { name: String },
}

pub type Result<T> = std::result::Result<T, Error>;
