//! Error types for plasma-core.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid node label: {0:?}")]
    InvalidLabel(String),

    #[error("node not found: {0}")]
    UnknownNode(String),

    #[error("invalid dimensions: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
