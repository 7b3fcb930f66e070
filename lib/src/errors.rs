//! Error type shared by the relation reader, writer and inverter.

use crate::relation::Relation;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The input does not open with `{ "<field>": [`.
    #[error("invalid input format: {0}")]
    Format(String),
    /// A relation carries a field outside the relation shape. The reader has
    /// already moved past the element, so the stream can continue.
    #[error("unknown field \"{field}\" in relation #{index}")]
    UnknownField { field: String, index: u64 },
    /// Any other malformed token, wrong value type or truncated input.
    #[error("failed to decode relation: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("failed to encode relation: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("subject_relation is not empty: {0}")]
    InvariantViolation(Box<Relation>),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("{} not found", .0.display())]
    NotFound(PathBuf),
    #[error("write after the relation writer was closed")]
    WriterClosed,
}

impl Error {
    /// Reports whether the driver may drop the offending relation and keep
    /// reading.
    pub fn is_skippable(&self) -> bool {
        matches!(self, Error::UnknownField { .. })
    }

    pub(crate) fn from_decode(e: serde_json::Error) -> Self {
        if e.is_io() {
            Error::Io(e.into())
        } else {
            Error::Decode(e)
        }
    }

    pub(crate) fn from_encode(e: serde_json::Error) -> Self {
        if e.is_io() {
            Error::Io(e.into())
        } else {
            Error::Encode(e)
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
