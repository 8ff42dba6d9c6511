use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid object identifier: {0:?}")]
    InvalidIdentifier(String),

    #[error("unknown base type id: {0}")]
    UnknownBaseType(String),
}
