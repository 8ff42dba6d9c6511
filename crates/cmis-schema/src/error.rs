//! Error types for type registry operations.

use thiserror::Error;

/// Errors that can occur during type registry operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// The type definition cannot be registered.
    #[error("invalid type {id:?}: {reason}")]
    InvalidType { id: String, reason: String },

    /// No type is registered under this id.
    #[error("type '{0}' is unknown")]
    TypeNotFound(String),

    /// A query argument is out of range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Convenience type alias for registry operations.
pub type SchemaResult<T> = std::result::Result<T, SchemaError>;
