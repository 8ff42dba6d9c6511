use cmis_types::{ObjectKey, ObjectKind};

/// Errors from document store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// An entity with this key already exists.
    #[error("duplicate {kind} key: {key}")]
    DuplicateKey { kind: ObjectKind, key: ObjectKey },

    /// A document or space references a parent space that does not exist.
    #[error("unknown parent space: {0}")]
    UnknownSpace(ObjectKey),

    /// Fixture serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error while reading a fixture.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The storage backend failed or is unavailable.
    #[error("store backend error: {0}")]
    Backend(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
