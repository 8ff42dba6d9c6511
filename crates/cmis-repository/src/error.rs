use cmis_schema::SchemaError;
use cmis_store::StoreError;
use cmis_types::{ObjectKind, TypeError};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors surfaced by repository operations.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// A caller-supplied argument is malformed or out of range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The requested object or type does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The operation is not supported for this object or these arguments.
    #[error("not supported: {0}")]
    NotSupported(String),

    /// A kind-specific accessor was used on the other kind of object.
    #[error("wrong object kind: expected {expected}, found {found}")]
    WrongKind {
        expected: ObjectKind,
        found: ObjectKind,
    },

    /// Unexpected failure, usually from the store.
    #[error("runtime failure: {message}")]
    Runtime {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// Configuration could not be read or is invalid.
    #[error("configuration error: {0}")]
    Config(String),
}

impl RepositoryError {
    /// A runtime failure without an underlying cause.
    pub fn runtime(message: impl Into<String>) -> Self {
        Self::Runtime {
            message: message.into(),
            source: None,
        }
    }

    /// A runtime failure wrapping its cause.
    pub fn wrap(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Runtime {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<TypeError> for RepositoryError {
    fn from(e: TypeError) -> Self {
        Self::InvalidArgument(e.to_string())
    }
}

impl From<SchemaError> for RepositoryError {
    fn from(e: SchemaError) -> Self {
        match e {
            SchemaError::TypeNotFound(_) => Self::NotFound(e.to_string()),
            SchemaError::InvalidType { .. } | SchemaError::InvalidArgument(_) => {
                Self::InvalidArgument(e.to_string())
            }
        }
    }
}

impl From<StoreError> for RepositoryError {
    fn from(e: StoreError) -> Self {
        Self::wrap(e.to_string(), e)
    }
}

/// Convenience type alias for repository operations.
pub type RepositoryResult<T> = std::result::Result<T, RepositoryError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn type_errors_are_invalid_arguments() {
        let err: RepositoryError = TypeError::InvalidIdentifier("X1".into()).into();
        assert!(matches!(err, RepositoryError::InvalidArgument(_)));
    }

    #[test]
    fn schema_errors_map_by_variant() {
        let missing: RepositoryError = SchemaError::TypeNotFound("my:none".into()).into();
        assert!(missing.is_not_found());

        let depth: RepositoryError = SchemaError::InvalidArgument("depth".into()).into();
        assert!(matches!(depth, RepositoryError::InvalidArgument(_)));

        let invalid: RepositoryError = SchemaError::InvalidType {
            id: "".into(),
            reason: "blank".into(),
        }
        .into();
        assert!(matches!(invalid, RepositoryError::InvalidArgument(_)));
    }

    #[test]
    fn store_errors_keep_their_source() {
        let err: RepositoryError = StoreError::Backend("disk gone".into()).into();
        assert!(matches!(err, RepositoryError::Runtime { .. }));
        let source = err.source().unwrap();
        assert!(source.to_string().contains("disk gone"));
    }

    #[test]
    fn display_formats() {
        let err = RepositoryError::WrongKind {
            expected: ObjectKind::Document,
            found: ObjectKind::Folder,
        };
        assert_eq!(
            err.to_string(),
            "wrong object kind: expected document, found folder"
        );
        assert_eq!(
            RepositoryError::runtime("boom").to_string(),
            "runtime failure: boom"
        );
    }
}
