use cmis_types::ObjectKey;

use crate::entity::{Document, Space};
use crate::error::StoreResult;

/// Read access to the document/space store.
///
/// All implementations must satisfy these invariants:
/// - Lookups never mutate the store.
/// - A missing entity is `Ok(None)`; `Err` is reserved for backend failure.
/// - Child listings are returned in a stable, backend-defined order.
pub trait DocumentStore: Send + Sync {
    /// Read a document by key.
    fn find_document(&self, key: ObjectKey) -> StoreResult<Option<Document>>;

    /// Read a space by key.
    fn find_space(&self, key: ObjectKey) -> StoreResult<Option<Space>>;

    /// Documents filed directly in the given space.
    fn documents_by_space(&self, space_key: ObjectKey) -> StoreResult<Vec<Document>>;

    /// Spaces whose parent is the given space.
    fn child_spaces(&self, space_key: ObjectKey) -> StoreResult<Vec<Space>>;
}
