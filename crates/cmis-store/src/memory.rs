use std::collections::HashMap;
use std::path::Path;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;

use cmis_types::{ObjectKey, ObjectKind};

use crate::entity::{Document, Space, StoreFixture};
use crate::error::{StoreError, StoreResult};
use crate::traits::DocumentStore;

#[derive(Default)]
struct Inner {
    documents: HashMap<ObjectKey, Document>,
    spaces: HashMap<ObjectKey, Space>,
    /// Insertion order, used for listings and fixture export.
    document_order: Vec<ObjectKey>,
    space_order: Vec<ObjectKey>,
    /// Forward-edge indexes: space -> children in insertion order.
    documents_by_space: HashMap<ObjectKey, Vec<ObjectKey>>,
    spaces_by_parent: HashMap<ObjectKey, Vec<ObjectKey>>,
}

/// In-memory, map-based document store.
///
/// Intended for tests, fixtures, and embedding. Entities are held behind a
/// `RwLock` and cloned on read. Child listings preserve insertion order.
pub struct InMemoryDocumentStore {
    inner: RwLock<Inner>,
}

impl InMemoryDocumentStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
        }
    }

    /// Build a store from a fixture. Spaces are inserted before documents.
    pub fn from_fixture(fixture: StoreFixture) -> StoreResult<Self> {
        let store = Self::new();
        for space in fixture.spaces {
            store.insert_space(space)?;
        }
        for document in fixture.documents {
            store.insert_document(document)?;
        }
        Ok(store)
    }

    /// Load a JSON fixture file.
    pub fn load_fixture(path: &Path) -> StoreResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        let fixture: StoreFixture =
            serde_json::from_str(&raw).map_err(|e| StoreError::Serialization(e.to_string()))?;
        let store = Self::from_fixture(fixture)?;
        debug!(
            path = %path.display(),
            spaces = store.space_count(),
            documents = store.document_count(),
            "loaded store fixture"
        );
        Ok(store)
    }

    /// Export the current contents in insertion order.
    pub fn to_fixture(&self) -> StoreResult<StoreFixture> {
        let inner = self.read()?;
        Ok(StoreFixture {
            spaces: inner
                .space_order
                .iter()
                .filter_map(|k| inner.spaces.get(k).cloned())
                .collect(),
            documents: inner
                .document_order
                .iter()
                .filter_map(|k| inner.documents.get(k).cloned())
                .collect(),
        })
    }

    /// Insert a space. Its parent, if any, must already exist.
    pub fn insert_space(&self, space: Space) -> StoreResult<()> {
        let mut inner = self.write()?;
        if inner.spaces.contains_key(&space.key) {
            return Err(StoreError::DuplicateKey {
                kind: ObjectKind::Folder,
                key: space.key,
            });
        }
        if let Some(parent) = space.parent_key {
            if !inner.spaces.contains_key(&parent) {
                return Err(StoreError::UnknownSpace(parent));
            }
            inner.spaces_by_parent.entry(parent).or_default().push(space.key);
        }
        inner.space_order.push(space.key);
        inner.spaces.insert(space.key, space);
        Ok(())
    }

    /// Insert a document. Its space must already exist.
    pub fn insert_document(&self, document: Document) -> StoreResult<()> {
        let mut inner = self.write()?;
        if inner.documents.contains_key(&document.key) {
            return Err(StoreError::DuplicateKey {
                kind: ObjectKind::Document,
                key: document.key,
            });
        }
        if !inner.spaces.contains_key(&document.space_key) {
            return Err(StoreError::UnknownSpace(document.space_key));
        }
        inner
            .documents_by_space
            .entry(document.space_key)
            .or_default()
            .push(document.key);
        inner.document_order.push(document.key);
        inner.documents.insert(document.key, document);
        Ok(())
    }

    /// Number of documents currently stored.
    pub fn document_count(&self) -> usize {
        self.read().map(|inner| inner.documents.len()).unwrap_or(0)
    }

    /// Number of spaces currently stored.
    pub fn space_count(&self) -> usize {
        self.read().map(|inner| inner.spaces.len()).unwrap_or(0)
    }

    /// Returns `true` if the store holds no entities.
    pub fn is_empty(&self) -> bool {
        self.document_count() == 0 && self.space_count() == 0
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Inner>> {
        self.inner
            .read()
            .map_err(|e| StoreError::Backend(format!("lock poisoned: {e}")))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Inner>> {
        self.inner
            .write()
            .map_err(|e| StoreError::Backend(format!("lock poisoned: {e}")))
    }
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentStore for InMemoryDocumentStore {
    fn find_document(&self, key: ObjectKey) -> StoreResult<Option<Document>> {
        Ok(self.read()?.documents.get(&key).cloned())
    }

    fn find_space(&self, key: ObjectKey) -> StoreResult<Option<Space>> {
        Ok(self.read()?.spaces.get(&key).cloned())
    }

    fn documents_by_space(&self, space_key: ObjectKey) -> StoreResult<Vec<Document>> {
        let inner = self.read()?;
        Ok(inner
            .documents_by_space
            .get(&space_key)
            .into_iter()
            .flatten()
            .filter_map(|k| inner.documents.get(k).cloned())
            .collect())
    }

    fn child_spaces(&self, space_key: ObjectKey) -> StoreResult<Vec<Space>> {
        let inner = self.read()?;
        Ok(inner
            .spaces_by_parent
            .get(&space_key)
            .into_iter()
            .flatten()
            .filter_map(|k| inner.spaces.get(k).cloned())
            .collect())
    }
}

impl std::fmt::Debug for InMemoryDocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryDocumentStore")
            .field("space_count", &self.space_count())
            .field("document_count", &self.document_count())
            .finish()
    }
}
