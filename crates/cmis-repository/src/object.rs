//! Entity resolution: from an object id to a loaded document or space.

use std::collections::HashSet;

use tracing::debug;

use cmis_store::{Document, DocumentStore, Space};
use cmis_types::{ObjectKind, ObjectToken, ROOT_SENTINEL};

use crate::config::RepositoryConfig;
use crate::error::{RepositoryError, RepositoryResult};

/// The store entity behind a [`RepositoryObject`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Entity {
    Document(Document),
    Folder(Space),
}

/// A store entity resolved for the duration of one request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RepositoryObject {
    token: ObjectToken,
    entity: Entity,
}

/// Map an object id to a token, translating the root sentinel.
pub fn resolve_token(object_id: &str, config: &RepositoryConfig) -> RepositoryResult<ObjectToken> {
    if object_id == ROOT_SENTINEL {
        return Ok(config.root_token());
    }
    Ok(ObjectToken::decode(object_id)?)
}

impl RepositoryObject {
    /// Decode `object_id` and load its entity.
    pub fn resolve<S: DocumentStore + ?Sized>(
        store: &S,
        object_id: &str,
        config: &RepositoryConfig,
    ) -> RepositoryResult<Self> {
        let token = resolve_token(object_id, config)?;
        Self::load(store, token)
    }

    /// Load the entity a token names.
    pub fn load<S: DocumentStore + ?Sized>(store: &S, token: ObjectToken) -> RepositoryResult<Self> {
        let entity = match token.kind() {
            ObjectKind::Document => store.find_document(token.key())?.map(Entity::Document),
            ObjectKind::Folder => store.find_space(token.key())?.map(Entity::Folder),
        };
        let entity = entity.ok_or_else(|| RepositoryError::NotFound(format!("object {token}")))?;
        debug!(object = %token, "resolved object");
        Ok(Self { token, entity })
    }

    pub fn from_document(document: Document) -> Self {
        Self {
            token: document.token(),
            entity: Entity::Document(document),
        }
    }

    pub fn from_space(space: Space) -> Self {
        Self {
            token: space.token(),
            entity: Entity::Folder(space),
        }
    }

    pub fn token(&self) -> ObjectToken {
        self.token
    }

    /// The textual object id.
    pub fn id(&self) -> String {
        self.token.to_string()
    }

    pub fn kind(&self) -> ObjectKind {
        self.token.kind()
    }

    /// Document title or space name.
    pub fn name(&self) -> &str {
        match &self.entity {
            Entity::Document(d) => &d.title,
            Entity::Folder(s) => &s.name,
        }
    }

    pub fn entity(&self) -> &Entity {
        &self.entity
    }

    pub fn is_document(&self) -> bool {
        matches!(self.entity, Entity::Document(_))
    }

    pub fn is_folder(&self) -> bool {
        matches!(self.entity, Entity::Folder(_))
    }

    pub fn document(&self) -> RepositoryResult<&Document> {
        match &self.entity {
            Entity::Document(d) => Ok(d),
            Entity::Folder(_) => Err(self.wrong_kind(ObjectKind::Document)),
        }
    }

    pub fn space(&self) -> RepositoryResult<&Space> {
        match &self.entity {
            Entity::Folder(s) => Ok(s),
            Entity::Document(_) => Err(self.wrong_kind(ObjectKind::Folder)),
        }
    }

    /// Documents filed in this folder, in store order.
    pub fn child_documents<S: DocumentStore + ?Sized>(&self, store: &S) -> RepositoryResult<Vec<Document>> {
        let space = self.space()?;
        Ok(store.documents_by_space(space.key)?)
    }

    /// Child folders of this folder, in store order.
    pub fn child_folders<S: DocumentStore + ?Sized>(&self, store: &S) -> RepositoryResult<Vec<Space>> {
        let space = self.space()?;
        Ok(store.child_spaces(space.key)?)
    }

    /// Slash-separated path from the root folder.
    ///
    /// Walks parent keys up to a space without a parent or to the
    /// configured root. The walk is not depth-limited; a parent chain that
    /// loops back on itself is a runtime failure. A folder's path ends
    /// with its own name; a document's path is its folder's path joined
    /// with its title.
    pub fn path<S: DocumentStore + ?Sized>(
        &self,
        store: &S,
        config: &RepositoryConfig,
    ) -> RepositoryResult<String> {
        match &self.entity {
            Entity::Folder(space) => folder_path(store, space, config),
            Entity::Document(document) => {
                let folder = store.find_space(document.space_key)?.ok_or_else(|| {
                    RepositoryError::runtime(format!(
                        "document {} is filed in missing space {}",
                        document.key, document.space_key
                    ))
                })?;
                Ok(join_path(&folder_path(store, &folder, config)?, &document.title))
            }
        }
    }

    fn wrong_kind(&self, expected: ObjectKind) -> RepositoryError {
        RepositoryError::WrongKind {
            expected,
            found: self.kind(),
        }
    }
}

/// Append one segment to a folder path.
pub fn join_path(parent: &str, segment: &str) -> String {
    if parent.ends_with('/') {
        format!("{parent}{segment}")
    } else {
        format!("{parent}/{segment}")
    }
}

fn folder_path<S: DocumentStore + ?Sized>(
    store: &S,
    space: &Space,
    config: &RepositoryConfig,
) -> RepositoryResult<String> {
    let mut segments = Vec::new();
    let mut visited = HashSet::new();
    let mut current = space.clone();
    while current.key != config.root_folder_key {
        let Some(parent_key) = current.parent_key else {
            break;
        };
        if !visited.insert(current.key) {
            return Err(RepositoryError::runtime(format!(
                "parent chain of space {} loops at space {}",
                space.key, current.key
            )));
        }
        segments.push(current.name.clone());
        current = store.find_space(parent_key)?.ok_or_else(|| {
            RepositoryError::runtime(format!("space {} has missing parent {parent_key}", current.key))
        })?;
    }
    segments.reverse();
    Ok(format!("/{}", segments.join("/")))
}
