//! CMIS repository projection engine.
//!
//! Exposes a [`DocumentStore`](cmis_store::DocumentStore) as a read-only
//! CMIS repository: object ids are resolved to store entities, entities are
//! projected into filtered property bags, and folders are listed page by
//! page or walked as depth-bounded trees.
//!
//! # Key Types
//!
//! - [`DocumentRepository`] - The facade answering every read operation
//! - [`RepositoryObject`] - A resolved document or space
//! - [`PropertyFilter`] - Parsed client property filter
//! - [`RepositoryConfig`] - Identity, root folder, and traversal limits
//! - [`RepositoryInfo`] - Static capabilities and ACL description
//!
//! # Design Rules
//!
//! 1. Nothing is cached between calls; each request resolves fresh objects.
//! 2. The type registry is shared behind an `Arc` and never mutated by a request.
//! 3. Tree walks use an explicit stack and stop at `max_tree_depth` levels.
//! 4. Store failures surface as [`RepositoryError::Runtime`] with the cause kept.

pub mod config;
pub mod error;
pub mod info;
pub mod model;
pub mod object;
pub mod projector;
pub mod repository;

pub use config::RepositoryConfig;
pub use error::{RepositoryError, RepositoryResult};
pub use info::{AclCapabilities, PermissionDefinition, PermissionMapping, RepositoryCapabilities, RepositoryInfo};
pub use model::{ContentStream, ObjectData, ObjectInFolder, ObjectInFolderContainer, ObjectInFolderList};
pub use object::{resolve_token, Entity, RepositoryObject};
pub use projector::{compile_properties, ObjectInfo, PropertyBag, PropertyFilter};
pub use repository::DocumentRepository;
