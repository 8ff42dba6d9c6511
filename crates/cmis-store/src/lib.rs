//! Document and space storage for the CMIS docspace bridge.
//!
//! The projection engine never owns persistence. It reads through the
//! [`DocumentStore`] trait, which exposes exactly the lookups the engine
//! needs: a document or space by key, the documents filed in a space, and
//! the child spaces of a space.
//!
//! # Entities
//!
//! - [`Document`] - a titled XML document with validated and working content
//! - [`Space`] - a named folder with an optional parent space
//!
//! # Storage Backends
//!
//! - [`InMemoryDocumentStore`] - map-based store for tests, fixtures, and embedding
//!
//! # Design Rules
//!
//! 1. Lookups are synchronous and side-effect free.
//! 2. Child listings come back in insertion order; callers never re-sort.
//! 3. A missing entity is `Ok(None)`, not an error. Errors mean the backend failed.

pub mod entity;
pub mod error;
pub mod memory;
pub mod traits;

pub use entity::{Document, Space, StoreFixture};
pub use error::{StoreError, StoreResult};
pub use memory::InMemoryDocumentStore;
pub use traits::DocumentStore;
