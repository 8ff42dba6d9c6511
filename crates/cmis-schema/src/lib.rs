//! CMIS type registry for the docspace bridge.
//!
//! The registry holds the type hierarchy advertised to CMIS clients. It is
//! built once at startup with the four base types (Folder, Document,
//! Relationship, Policy) and then treated as a frozen value shared by every
//! request handler. Derived types may be added through an administrative
//! path before the registry is shared.
//!
//! # Modules
//!
//! - [`definition`] - [`TypeDefinition`], [`PropertyDefinition`], [`PropertyValue`]
//! - [`builtin`] - Construction of the base types and their property definitions
//! - [`registry`] - The [`TypeRegistry`] and its paged/tree queries
//! - [`error`] - Error types for registry operations
//!
//! # Invariants
//!
//! - A type id, once registered, is never overwritten.
//! - A derived type carries every property definition of its base type,
//!   flagged `inherited`.
//! - Queries hand out copies; the registry's own definitions never change.

pub mod builtin;
pub mod definition;
pub mod error;
pub mod registry;

pub use definition::{
    Cardinality, ContentStreamAllowed, PropertyDefinition, PropertyType, PropertyValue,
    TypeDefinition, TypeDefinitionContainer, TypeDefinitionList, Updatability,
};
pub use error::{SchemaError, SchemaResult};
pub use registry::TypeRegistry;
