//! Foundation types for the CMIS docspace bridge.
//!
//! This crate provides the identifier, typing, and paging primitives shared
//! by every other crate in the workspace. It has no knowledge of the backing
//! store or of the type registry.
//!
//! # Key Types
//!
//! - [`ObjectToken`] - Opaque CMIS object id (`D42`, `S7`) encoding kind and key
//! - [`ObjectKind`] - Document or folder ("space")
//! - [`BaseTypeId`] - The four CMIS root types
//! - [`PageWindow`] - Skip/max sliding window used by every paged listing
//! - [`property_ids`] - Well-known CMIS property identifiers
//! - [`temporal`] - Store timestamp to CMIS date-time conversion

pub mod base_type;
pub mod error;
pub mod paging;
pub mod property_ids;
pub mod temporal;
pub mod token;

pub use base_type::BaseTypeId;
pub use error::TypeError;
pub use paging::{Admission, PageWindow};
pub use temporal::{millis_to_datetime, round_up_to_second};
pub use token::{ObjectKey, ObjectKind, ObjectToken, ROOT_SENTINEL};
