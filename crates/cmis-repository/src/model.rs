//! Values returned by repository operations.

use std::io::Read;

use bytes::{Buf, Bytes};
use serde::{Deserialize, Serialize};

use crate::projector::{ObjectInfo, PropertyBag};

/// One object: its filtered properties and its info summary.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObjectData {
    pub properties: PropertyBag,
    pub info: ObjectInfo,
}

impl ObjectData {
    pub fn id(&self) -> &str {
        &self.info.id
    }
}

/// An object listed inside a folder.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObjectInFolder {
    pub object: ObjectData,
    /// Name of the object within its folder, when requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_segment: Option<String>,
}

/// One page of a folder's children.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectInFolderList {
    pub objects: Vec<ObjectInFolder>,
    pub has_more_items: bool,
    /// All eligible children, not just this page.
    pub num_items: usize,
}

/// A node of a descendants tree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObjectInFolderContainer {
    pub object: ObjectInFolder,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ObjectInFolderContainer>,
}

impl ObjectInFolderContainer {
    /// Number of nodes in this subtree, including this one.
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(Self::size).sum::<usize>()
    }
}

/// Document content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContentStream {
    pub file_name: String,
    pub length: u64,
    pub mime_type: String,
    pub stream: Bytes,
}

impl ContentStream {
    /// Read the content from the start.
    pub fn reader(&self) -> impl Read {
        self.stream.clone().reader()
    }
}
