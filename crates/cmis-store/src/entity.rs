use serde::{Deserialize, Serialize};

use cmis_types::{ObjectKey, ObjectToken};

/// A stored XML document.
///
/// Timestamps are milliseconds since the UNIX epoch. A document carries two
/// content variants: the validated content published to readers, and the
/// working content still being edited.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub key: ObjectKey,
    /// Key of the space the document is filed in.
    pub space_key: ObjectKey,
    pub title: String,
    pub date_creation: i64,
    pub date_modification: i64,
    #[serde(default)]
    pub xml_validated_content: Option<String>,
    #[serde(default)]
    pub xml_working_content: Option<String>,
    #[serde(default)]
    pub out_of_date: bool,
    #[serde(default = "default_valid")]
    pub valid: bool,
}

fn default_valid() -> bool {
    true
}

impl Document {
    /// Create a valid, current document with no content.
    pub fn new(key: ObjectKey, space_key: ObjectKey, title: impl Into<String>) -> Self {
        Self {
            key,
            space_key,
            title: title.into(),
            date_creation: 0,
            date_modification: 0,
            xml_validated_content: None,
            xml_working_content: None,
            out_of_date: false,
            valid: true,
        }
    }

    pub fn with_dates(mut self, created_ms: i64, modified_ms: i64) -> Self {
        self.date_creation = created_ms;
        self.date_modification = modified_ms;
        self
    }

    pub fn with_validated_content(mut self, xml: impl Into<String>) -> Self {
        self.xml_validated_content = Some(xml.into());
        self
    }

    pub fn with_working_content(mut self, xml: impl Into<String>) -> Self {
        self.xml_working_content = Some(xml.into());
        self
    }

    pub fn out_of_date(mut self) -> Self {
        self.out_of_date = true;
        self
    }

    pub fn invalid(mut self) -> Self {
        self.valid = false;
        self
    }

    pub fn token(&self) -> ObjectToken {
        ObjectToken::document(self.key)
    }

    /// Whether the document appears in folder listings.
    pub fn is_listable(&self) -> bool {
        !self.out_of_date && self.valid
    }

    /// Effective content: validated if present, otherwise working.
    pub fn content(&self) -> Option<&str> {
        self.xml_validated_content
            .as_deref()
            .or(self.xml_working_content.as_deref())
    }
}

/// A stored folder ("space").
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Space {
    pub key: ObjectKey,
    pub name: String,
    #[serde(default)]
    pub parent_key: Option<ObjectKey>,
}

impl Space {
    pub fn new(key: ObjectKey, name: impl Into<String>, parent_key: Option<ObjectKey>) -> Self {
        Self {
            key,
            name: name.into(),
            parent_key,
        }
    }

    pub fn token(&self) -> ObjectToken {
        ObjectToken::folder(self.key)
    }
}

/// Serializable snapshot of a store, used to seed an in-memory backend.
///
/// Spaces must be listed parents-first; documents may only reference
/// spaces listed in the same fixture.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreFixture {
    #[serde(default)]
    pub spaces: Vec<Space>,
    #[serde(default)]
    pub documents: Vec<Document>,
}
