use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::token::ObjectKind;

/// The four root types of the CMIS type hierarchy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BaseTypeId {
    #[serde(rename = "cmis:document")]
    Document,
    #[serde(rename = "cmis:folder")]
    Folder,
    #[serde(rename = "cmis:relationship")]
    Relationship,
    #[serde(rename = "cmis:policy")]
    Policy,
}

impl BaseTypeId {
    pub const ALL: [BaseTypeId; 4] = [
        BaseTypeId::Folder,
        BaseTypeId::Document,
        BaseTypeId::Relationship,
        BaseTypeId::Policy,
    ];

    /// CMIS id of the type, also used as its query name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Document => "cmis:document",
            Self::Folder => "cmis:folder",
            Self::Relationship => "cmis:relationship",
            Self::Policy => "cmis:policy",
        }
    }

    /// Human-readable name ("Document", "Folder", ...).
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Document => "Document",
            Self::Folder => "Folder",
            Self::Relationship => "Relationship",
            Self::Policy => "Policy",
        }
    }
}

impl From<ObjectKind> for BaseTypeId {
    fn from(kind: ObjectKind) -> Self {
        match kind {
            ObjectKind::Document => Self::Document,
            ObjectKind::Folder => Self::Folder,
        }
    }
}

impl fmt::Display for BaseTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BaseTypeId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|base| base.as_str() == s)
            .ok_or_else(|| TypeError::UnknownBaseType(s.to_string()))
    }
}
