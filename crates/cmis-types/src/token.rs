use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Numeric primary key of a document or space in the backing store.
pub type ObjectKey = u32;

/// Well-known id of the repository root folder.
///
/// It carries no kind prefix and must be mapped to the root folder's real
/// token before it can be decoded.
pub const ROOT_SENTINEL: &str = "@root@";

/// The two kinds of store entity exposed through CMIS.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ObjectKind {
    Document,
    /// A folder; the store calls these "spaces".
    Folder,
}

impl ObjectKind {
    /// Single-character token prefix.
    pub const fn prefix(self) -> char {
        match self {
            Self::Document => 'D',
            Self::Folder => 'S',
        }
    }

    /// Kind for a token prefix, ignoring ASCII case.
    pub fn from_prefix(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'D' => Some(Self::Document),
            'S' => Some(Self::Folder),
            _ => None,
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Document => f.write_str("document"),
            Self::Folder => f.write_str("folder"),
        }
    }
}

/// Decoded CMIS object id: `<KindPrefix><NumericKey>`, e.g. `D42` or `S7`.
///
/// The textual form is the only thing clients ever see; `ObjectToken` is
/// its parsed counterpart. Serializes as the textual form.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ObjectToken {
    kind: ObjectKind,
    key: ObjectKey,
}

impl ObjectToken {
    pub const fn new(kind: ObjectKind, key: ObjectKey) -> Self {
        Self { kind, key }
    }

    pub const fn document(key: ObjectKey) -> Self {
        Self::new(ObjectKind::Document, key)
    }

    pub const fn folder(key: ObjectKey) -> Self {
        Self::new(ObjectKind::Folder, key)
    }

    pub const fn kind(&self) -> ObjectKind {
        self.kind
    }

    pub const fn key(&self) -> ObjectKey {
        self.key
    }

    /// Encode a kind and key into the textual id.
    pub fn encode(kind: ObjectKind, key: ObjectKey) -> String {
        Self::new(kind, key).to_string()
    }

    /// Decode a textual id.
    ///
    /// The first character selects the kind (case-insensitive), the rest
    /// must parse as a decimal key. The root sentinel is not accepted here.
    pub fn decode(token: &str) -> Result<Self, TypeError> {
        let mut chars = token.chars();
        let kind = chars
            .next()
            .and_then(ObjectKind::from_prefix)
            .ok_or_else(|| TypeError::InvalidIdentifier(token.to_string()))?;
        let key = chars
            .as_str()
            .parse::<ObjectKey>()
            .map_err(|_| TypeError::InvalidIdentifier(token.to_string()))?;
        Ok(Self { kind, key })
    }

    pub fn is_document(&self) -> bool {
        self.kind == ObjectKind::Document
    }

    pub fn is_folder(&self) -> bool {
        self.kind == ObjectKind::Folder
    }
}

impl fmt::Debug for ObjectToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectToken({self})")
    }
}

impl fmt::Display for ObjectToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind.prefix(), self.key)
    }
}

impl FromStr for ObjectToken {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}

impl TryFrom<String> for ObjectToken {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::decode(&value)
    }
}

impl From<ObjectToken> for String {
    fn from(token: ObjectToken) -> Self {
        token.to_string()
    }
}
