use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use cmis_types::BaseTypeId;

/// Data type of a CMIS property.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    Boolean,
    DateTime,
    Decimal,
    Html,
    Id,
    Integer,
    String,
    Uri,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cardinality {
    Single,
    Multi,
}

/// When a property may be written.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Updatability {
    ReadOnly,
    ReadWrite,
    WhenCheckedOut,
    OnCreate,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentStreamAllowed {
    NotAllowed,
    Allowed,
    Required,
}

/// A typed property value.
///
/// Every variant holds a list: single-valued properties have at most one
/// element, and an empty list is the CMIS "value not set".
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "values", rename_all = "lowercase")]
pub enum PropertyValue {
    Boolean(Vec<bool>),
    DateTime(Vec<DateTime<Utc>>),
    Decimal(Vec<f64>),
    Html(Vec<String>),
    Id(Vec<String>),
    Integer(Vec<i64>),
    String(Vec<String>),
    Uri(Vec<String>),
}

impl PropertyValue {
    pub fn id(value: Option<impl Into<String>>) -> Self {
        Self::Id(value.map(Into::into).into_iter().collect())
    }

    pub fn string(value: Option<impl Into<String>>) -> Self {
        Self::String(value.map(Into::into).into_iter().collect())
    }

    pub fn integer(value: Option<i64>) -> Self {
        Self::Integer(value.into_iter().collect())
    }

    pub fn boolean(value: bool) -> Self {
        Self::Boolean(vec![value])
    }

    pub fn date_time(value: Option<DateTime<Utc>>) -> Self {
        Self::DateTime(value.into_iter().collect())
    }

    /// The data type this value carries.
    pub fn property_type(&self) -> PropertyType {
        match self {
            Self::Boolean(_) => PropertyType::Boolean,
            Self::DateTime(_) => PropertyType::DateTime,
            Self::Decimal(_) => PropertyType::Decimal,
            Self::Html(_) => PropertyType::Html,
            Self::Id(_) => PropertyType::Id,
            Self::Integer(_) => PropertyType::Integer,
            Self::String(_) => PropertyType::String,
            Self::Uri(_) => PropertyType::Uri,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Boolean(v) => v.len(),
            Self::DateTime(v) => v.len(),
            Self::Decimal(v) => v.len(),
            Self::Integer(v) => v.len(),
            Self::Html(v) | Self::Id(v) | Self::String(v) | Self::Uri(v) => v.len(),
        }
    }

    /// Returns `true` if no value is set.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// First textual value, for id/string/html/uri properties.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Html(v) | Self::Id(v) | Self::String(v) | Self::Uri(v) => {
                v.first().map(String::as_str)
            }
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(v) => v.first().copied(),
            _ => None,
        }
    }

    pub fn as_date_time(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::DateTime(v) => v.first().copied(),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(v) => v.first().copied(),
            _ => None,
        }
    }
}

/// Definition of one property on a type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PropertyDefinition {
    pub id: String,
    pub local_name: String,
    pub query_name: String,
    pub display_name: String,
    pub description: String,
    pub property_type: PropertyType,
    pub cardinality: Cardinality,
    pub updatability: Updatability,
    pub inherited: bool,
    pub required: bool,
    pub queryable: bool,
    pub orderable: bool,
    #[serde(default)]
    pub default_value: Option<PropertyValue>,
}

impl PropertyDefinition {
    /// Create a definition whose local and query names equal its id and
    /// whose description equals its display name.
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        property_type: PropertyType,
        cardinality: Cardinality,
        updatability: Updatability,
        required: bool,
    ) -> Self {
        let id = id.into();
        let display_name = display_name.into();
        Self {
            local_name: id.clone(),
            query_name: id.clone(),
            description: display_name.clone(),
            id,
            display_name,
            property_type,
            cardinality,
            updatability,
            inherited: false,
            required,
            queryable: false,
            orderable: false,
            default_value: None,
        }
    }

    pub fn with_default(mut self, value: PropertyValue) -> Self {
        self.default_value = Some(value);
        self
    }
}

/// Definition of a CMIS object type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TypeDefinition {
    pub id: String,
    pub local_name: String,
    pub local_namespace: String,
    pub query_name: String,
    pub display_name: String,
    pub description: String,
    pub base_type_id: BaseTypeId,
    #[serde(default)]
    pub parent_type_id: Option<String>,
    pub creatable: bool,
    pub fileable: bool,
    pub queryable: bool,
    pub controllable_policy: bool,
    pub controllable_acl: bool,
    pub fulltext_indexed: bool,
    pub included_in_supertype_query: bool,
    /// Document types only.
    #[serde(default)]
    pub versionable: Option<bool>,
    /// Document types only.
    #[serde(default)]
    pub content_stream_allowed: Option<ContentStreamAllowed>,
    #[serde(default)]
    pub property_definitions: BTreeMap<String, PropertyDefinition>,
}

impl TypeDefinition {
    /// Create a type with no properties. Names default to the id; the
    /// type is fileable and creatable unless it is a relationship or policy.
    pub fn new(id: impl Into<String>, base_type_id: BaseTypeId) -> Self {
        let id = id.into();
        let filed = matches!(base_type_id, BaseTypeId::Document | BaseTypeId::Folder);
        Self {
            local_name: id.clone(),
            query_name: id.clone(),
            display_name: id.clone(),
            description: id.clone(),
            id,
            local_namespace: String::new(),
            base_type_id,
            parent_type_id: None,
            creatable: filed,
            fileable: filed,
            queryable: false,
            controllable_policy: false,
            controllable_acl: false,
            fulltext_indexed: false,
            included_in_supertype_query: true,
            versionable: None,
            content_stream_allowed: None,
            property_definitions: BTreeMap::new(),
        }
    }

    pub fn with_parent(mut self, parent_type_id: impl Into<String>) -> Self {
        self.parent_type_id = Some(parent_type_id.into());
        self
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    pub fn with_property(mut self, definition: PropertyDefinition) -> Self {
        self.add_property_definition(definition);
        self
    }

    /// Insert or replace a property definition.
    pub fn add_property_definition(&mut self, definition: PropertyDefinition) {
        self.property_definitions
            .insert(definition.id.clone(), definition);
    }

    pub fn property_definition(&self, id: &str) -> Option<&PropertyDefinition> {
        self.property_definitions.get(id)
    }

    /// Copy of this type without property definitions.
    pub fn without_property_definitions(&self) -> Self {
        Self {
            property_definitions: BTreeMap::new(),
            ..self.clone()
        }
    }

    /// Copy of this type, optionally stripped of property definitions.
    pub fn copy(&self, include_property_definitions: bool) -> Self {
        if include_property_definitions {
            self.clone()
        } else {
            self.without_property_definitions()
        }
    }
}

/// One page of a type-children listing.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TypeDefinitionList {
    pub list: Vec<TypeDefinition>,
    pub has_more_items: bool,
    pub num_items: usize,
}

/// A node of a type-descendants tree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TypeDefinitionContainer {
    pub type_definition: TypeDefinition,
    pub children: Vec<TypeDefinitionContainer>,
}

impl TypeDefinitionContainer {
    /// Number of nodes in this subtree, including this one.
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(Self::size).sum::<usize>()
    }

    /// Longest path from this node to a leaf, counting this node.
    pub fn height(&self) -> usize {
        1 + self.children.iter().map(Self::height).max().unwrap_or(0)
    }
}
