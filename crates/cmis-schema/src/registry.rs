//! The type registry and its queries.
//!
//! [`TypeRegistry`] stores every registered type in a map and maintains a
//! forward-edge index (`children`) from a type to the derived types that
//! name it as parent, in registration order. Because a child can only be
//! linked to a parent that is already registered and ids are never
//! reused, the hierarchy is always a forest.

use std::collections::HashMap;

use tracing::debug;

use cmis_types::{BaseTypeId, PageWindow};

use crate::builtin::base_type;
use crate::definition::{TypeDefinition, TypeDefinitionContainer, TypeDefinitionList};
use crate::error::{SchemaError, SchemaResult};

/// Types listed as children of the type root, in order.
const ROOT_CHILDREN: [BaseTypeId; 2] = [BaseTypeId::Folder, BaseTypeId::Document];

/// Depth used by `type_descendants` when the caller gives none.
const DEFAULT_DESCENDANTS_DEPTH: i64 = -1;

#[derive(Clone, Debug)]
struct TypeEntry {
    definition: TypeDefinition,
    children: Vec<String>,
}

/// The CMIS type hierarchy.
///
/// Construction registers the four base types; the registry is complete
/// and queryable from then on. Share it behind an `Arc` once all derived
/// types are added: [`add_type`] needs `&mut self`, so request handlers
/// holding a shared reference can never mutate it.
///
/// [`add_type`]: TypeRegistry::add_type
#[derive(Clone, Debug)]
pub struct TypeRegistry {
    types: HashMap<String, TypeEntry>,
    /// Registration order.
    order: Vec<String>,
}

impl TypeRegistry {
    /// Create a registry holding the four base types.
    pub fn new() -> Self {
        let mut registry = Self {
            types: HashMap::new(),
            order: Vec::new(),
        };
        for base in BaseTypeId::ALL {
            registry.insert(base_type(base));
        }
        registry
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Always `false`: the base types are registered on construction.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Registered type ids in registration order.
    pub fn type_ids(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Borrow a registered definition.
    pub fn get(&self, type_id: &str) -> Option<&TypeDefinition> {
        self.types.get(type_id).map(|entry| &entry.definition)
    }

    /// Definition of a registered base type.
    pub fn base(&self, base: BaseTypeId) -> SchemaResult<&TypeDefinition> {
        self.get(base.as_str())
            .ok_or_else(|| SchemaError::TypeNotFound(base.as_str().to_string()))
    }

    pub fn contains(&self, type_id: &str) -> bool {
        self.types.contains_key(type_id)
    }

    // ---------------------------------------------------------------
    // Registration
    // ---------------------------------------------------------------

    /// Register a derived type.
    ///
    /// Every property definition of the type's base type is merged in and
    /// flagged `inherited`; a base definition replaces an own definition
    /// with the same id. If `parent_type_id` names a registered type the
    /// new type is appended to that parent's children.
    ///
    /// Returns `Ok(true)` when registered and `Ok(false)` when the id is
    /// already taken (the existing type is left untouched).
    pub fn add_type(&mut self, definition: TypeDefinition) -> SchemaResult<bool> {
        if definition.id.trim().is_empty() {
            return Err(SchemaError::InvalidType {
                id: definition.id,
                reason: "type id must not be empty".into(),
            });
        }

        let base = self
            .get(definition.base_type_id.as_str())
            .ok_or_else(|| SchemaError::InvalidType {
                id: definition.id.clone(),
                reason: format!("unknown base type {}", definition.base_type_id),
            })?;

        if self.contains(&definition.id) {
            debug!(type_id = %definition.id, "type already registered; not overwritten");
            return Ok(false);
        }

        let mut merged = definition;
        for inherited in base.property_definitions.values() {
            let mut inherited = inherited.clone();
            inherited.inherited = true;
            merged.add_property_definition(inherited);
        }

        Ok(self.insert(merged))
    }

    /// Store a definition and link it under its parent. Never overwrites.
    fn insert(&mut self, definition: TypeDefinition) -> bool {
        if self.types.contains_key(&definition.id) {
            return false;
        }
        let id = definition.id.clone();
        if let Some(parent) = definition
            .parent_type_id
            .as_deref()
            .and_then(|p| self.types.get_mut(p))
        {
            parent.children.push(id.clone());
        }
        debug!(
            type_id = %id,
            base = %definition.base_type_id,
            parent = ?definition.parent_type_id,
            properties = definition.property_definitions.len(),
            "registered type"
        );
        self.types.insert(
            id.clone(),
            TypeEntry {
                definition,
                children: Vec::new(),
            },
        );
        self.order.push(id);
        true
    }

    // ---------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------

    /// Copy of a registered type definition.
    pub fn type_definition(&self, type_id: &str) -> SchemaResult<TypeDefinition> {
        self.get(type_id)
            .cloned()
            .ok_or_else(|| SchemaError::TypeNotFound(type_id.to_string()))
    }

    /// One page of the children of a type.
    ///
    /// With no `type_id` the children of the type root are exactly Folder
    /// then Document. Otherwise they are the derived types registered
    /// under `type_id`, in registration order. An unknown type yields an
    /// empty list.
    pub fn type_children(
        &self,
        type_id: Option<&str>,
        include_property_definitions: bool,
        max_items: Option<i64>,
        skip_count: Option<i64>,
    ) -> TypeDefinitionList {
        let children: Vec<&TypeDefinition> = match type_id {
            None => ROOT_CHILDREN
                .iter()
                .filter_map(|base| self.get(base.as_str()))
                .collect(),
            Some(id) => match self.types.get(id) {
                Some(entry) => entry
                    .children
                    .iter()
                    .filter_map(|child| self.get(child))
                    .collect(),
                None => return TypeDefinitionList::default(),
            },
        };

        let mut window = PageWindow::new(max_items, skip_count);
        let list = window
            .collect(children)
            .into_iter()
            .map(|def| def.copy(include_property_definitions))
            .collect();

        TypeDefinitionList {
            list,
            has_more_items: window.has_more_items(),
            num_items: window.num_items(),
        }
    }

    /// Depth-bounded trees of types below `type_id`.
    ///
    /// Each tree is rooted at the type itself (Folder and Document when
    /// `type_id` is `None`). `depth` counts levels of children below each
    /// root; `-1` (and anything below it) means unbounded, an absent depth
    /// is unbounded, and `0` is rejected. An unknown type yields an empty
    /// forest.
    pub fn type_descendants(
        &self,
        type_id: Option<&str>,
        depth: Option<i64>,
        include_property_definitions: bool,
    ) -> SchemaResult<Vec<TypeDefinitionContainer>> {
        let depth = depth.unwrap_or(DEFAULT_DESCENDANTS_DEPTH);
        if depth == 0 {
            return Err(SchemaError::InvalidArgument("depth must not be 0".into()));
        }
        let depth = depth.max(-1);

        let roots: Vec<&TypeEntry> = match type_id {
            None => ROOT_CHILDREN
                .iter()
                .filter_map(|base| self.types.get(base.as_str()))
                .collect(),
            Some(id) => self.types.get(id).into_iter().collect(),
        };

        Ok(self.descend(roots, depth, include_property_definitions))
    }

    /// Build the trees below `roots` with an explicit work stack.
    ///
    /// Nodes land in an arena in visit order, so a node's index is always
    /// greater than its parent's; assembly pops the arena from the back
    /// and hands each finished subtree to its parent.
    fn descend(
        &self,
        roots: Vec<&TypeEntry>,
        depth: i64,
        include_property_definitions: bool,
    ) -> Vec<TypeDefinitionContainer> {
        let mut arena: Vec<(TypeDefinitionContainer, Option<usize>)> = Vec::new();
        let mut work: Vec<(&TypeEntry, i64, Option<usize>)> =
            roots.into_iter().rev().map(|entry| (entry, depth, None)).collect();

        while let Some((entry, depth, parent)) = work.pop() {
            let index = arena.len();
            arena.push((
                TypeDefinitionContainer {
                    type_definition: entry.definition.copy(include_property_definitions),
                    children: Vec::new(),
                },
                parent,
            ));
            if depth == 0 {
                continue;
            }
            let next = if depth < 0 { -1 } else { depth - 1 };
            work.extend(
                entry
                    .children
                    .iter()
                    .rev()
                    .filter_map(|id| self.types.get(id))
                    .map(|child| (child, next, Some(index))),
            );
        }

        let mut forest = Vec::new();
        while let Some((mut node, parent)) = arena.pop() {
            node.children.reverse();
            match parent {
                Some(parent) => arena[parent].0.children.push(node),
                None => forest.push(node),
            }
        }
        forest.reverse();
        forest
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::{Cardinality, PropertyDefinition, PropertyType, Updatability};
    use cmis_types::property_ids as pid;

    fn custom_prop(id: &str) -> PropertyDefinition {
        PropertyDefinition::new(
            id,
            id,
            PropertyType::String,
            Cardinality::Single,
            Updatability::ReadWrite,
            false,
        )
    }

    /// cmis:document <- my:report <- my:annual, cmis:document <- my:memo
    fn registry_with_derived() -> TypeRegistry {
        let mut registry = TypeRegistry::new();
        assert!(registry
            .add_type(
                TypeDefinition::new("my:report", BaseTypeId::Document)
                    .with_parent("cmis:document")
                    .with_property(custom_prop("my:author")),
            )
            .unwrap());
        assert!(registry
            .add_type(
                TypeDefinition::new("my:annual", BaseTypeId::Document).with_parent("my:report"),
            )
            .unwrap());
        assert!(registry
            .add_type(TypeDefinition::new("my:memo", BaseTypeId::Document).with_parent("cmis:document"))
            .unwrap());
        registry
    }

    fn ids(list: &TypeDefinitionList) -> Vec<&str> {
        list.list.iter().map(|t| t.id.as_str()).collect()
    }

    // ---- Setup ----

    #[test]
    fn new_registers_four_base_types() {
        let registry = TypeRegistry::new();
        assert_eq!(registry.len(), 4);
        assert!(!registry.is_empty());
        for base in BaseTypeId::ALL {
            assert!(registry.contains(base.as_str()));
            assert_eq!(registry.base(base).unwrap().base_type_id, base);
        }
        let order: Vec<_> = registry.type_ids().collect();
        assert_eq!(
            order,
            vec!["cmis:folder", "cmis:document", "cmis:relationship", "cmis:policy"]
        );
    }

    // ---- add_type ----

    #[test]
    fn add_type_inherits_base_properties() {
        let registry = registry_with_derived();
        let report = registry.get("my:report").unwrap();
        let base = registry.get("cmis:document").unwrap();

        assert_eq!(
            report.property_definitions.len(),
            base.property_definitions.len() + 1
        );
        for id in base.property_definitions.keys() {
            assert!(report.property_definition(id).unwrap().inherited, "{id}");
        }
        assert!(!report.property_definition("my:author").unwrap().inherited);
    }

    #[test]
    fn add_type_does_not_mutate_base() {
        let registry = registry_with_derived();
        let base = registry.get("cmis:document").unwrap();
        assert!(base.property_definitions.values().all(|p| !p.inherited));
    }

    #[test]
    fn add_type_base_definition_wins_on_conflict() {
        let mut registry = TypeRegistry::new();
        let mut own = custom_prop(pid::NAME);
        own.display_name = "Custom Name".into();
        registry
            .add_type(TypeDefinition::new("my:folder", BaseTypeId::Folder).with_property(own))
            .unwrap();
        let name = registry
            .get("my:folder")
            .unwrap()
            .property_definition(pid::NAME)
            .unwrap();
        assert_eq!(name.display_name, "Name");
        assert!(name.inherited);
    }

    #[test]
    fn add_type_never_overwrites() {
        let mut registry = registry_with_derived();
        let replaced = registry
            .add_type(TypeDefinition::new("my:report", BaseTypeId::Folder))
            .unwrap();
        assert!(!replaced);
        assert_eq!(
            registry.get("my:report").unwrap().base_type_id,
            BaseTypeId::Document
        );

        assert!(!registry
            .add_type(TypeDefinition::new("cmis:folder", BaseTypeId::Folder))
            .unwrap());
    }

    #[test]
    fn add_type_rejects_blank_id() {
        let mut registry = TypeRegistry::new();
        let err = registry
            .add_type(TypeDefinition::new("  ", BaseTypeId::Document))
            .unwrap_err();
        assert!(matches!(err, SchemaError::InvalidType { .. }));
        assert_eq!(registry.len(), 4);
    }

    #[test]
    fn add_type_from_relationship_and_policy() {
        let mut registry = TypeRegistry::new();
        assert!(registry
            .add_type(TypeDefinition::new("my:link", BaseTypeId::Relationship))
            .unwrap());
        assert!(registry
            .add_type(TypeDefinition::new("my:rule", BaseTypeId::Policy))
            .unwrap());
        assert_eq!(
            registry.get("my:link").unwrap().property_definitions.len(),
            9
        );
    }

    #[test]
    fn add_type_with_unknown_parent_is_unlinked() {
        let mut registry = TypeRegistry::new();
        assert!(registry
            .add_type(TypeDefinition::new("my:stray", BaseTypeId::Document).with_parent("nope"))
            .unwrap());
        assert!(registry.contains("my:stray"));
        let children = registry.type_children(Some("cmis:document"), false, None, None);
        assert!(children.list.is_empty());
    }

    // ---- type_definition ----

    #[test]
    fn type_definition_returns_copy() {
        let registry = TypeRegistry::new();
        let mut copy = registry.type_definition("cmis:folder").unwrap();
        copy.property_definitions.clear();
        assert_eq!(
            registry.get("cmis:folder").unwrap().property_definitions.len(),
            12
        );
    }

    #[test]
    fn type_definition_unknown_fails() {
        let registry = TypeRegistry::new();
        assert_eq!(
            registry.type_definition("my:none"),
            Err(SchemaError::TypeNotFound("my:none".into()))
        );
    }

    // ---- type_children ----

    #[test]
    fn root_children_are_folder_then_document() {
        let registry = registry_with_derived();
        let list = registry.type_children(None, true, None, None);
        assert_eq!(ids(&list), vec!["cmis:folder", "cmis:document"]);
        assert_eq!(list.num_items, 2);
        assert!(!list.has_more_items);
    }

    #[test]
    fn root_children_paging_is_positional() {
        let registry = TypeRegistry::new();

        let first = registry.type_children(None, true, Some(1), Some(0));
        assert_eq!(ids(&first), vec!["cmis:folder"]);
        assert!(first.has_more_items);

        let second = registry.type_children(None, true, Some(1), Some(1));
        assert_eq!(ids(&second), vec!["cmis:document"]);
        assert!(!second.has_more_items);

        let past = registry.type_children(None, true, None, Some(2));
        assert!(past.list.is_empty());
        assert!(!past.has_more_items);
        assert_eq!(past.num_items, 2);
    }

    #[test]
    fn derived_children_in_registration_order() {
        let registry = registry_with_derived();
        let list = registry.type_children(Some("cmis:document"), true, None, None);
        assert_eq!(ids(&list), vec!["my:report", "my:memo"]);
        assert_eq!(list.num_items, 2);

        let paged = registry.type_children(Some("cmis:document"), true, Some(1), None);
        assert_eq!(ids(&paged), vec!["my:report"]);
        assert!(paged.has_more_items);
    }

    #[test]
    fn children_of_unknown_or_leaf_type_are_empty() {
        let registry = registry_with_derived();
        let unknown = registry.type_children(Some("my:none"), true, None, None);
        assert!(unknown.list.is_empty());
        assert_eq!(unknown.num_items, 0);

        let leaf = registry.type_children(Some("my:memo"), true, None, None);
        assert!(leaf.list.is_empty());
        assert!(!leaf.has_more_items);
    }

    #[test]
    fn children_without_property_definitions() {
        let registry = TypeRegistry::new();
        let list = registry.type_children(None, false, None, None);
        assert!(list.list.iter().all(|t| t.property_definitions.is_empty()));
        assert_eq!(
            registry.get("cmis:folder").unwrap().property_definitions.len(),
            12
        );
    }

    // ---- type_descendants ----

    #[test]
    fn descendants_zero_depth_rejected() {
        let registry = TypeRegistry::new();
        assert!(matches!(
            registry.type_descendants(None, Some(0), false),
            Err(SchemaError::InvalidArgument(_))
        ));
    }

    #[test]
    fn descendants_unbounded_walks_whole_subtree() {
        let registry = registry_with_derived();
        let forest = registry.type_descendants(None, Some(-1), false).unwrap();
        assert_eq!(forest.len(), 2);
        assert_eq!(forest[0].type_definition.id, "cmis:folder");
        assert_eq!(forest[0].size(), 1);

        let document = &forest[1];
        assert_eq!(document.type_definition.id, "cmis:document");
        assert_eq!(document.size(), 4);
        assert_eq!(document.height(), 3);
        assert_eq!(document.children[0].children[0].type_definition.id, "my:annual");
    }

    #[test]
    fn descendants_below_minus_one_is_unbounded() {
        let registry = registry_with_derived();
        let forest = registry.type_descendants(None, Some(-7), false).unwrap();
        assert_eq!(forest[1].size(), 4);
        let absent = registry.type_descendants(None, None, false).unwrap();
        assert_eq!(absent[1].size(), 4);
    }

    #[test]
    fn descendants_depth_limits_levels() {
        let registry = registry_with_derived();
        let forest = registry
            .type_descendants(Some("cmis:document"), Some(1), false)
            .unwrap();
        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].children.len(), 2);
        assert!(forest[0].children.iter().all(|c| c.children.is_empty()));
    }

    #[test]
    fn descendants_of_long_derivation_chain() {
        let mut registry = TypeRegistry::new();
        let mut parent = "cmis:folder".to_string();
        for level in 0..2_000 {
            let id = format!("my:level{level}");
            registry
                .add_type(TypeDefinition::new(id.as_str(), BaseTypeId::Folder).with_parent(parent))
                .unwrap();
            parent = id;
        }
        let forest = registry
            .type_descendants(Some("cmis:folder"), Some(-1), false)
            .unwrap();

        let mut node = &forest[0];
        let mut levels = 0;
        while let Some(child) = node.children.first() {
            assert_eq!(node.children.len(), 1);
            assert_eq!(child.type_definition.id, format!("my:level{levels}"));
            node = child;
            levels += 1;
        }
        assert_eq!(levels, 2_000);
    }

    #[test]
    fn descendants_of_unknown_type_is_empty() {
        let registry = TypeRegistry::new();
        assert!(registry
            .type_descendants(Some("my:none"), Some(2), true)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn descendants_property_definitions_flag() {
        let registry = registry_with_derived();
        let with = registry
            .type_descendants(Some("my:report"), None, true)
            .unwrap();
        assert!(!with[0].type_definition.property_definitions.is_empty());
        let without = registry
            .type_descendants(Some("my:report"), None, false)
            .unwrap();
        assert!(without[0].type_definition.property_definitions.is_empty());
        assert!(without[0].children[0]
            .type_definition
            .property_definitions
            .is_empty());
    }
}
