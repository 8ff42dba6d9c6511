//! The four CMIS base types and their property definitions.

use cmis_types::{property_ids as pid, BaseTypeId};

use crate::definition::{
    Cardinality, ContentStreamAllowed, PropertyDefinition, PropertyType, TypeDefinition,
    Updatability,
};

/// Namespace advertised as the local namespace of every base type.
pub const NAMESPACE: &str = "http://opencmis.org/fileshare";

fn prop(
    id: &str,
    display_name: &str,
    property_type: PropertyType,
    cardinality: Cardinality,
    updatability: Updatability,
    required: bool,
) -> PropertyDefinition {
    PropertyDefinition::new(id, display_name, property_type, cardinality, updatability, required)
}

fn single(id: &str, display_name: &str, property_type: PropertyType) -> PropertyDefinition {
    prop(
        id,
        display_name,
        property_type,
        Cardinality::Single,
        Updatability::ReadOnly,
        false,
    )
}

/// Build a base type definition.
pub fn base_type(base: BaseTypeId) -> TypeDefinition {
    let mut def = TypeDefinition::new(base.as_str(), base);
    def.local_name = base.display_name().to_string();
    def.display_name = base.display_name().to_string();
    def.description = base.display_name().to_string();
    def.local_namespace = NAMESPACE.to_string();

    add_base_property_definitions(&mut def);
    match base {
        BaseTypeId::Folder => add_folder_property_definitions(&mut def),
        BaseTypeId::Document => {
            def.versionable = Some(false);
            def.content_stream_allowed = Some(ContentStreamAllowed::Allowed);
            add_document_property_definitions(&mut def);
        }
        BaseTypeId::Relationship | BaseTypeId::Policy => {}
    }
    def
}

fn add_base_property_definitions(def: &mut TypeDefinition) {
    use PropertyType::*;

    def.add_property_definition(single(pid::BASE_TYPE_ID, "Base Type Id", Id));
    def.add_property_definition(single(pid::OBJECT_ID, "Object Id", Id));
    def.add_property_definition(prop(
        pid::OBJECT_TYPE_ID,
        "Type Id",
        Id,
        Cardinality::Single,
        Updatability::OnCreate,
        true,
    ));
    def.add_property_definition(prop(
        pid::NAME,
        "Name",
        String,
        Cardinality::Single,
        Updatability::ReadWrite,
        true,
    ));
    def.add_property_definition(single(pid::CREATED_BY, "Created By", String));
    def.add_property_definition(single(pid::CREATION_DATE, "Creation Date", DateTime));
    def.add_property_definition(single(pid::LAST_MODIFIED_BY, "Last Modified By", String));
    def.add_property_definition(single(
        pid::LAST_MODIFICATION_DATE,
        "Last Modification Date",
        DateTime,
    ));
    def.add_property_definition(single(pid::CHANGE_TOKEN, "Change Token", String));
}

fn add_folder_property_definitions(def: &mut TypeDefinition) {
    def.add_property_definition(single(pid::PARENT_ID, "Parent Id", PropertyType::Id));
    def.add_property_definition(prop(
        pid::ALLOWED_CHILD_OBJECT_TYPE_IDS,
        "Allowed Child Object Type Ids",
        PropertyType::Id,
        Cardinality::Multi,
        Updatability::ReadOnly,
        false,
    ));
    def.add_property_definition(single(pid::PATH, "Path", PropertyType::String));
}

fn add_document_property_definitions(def: &mut TypeDefinition) {
    use PropertyType::*;

    def.add_property_definition(single(pid::IS_IMMUTABLE, "Is Immutable", Boolean));
    def.add_property_definition(single(pid::IS_LATEST_VERSION, "Is Latest Version", Boolean));
    def.add_property_definition(single(pid::IS_MAJOR_VERSION, "Is Major Version", Boolean));
    def.add_property_definition(single(
        pid::IS_LATEST_MAJOR_VERSION,
        "Is Latest Major Version",
        Boolean,
    ));
    def.add_property_definition(prop(
        pid::VERSION_LABEL,
        "Version Label",
        String,
        Cardinality::Single,
        Updatability::ReadOnly,
        true,
    ));
    def.add_property_definition(prop(
        pid::VERSION_SERIES_ID,
        "Version Series Id",
        Id,
        Cardinality::Single,
        Updatability::ReadOnly,
        true,
    ));
    def.add_property_definition(single(
        pid::IS_VERSION_SERIES_CHECKED_OUT,
        "Is Version Series Checked Out",
        Boolean,
    ));
    def.add_property_definition(single(
        pid::VERSION_SERIES_CHECKED_OUT_ID,
        "Version Series Checked Out Id",
        Id,
    ));
    def.add_property_definition(single(
        pid::VERSION_SERIES_CHECKED_OUT_BY,
        "Version Series Checked Out By",
        String,
    ));
    def.add_property_definition(single(pid::CHECKIN_COMMENT, "Checkin Comment", String));
    def.add_property_definition(single(
        pid::CONTENT_STREAM_LENGTH,
        "Content Stream Length",
        Integer,
    ));
    def.add_property_definition(single(pid::CONTENT_STREAM_MIME_TYPE, "MIME Type", String));
    def.add_property_definition(single(pid::CONTENT_STREAM_FILE_NAME, "Filename", String));
    def.add_property_definition(single(pid::CONTENT_STREAM_ID, "Content Stream Id", Id));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_base_type_has_base_properties() {
        for base in BaseTypeId::ALL {
            let def = base_type(base);
            assert_eq!(def.id, base.as_str());
            assert_eq!(def.base_type_id, base);
            assert!(def.parent_type_id.is_none());
            assert_eq!(def.local_namespace, NAMESPACE);
            for id in [pid::OBJECT_ID, pid::NAME, pid::CHANGE_TOKEN, pid::BASE_TYPE_ID] {
                assert!(def.property_definition(id).is_some(), "{base} lacks {id}");
            }
        }
    }

    #[test]
    fn folder_has_path_and_parent() {
        let def = base_type(BaseTypeId::Folder);
        assert_eq!(def.property_definitions.len(), 12);
        assert!(def.property_definition(pid::PATH).is_some());
        assert_eq!(
            def.property_definition(pid::ALLOWED_CHILD_OBJECT_TYPE_IDS)
                .unwrap()
                .cardinality,
            Cardinality::Multi
        );
        assert!(def.content_stream_allowed.is_none());
    }

    #[test]
    fn document_allows_content() {
        let def = base_type(BaseTypeId::Document);
        assert_eq!(def.property_definitions.len(), 23);
        assert_eq!(def.content_stream_allowed, Some(ContentStreamAllowed::Allowed));
        assert_eq!(def.versionable, Some(false));
        assert_eq!(
            def.property_definition(pid::CONTENT_STREAM_LENGTH)
                .unwrap()
                .property_type,
            PropertyType::Integer
        );
    }

    #[test]
    fn relationship_and_policy_are_not_fileable() {
        for base in [BaseTypeId::Relationship, BaseTypeId::Policy] {
            let def = base_type(base);
            assert!(!def.fileable);
            assert!(!def.creatable);
            assert_eq!(def.property_definitions.len(), 9);
        }
    }

    #[test]
    fn required_flags() {
        let def = base_type(BaseTypeId::Folder);
        assert!(def.property_definition(pid::NAME).unwrap().required);
        assert!(def.property_definition(pid::OBJECT_TYPE_ID).unwrap().required);
        assert!(!def.property_definition(pid::OBJECT_ID).unwrap().required);
        assert_eq!(
            def.property_definition(pid::NAME).unwrap().updatability,
            Updatability::ReadWrite
        );
    }
}
