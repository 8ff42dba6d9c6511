//! Property projection: from a resolved object to a filtered property bag.
//!
//! [`PropertyFilter::split`] turns a client filter expression into a
//! filter, and [`compile_properties`] builds the [`PropertyBag`] together
//! with an [`ObjectInfo`] summary of the same object.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use cmis_schema::PropertyValue;
use cmis_store::{Document, Space};
use cmis_types::{millis_to_datetime, property_ids as pid, BaseTypeId, ObjectToken};

use crate::config::RepositoryConfig;
use crate::error::{RepositoryError, RepositoryResult};
use crate::object::{Entity, RepositoryObject};

/// Property id to value.
pub type PropertyBag = BTreeMap<String, PropertyValue>;

/// Which properties a caller asked for.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum PropertyFilter {
    /// No filtering.
    #[default]
    All,
    /// Only these ids. Always contains the identity properties.
    Only(BTreeSet<String>),
}

impl PropertyFilter {
    /// Parse a comma-separated filter expression.
    ///
    /// `None`, a blank expression, or any `*` token means no filtering.
    pub fn split(expr: Option<&str>) -> Self {
        let Some(expr) = expr else {
            return Self::All;
        };
        let tokens: Vec<&str> = expr
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect();
        if tokens.is_empty() || tokens.contains(&"*") {
            return Self::All;
        }
        let mut ids: BTreeSet<String> = tokens.into_iter().map(str::to_string).collect();
        ids.extend(pid::IDENTITY.iter().map(|id| id.to_string()));
        Self::Only(ids)
    }

    pub fn admits(&self, id: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(ids) => ids.contains(id),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }
}

/// Facts about an object, gathered while its properties are compiled.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectInfo {
    pub id: String,
    pub name: String,
    pub base_type: BaseTypeId,
    pub type_id: String,
    pub created_by: String,
    pub creation_date: Option<DateTime<Utc>>,
    pub last_modification_date: Option<DateTime<Utc>>,
    pub has_content: bool,
    pub content_type: Option<String>,
    pub file_name: Option<String>,
    pub supports_descendants: bool,
    pub supports_folder_tree: bool,
    pub has_acl: bool,
    pub has_parent: bool,
}

struct Properties<'a> {
    filter: &'a PropertyFilter,
    bag: PropertyBag,
}

impl Properties<'_> {
    fn add(&mut self, id: &str, value: PropertyValue) {
        if self.filter.admits(id) {
            self.bag.insert(id.to_string(), value);
        }
    }
}

/// Compile the properties of `object` that pass `filter`.
///
/// `path` is the object's path as known to the caller. Store timestamps
/// are rounded up to the whole second.
pub fn compile_properties(
    object: &RepositoryObject,
    filter: &PropertyFilter,
    path: &str,
    config: &RepositoryConfig,
) -> RepositoryResult<(PropertyBag, ObjectInfo)> {
    let base_type = BaseTypeId::from(object.kind());
    let type_id = base_type.as_str().to_string();
    let id = object.id();

    let mut info = ObjectInfo {
        id: id.clone(),
        name: object.name().to_string(),
        base_type,
        type_id: type_id.clone(),
        created_by: config.system_user.clone(),
        creation_date: None,
        last_modification_date: None,
        has_content: false,
        content_type: None,
        file_name: None,
        supports_descendants: object.is_folder(),
        supports_folder_tree: object.is_folder(),
        has_acl: true,
        has_parent: true,
    };

    let mut props = Properties {
        filter,
        bag: PropertyBag::new(),
    };
    props.add(pid::OBJECT_ID, PropertyValue::id(Some(id)));
    props.add(pid::NAME, PropertyValue::string(Some(object.name())));
    props.add(pid::CREATED_BY, PropertyValue::string(Some(&config.system_user)));
    props.add(pid::LAST_MODIFIED_BY, PropertyValue::string(Some(&config.system_user)));
    props.add(pid::CHANGE_TOKEN, PropertyValue::string(None::<String>));
    props.add(pid::BASE_TYPE_ID, PropertyValue::id(Some(base_type.as_str())));
    props.add(pid::OBJECT_TYPE_ID, PropertyValue::id(Some(type_id)));
    props.add(pid::PATH, PropertyValue::string(Some(path)));

    match object.entity() {
        Entity::Document(document) => add_document_properties(&mut props, &mut info, document, config)?,
        Entity::Folder(space) => add_folder_properties(&mut props, &mut info, space),
    }

    Ok((props.bag, info))
}

fn add_document_properties(
    props: &mut Properties<'_>,
    info: &mut ObjectInfo,
    document: &Document,
    config: &RepositoryConfig,
) -> RepositoryResult<()> {
    let created = store_timestamp(document.date_creation, document)?;
    let modified = store_timestamp(document.date_modification, document)?;
    props.add(pid::CREATION_DATE, PropertyValue::date_time(Some(created)));
    props.add(pid::LAST_MODIFICATION_DATE, PropertyValue::date_time(Some(modified)));
    info.creation_date = Some(created);
    info.last_modification_date = Some(modified);

    let length = document.content().map_or(0, str::len);
    props.add(pid::CONTENT_STREAM_ID, PropertyValue::id(None::<String>));
    props.add(
        pid::CONTENT_STREAM_LENGTH,
        PropertyValue::integer(Some(i64::try_from(length).unwrap_or(i64::MAX))),
    );
    props.add(
        pid::CONTENT_STREAM_MIME_TYPE,
        PropertyValue::string(Some(&config.content_mime_type)),
    );
    props.add(
        pid::CONTENT_STREAM_FILE_NAME,
        PropertyValue::string(Some(&document.title)),
    );

    info.has_content = document.content().is_some();
    info.content_type = Some(config.content_mime_type.clone());
    info.file_name = Some(document.title.clone());
    Ok(())
}

fn add_folder_properties(props: &mut Properties<'_>, info: &mut ObjectInfo, space: &Space) {
    match space.parent_key {
        Some(parent) => {
            let parent = ObjectToken::folder(parent).to_string();
            props.add(pid::PARENT_ID, PropertyValue::id(Some(parent)));
        }
        None => info.has_parent = false,
    }
}

fn store_timestamp(millis: i64, document: &Document) -> RepositoryResult<DateTime<Utc>> {
    millis_to_datetime(millis).ok_or_else(|| {
        RepositoryError::runtime(format!(
            "document {} has out-of-range timestamp {millis}",
            document.key
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn doc() -> RepositoryObject {
        RepositoryObject::from_document(
            Document::new(5, 2, "report.xml")
                .with_dates(1_500, 2_000)
                .with_working_content("<draft/>")
                .with_validated_content("<report/>"),
        )
    }

    fn folder() -> RepositoryObject {
        RepositoryObject::from_space(Space::new(2, "reports", Some(1)))
    }

    // ---- split ----

    #[test]
    fn no_filter_forms() {
        for expr in [None, Some(""), Some("  "), Some("*"), Some("cmis:name, *"), Some(" , ")] {
            assert_eq!(PropertyFilter::split(expr), PropertyFilter::All, "{expr:?}");
        }
    }

    #[test]
    fn filter_trims_and_adds_identity() {
        let filter = PropertyFilter::split(Some(" cmis:name ,, cmis:path"));
        let PropertyFilter::Only(ids) = &filter else {
            panic!("expected a filter set");
        };
        assert_eq!(ids.len(), 5);
        assert!(filter.admits("cmis:name"));
        assert!(filter.admits("cmis:path"));
        for id in pid::IDENTITY {
            assert!(filter.admits(id));
        }
        assert!(!filter.admits("cmis:createdBy"));
    }

    proptest! {
        #[test]
        fn split_always_keeps_identity(names in proptest::collection::vec("[a-z:]{1,12}", 1..6)) {
            let filter = PropertyFilter::split(Some(&names.join(",")));
            prop_assert!(!filter.is_all());
            for id in pid::IDENTITY {
                prop_assert!(filter.admits(id));
            }
        }
    }

    // ---- compile ----

    #[test]
    fn document_properties() {
        let config = RepositoryConfig::default();
        let (bag, info) =
            compile_properties(&doc(), &PropertyFilter::All, "/reports/report.xml", &config).unwrap();

        assert_eq!(bag[pid::OBJECT_ID].as_str(), Some("D5"));
        assert_eq!(bag[pid::NAME].as_str(), Some("report.xml"));
        assert_eq!(bag[pid::BASE_TYPE_ID].as_str(), Some("cmis:document"));
        assert_eq!(bag[pid::OBJECT_TYPE_ID].as_str(), Some("cmis:document"));
        assert_eq!(bag[pid::CREATED_BY].as_str(), Some("<unknown>"));
        assert_eq!(bag[pid::LAST_MODIFIED_BY].as_str(), Some("<unknown>"));
        assert!(bag[pid::CHANGE_TOKEN].is_empty());
        assert!(bag[pid::CONTENT_STREAM_ID].is_empty());
        assert_eq!(bag[pid::CONTENT_STREAM_LENGTH].as_integer(), Some(9));
        assert_eq!(bag[pid::CONTENT_STREAM_MIME_TYPE].as_str(), Some("application/xml"));
        assert_eq!(bag[pid::CONTENT_STREAM_FILE_NAME].as_str(), Some("report.xml"));
        assert_eq!(bag[pid::PATH].as_str(), Some("/reports/report.xml"));
        assert!(!bag.contains_key(pid::PARENT_ID));

        assert_eq!(info.base_type, BaseTypeId::Document);
        assert!(info.has_content);
        assert!(!info.supports_descendants);
        assert_eq!(info.file_name.as_deref(), Some("report.xml"));
    }

    #[test]
    fn dates_round_up_to_second() {
        let config = RepositoryConfig::default();
        let (bag, info) = compile_properties(&doc(), &PropertyFilter::All, "/", &config).unwrap();
        let created = bag[pid::CREATION_DATE].as_date_time().unwrap();
        let modified = bag[pid::LAST_MODIFICATION_DATE].as_date_time().unwrap();
        assert_eq!(created.timestamp_millis(), 2_000);
        assert_eq!(modified.timestamp_millis(), 2_000);
        assert_eq!(info.creation_date, Some(created));
    }

    #[test]
    fn folder_properties() {
        let config = RepositoryConfig::default();
        let (bag, info) =
            compile_properties(&folder(), &PropertyFilter::All, "/reports", &config).unwrap();
        assert_eq!(bag[pid::OBJECT_ID].as_str(), Some("S2"));
        assert_eq!(bag[pid::BASE_TYPE_ID].as_str(), Some("cmis:folder"));
        assert_eq!(bag[pid::PARENT_ID].as_str(), Some("S1"));
        assert_eq!(bag[pid::PATH].as_str(), Some("/reports"));
        assert!(!bag.contains_key(pid::CONTENT_STREAM_LENGTH));
        assert!(!bag.contains_key(pid::CREATION_DATE));
        assert!(info.supports_folder_tree);
        assert!(!info.has_content);
        assert!(info.has_parent);
    }

    #[test]
    fn root_folder_has_no_parent_id() {
        let root = RepositoryObject::from_space(Space::new(1, "root", None));
        let (bag, info) =
            compile_properties(&root, &PropertyFilter::All, "/", &RepositoryConfig::default())
                .unwrap();
        assert!(!bag.contains_key(pid::PARENT_ID));
        assert!(!info.has_parent);
    }

    #[test]
    fn filter_restricts_bag_but_not_info() {
        let config = RepositoryConfig::default();
        let filter = PropertyFilter::split(Some("cmis:name"));
        let (bag, info) = compile_properties(&doc(), &filter, "/", &config).unwrap();
        let keys: Vec<_> = bag.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec![pid::BASE_TYPE_ID, pid::NAME, pid::OBJECT_ID, pid::OBJECT_TYPE_ID]
        );
        assert_eq!(info.file_name.as_deref(), Some("report.xml"));
    }

    #[test]
    fn system_user_comes_from_config() {
        let config = RepositoryConfig {
            system_user: "admin".into(),
            ..Default::default()
        };
        let (bag, info) = compile_properties(&folder(), &PropertyFilter::All, "/", &config).unwrap();
        assert_eq!(bag[pid::CREATED_BY].as_str(), Some("admin"));
        assert_eq!(info.created_by, "admin");
    }

    #[test]
    fn out_of_range_timestamp_is_runtime_failure() {
        let broken = RepositoryObject::from_document(Document::new(9, 1, "x").with_dates(i64::MAX, 0));
        assert!(matches!(
            compile_properties(&broken, &PropertyFilter::All, "/", &RepositoryConfig::default()),
            Err(RepositoryError::Runtime { .. })
        ));
    }
}
