//! Static repository information advertised to clients.

use serde::{Deserialize, Serialize};

use cmis_types::ROOT_SENTINEL;

use crate::config::RepositoryConfig;

pub const CMIS_READ: &str = "cmis:read";
pub const CMIS_WRITE: &str = "cmis:write";
pub const CMIS_ALL: &str = "cmis:all";

/// Permission required by each allowable action, in advertised order.
const PERMISSION_MAPPINGS: [(&str, &str); 18] = [
    ("canCreateDocument.Folder", CMIS_READ),
    ("canCreateFolder.Folder", CMIS_READ),
    ("canDeleteContent.Document", CMIS_WRITE),
    ("canDelete.Object", CMIS_ALL),
    ("canDeleteTree.Folder", CMIS_ALL),
    ("canGetACL.Object", CMIS_READ),
    ("canGetAllVersions.VersionSeries", CMIS_READ),
    ("canGetChildren.Folder", CMIS_READ),
    ("canGetDescendents.Folder", CMIS_READ),
    ("canGetFolderParent.Object", CMIS_READ),
    ("canGetParents.Folder", CMIS_READ),
    ("canGetProperties.Object", CMIS_READ),
    ("canMove.Object", CMIS_WRITE),
    ("canMove.Source", CMIS_READ),
    ("canMove.Target", CMIS_WRITE),
    ("canSetContent.Document", CMIS_WRITE),
    ("canUpdateProperties.Object", CMIS_WRITE),
    ("canViewContent.Object", CMIS_READ),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CapabilityAcl {
    None,
    Discover,
    Manage,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CapabilityJoin {
    None,
    InnerOnly,
    InnerAndOuter,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CapabilityQuery {
    None,
    MetadataOnly,
    FulltextOnly,
    BothSeparate,
    BothCombined,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CapabilityChanges {
    None,
    ObjectIdsOnly,
    Properties,
    All,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CapabilityContentStreamUpdates {
    Anytime,
    PwcOnly,
    None,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CapabilityRenditions {
    None,
    Read,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SupportedPermissions {
    Basic,
    Repository,
    Both,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AclPropagation {
    RepositoryDetermined,
    ObjectOnly,
    Propagate,
}

/// Optional CMIS features and which of them this repository offers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryCapabilities {
    pub acl: CapabilityAcl,
    pub all_versions_searchable: bool,
    pub join: CapabilityJoin,
    pub multifiling: bool,
    pub unfiling: bool,
    pub version_specific_filing: bool,
    pub pwc_searchable: bool,
    pub pwc_updatable: bool,
    pub query: CapabilityQuery,
    pub changes: CapabilityChanges,
    pub content_stream_updates: CapabilityContentStreamUpdates,
    pub get_descendants: bool,
    pub get_folder_tree: bool,
    pub renditions: CapabilityRenditions,
}

impl Default for RepositoryCapabilities {
    fn default() -> Self {
        Self {
            acl: CapabilityAcl::Discover,
            all_versions_searchable: false,
            join: CapabilityJoin::None,
            multifiling: false,
            unfiling: false,
            version_specific_filing: false,
            pwc_searchable: false,
            pwc_updatable: false,
            query: CapabilityQuery::None,
            changes: CapabilityChanges::None,
            content_stream_updates: CapabilityContentStreamUpdates::Anytime,
            get_descendants: true,
            get_folder_tree: true,
            renditions: CapabilityRenditions::None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionDefinition {
    pub permission: String,
    pub description: String,
}

/// Permissions required to perform one allowable action.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionMapping {
    pub key: String,
    pub permissions: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AclCapabilities {
    pub supported_permissions: SupportedPermissions,
    pub propagation: AclPropagation,
    pub permissions: Vec<PermissionDefinition>,
    pub mappings: Vec<PermissionMapping>,
}

impl AclCapabilities {
    /// Permissions required by an allowable action key.
    pub fn permissions_for(&self, key: &str) -> Option<&[String]> {
        self.mappings
            .iter()
            .find(|m| m.key == key)
            .map(|m| m.permissions.as_slice())
    }
}

impl Default for AclCapabilities {
    fn default() -> Self {
        let permissions = [(CMIS_READ, "Read"), (CMIS_WRITE, "Write"), (CMIS_ALL, "All")]
            .into_iter()
            .map(|(permission, description)| PermissionDefinition {
                permission: permission.into(),
                description: description.into(),
            })
            .collect();
        let mappings = PERMISSION_MAPPINGS
            .iter()
            .map(|(key, permission)| PermissionMapping {
                key: (*key).into(),
                permissions: vec![(*permission).into()],
            })
            .collect();
        Self {
            supported_permissions: SupportedPermissions::Basic,
            propagation: AclPropagation::ObjectOnly,
            permissions,
            mappings,
        }
    }
}

/// Description of the repository returned by `repository_info`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryInfo {
    pub id: String,
    pub name: String,
    pub description: String,
    pub cmis_version_supported: String,
    pub product_name: String,
    pub product_version: String,
    pub vendor_name: String,
    pub root_folder_id: String,
    pub thin_client_uri: String,
    pub capabilities: RepositoryCapabilities,
    pub acl_capabilities: AclCapabilities,
}

impl RepositoryInfo {
    pub fn from_config(config: &RepositoryConfig) -> Self {
        Self {
            id: config.repository_id.clone(),
            name: config.repository_name().to_string(),
            description: config.repository_description().to_string(),
            cmis_version_supported: config.cmis_version.clone(),
            product_name: config.product_name.clone(),
            product_version: config.product_version.clone(),
            vendor_name: config.vendor_name.clone(),
            root_folder_id: ROOT_SENTINEL.to_string(),
            thin_client_uri: String::new(),
            capabilities: RepositoryCapabilities::default(),
            acl_capabilities: AclCapabilities::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn info_from_default_config() {
        let info = RepositoryInfo::from_config(&RepositoryConfig::default());
        assert_eq!(info.id, "document");
        assert_eq!(info.name, "document");
        assert_eq!(info.product_name, "CMIS document module");
        assert_eq!(info.vendor_name, "Lutece");
        assert_eq!(info.root_folder_id, "@root@");
        assert!(info.thin_client_uri.is_empty());
    }

    #[test]
    fn capabilities_are_read_only_navigation() {
        let caps = RepositoryCapabilities::default();
        assert_eq!(caps.acl, CapabilityAcl::Discover);
        assert_eq!(caps.query, CapabilityQuery::None);
        assert_eq!(caps.content_stream_updates, CapabilityContentStreamUpdates::Anytime);
        assert!(caps.get_descendants && caps.get_folder_tree);
        assert!(!caps.multifiling && !caps.unfiling);
    }

    #[test]
    fn acl_mappings_in_order() {
        let acl = AclCapabilities::default();
        assert_eq!(acl.permissions.len(), 3);
        assert_eq!(acl.permissions[2].description, "All");
        assert_eq!(acl.mappings.len(), 18);
        assert_eq!(acl.mappings[0].key, "canCreateDocument.Folder");
        assert_eq!(acl.mappings[17].key, "canViewContent.Object");
        assert_eq!(
            acl.permissions_for("canGetChildren.Folder"),
            Some(&[CMIS_READ.to_string()][..])
        );
        assert_eq!(
            acl.permissions_for("canDeleteTree.Folder"),
            Some(&[CMIS_ALL.to_string()][..])
        );
        assert_eq!(acl.permissions_for("canFly.Object"), None);
    }

    #[test]
    fn serializes_enums_lowercase() {
        let json = serde_json::to_value(RepositoryCapabilities::default()).unwrap();
        assert_eq!(json["acl"], "discover");
        assert_eq!(json["content_stream_updates"], "anytime");
        let acl = serde_json::to_value(AclCapabilities::default()).unwrap();
        assert_eq!(acl["propagation"], "objectonly");
    }
}
