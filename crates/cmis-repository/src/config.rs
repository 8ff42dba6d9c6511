use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use cmis_types::{ObjectKey, ObjectToken};

use crate::error::{RepositoryError, RepositoryResult};

/// Configuration for a [`DocumentRepository`](crate::DocumentRepository).
///
/// Every field has a default, so a TOML file only needs the keys it
/// changes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositoryConfig {
    /// Repository id advertised to clients.
    pub repository_id: String,
    /// Display name; the repository id when unset.
    pub repository_name: Option<String>,
    /// Description; the repository id when unset.
    pub repository_description: Option<String>,
    pub product_name: String,
    pub product_version: String,
    pub vendor_name: String,
    /// CMIS version supported.
    pub cmis_version: String,
    /// Key of the space the root sentinel resolves to.
    pub root_folder_key: ObjectKey,
    /// Reported as `cmis:createdBy` and `cmis:lastModifiedBy`.
    pub system_user: String,
    /// Mime type of every document content stream.
    pub content_mime_type: String,
    /// Depth used by `descendants` when the caller passes none.
    pub default_descendants_depth: i64,
    /// Maximum number of folder levels visited below the start folder by a
    /// descendants walk.
    pub max_tree_depth: usize,
    /// When `true`, `object_by_path` resolves each path segment by name.
    /// When `false`, every rooted path resolves to the root folder.
    pub resolve_path_segments: bool,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            repository_id: "document".into(),
            repository_name: None,
            repository_description: None,
            product_name: "CMIS document module".into(),
            product_version: "0.9".into(),
            vendor_name: "Lutece".into(),
            cmis_version: "1.0".into(),
            root_folder_key: 1,
            system_user: "<unknown>".into(),
            content_mime_type: "application/xml".into(),
            default_descendants_depth: 2,
            max_tree_depth: 256,
            resolve_path_segments: false,
        }
    }
}

impl RepositoryConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(raw: &str) -> RepositoryResult<Self> {
        let config: Self =
            toml::from_str(raw).map_err(|e| RepositoryError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a TOML file.
    pub fn load(path: &Path) -> RepositoryResult<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| RepositoryError::Config(format!("{}: {e}", path.display())))?;
        let config = Self::from_toml_str(&raw)?;
        debug!(path = %path.display(), repository = %config.repository_id, "loaded repository config");
        Ok(config)
    }

    /// Serialize to TOML.
    pub fn to_toml_string(&self) -> RepositoryResult<String> {
        toml::to_string_pretty(self).map_err(|e| RepositoryError::Config(e.to_string()))
    }

    pub fn validate(&self) -> RepositoryResult<()> {
        if self.repository_id.trim().is_empty() {
            return Err(RepositoryError::Config("repository_id must not be empty".into()));
        }
        if self.default_descendants_depth == 0 {
            return Err(RepositoryError::Config(
                "default_descendants_depth must not be 0".into(),
            ));
        }
        if self.max_tree_depth == 0 {
            return Err(RepositoryError::Config("max_tree_depth must be positive".into()));
        }
        Ok(())
    }

    pub fn repository_name(&self) -> &str {
        self.repository_name.as_deref().unwrap_or(&self.repository_id)
    }

    pub fn repository_description(&self) -> &str {
        self.repository_description
            .as_deref()
            .unwrap_or(&self.repository_id)
    }

    /// Token of the root folder.
    pub fn root_token(&self) -> ObjectToken {
        ObjectToken::folder(self.root_folder_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config() {
        let c = RepositoryConfig::default();
        assert_eq!(c.repository_id, "document");
        assert_eq!(c.repository_name(), "document");
        assert_eq!(c.repository_description(), "document");
        assert_eq!(c.cmis_version, "1.0");
        assert_eq!(c.root_token().to_string(), "S1");
        assert_eq!(c.system_user, "<unknown>");
        assert_eq!(c.content_mime_type, "application/xml");
        assert_eq!(c.default_descendants_depth, 2);
        assert!(!c.resolve_path_segments);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let c = RepositoryConfig::from_toml_str(
            r#"
            repository_id = "archive"
            root_folder_key = 7
            "#,
        )
        .unwrap();
        assert_eq!(c.repository_id, "archive");
        assert_eq!(c.repository_name(), "archive");
        assert_eq!(c.root_token().to_string(), "S7");
        assert_eq!(c.vendor_name, "Lutece");
        assert_eq!(c.max_tree_depth, 256);
    }

    #[test]
    fn explicit_name_overrides_id() {
        let c = RepositoryConfig::from_toml_str(
            r#"
            repository_name = "Archive"
            repository_description = "Old documents"
            "#,
        )
        .unwrap();
        assert_eq!(c.repository_name(), "Archive");
        assert_eq!(c.repository_description(), "Old documents");
    }

    #[test]
    fn invalid_values_rejected() {
        assert!(matches!(
            RepositoryConfig::from_toml_str("default_descendants_depth = 0"),
            Err(RepositoryError::Config(_))
        ));
        assert!(matches!(
            RepositoryConfig::from_toml_str("max_tree_depth = 0"),
            Err(RepositoryError::Config(_))
        ));
        assert!(matches!(
            RepositoryConfig::from_toml_str("repository_id = \" \""),
            Err(RepositoryError::Config(_))
        ));
        assert!(matches!(
            RepositoryConfig::from_toml_str("root_folder_key = \"one\""),
            Err(RepositoryError::Config(_))
        ));
    }

    #[test]
    fn toml_roundtrip() {
        let mut c = RepositoryConfig::default();
        c.resolve_path_segments = true;
        c.repository_name = Some("Docs".into());
        let raw = c.to_toml_string().unwrap();
        assert_eq!(RepositoryConfig::from_toml_str(&raw).unwrap(), c);
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "system_user = \"admin\"").unwrap();
        writeln!(file, "resolve_path_segments = true").unwrap();
        let c = RepositoryConfig::load(file.path()).unwrap();
        assert_eq!(c.system_user, "admin");
        assert!(c.resolve_path_segments);
    }

    #[test]
    fn load_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = RepositoryConfig::load(&dir.path().join("cmis.toml")).unwrap_err();
        assert!(err.to_string().contains("cmis.toml"));
    }
}
