use std::sync::Arc;

use bytes::Bytes;
use tracing::{debug, info, warn};

use cmis_schema::{TypeDefinition, TypeDefinitionContainer, TypeDefinitionList, TypeRegistry};
use cmis_store::DocumentStore;
use cmis_types::{Admission, PageWindow};

use crate::config::RepositoryConfig;
use crate::error::{RepositoryError, RepositoryResult};
use crate::info::RepositoryInfo;
use crate::model::{ContentStream, ObjectData, ObjectInFolder, ObjectInFolderContainer, ObjectInFolderList};
use crate::object::{join_path, RepositoryObject};
use crate::projector::{compile_properties, PropertyFilter};

/// Read-only CMIS view of a document store.
///
/// Every operation is synchronous and stateless: each call resolves the
/// objects it needs from the store, projects them, and returns owned
/// values. The type registry is shared and never mutated here.
pub struct DocumentRepository<S> {
    store: S,
    types: Arc<TypeRegistry>,
    config: RepositoryConfig,
    info: RepositoryInfo,
}

/// A folder whose children are still to be gathered.
struct Frame {
    folder: RepositoryObject,
    path: String,
    depth: i64,
    level: usize,
    parent: Option<usize>,
}

/// A gathered node awaiting assembly into its parent.
struct Gathered {
    entry: ObjectInFolder,
    parent: Option<usize>,
    children: Vec<ObjectInFolderContainer>,
}

impl<S: DocumentStore> DocumentRepository<S> {
    /// Create a repository with a registry holding only the base types.
    pub fn new(store: S, config: RepositoryConfig) -> Self {
        Self::with_types(store, Arc::new(TypeRegistry::new()), config)
    }

    /// Create a repository sharing an existing type registry.
    pub fn with_types(store: S, types: Arc<TypeRegistry>, config: RepositoryConfig) -> Self {
        let info = RepositoryInfo::from_config(&config);
        Self {
            store,
            types,
            config,
            info,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    pub fn config(&self) -> &RepositoryConfig {
        &self.config
    }

    // ---------------------------------------------------------------
    // Repository and types
    // ---------------------------------------------------------------

    pub fn repository_info(&self) -> &RepositoryInfo {
        &self.info
    }

    pub fn type_children(
        &self,
        type_id: Option<&str>,
        include_property_definitions: bool,
        max_items: Option<i64>,
        skip_count: Option<i64>,
    ) -> TypeDefinitionList {
        self.types
            .type_children(type_id, include_property_definitions, max_items, skip_count)
    }

    pub fn type_descendants(
        &self,
        type_id: Option<&str>,
        depth: Option<i64>,
        include_property_definitions: bool,
    ) -> RepositoryResult<Vec<TypeDefinitionContainer>> {
        Ok(self
            .types
            .type_descendants(type_id, depth, include_property_definitions)?)
    }

    pub fn type_definition(&self, type_id: &str) -> RepositoryResult<TypeDefinition> {
        Ok(self.types.type_definition(type_id)?)
    }

    // ---------------------------------------------------------------
    // Navigation
    // ---------------------------------------------------------------

    /// One page of a folder's children.
    ///
    /// Listable documents come first, then child folders, both in store
    /// order. Out-of-date and invalid documents are not counted. A
    /// document has no children, so asking for its children yields an
    /// empty page.
    pub fn children(
        &self,
        folder_id: &str,
        filter: Option<&str>,
        include_path_segment: bool,
        max_items: Option<i64>,
        skip_count: Option<i64>,
    ) -> RepositoryResult<ObjectInFolderList> {
        let filter = PropertyFilter::split(filter);
        let folder = RepositoryObject::resolve(&self.store, folder_id, &self.config)?;
        if !folder.is_folder() {
            return Ok(ObjectInFolderList::default());
        }
        let folder_path = self.listing_path(&folder);

        let documents = folder
            .child_documents(&self.store)?
            .into_iter()
            .filter(|d| d.is_listable())
            .map(RepositoryObject::from_document);
        let folders = folder
            .child_folders(&self.store)?
            .into_iter()
            .map(RepositoryObject::from_space);

        let mut window = PageWindow::new(max_items, skip_count);
        let mut objects = Vec::new();
        for child in documents.chain(folders) {
            if window.admit() != Admission::Take {
                continue;
            }
            objects.push(self.in_folder(&child, &folder_path, &filter, include_path_segment)?);
        }

        debug!(
            folder = %folder.token(),
            returned = objects.len(),
            num_items = window.num_items(),
            has_more = window.has_more_items(),
            "listed children"
        );
        Ok(ObjectInFolderList {
            objects,
            has_more_items: window.has_more_items(),
            num_items: window.num_items(),
        })
    }

    /// A single object. Its path is reported as `/`.
    pub fn object(&self, object_id: &str, filter: Option<&str>) -> RepositoryResult<ObjectData> {
        let filter = PropertyFilter::split(filter);
        let object = RepositoryObject::resolve(&self.store, object_id, &self.config)?;
        self.project(&object, &filter, "/")
    }

    /// The object at a rooted path.
    ///
    /// Unless `resolve_path_segments` is enabled every rooted path resolves
    /// to the root folder.
    pub fn object_by_path(&self, path: &str, filter: Option<&str>) -> RepositoryResult<ObjectData> {
        let filter = PropertyFilter::split(filter);
        if !path.starts_with('/') {
            return Err(RepositoryError::InvalidArgument(format!(
                "folder path must start with '/': {path:?}"
            )));
        }
        let root = RepositoryObject::load(&self.store, self.config.root_token())?;
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        if segments.is_empty() {
            return self.project(&root, &filter, "/");
        }
        if !self.config.resolve_path_segments {
            warn!(path, ignored = segments.len(), "path segments ignored, resolving to root folder");
            return self.project(&root, &filter, "/");
        }

        let mut current = root;
        for (i, segment) in segments.iter().enumerate() {
            let last = i + 1 == segments.len();
            if let Some(space) = current
                .child_folders(&self.store)?
                .into_iter()
                .find(|s| s.name == *segment)
            {
                current = RepositoryObject::from_space(space);
                continue;
            }
            let document = if last {
                current
                    .child_documents(&self.store)?
                    .into_iter()
                    .find(|d| d.is_listable() && d.title == *segment)
            } else {
                None
            };
            match document {
                Some(document) => current = RepositoryObject::from_document(document),
                None => return Err(RepositoryError::NotFound(format!("path {path}"))),
            }
        }
        self.project(&current, &filter, &format!("/{}", segments.join("/")))
    }

    /// Depth-bounded trees of the folders below `folder_id`.
    ///
    /// An absent depth uses the configured default, `0` is rejected, and
    /// anything below `-1` is unbounded. The walk is iterative and stops
    /// with a runtime failure past `max_tree_depth` levels.
    pub fn descendants(
        &self,
        folder_id: &str,
        depth: Option<i64>,
        filter: Option<&str>,
        include_path_segment: bool,
    ) -> RepositoryResult<Vec<ObjectInFolderContainer>> {
        let depth = depth.unwrap_or(self.config.default_descendants_depth);
        if depth == 0 {
            return Err(RepositoryError::InvalidArgument("depth must not be 0".into()));
        }
        let depth = depth.max(-1);
        let filter = PropertyFilter::split(filter);
        let folder = RepositoryObject::resolve(&self.store, folder_id, &self.config)?;
        if !folder.is_folder() {
            return Ok(Vec::new());
        }

        let forest = self.gather(folder, depth, true, &filter, include_path_segment)?;
        debug!(
            folder = folder_id,
            depth,
            nodes = forest.iter().map(ObjectInFolderContainer::size).sum::<usize>(),
            "gathered descendants"
        );
        Ok(forest)
    }

    /// Walk the tree below `root` with an explicit work stack.
    ///
    /// Nodes are recorded in an arena in creation order, so every node's
    /// index is greater than its parent's; assembly pops the arena from
    /// the back and hands each finished subtree to its parent.
    fn gather(
        &self,
        root: RepositoryObject,
        depth: i64,
        folders_only: bool,
        filter: &PropertyFilter,
        include_path_segment: bool,
    ) -> RepositoryResult<Vec<ObjectInFolderContainer>> {
        let root_path = self.listing_path(&root);
        let mut arena: Vec<Gathered> = Vec::new();
        let mut work = vec![Frame {
            folder: root,
            path: root_path,
            depth,
            level: 1,
            parent: None,
        }];

        while let Some(frame) = work.pop() {
            if frame.level > self.config.max_tree_depth {
                return Err(RepositoryError::runtime(format!(
                    "descendants of {} exceed {} levels",
                    frame.folder.token(),
                    self.config.max_tree_depth
                )));
            }

            let mut entries: Vec<RepositoryObject> = frame
                .folder
                .child_folders(&self.store)?
                .into_iter()
                .map(RepositoryObject::from_space)
                .collect();
            if !folders_only {
                entries.extend(
                    frame
                        .folder
                        .child_documents(&self.store)?
                        .into_iter()
                        .filter(|d| d.is_listable())
                        .map(RepositoryObject::from_document),
                );
            }

            let descend = frame.depth != 1;
            let next_depth = if frame.depth < 0 { -1 } else { frame.depth - 1 };
            let mut next = Vec::new();
            for child in entries {
                let entry = self.in_folder(&child, &frame.path, filter, include_path_segment)?;
                let index = arena.len();
                arena.push(Gathered {
                    entry,
                    parent: frame.parent,
                    children: Vec::new(),
                });
                if descend && child.is_folder() {
                    next.push(Frame {
                        path: join_path(&frame.path, child.name()),
                        folder: child,
                        depth: next_depth,
                        level: frame.level + 1,
                        parent: Some(index),
                    });
                }
            }
            work.extend(next.into_iter().rev());
        }

        let mut roots = Vec::new();
        while let Some(node) = arena.pop() {
            let mut children = node.children;
            children.reverse();
            let container = ObjectInFolderContainer {
                object: node.entry,
                children,
            };
            match node.parent {
                Some(parent) => arena[parent].children.push(container),
                None => roots.push(container),
            }
        }
        roots.reverse();
        Ok(roots)
    }

    // ---------------------------------------------------------------
    // Content
    // ---------------------------------------------------------------

    /// Full content of a document.
    ///
    /// Partial reads are not supported: `offset` and `length` must both be
    /// `None`. Validated content is preferred over working content. A
    /// missing document is reported as having no content stream.
    pub fn content_stream(
        &self,
        object_id: &str,
        offset: Option<u64>,
        length: Option<u64>,
    ) -> RepositoryResult<ContentStream> {
        if offset.is_some() || length.is_some() {
            return Err(RepositoryError::NotSupported(
                "offset and length are not supported".into(),
            ));
        }
        let object = RepositoryObject::resolve(&self.store, object_id, &self.config).map_err(
            |e| match e {
                RepositoryError::NotFound(what) => {
                    RepositoryError::NotSupported(format!("{what} has no content stream"))
                }
                other => other,
            },
        )?;
        let document = object.document().map_err(|_| {
            RepositoryError::NotSupported(format!("{} has no content stream", object.token()))
        })?;
        let content = document.content().ok_or_else(|| {
            RepositoryError::NotSupported(format!("{} has no content", object.token()))
        })?;

        let stream = Bytes::copy_from_slice(content.as_bytes());
        info!(object = %object.token(), bytes = stream.len(), "serving content stream");
        Ok(ContentStream {
            file_name: document.title.clone(),
            length: stream.len() as u64,
            mime_type: self.config.content_mime_type.clone(),
            stream,
        })
    }

    // ---------------------------------------------------------------
    // Projection helpers
    // ---------------------------------------------------------------

    /// Path of a folder whose contents are being listed.
    ///
    /// A listing never fails because the folder's ancestry cannot be
    /// walked; the path then falls back to the folder's name below `/`.
    fn listing_path(&self, folder: &RepositoryObject) -> String {
        folder.path(&self.store, &self.config).unwrap_or_else(|e| {
            warn!(folder = %folder.token(), error = %e, "folder path unavailable");
            join_path("/", folder.name())
        })
    }

    fn project(
        &self,
        object: &RepositoryObject,
        filter: &PropertyFilter,
        path: &str,
    ) -> RepositoryResult<ObjectData> {
        let (properties, info) = compile_properties(object, filter, path, &self.config)?;
        Ok(ObjectData { properties, info })
    }

    fn in_folder(
        &self,
        child: &RepositoryObject,
        folder_path: &str,
        filter: &PropertyFilter,
        include_path_segment: bool,
    ) -> RepositoryResult<ObjectInFolder> {
        let path = join_path(folder_path, child.name());
        Ok(ObjectInFolder {
            object: self.project(child, filter, &path)?,
            path_segment: include_path_segment.then(|| child.name().to_string()),
        })
    }
}

impl<S> std::fmt::Debug for DocumentRepository<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentRepository")
            .field("repository_id", &self.config.repository_id)
            .field("types", &self.types.len())
            .finish()
    }
}
