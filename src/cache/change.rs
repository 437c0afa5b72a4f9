//! Repository change events and their effect on cached tables.

use serde::{Deserialize, Serialize};

use crate::config::SitemapConfig;
use crate::core::{RootPath, StructureId};
use crate::structure::SitemapTables;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChangeKind {
    Created,
    Modified,
    PropertiesChanged,
    Deleted,
}

/// A change of one repository resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceChange {
    pub root_path: RootPath,
    pub type_name: String,
    pub structure_id: Option<StructureId>,
    pub kind: ChangeKind,
}

impl ResourceChange {
    pub fn new(root_path: RootPath, type_name: impl Into<String>, kind: ChangeKind) -> Self {
        Self {
            root_path,
            type_name: type_name.into(),
            structure_id: None,
            kind,
        }
    }

    pub fn with_structure_id(mut self, id: StructureId) -> Self {
        self.structure_id = Some(id);
        self
    }

    /// Whether this change can alter the tree built into `tables`.
    ///
    /// Folder property changes count because a folder can become an entry
    /// point or change its export name. A deleted folder counts if it holds
    /// an entry point or backing sitemap, as its children may not get events
    /// of their own.
    pub fn affects(&self, tables: &SitemapTables, config: &SitemapConfig) -> bool {
        if config.types.is_sitemap(&self.type_name) || config.types.is_schema(&self.root_path) {
            return true;
        }
        if tables.is_backing_sitemap(&self.root_path, self.structure_id) {
            return true;
        }
        match self.kind {
            ChangeKind::PropertiesChanged => {
                self.root_path.is_folder() || tables.is_entry_point(&self.root_path)
            }
            ChangeKind::Deleted => {
                tables.is_entry_point(&self.root_path)
                    || (self.root_path.is_folder()
                        && tables.contains_source_under(&self.root_path))
            }
            ChangeKind::Created | ChangeKind::Modified => false,
        }
    }
}
