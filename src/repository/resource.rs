//! Repository resource descriptors.

use serde::{Deserialize, Serialize};

use crate::core::{RootPath, StructureId};

/// Broad resource category, as reported by the repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceKind {
    Folder,
    /// Structured (schema-backed) content; sitemap documents are of this kind too.
    StructuredContent,
    #[default]
    Plain,
}

/// Modification state of a resource relative to its last published version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceState {
    #[default]
    Unchanged,
    New,
    Changed,
    Deleted,
}

impl ResourceState {
    #[inline]
    pub fn is_deleted(self) -> bool {
        matches!(self, Self::Deleted)
    }
}

/// A repository resource as seen in one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub structure_id: StructureId,
    pub root_path: RootPath,
    /// Specific resource type name (e.g. `folder`, `sitemap`, `article`).
    pub type_name: String,
    pub kind: ResourceKind,
    #[serde(default)]
    pub state: ResourceState,
}

impl Resource {
    pub fn new(
        structure_id: StructureId,
        root_path: RootPath,
        type_name: impl Into<String>,
        kind: ResourceKind,
    ) -> Self {
        Self {
            structure_id,
            root_path,
            type_name: type_name.into(),
            kind,
            state: ResourceState::Unchanged,
        }
    }

    #[inline]
    pub fn is_folder(&self) -> bool {
        self.kind == ResourceKind::Folder
    }

    #[inline]
    pub fn is_structured_content(&self) -> bool {
        self.kind == ResourceKind::StructuredContent
    }
}

/// A file read from the repository, ready to be handed to the document parser.
#[derive(Debug, Clone)]
pub struct SitemapFile {
    pub resource: Resource,
    pub content: String,
}
