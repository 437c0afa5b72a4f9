//! Backing-context selection.
//!
//! A [`ContextSelector`] decides which repository serves each read while a
//! tree is built. A plain project reads everything from its own repository;
//! the publish simulation mixes offline and online per resource.

use std::sync::Arc;

use crate::core::{RootPath, StructureId};
use crate::repository::{ContentRepository, RepoResult, Resource};

pub trait ContextSelector: Send + Sync {
    /// Short name used in log messages.
    fn label(&self) -> &str;

    /// Repository serving reads of the resource with this structure id.
    fn by_id(&self, id: StructureId) -> &dyn ContentRepository;

    /// Repository serving reads of the resource at this path.
    fn by_path(&self, path: &RootPath) -> &dyn ContentRepository;

    /// Entry point resources: everything carrying the `marker` property.
    fn entry_points(&self, marker: &str) -> RepoResult<Vec<Resource>>;
}

/// Reads everything from one project's repository.
pub struct ProjectContext {
    label: String,
    repository: Arc<dyn ContentRepository>,
}

impl ProjectContext {
    pub fn new(label: impl Into<String>, repository: Arc<dyn ContentRepository>) -> Self {
        Self {
            label: label.into(),
            repository,
        }
    }

    pub fn repository(&self) -> &Arc<dyn ContentRepository> {
        &self.repository
    }
}

impl ContextSelector for ProjectContext {
    fn label(&self) -> &str {
        &self.label
    }

    fn by_id(&self, _id: StructureId) -> &dyn ContentRepository {
        self.repository.as_ref()
    }

    fn by_path(&self, _path: &RootPath) -> &dyn ContentRepository {
        self.repository.as_ref()
    }

    fn entry_points(&self, marker: &str) -> RepoResult<Vec<Resource>> {
        self.repository.resources_with_property(marker)
    }
}
