//! Content repository access.
//!
//! The cache never talks to storage directly. Everything it needs from the
//! repository goes through [`ContentRepository`], one instance per project:
//!
//! ```text
//! ContentRepository
//! ├── read_resource / read_resource_by_id   # metadata lookups
//! ├── read_file                             # sitemap document bytes
//! ├── read_property                         # (optionally inherited) properties
//! ├── resources_with_property               # entry point discovery
//! └── parse_sitemap                         # file -> per-locale raw trees
//! ```
//!
//! [`MemoryRepository`] is the in-process backend used by the CLI and tests.

mod document;
mod error;
mod fixture;
mod memory;
mod resource;

pub use document::{DetailPageConfig, RawEntry, SitemapDocument};
pub use error::{RepoResult, RepositoryError};
pub use fixture::{ProjectFixture, RepositoryFixture, ResourceFixture};
pub use memory::MemoryRepository;
pub use resource::{Resource, ResourceKind, ResourceState, SitemapFile};

use crate::core::{RootPath, StructureId};

/// Read access to one project of the content repository.
pub trait ContentRepository: Send + Sync {
    /// Resource metadata by path.
    fn read_resource(&self, path: &RootPath) -> RepoResult<Resource>;

    /// Resource metadata by structure id.
    fn read_resource_by_id(&self, id: StructureId) -> RepoResult<Resource>;

    /// Read a file's content. Returns [`RepositoryError::NotFound`] if absent.
    fn read_file(&self, path: &RootPath) -> RepoResult<SitemapFile>;

    /// Read a property value. With `search`, the parent folders are searched
    /// when the resource itself does not carry the property.
    fn read_property(&self, resource: &Resource, name: &str, search: bool)
    -> RepoResult<Option<String>>;

    /// All non-deleted resources carrying the given property.
    fn resources_with_property(&self, name: &str) -> RepoResult<Vec<Resource>>;

    /// Decode a sitemap file into its per-locale raw trees.
    fn parse_sitemap(&self, file: &SitemapFile) -> RepoResult<SitemapDocument> {
        SitemapDocument::from_json(&file.resource.root_path, &file.content)
    }
}
