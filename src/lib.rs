//! In-memory sitemap tree cache.
//!
//! Builds navigation trees from sitemap documents stored in a content
//! repository, indexes them for lookup by id, path and resource, computes
//! inherited properties, and keeps separate snapshots for the offline and
//! online projects.
//!
//! ```ignore
//! let cache = DualProjectCache::new(config, offline, online);
//! let entry = cache.entry_by_uri(Project::Online, &Locale::new("en"), "/news/")?;
//! ```

pub mod logger;

pub mod cache;
pub mod config;
pub mod core;
pub mod detail;
pub mod entry;
pub mod error;
pub mod property;
pub mod publish;
pub mod repository;
pub mod structure;
pub mod utils;

#[cfg(test)]
mod testing;

pub use cache::{CacheReporter, CacheStats, ChangeKind, DualProjectCache, ResourceChange};
pub use config::SitemapConfig;
pub use core::{EntryId, Locale, Project, RootPath, StructureId};
pub use detail::DetailPageResolver;
pub use entry::SitemapEntry;
pub use error::{CacheError, Result};
pub use property::{PropertyInheritanceState, PropertyValue};
pub use publish::{PendingPublish, PendingState, PublishSimulationCache};
pub use repository::{ContentRepository, MemoryRepository};
pub use structure::{SitemapTables, SitemapTreeBuilder, StructureCache};
pub use utils::ClosestPathMatcher;
