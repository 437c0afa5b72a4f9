//! Shared fixtures for unit tests.

use std::sync::Arc;

use crate::cache::DualProjectCache;
use crate::config::{SitemapConfig, SitesConfig};
use crate::core::{RootPath, StructureId};
use crate::property::PropertyValue;
use crate::repository::{ContentRepository, MemoryRepository, RawEntry, SitemapDocument};

/// Config with default property names and `/site/` as the only site root.
pub(crate) fn config() -> SitemapConfig {
    crate::logger::set_quiet(true);
    SitemapConfig {
        sites: SitesConfig::new(["/site/"]),
        ..SitemapConfig::default()
    }
}

/// Ids of a mounted sitemap.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Mounted {
    pub folder: StructureId,
    pub sitemap: StructureId,
}

/// Store `document` at `sitemap_path` and mark `entry_point` with it.
pub(crate) fn mount(
    repo: &MemoryRepository,
    entry_point: &str,
    sitemap_path: &str,
    document: &SitemapDocument,
) -> Mounted {
    let folder = match repo.read_resource(&RootPath::folder(entry_point)) {
        Ok(resource) => resource.structure_id,
        Err(_) => repo.add_folder(entry_point),
    };
    let sitemap = repo.add_sitemap(sitemap_path, document);
    repo.set_property(entry_point, "sitemap", sitemap_path)
        .expect("entry point folder exists");
    Mounted { folder, sitemap }
}

/// ```text
/// "home" (stripped)  {A: 1}
/// ├── a              {B: 2}
/// │   ├── a1
/// │   └── a2
/// ├── b
/// └── c
/// ```
pub(crate) fn news_document() -> SitemapDocument {
    let tree = RawEntry::new("home")
        .with_title("Home")
        .with_property("A", PropertyValue::simple("1"))
        .with_child(
            RawEntry::new("a")
                .with_property("B", PropertyValue::simple("2"))
                .with_child(RawEntry::new("a1"))
                .with_child(RawEntry::new("a2")),
        )
        .with_child(RawEntry::new("b"))
        .with_child(RawEntry::new("c"));
    SitemapDocument::new().with_locale("en", tree)
}

pub(crate) fn dual(offline: &Arc<MemoryRepository>, online: &Arc<MemoryRepository>) -> DualProjectCache {
    let offline: Arc<dyn ContentRepository> = offline.clone();
    let online: Arc<dyn ContentRepository> = online.clone();
    DualProjectCache::new(config(), offline, online)
}
