//! Dual-project sitemap cache.
//!
//! Holds one [`StructureCache`] per project and routes every read by the
//! caller's [`Project`]. Offline edits only ever drop offline state; a publish
//! drops online state.
//!
//! ```text
//! DualProjectCache
//! ├── offline: StructureCache (+ DocumentCache)   <- on_resource_changed
//! └── online:  StructureCache (+ DocumentCache)   <- on_published
//! ```

mod change;
mod reporter;

pub use change::{ChangeKind, ResourceChange};
pub use reporter::{CacheReporter, CacheStats, LogReporter};

use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::config::SitemapConfig;
use crate::core::{EntryId, Locale, Project, RootPath, StructureId};
use crate::debug;
use crate::detail::DetailPageResolver;
use crate::entry::SitemapEntry;
use crate::error::{CacheError, Result};
use crate::property::PropertyDefinitions;
use crate::publish::{PendingPublish, PublishSimulationCache};
use crate::repository::ContentRepository;
use crate::structure::{ActiveSitemaps, ProjectContext, SitemapTables, StructureCache};

pub struct DualProjectCache {
    config: Arc<SitemapConfig>,
    offline_repository: Arc<dyn ContentRepository>,
    online_repository: Arc<dyn ContentRepository>,
    offline: StructureCache,
    online: StructureCache,
    shut_down: AtomicBool,
}

impl DualProjectCache {
    pub fn new(
        config: SitemapConfig,
        offline: Arc<dyn ContentRepository>,
        online: Arc<dyn ContentRepository>,
    ) -> Self {
        let config = Arc::new(config);
        let structure = |project: Project, repository: &Arc<dyn ContentRepository>| {
            let context = ProjectContext::new(project.as_str(), Arc::clone(repository));
            StructureCache::new(Arc::clone(&config), Box::new(context)).with_document_cache()
        };
        Self {
            offline: structure(Project::Offline, &offline),
            online: structure(Project::Online, &online),
            offline_repository: offline,
            online_repository: online,
            config,
            shut_down: AtomicBool::new(false),
        }
    }

    /// Report table sizes of both projects after every rebuild.
    pub fn with_reporter(mut self, reporter: Arc<dyn CacheReporter>) -> Self {
        self.offline = self.offline.with_reporter(Arc::clone(&reporter));
        self.online = self.online.with_reporter(reporter);
        self
    }

    pub fn config(&self) -> &Arc<SitemapConfig> {
        &self.config
    }

    pub fn repository(&self, project: Project) -> &Arc<dyn ContentRepository> {
        match project {
            Project::Offline => &self.offline_repository,
            Project::Online => &self.online_repository,
        }
    }

    fn structure(&self, project: Project) -> Result<&StructureCache> {
        if self.shut_down.load(Ordering::Acquire) {
            return Err(CacheError::ShutDown);
        }
        Ok(match project {
            Project::Offline => &self.offline,
            Project::Online => &self.online,
        })
    }

    // ========================================================================
    // lookups
    // ========================================================================

    /// The project's current snapshot, rebuilt on demand.
    pub fn tables(&self, project: Project) -> Result<Arc<SitemapTables>> {
        Ok(self.structure(project)?.tables()?)
    }

    /// The snapshot if one is built, without triggering a rebuild.
    pub fn cached_tables(&self, project: Project) -> Option<Arc<SitemapTables>> {
        self.structure(project).ok()?.cached()
    }

    pub fn active_sitemaps(&self, project: Project) -> Result<Arc<ActiveSitemaps>> {
        Ok(Arc::clone(self.tables(project)?.active_sitemaps()))
    }

    pub fn entry_by_id(
        &self,
        project: Project,
        locale: &Locale,
        id: EntryId,
    ) -> Result<Option<Arc<SitemapEntry>>> {
        Ok(self.tables(project)?.entry_by_id(locale, id).cloned())
    }

    /// Entry at `uri`, or the detail entry of a content item below a
    /// sitemap entry (`/news/<structure id>/`).
    pub fn entry_by_uri(
        &self,
        project: Project,
        locale: &Locale,
        uri: &str,
    ) -> Result<Option<Arc<SitemapEntry>>> {
        let tables = self.tables(project)?;
        let path = RootPath::from_link(uri);
        if let Some(entry) = tables.entry_by_uri(locale, &path) {
            return Ok(Some(Arc::clone(entry)));
        }

        let Some(content_id) = path.last_segment().and_then(StructureId::parse) else {
            return Ok(None);
        };
        let Some(parent) = path
            .to_folder()
            .parent()
            .and_then(|parent| tables.entry_by_uri(locale, &parent))
        else {
            return Ok(None);
        };

        match self.repository(project).read_resource_by_id(content_id) {
            Ok(resource) if !resource.state.is_deleted() => {
                Ok(Some(Arc::new(parent.with_detail(content_id))))
            }
            Ok(_) => Ok(None),
            Err(err) if err.is_not_found() => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    pub fn entries_by_structure_id(
        &self,
        project: Project,
        id: StructureId,
        locale: &Locale,
    ) -> Result<Vec<Arc<SitemapEntry>>> {
        Ok(self.tables(project)?.entries_by_structure_id(id, locale).to_vec())
    }

    pub fn entries_by_root_path(
        &self,
        project: Project,
        path: &RootPath,
    ) -> Result<Vec<Arc<SitemapEntry>>> {
        Ok(self.tables(project)?.entries_by_root_path(path).to_vec())
    }

    pub fn default_properties(
        &self,
        project: Project,
        entry_point: &RootPath,
    ) -> Result<Option<Arc<PropertyDefinitions>>> {
        Ok(self
            .tables(project)?
            .default_properties(&entry_point.to_folder())
            .cloned())
    }

    pub fn export_name(&self, project: Project, site_root: &RootPath) -> Result<Option<String>> {
        Ok(self
            .tables(project)?
            .export_name(&site_root.to_folder())
            .map(str::to_string))
    }

    pub fn site_root_for_export_name(&self, project: Project, name: &str) -> Result<Option<RootPath>> {
        Ok(self.tables(project)?.site_root_for_export_name(name).cloned())
    }

    pub fn site_roots_with_sitemap(&self, project: Project) -> Result<BTreeSet<RootPath>> {
        Ok(self.tables(project)?.site_roots_with_sitemap().clone())
    }

    pub fn detail_pages(&self) -> DetailPageResolver<'_> {
        DetailPageResolver::new(self)
    }

    // ========================================================================
    // events
    // ========================================================================

    /// Apply an offline change. Returns whether the offline tables were dropped.
    pub fn on_resource_changed(&self, change: &ResourceChange) -> bool {
        let Ok(offline) = self.structure(Project::Offline) else {
            return false;
        };
        if let Some(id) = change.structure_id {
            offline.invalidate_document(id);
        }

        let drop = match offline.cached() {
            Some(tables) => change.affects(&tables, &self.config),
            // Nothing built; still fence off a rebuild that may be in flight
            None => true,
        };
        if drop {
            debug!("cache"; "offline change of `{}` ({:?})", change.root_path, change.kind);
            offline.invalidate();
        }
        drop
    }

    /// Apply a completed publish: online tables and the published documents
    /// are dropped.
    pub fn on_published(&self, changes: &[ResourceChange]) {
        let Ok(online) = self.structure(Project::Online) else {
            return;
        };
        for id in changes.iter().filter_map(|change| change.structure_id) {
            online.invalidate_document(id);
        }
        online.invalidate();
    }

    /// Start a publish simulation for the given pending set.
    pub fn publish_simulation(&self, pending: PendingPublish) -> Result<PublishSimulationCache> {
        if self.shut_down.load(Ordering::Acquire) {
            return Err(CacheError::ShutDown);
        }
        Ok(PublishSimulationCache::new(
            Arc::clone(&self.config),
            Arc::clone(&self.offline_repository),
            Arc::clone(&self.online_repository),
            pending,
        ))
    }

    /// Drop both projects. Later reads fail with [`CacheError::ShutDown`].
    pub fn shutdown(&self) {
        if self.shut_down.swap(true, Ordering::AcqRel) {
            return;
        }
        self.offline.clear();
        self.online.clear();
        debug!("cache"; "shut down");
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down.load(Ordering::Acquire)
    }
}
