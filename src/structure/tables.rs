//! Index tables of one built sitemap tree.
//!
//! ```text
//! SitemapTables (one snapshot, rebuilt wholesale)
//! ├── roots             root entries, one per (entry point, locale)
//! ├── by_id             (locale, entry id)      -> entry
//! ├── by_uri            (locale, root path)     -> entry
//! ├── by_structure_id   (structure id, locale)  -> entries
//! ├── active_sitemaps   (locale, entry point)   -> backing sitemap path
//! ├── export names      site root <-> export name
//! ├── paths / ids       link validation sets
//! └── sitemap_infos     runtime info arena + (site root, locale) roots
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};
use uuid::Uuid;

use super::{SitemapInfoId, SitemapRuntimeInfo};
use crate::cache::CacheStats;
use crate::core::{EntryId, Locale, RootPath, StructureId};
use crate::entry::SitemapEntry;
use crate::property::PropertyDefinitions;

/// `(locale, entry point) -> backing sitemap path`
pub type ActiveSitemaps = BTreeMap<(Locale, RootPath), RootPath>;

/// Immutable snapshot of all index tables of one project.
#[derive(Debug, Default)]
pub struct SitemapTables {
    generation: u64,
    roots: Vec<Arc<SitemapEntry>>,
    by_id: FxHashMap<(Locale, EntryId), Arc<SitemapEntry>>,
    by_uri: FxHashMap<(Locale, RootPath), Arc<SitemapEntry>>,
    by_structure_id: FxHashMap<(StructureId, Locale), Vec<Arc<SitemapEntry>>>,
    by_root_path: FxHashMap<RootPath, Vec<Arc<SitemapEntry>>>,
    active_sitemaps: Arc<ActiveSitemaps>,
    export_names: FxHashMap<RootPath, String>,
    export_name_roots: FxHashMap<String, RootPath>,
    site_roots_with_sitemap: BTreeSet<RootPath>,
    paths: FxHashSet<RootPath>,
    ids: FxHashSet<Uuid>,
    sitemap_infos: Vec<SitemapRuntimeInfo>,
    root_infos: FxHashMap<(RootPath, Locale), SitemapInfoId>,
    default_properties: FxHashMap<RootPath, Arc<PropertyDefinitions>>,
    entry_points: BTreeSet<RootPath>,
    sitemap_paths: FxHashSet<RootPath>,
    sitemap_ids: FxHashSet<StructureId>,
}

impl SitemapTables {
    pub(crate) fn new(generation: u64) -> Self {
        Self {
            generation,
            ..Self::default()
        }
    }

    // ========================================================================
    // population (builder only)
    // ========================================================================

    /// Index one entry under its locale. Children are not visited.
    pub(crate) fn insert_entry(&mut self, entry: &Arc<SitemapEntry>) {
        let locale = entry.locale().clone();
        let path = entry.root_path().clone();

        self.by_id
            .insert((locale.clone(), entry.id()), Arc::clone(entry));
        self.by_uri
            .insert((locale.clone(), path.clone()), Arc::clone(entry));
        self.by_root_path
            .entry(path.clone())
            .or_default()
            .push(Arc::clone(entry));
        self.by_structure_id
            .entry((entry.structure_id(), locale))
            .or_default()
            .push(Arc::clone(entry));
        self.ids.insert(*entry.structure_id().as_uuid());
        self.ids.insert(*entry.id().as_uuid());
        self.paths.insert(path);
    }

    pub(crate) fn push_root(&mut self, root: Arc<SitemapEntry>) {
        self.roots.push(root);
    }

    pub(crate) fn add_info(&mut self, info: SitemapRuntimeInfo) -> SitemapInfoId {
        let id = SitemapInfoId(self.sitemap_infos.len());
        self.sitemap_infos.push(info);
        id
    }

    /// Register the root-level info of a site. The first one registered wins.
    pub(crate) fn set_root_info(&mut self, site_root: RootPath, locale: Locale, id: SitemapInfoId) {
        self.root_infos.entry((site_root, locale)).or_insert(id);
    }

    pub(crate) fn add_active_sitemap(&mut self, locale: Locale, entry_point: RootPath, sitemap: RootPath) {
        Arc::make_mut(&mut self.active_sitemaps).insert((locale, entry_point), sitemap);
    }

    pub(crate) fn add_entry_point(&mut self, entry_point: &RootPath, id: StructureId) {
        self.entry_points.insert(entry_point.clone());
        self.ids.insert(*id.as_uuid());
    }

    pub(crate) fn add_backing_sitemap(&mut self, path: &RootPath, id: StructureId) {
        self.sitemap_paths.insert(path.clone());
        self.sitemap_ids.insert(id);
        self.ids.insert(*id.as_uuid());
    }

    pub(crate) fn set_default_properties(&mut self, entry_point: RootPath, defs: Arc<PropertyDefinitions>) {
        self.default_properties.insert(entry_point, defs);
    }

    pub(crate) fn add_site_root_with_sitemap(&mut self, site_root: RootPath) {
        self.site_roots_with_sitemap.insert(site_root);
    }

    pub(crate) fn add_export_name(&mut self, site_root: RootPath, name: String) {
        self.export_name_roots.insert(name.clone(), site_root.clone());
        self.export_names.insert(site_root, name);
    }

    // ========================================================================
    // lookups
    // ========================================================================

    /// Generation of the cache this snapshot was built for.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Root entries, in entry point order.
    pub fn roots(&self) -> &[Arc<SitemapEntry>] {
        &self.roots
    }

    /// Number of indexed entries over all locales.
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub fn entry_by_id(&self, locale: &Locale, id: EntryId) -> Option<&Arc<SitemapEntry>> {
        self.by_id.get(&(locale.clone(), id))
    }

    /// Entry at `path`. File-form paths also match the folder form.
    pub fn entry_by_uri(&self, locale: &Locale, path: &RootPath) -> Option<&Arc<SitemapEntry>> {
        self.by_uri.get(&(locale.clone(), path.clone())).or_else(|| {
            (!path.is_folder())
                .then(|| self.by_uri.get(&(locale.clone(), path.to_folder())))
                .flatten()
        })
    }

    pub fn entries_by_structure_id(&self, id: StructureId, locale: &Locale) -> &[Arc<SitemapEntry>] {
        self.by_structure_id
            .get(&(id, locale.clone()))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Entries at `path` in every locale.
    pub fn entries_by_root_path(&self, path: &RootPath) -> &[Arc<SitemapEntry>] {
        self.by_root_path
            .get(path)
            .or_else(|| self.by_root_path.get(&path.to_folder()))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn active_sitemaps(&self) -> &Arc<ActiveSitemaps> {
        &self.active_sitemaps
    }

    pub fn export_name(&self, site_root: &RootPath) -> Option<&str> {
        self.export_names.get(site_root).map(String::as_str)
    }

    pub fn site_root_for_export_name(&self, name: &str) -> Option<&RootPath> {
        self.export_name_roots.get(name)
    }

    pub fn site_roots_with_sitemap(&self) -> &BTreeSet<RootPath> {
        &self.site_roots_with_sitemap
    }

    /// Property definitions of the root-level sitemap mounted at `entry_point`.
    pub fn default_properties(&self, entry_point: &RootPath) -> Option<&Arc<PropertyDefinitions>> {
        self.default_properties.get(entry_point)
    }

    /// Whether an entry exists at `path` (either form) in any locale.
    pub fn contains_path(&self, path: &RootPath) -> bool {
        self.paths.contains(path) || self.paths.contains(&path.to_folder())
    }

    /// Whether `id` is an entry id, an entry's structure id, an entry point
    /// id, or a backing sitemap id.
    pub fn contains_id(&self, id: &Uuid) -> bool {
        self.ids.contains(id)
    }

    pub fn entry_points(&self) -> &BTreeSet<RootPath> {
        &self.entry_points
    }

    pub fn is_entry_point(&self, path: &RootPath) -> bool {
        self.entry_points.contains(path) || self.entry_points.contains(&path.to_folder())
    }

    pub fn is_backing_sitemap(&self, path: &RootPath, id: Option<StructureId>) -> bool {
        self.sitemap_paths.contains(path) || id.is_some_and(|id| self.sitemap_ids.contains(&id))
    }

    /// Whether an entry point or backing sitemap lies inside (or is) `folder`.
    pub fn contains_source_under(&self, folder: &RootPath) -> bool {
        self.entry_points.iter().any(|p| p.is_under(folder))
            || self.sitemap_paths.iter().any(|p| p.is_under(folder))
    }

    pub fn sitemap_info(&self, id: SitemapInfoId) -> Option<&SitemapRuntimeInfo> {
        self.sitemap_infos.get(id.0)
    }

    pub fn sitemap_infos(&self) -> &[SitemapRuntimeInfo] {
        &self.sitemap_infos
    }

    /// Root-level runtime info of a site for one locale.
    pub fn root_info(&self, site_root: &RootPath, locale: &Locale) -> Option<SitemapInfoId> {
        self.root_infos
            .get(&(site_root.clone(), locale.clone()))
            .copied()
    }

    /// First detail page for `type_name`, searching `start` and then its
    /// enclosing sitemaps.
    pub fn detail_page_in_chain(&self, start: SitemapInfoId, type_name: &str) -> Option<&RootPath> {
        let mut current = Some(start);
        // Parents always have smaller indices, so the walk terminates
        while let Some(id) = current {
            let info = self.sitemap_info(id)?;
            if let Some(uri) = info.detail_page_for(type_name) {
                return Some(uri);
            }
            current = info.parent.filter(|parent| parent.0 < id.0);
        }
        None
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            generation: self.generation,
            entries: self.by_id.len(),
            paths: self.paths.len(),
            ids: self.ids.len(),
            active_sitemaps: self.active_sitemaps.len(),
            sitemap_infos: self.sitemap_infos.len(),
            entry_points: self.entry_points.len(),
        }
    }
}
