//! Sitemap tree construction.
//!
//! # Build Flow
//!
//! ```text
//! entry points (marker property)
//!     │
//!     ├── load (parallel)      marker -> sitemap file -> document, export name
//!     │
//!     └── visit (sorted)       per locale, depth-first
//!             ├── strip root name
//!             ├── inherit properties, inject nav position
//!             ├── sub-sitemap?  splice its root children, switch entry point
//!             └── freeze + index (post-order)
//! ```
//!
//! A failing entry point or sub-sitemap is logged and skipped; only a failure
//! to list the entry points aborts the build.

use std::sync::Arc;

use rayon::prelude::*;
use rustc_hash::FxHashSet;

use super::{ContextSelector, DocumentCache, SitemapInfoId, SitemapRuntimeInfo, SitemapTables};
use crate::config::SitemapConfig;
use crate::core::{EntryId, Locale, RootPath, StructureId};
use crate::entry::{EntryDraft, SitemapEntry};
use crate::property::PropertyInheritanceState;
use crate::repository::{
    RawEntry, RepoResult, RepositoryError, Resource, SitemapDocument, SitemapFile,
};
use crate::utils::plural_count;
use crate::{debug, log};

/// Builds a complete [`SitemapTables`] snapshot from a backing context.
#[derive(Clone, Copy)]
pub struct SitemapTreeBuilder<'a> {
    config: &'a SitemapConfig,
    context: &'a dyn ContextSelector,
    documents: Option<&'a DocumentCache>,
    generation: u64,
}

/// An entry point with its sitemap loaded and parsed.
struct LoadedEntryPoint {
    resource: Resource,
    site_root: Option<RootPath>,
    sitemap: Resource,
    document: Arc<SitemapDocument>,
    export_name: Option<String>,
}

impl<'a> SitemapTreeBuilder<'a> {
    pub fn new(config: &'a SitemapConfig, context: &'a dyn ContextSelector) -> Self {
        Self {
            config,
            context,
            documents: None,
            generation: 0,
        }
    }

    /// Reuse parsed documents across builds.
    pub fn with_documents(mut self, documents: &'a DocumentCache) -> Self {
        self.documents = Some(documents);
        self
    }

    pub fn with_generation(mut self, generation: u64) -> Self {
        self.generation = generation;
        self
    }

    /// Build all tables.
    ///
    /// Only a failure to list the entry points is returned as an error.
    pub fn build(&self) -> RepoResult<SitemapTables> {
        let marker = &self.config.properties.entry_point;
        let mut entry_points = self.context.entry_points(marker)?;
        entry_points.sort_by(|a, b| a.root_path.cmp(&b.root_path));
        entry_points.dedup_by(|a, b| a.root_path == b.root_path);

        debug!(
            "rebuild";
            "{}: loading {}",
            self.context.label(),
            plural_count(entry_points.len(), "entry point")
        );

        let loaded: Vec<LoadedEntryPoint> = entry_points
            .into_par_iter()
            .filter_map(|resource| match self.load_entry_point(&resource) {
                Ok(loaded) => Some(loaded),
                Err(err) => {
                    log!(
                        "warning";
                        "{}: skipping entry point `{}`: {}",
                        self.context.label(),
                        resource.root_path,
                        error_chain(&err)
                    );
                    None
                }
            })
            .collect();

        let mut tables = SitemapTables::new(self.generation);
        // Registered up front so that enclosing trees yield nested entry points
        for entry_point in &loaded {
            tables.add_entry_point(
                &entry_point.resource.root_path.to_folder(),
                entry_point.resource.structure_id,
            );
        }
        let mut claimed = FxHashSet::default();
        for entry_point in loaded {
            self.visit_entry_point(&mut tables, &mut claimed, entry_point);
        }

        debug!(
            "rebuild";
            "{}: indexed {} under {}",
            self.context.label(),
            plural_count(tables.len(), "entry"),
            plural_count(tables.entry_points().len(), "entry point")
        );
        Ok(tables)
    }

    // ========================================================================
    // loading
    // ========================================================================

    fn load_entry_point(&self, resource: &Resource) -> RepoResult<LoadedEntryPoint> {
        let marker = &self.config.properties.entry_point;
        let repository = self.context.by_path(&resource.root_path);
        let target = repository
            .read_property(resource, marker, false)?
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| RepositoryError::MissingProperty {
                path: resource.root_path.clone(),
                name: marker.clone(),
            })?;

        let site_root = self.config.sites.site_root_of(&resource.root_path);
        let (sitemap, document) = self.read_document(&target, site_root.as_ref())?;
        let export_name = site_root.as_ref().and_then(|root| self.read_export_name(root));

        Ok(LoadedEntryPoint {
            resource: resource.clone(),
            site_root,
            sitemap,
            document,
            export_name,
        })
    }

    /// Read and parse a sitemap, trying `target` as absolute path first and
    /// then relative to the site root.
    fn read_document(
        &self,
        target: &str,
        site_root: Option<&RootPath>,
    ) -> RepoResult<(Resource, Arc<SitemapDocument>)> {
        let absolute = RootPath::file(target);
        let file = match self.context.by_path(&absolute).read_file(&absolute) {
            Ok(file) => file,
            Err(err) => {
                let Some(root) = site_root else {
                    return Err(err);
                };
                let relative = root.join(target);
                debug!("rebuild"; "`{}` unreadable ({}), trying `{}`", absolute, err, relative);
                self.context.by_path(&relative).read_file(&relative)?
            }
        };
        let document = self.parse(&file)?;
        Ok((file.resource, document))
    }

    fn parse(&self, file: &SitemapFile) -> RepoResult<Arc<SitemapDocument>> {
        let repository = self.context.by_path(&file.resource.root_path);
        match self.documents {
            Some(cache) => cache.get_or_parse(file, repository),
            None => Ok(Arc::new(repository.parse_sitemap(file)?)),
        }
    }

    /// Resolve a sub-sitemap reference. Deleted resources count as missing.
    fn read_sub_sitemap(&self, id: StructureId) -> RepoResult<(Resource, Arc<SitemapDocument>)> {
        let resource = self.context.by_id(id).read_resource_by_id(id)?;
        if resource.state.is_deleted() {
            return Err(RepositoryError::IdNotFound(id));
        }
        let file = self
            .context
            .by_path(&resource.root_path)
            .read_file(&resource.root_path)?;
        let document = self.parse(&file)?;
        Ok((file.resource, document))
    }

    fn read_export_name(&self, site_root: &RootPath) -> Option<String> {
        let repository = self.context.by_path(site_root);
        let name = &self.config.properties.export_name;
        let result = repository
            .read_resource(site_root)
            .and_then(|resource| repository.read_property(&resource, name, false));
        match result {
            Ok(value) => value.filter(|v| !v.trim().is_empty()),
            Err(err) => {
                log!("warning"; "cannot read export name of `{}`: {}", site_root, err);
                None
            }
        }
    }

    // ========================================================================
    // visiting
    // ========================================================================

    fn visit_entry_point(
        &self,
        tables: &mut SitemapTables,
        claimed: &mut FxHashSet<(Locale, EntryId)>,
        loaded: LoadedEntryPoint,
    ) {
        let entry_point = loaded.resource.root_path.to_folder();
        tables.add_backing_sitemap(&loaded.sitemap.root_path, loaded.sitemap.structure_id);
        if let Some(root) = &loaded.site_root {
            tables.add_site_root_with_sitemap(root.clone());
            if let Some(name) = loaded.export_name {
                tables.add_export_name(root.clone(), name);
            }
        }

        let definitions = Arc::new(loaded.document.properties.clone());
        tables.set_default_properties(entry_point.clone(), Arc::clone(&definitions));

        for (locale, raw_root) in &loaded.document.locales {
            tables.add_active_sitemap(
                locale.clone(),
                entry_point.clone(),
                loaded.sitemap.root_path.clone(),
            );
            let info = tables.add_info(SitemapRuntimeInfo::new(
                loaded.sitemap.root_path.clone(),
                loaded.sitemap.structure_id,
                entry_point.clone(),
                locale.clone(),
                None,
                &loaded.document.detail_pages,
            ));
            if let Some(root) = &loaded.site_root {
                tables.set_root_info(root.clone(), locale.clone(), info);
            }

            if !raw_root.name.is_empty() {
                debug!("rebuild"; "stripping root name `{}` of `{}`", raw_root.name, loaded.sitemap.root_path);
            }

            let frame = Frame {
                sitemap_id: loaded.sitemap.structure_id,
                entry_point: entry_point.clone(),
                parent_uri: String::new(),
                parent_path: entry_point.clone(),
                info,
                state: PropertyInheritanceState::root(Arc::clone(&definitions)),
            };
            let mut walk = TreeWalk {
                builder: *self,
                tables: &mut *tables,
                claimed: &mut *claimed,
                locale: locale.clone(),
                stack: vec![loaded.sitemap.structure_id],
            };
            let root = walk.visit(&frame, raw_root, 0, true);
            tables.push_root(root);
        }
    }
}

/// Context of the node being visited, as inherited from its parent.
struct Frame {
    /// Sitemap owning the node (ids are synthesized from it).
    sitemap_id: StructureId,
    entry_point: RootPath,
    parent_uri: String,
    parent_path: RootPath,
    info: SitemapInfoId,
    state: PropertyInheritanceState,
}

/// Depth-first visit of one locale of one entry point.
struct TreeWalk<'a, 't> {
    builder: SitemapTreeBuilder<'a>,
    tables: &'t mut SitemapTables,
    claimed: &'t mut FxHashSet<(Locale, EntryId)>,
    locale: Locale,
    /// Sitemaps currently being expanded, outermost first.
    stack: Vec<StructureId>,
}

impl TreeWalk<'_, '_> {
    fn visit(
        &mut self,
        frame: &Frame,
        raw: &RawEntry,
        position: usize,
        is_root: bool,
    ) -> Arc<SitemapEntry> {
        let config = self.builder.config;
        let properties = &config.properties;

        let (name, original_uri, root_path) = if is_root {
            (String::new(), String::new(), frame.entry_point.clone())
        } else {
            let name = raw.name.trim().trim_matches('/').to_string();
            let original_uri = format!("{}{name}/", frame.parent_uri);
            let root_path = frame.parent_path.join(&format!("{name}/"));
            (name, original_uri, root_path)
        };

        let id = self.claim_id(raw, frame.sitemap_id, &original_uri, &root_path);
        let structure_id = raw
            .structure_id
            .as_deref()
            .and_then(StructureId::parse)
            .unwrap_or(frame.sitemap_id);

        let state = frame.state.update(&raw.properties, &root_path);
        let mut computed = state.computed().clone();
        computed.insert(properties.nav_pos.clone(), position.to_string());

        let draft = EntryDraft {
            id,
            structure_id,
            locale: self.locale.clone(),
            name,
            title: raw.title.clone(),
            original_uri: original_uri.clone(),
            root_path: root_path.clone(),
            entry_point: frame.entry_point.clone(),
            position,
            is_root_entry: is_root,
            own_properties: raw.properties.clone(),
            computed_properties: computed,
            sitemap_info: Some(frame.info),
        };

        let sub_sitemap = raw
            .properties
            .get(&properties.sub_sitemap)
            .and_then(|value| value.own.as_deref())
            .filter(|value| !value.trim().is_empty());

        let sub_entries = match sub_sitemap {
            Some(reference) => self.visit_sub_sitemap(reference, &root_path, frame.info, state),
            None => {
                let child_frame = Frame {
                    sitemap_id: frame.sitemap_id,
                    entry_point: frame.entry_point.clone(),
                    parent_uri: original_uri,
                    parent_path: root_path,
                    info: frame.info,
                    state,
                };
                self.visit_children(&child_frame, &raw.children)
            }
        };

        let entry = Arc::new(draft.freeze(sub_entries));
        self.tables.insert_entry(&entry);
        entry
    }

    /// Visit the children of a node, skipping those that cannot own a path.
    ///
    /// A child whose path is itself an entry point belongs to that entry
    /// point's tree, and of two siblings with the same name the first wins.
    fn visit_children(&mut self, frame: &Frame, children: &[RawEntry]) -> Vec<Arc<SitemapEntry>> {
        let mut named = Vec::with_capacity(children.len());
        let mut seen = FxHashSet::default();
        for child in children {
            let name = child.name.trim().trim_matches('/');
            if name.is_empty() {
                log!(
                    "warning";
                    "skipping unnamed entry below `{}` ({})",
                    frame.parent_path,
                    self.locale
                );
                continue;
            }

            let path = frame.parent_path.join(&format!("{name}/"));
            if self.tables.is_entry_point(&path) {
                log!(
                    "warning";
                    "skipping entry `{}` ({}): the path is a nested entry point",
                    path,
                    self.locale
                );
            } else if !seen.insert(path.clone()) {
                log!(
                    "warning";
                    "skipping entry `{}` ({}): duplicate sibling name",
                    path,
                    self.locale
                );
            } else {
                named.push(child);
            }
        }

        named
            .into_iter()
            .enumerate()
            .map(|(position, child)| self.visit(frame, child, position, false))
            .collect()
    }

    /// Splice the root children of a referenced sitemap below `node_path`.
    ///
    /// Any failure leaves the node childless.
    fn visit_sub_sitemap(
        &mut self,
        reference: &str,
        node_path: &RootPath,
        parent_info: SitemapInfoId,
        state: PropertyInheritanceState,
    ) -> Vec<Arc<SitemapEntry>> {
        let Some(id) = StructureId::parse(reference) else {
            log!("warning"; "`{}`: malformed sub-sitemap reference `{}`", node_path, reference);
            return Vec::new();
        };
        if self.stack.contains(&id) {
            log!("warning"; "`{}`: sub-sitemap {} is already being expanded (cycle)", node_path, id);
            return Vec::new();
        }

        let (sitemap, document) = match self.builder.read_sub_sitemap(id) {
            Ok(loaded) => loaded,
            Err(err) => {
                log!("warning"; "`{}`: cannot load sub-sitemap {}: {}", node_path, id, error_chain(&err));
                return Vec::new();
            }
        };
        let Some(sub_root) = document.root(&self.locale) else {
            log!(
                "warning";
                "`{}`: sub-sitemap `{}` has no `{}` tree",
                node_path,
                sitemap.root_path,
                self.locale
            );
            return Vec::new();
        };

        self.tables.add_active_sitemap(
            self.locale.clone(),
            node_path.clone(),
            sitemap.root_path.clone(),
        );
        self.tables
            .add_backing_sitemap(&sitemap.root_path, sitemap.structure_id);
        let info = self.tables.add_info(SitemapRuntimeInfo::new(
            sitemap.root_path.clone(),
            sitemap.structure_id,
            node_path.clone(),
            self.locale.clone(),
            Some(parent_info),
            &document.detail_pages,
        ));

        let frame = Frame {
            sitemap_id: sitemap.structure_id,
            entry_point: node_path.clone(),
            parent_uri: String::new(),
            parent_path: node_path.clone(),
            info,
            state: state.with_definitions(Arc::new(document.properties.clone())),
        };

        self.stack.push(id);
        let children = self.visit_children(&frame, &sub_root.children);
        self.stack.pop();
        children
    }

    /// Entry id from the raw data, or a stable synthesized one when it is
    /// missing, malformed, or already taken in this locale.
    fn claim_id(
        &mut self,
        raw: &RawEntry,
        sitemap_id: StructureId,
        original_uri: &str,
        root_path: &RootPath,
    ) -> EntryId {
        let candidate = raw
            .id
            .as_deref()
            .and_then(EntryId::parse)
            .unwrap_or_else(|| EntryId::synthesize(sitemap_id, &self.locale, original_uri));
        if self.claimed.insert((self.locale.clone(), candidate)) {
            return candidate;
        }

        // Same sitemap mounted twice, or a duplicated raw id
        let derived = EntryId::synthesize(sitemap_id, &self.locale, root_path.as_str());
        debug!("rebuild"; "duplicate entry id {} at `{}`, using {}", candidate, root_path, derived);
        self.claimed.insert((self.locale.clone(), derived));
        derived
    }
}

/// Render an error with its sources, `a: b: c`.
pub(crate) fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::repository::{ContentRepository, MemoryRepository};
    use crate::structure::ProjectContext;
    use crate::testing::{self, mount, news_document};
    use crate::property::PropertyValue;

    fn build(repo: &Arc<MemoryRepository>) -> SitemapTables {
        let config = testing::config();
        let repository: Arc<dyn ContentRepository> = repo.clone();
        let context = ProjectContext::new("test", repository);
        SitemapTreeBuilder::new(&config, &context).build().unwrap()
    }

    fn en() -> Locale {
        Locale::new("en")
    }

    fn find<'t>(tables: &'t SitemapTables, path: &str) -> &'t Arc<SitemapEntry> {
        tables
            .entry_by_uri(&en(), &RootPath::folder(path))
            .unwrap_or_else(|| panic!("no entry at {path}"))
    }

    #[test]
    fn test_sibling_positions_are_contiguous() {
        let repo = Arc::new(MemoryRepository::new());
        mount(&repo, "/site/news/", "/site/news/news.sitemap", &news_document());
        let tables = build(&repo);

        assert_eq!(tables.roots().len(), 1);
        for entry in tables.roots()[0].walk() {
            let positions: Vec<_> = entry.sub_entries().iter().map(|e| e.position()).collect();
            let expected: Vec<_> = (0..entry.sub_entries().len()).collect();
            assert_eq!(positions, expected, "below {}", entry.root_path());
        }
    }

    #[test]
    fn test_root_name_stripped() {
        let repo = Arc::new(MemoryRepository::new());
        mount(&repo, "/site/news/", "/site/news/news.sitemap", &news_document());
        let tables = build(&repo);

        let root = &tables.roots()[0];
        assert_eq!(root.name(), "");
        assert_eq!(root.original_uri(), "");
        assert_eq!(root.root_path().as_str(), "/site/news/");
        assert!(root.is_root_entry());

        let a1 = find(&tables, "/site/news/a/a1/");
        assert_eq!(a1.name(), "a1");
        assert_eq!(a1.original_uri(), "a/a1/");
        assert_eq!(a1.entry_point().as_str(), "/site/news/");
        assert!(!a1.is_root_entry());
    }

    #[test]
    fn test_indexes_agree() {
        let repo = Arc::new(MemoryRepository::new());
        mount(&repo, "/site/news/", "/site/news/news.sitemap", &news_document());
        let tables = build(&repo);

        let mut count = 0;
        for entry in tables.roots()[0].walk() {
            let by_id = tables.entry_by_id(&en(), entry.id()).unwrap();
            let by_uri = tables.entry_by_uri(&en(), entry.root_path()).unwrap();
            assert!(std::ptr::eq(by_id.as_ref(), entry));
            assert!(std::ptr::eq(by_uri.as_ref(), entry));
            count += 1;
        }
        assert_eq!(count, 6);
        assert_eq!(tables.len(), 6);
    }

    #[test]
    fn test_nested_entry_point_owns_its_path() {
        let repo = Arc::new(MemoryRepository::new());
        let home = SitemapDocument::new().with_locale(
            "en",
            RawEntry::new("home")
                .with_child(RawEntry::new("news").with_child(RawEntry::new("stale")))
                .with_child(RawEntry::new("about")),
        );
        mount(&repo, "/site/", "/site/home.sitemap", &home);
        mount(&repo, "/site/news/", "/site/news/news.sitemap", &news_document());
        let tables = build(&repo);

        assert_eq!(tables.roots().len(), 2);
        let news = find(&tables, "/site/news/");
        assert!(news.is_root_entry());
        assert_eq!(news.entry_point().as_str(), "/site/news/");
        assert!(tables.entry_by_uri(&en(), &RootPath::folder("/site/news/stale/")).is_none());
        // Positions close over the skipped child
        assert_eq!(find(&tables, "/site/about/").position(), 0);

        let mut count = 0;
        for root in tables.roots() {
            for entry in root.walk() {
                let by_id = tables.entry_by_id(&en(), entry.id()).unwrap();
                let by_uri = tables.entry_by_uri(&en(), entry.root_path()).unwrap();
                assert!(std::ptr::eq(by_id.as_ref(), entry));
                assert!(std::ptr::eq(by_uri.as_ref(), entry));
                count += 1;
            }
        }
        assert_eq!(count, 8);
        assert_eq!(tables.len(), 8);
    }

    #[test]
    fn test_duplicate_sibling_names_keep_first() {
        let repo = Arc::new(MemoryRepository::new());
        let document = SitemapDocument::new().with_locale(
            "en",
            RawEntry::new("")
                .with_child(RawEntry::new("a").with_title("first"))
                .with_child(RawEntry::new("a/").with_title("second"))
                .with_child(RawEntry::new("b")),
        );
        mount(&repo, "/site/news/", "/site/news/news.sitemap", &document);
        let tables = build(&repo);

        assert_eq!(tables.len(), 3);
        assert_eq!(find(&tables, "/site/news/a/").title(), Some("first"));
        assert_eq!(find(&tables, "/site/news/b/").position(), 1);
    }

    #[test]
    fn test_inherited_properties_merge() {
        let repo = Arc::new(MemoryRepository::new());
        mount(&repo, "/site/news/", "/site/news/news.sitemap", &news_document());
        let tables = build(&repo);

        let a = find(&tables, "/site/news/a/");
        let expected: BTreeMap<String, String> = [("A", "1"), ("B", "2"), ("navPos", "0")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        assert_eq!(a.computed_properties(), &expected);

        let a2 = find(&tables, "/site/news/a/a2/");
        assert_eq!(a2.property("B"), Some("2"));
        assert_eq!(a2.property("navPos"), Some("1"));
        assert!(a2.own_properties().is_empty());

        let c = find(&tables, "/site/news/c/");
        assert_eq!(c.property("A"), Some("1"));
        assert_eq!(c.property("B"), None);
        assert_eq!(c.property("navPos"), Some("2"));
    }

    #[test]
    fn test_structure_id_falls_back_to_sitemap() {
        let repo = Arc::new(MemoryRepository::new());
        let mounted = mount(&repo, "/site/news/", "/site/news/news.sitemap", &news_document());
        let tables = build(&repo);

        let b = find(&tables, "/site/news/b/");
        assert_eq!(b.structure_id(), mounted.sitemap);
        assert_eq!(tables.entries_by_structure_id(mounted.sitemap, &en()).len(), 6);
        assert!(tables.is_entry_point(&RootPath::folder("/site/news")));
        assert!(tables.is_backing_sitemap(&RootPath::file("/site/news/news.sitemap"), None));
        assert!(tables.contains_id(mounted.sitemap.as_uuid()));
    }

    #[test]
    fn test_sub_sitemap_spliced() {
        let repo = Arc::new(MemoryRepository::new());
        let sub = SitemapDocument::new()
            .with_locale(
                "en",
                RawEntry::new("ignored")
                    .with_child(RawEntry::new("x"))
                    .with_child(RawEntry::new("y")),
            )
            .with_detail_page("article", "detail/");
        let sub_id = repo.add_sitemap("/site/shared/events.sitemap", &sub);

        let main = SitemapDocument::new().with_locale(
            "en",
            RawEntry::new("home")
                .with_property("A", PropertyValue::simple("1"))
                .with_child(
                    RawEntry::new("events")
                        .with_property("sitemap", PropertyValue::simple(sub_id.to_string()))
                        .with_child(RawEntry::new("shadowed")),
                ),
        );
        mount(&repo, "/site/news/", "/site/news/news.sitemap", &main);
        let tables = build(&repo);

        let events = find(&tables, "/site/news/events/");
        let names: Vec<_> = events.sub_entries().iter().map(|e| e.name()).collect();
        assert_eq!(names, ["x", "y"]);

        let y = find(&tables, "/site/news/events/y/");
        assert_eq!(y.original_uri(), "y/");
        assert_eq!(y.entry_point().as_str(), "/site/news/events/");
        assert_eq!(y.structure_id(), sub_id);
        assert_eq!(y.property("A"), Some("1"));
        assert_eq!(y.position(), 1);

        let active = tables.active_sitemaps();
        assert_eq!(
            active.get(&(en(), RootPath::folder("/site/news/events"))),
            Some(&RootPath::file("/site/shared/events.sitemap"))
        );
        assert!(tables.is_backing_sitemap(&RootPath::root(), Some(sub_id)));

        let info = tables.sitemap_info(y.sitemap_info().unwrap()).unwrap();
        assert_eq!(info.sitemap_id, sub_id);
        assert_eq!(info.parent, events.sitemap_info());
        assert_eq!(
            tables.detail_page_in_chain(y.sitemap_info().unwrap(), "article"),
            Some(&RootPath::file("/site/news/events/detail/"))
        );
    }

    #[test]
    fn test_cyclic_sub_sitemap_left_childless() {
        let repo = Arc::new(MemoryRepository::new());
        let id = StructureId::random();
        let document = SitemapDocument::new().with_locale(
            "en",
            RawEntry::new("home").with_child(
                RawEntry::new("loop").with_property("sitemap", PropertyValue::simple(id.to_string())),
            ),
        );
        repo.add_folder("/site/news/");
        repo.add_document("/site/news/news.sitemap", "sitemap", id, document.to_json());
        repo.set_property("/site/news/", "sitemap", "/site/news/news.sitemap")
            .unwrap();

        let tables = build(&repo);
        let looped = find(&tables, "/site/news/loop/");
        assert!(looped.sub_entries().is_empty());
        assert_eq!(tables.len(), 2);
    }

    #[test]
    fn test_missing_sub_sitemap_locale_left_childless() {
        let repo = Arc::new(MemoryRepository::new());
        let sub = SitemapDocument::new().with_locale("de", RawEntry::new("").with_child(RawEntry::new("x")));
        let sub_id = repo.add_sitemap("/site/shared/de.sitemap", &sub);
        let main = SitemapDocument::new().with_locale(
            "en",
            RawEntry::new("").with_child(
                RawEntry::new("events").with_property("sitemap", PropertyValue::simple(sub_id.to_string())),
            ),
        );
        mount(&repo, "/site/news/", "/site/news/news.sitemap", &main);

        let tables = build(&repo);
        assert!(find(&tables, "/site/news/events/").sub_entries().is_empty());
        assert!(!tables.contains_path(&RootPath::folder("/site/news/events/x")));
    }

    #[test]
    fn test_broken_entry_point_skipped() {
        let repo = Arc::new(MemoryRepository::new());
        mount(&repo, "/site/news/", "/site/news/news.sitemap", &news_document());
        repo.add_folder("/site/broken/");
        repo.set_property("/site/broken/", "sitemap", "/nowhere.sitemap")
            .unwrap();
        repo.add_folder("/site/garbage/");
        repo.add_document("/site/garbage/x.sitemap", "sitemap", StructureId::random(), "{".into());
        repo.set_property("/site/garbage/", "sitemap", "/site/garbage/x.sitemap")
            .unwrap();

        let tables = build(&repo);
        assert_eq!(tables.entry_points().len(), 1);
        assert!(tables.is_entry_point(&RootPath::folder("/site/news/")));
        assert!(!tables.contains_path(&RootPath::folder("/site/broken/")));
    }

    #[test]
    fn test_sitemap_reference_relative_to_site_root() {
        let repo = Arc::new(MemoryRepository::new());
        mount(&repo, "/site/news/", "/site/news/news.sitemap", &news_document());
        repo.set_property("/site/news/", "sitemap", "news/news.sitemap")
            .unwrap();

        let tables = build(&repo);
        assert_eq!(tables.len(), 6);
        assert_eq!(
            tables.active_sitemaps().get(&(en(), RootPath::folder("/site/news/"))),
            Some(&RootPath::file("/site/news/news.sitemap"))
        );
    }

    #[test]
    fn test_unnamed_children_skipped() {
        let repo = Arc::new(MemoryRepository::new());
        let document = SitemapDocument::new().with_locale(
            "en",
            RawEntry::new("home")
                .with_child(RawEntry::new("first"))
                .with_child(RawEntry::new(" / "))
                .with_child(RawEntry::new("second")),
        );
        mount(&repo, "/site/news/", "/site/news/news.sitemap", &document);

        let tables = build(&repo);
        assert_eq!(find(&tables, "/site/news/second/").position(), 1);
        assert_eq!(tables.len(), 3);
    }

    #[test]
    fn test_same_sitemap_mounted_twice_gets_distinct_ids() {
        let repo = Arc::new(MemoryRepository::new());
        mount(&repo, "/site/a/", "/site/shared.sitemap", &news_document());
        repo.add_folder("/site/b/");
        repo.set_property("/site/b/", "sitemap", "/site/shared.sitemap")
            .unwrap();

        let tables = build(&repo);
        assert_eq!(tables.roots().len(), 2);
        assert_eq!(tables.len(), 12);
        assert_ne!(tables.roots()[0].id(), tables.roots()[1].id());
    }

    #[test]
    fn test_ids_stable_across_builds() {
        let repo = Arc::new(MemoryRepository::new());
        let fixed = EntryId::new(uuid::Uuid::new_v4());
        let document = SitemapDocument::new().with_locale(
            "en",
            RawEntry::new("")
                .with_child(RawEntry::new("fixed").with_id(fixed.to_string()))
                .with_child(RawEntry::new("bad").with_id("not-a-uuid")),
        );
        mount(&repo, "/site/news/", "/site/news/news.sitemap", &document);

        let first = build(&repo);
        let second = build(&repo);
        assert_eq!(find(&first, "/site/news/fixed/").id(), fixed);
        assert_eq!(
            find(&first, "/site/news/bad/").id(),
            find(&second, "/site/news/bad/").id()
        );
    }

    #[test]
    fn test_export_name_and_site_root() {
        let repo = Arc::new(MemoryRepository::new());
        repo.add_folder("/site/");
        repo.set_property("/site/", "exportname", "main").unwrap();
        mount(&repo, "/site/news/", "/site/news/news.sitemap", &news_document());

        let tables = build(&repo);
        let site = RootPath::folder("/site/");
        assert_eq!(tables.export_name(&site), Some("main"));
        assert_eq!(tables.site_root_for_export_name("main"), Some(&site));
        assert!(tables.site_roots_with_sitemap().contains(&site));
        assert!(tables.root_info(&site, &en()).is_some());
        assert!(tables.default_properties(&RootPath::folder("/site/news/")).is_some());
    }

    #[test]
    fn test_locales_built_separately() {
        let repo = Arc::new(MemoryRepository::new());
        let document = news_document().with_locale("de", RawEntry::new("").with_child(RawEntry::new("nachrichten")));
        mount(&repo, "/site/news/", "/site/news/news.sitemap", &document);

        let tables = build(&repo);
        assert_eq!(tables.roots().len(), 2);
        let de = Locale::new("de");
        assert!(tables.entry_by_uri(&de, &RootPath::folder("/site/news/nachrichten/")).is_some());
        assert!(tables.entry_by_uri(&en(), &RootPath::folder("/site/news/nachrichten/")).is_none());
        assert_eq!(tables.entries_by_root_path(&RootPath::folder("/site/news/")).len(), 2);
    }

    #[test]
    fn test_error_chain() {
        let err = RepositoryError::Malformed {
            path: RootPath::file("/x.sitemap"),
            source: serde_json::from_str::<serde_json::Value>("{").unwrap_err(),
        };
        let chain = error_chain(&err);
        assert!(chain.starts_with(&err.to_string()));
        assert!(chain.matches(": ").count() >= 1);
    }
}
