//! One project's lazily rebuilt table snapshot.
//!
//! Uses `arc-swap` for lock-free reads and atomic snapshot replacement.
//! A rebuild runs under a mutex so concurrent readers of an empty cache
//! trigger exactly one build and then share its result.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use arc_swap::ArcSwapOption;
use parking_lot::Mutex;

use super::{ContextSelector, DocumentCache, SitemapTables, SitemapTreeBuilder, error_chain};
use crate::cache::CacheReporter;
use crate::config::SitemapConfig;
use crate::core::StructureId;
use crate::repository::RepoResult;
use crate::{debug, log};

pub struct StructureCache {
    config: Arc<SitemapConfig>,
    context: Box<dyn ContextSelector>,
    documents: Option<DocumentCache>,
    tables: ArcSwapOption<SitemapTables>,
    rebuild_lock: Mutex<()>,
    /// Bumped by every invalidation; snapshots of older generations are stale.
    generation: AtomicU64,
    reporter: Option<Arc<dyn CacheReporter>>,
}

impl StructureCache {
    pub fn new(config: Arc<SitemapConfig>, context: Box<dyn ContextSelector>) -> Self {
        Self {
            config,
            context,
            documents: None,
            tables: ArcSwapOption::empty(),
            rebuild_lock: Mutex::new(()),
            generation: AtomicU64::new(0),
            reporter: None,
        }
    }

    /// Keep parsed sitemap documents between rebuilds.
    pub fn with_document_cache(mut self) -> Self {
        self.documents = Some(DocumentCache::new());
        self
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn CacheReporter>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    pub fn label(&self) -> &str {
        self.context.label()
    }

    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Current snapshot, if one is installed and still valid.
    pub fn cached(&self) -> Option<Arc<SitemapTables>> {
        self.tables
            .load_full()
            .filter(|tables| tables.generation() == self.generation())
    }

    /// Current snapshot, rebuilding it first if necessary.
    ///
    /// A snapshot built while an invalidation arrives is returned to the
    /// caller but not installed.
    pub fn tables(&self) -> RepoResult<Arc<SitemapTables>> {
        if let Some(tables) = self.cached() {
            return Ok(tables);
        }

        let _guard = self.rebuild_lock.lock();
        if let Some(tables) = self.cached() {
            return Ok(tables);
        }

        let generation = self.generation();
        let started = Instant::now();
        let mut builder =
            SitemapTreeBuilder::new(&self.config, self.context.as_ref()).with_generation(generation);
        if let Some(documents) = &self.documents {
            builder = builder.with_documents(documents);
        }
        let tables = match builder.build() {
            Ok(tables) => Arc::new(tables),
            Err(err) => {
                log!("error"; "{}: rebuild failed: {}", self.label(), error_chain(&err));
                return Err(err);
            }
        };
        let elapsed = started.elapsed();

        if self.generation() == generation {
            self.tables.store(Some(Arc::clone(&tables)));
        } else {
            debug!("cache"; "{}: invalidated during rebuild, not installing", self.label());
            // Documents parsed by this build may predate the invalidation
            if let Some(documents) = &self.documents {
                documents.clear();
            }
        }

        debug!(
            "cache";
            "{}: rebuilt {} entries in {:?}",
            self.label(),
            tables.len(),
            elapsed
        );
        if let Some(reporter) = &self.reporter {
            reporter.on_rebuild(self.label(), &tables.stats(), elapsed);
        }
        Ok(tables)
    }

    /// Drop the snapshot; the next read rebuilds.
    pub fn invalidate(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
        self.tables.store(None);
        debug!("cache"; "{}: tables dropped", self.label());
    }

    /// Forget one parsed document. Returns whether it was cached.
    pub fn invalidate_document(&self, id: StructureId) -> bool {
        self.documents
            .as_ref()
            .is_some_and(|documents| documents.invalidate(id))
    }

    /// Drop the snapshot and all parsed documents.
    pub fn clear(&self) {
        self.invalidate();
        if let Some(documents) = &self.documents {
            documents.clear();
        }
    }

    pub fn config(&self) -> &Arc<SitemapConfig> {
        &self.config
    }
}
