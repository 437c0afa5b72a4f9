//! Parsed sitemap documents, keyed by structure id.

use std::sync::Arc;

use dashmap::DashMap;

use crate::core::StructureId;
use crate::repository::{ContentRepository, RepoResult, SitemapDocument, SitemapFile};

/// Cache of parsed sitemap documents (thread-safe).
///
/// Survives table rebuilds; entries are dropped one by one when the backing
/// resource changes.
#[derive(Debug, Default)]
pub struct DocumentCache {
    documents: DashMap<StructureId, Arc<SitemapDocument>>,
}

impl DocumentCache {
    pub fn new() -> Self {
        Self {
            documents: DashMap::new(),
        }
    }

    pub fn get(&self, id: StructureId) -> Option<Arc<SitemapDocument>> {
        self.documents.get(&id).map(|r| Arc::clone(&r))
    }

    /// Return the cached document of `file`, parsing it on a miss.
    pub fn get_or_parse(
        &self,
        file: &SitemapFile,
        repository: &dyn ContentRepository,
    ) -> RepoResult<Arc<SitemapDocument>> {
        let id = file.resource.structure_id;
        if let Some(doc) = self.get(id) {
            return Ok(doc);
        }
        // Parse outside the shard lock; a concurrent parse of the same file
        // yields an equal document.
        let doc = Arc::new(repository.parse_sitemap(file)?);
        Ok(Arc::clone(self.documents.entry(id).or_insert(doc).value()))
    }

    pub fn invalidate(&self, id: StructureId) -> bool {
        self.documents.remove(&id).is_some()
    }

    pub fn clear(&self) {
        self.documents.clear();
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}
