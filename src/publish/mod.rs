//! Publish simulation: the online tree as it will look after a publish.
//!
//! Used to validate links before publishing. A link target is valid if its
//! id or path is present in the simulated tables.

mod context;
mod pending;

pub use context::PublishContext;
pub use pending::{PendingPublish, PendingResource, PendingState};

use std::sync::Arc;

use crate::config::SitemapConfig;
use crate::core::{RootPath, StructureId};
use crate::error::{CacheError, Result};
use crate::log;
use crate::repository::ContentRepository;
use crate::structure::{SitemapTables, StructureCache, error_chain};

/// Structure cache over a mix of offline and online data.
///
/// Built lazily on first use and kept for the lifetime of one publish.
pub struct PublishSimulationCache {
    pending: Arc<PendingPublish>,
    cache: StructureCache,
}

impl PublishSimulationCache {
    pub fn new(
        config: Arc<SitemapConfig>,
        offline: Arc<dyn ContentRepository>,
        online: Arc<dyn ContentRepository>,
        pending: PendingPublish,
    ) -> Self {
        let pending = Arc::new(pending);
        let context = PublishContext::new(offline, online, Arc::clone(&pending));
        Self {
            pending,
            cache: StructureCache::new(config, Box::new(context)),
        }
    }

    pub fn pending(&self) -> &PendingPublish {
        &self.pending
    }

    /// Simulated post-publish tables.
    pub fn tables(&self) -> Result<Arc<SitemapTables>> {
        self.cache.tables().map_err(CacheError::from)
    }

    /// Whether a link to `target_id` / `target_path` resolves after the publish.
    ///
    /// Fails closed: if the simulation cannot be built, the link is reported
    /// as broken.
    pub fn check_link(&self, target_id: Option<StructureId>, target_path: &str) -> bool {
        let tables = match self.cache.tables() {
            Ok(tables) => tables,
            Err(err) => {
                log!("warning"; "publish simulation unavailable, rejecting `{}`: {}", target_path, error_chain(&err));
                return false;
            }
        };
        if let Some(id) = target_id
            && tables.contains_id(id.as_uuid())
        {
            return true;
        }
        tables.contains_path(&RootPath::from_link(target_path))
    }
}
