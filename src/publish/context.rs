//! Per-resource routing between offline and online for the publish simulation.

use std::sync::Arc;

use rustc_hash::FxHashSet;

use super::PendingPublish;
use crate::core::{RootPath, StructureId};
use crate::repository::{ContentRepository, RepoResult, Resource};
use crate::structure::ContextSelector;

/// Reads pending resources from offline and everything else from online,
/// which is what online will look like once the publish completes.
pub struct PublishContext {
    offline: Arc<dyn ContentRepository>,
    online: Arc<dyn ContentRepository>,
    pending: Arc<PendingPublish>,
}

impl PublishContext {
    pub fn new(
        offline: Arc<dyn ContentRepository>,
        online: Arc<dyn ContentRepository>,
        pending: Arc<PendingPublish>,
    ) -> Self {
        Self {
            offline,
            online,
            pending,
        }
    }
}

impl ContextSelector for PublishContext {
    fn label(&self) -> &str {
        "publish"
    }

    fn by_id(&self, id: StructureId) -> &dyn ContentRepository {
        if self.pending.contains_id(id) {
            self.offline.as_ref()
        } else {
            self.online.as_ref()
        }
    }

    fn by_path(&self, path: &RootPath) -> &dyn ContentRepository {
        if self.pending.contains_path(path) {
            self.offline.as_ref()
        } else {
            self.online.as_ref()
        }
    }

    /// Online entry points minus pending deletions, plus pending offline
    /// entry points not yet online.
    fn entry_points(&self, marker: &str) -> RepoResult<Vec<Resource>> {
        let mut entry_points: Vec<Resource> = self
            .online
            .resources_with_property(marker)?
            .into_iter()
            .filter(|r| !self.pending.is_deleted(r.structure_id, &r.root_path))
            .collect();

        let present: FxHashSet<RootPath> =
            entry_points.iter().map(|r| r.root_path.clone()).collect();
        let added = self
            .offline
            .resources_with_property(marker)?
            .into_iter()
            .filter(|r| {
                let pending = self.pending.contains_id(r.structure_id)
                    || self.pending.contains_path(&r.root_path);
                pending
                    && !self.pending.is_deleted(r.structure_id, &r.root_path)
                    && !present.contains(&r.root_path)
            });
        entry_points.extend(added);
        Ok(entry_points)
    }
}
