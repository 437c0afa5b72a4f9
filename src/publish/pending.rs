//! The set of resources about to be published.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::core::{RootPath, StructureId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PendingState {
    New,
    Changed,
    Deleted,
}

/// One resource in the publish set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingResource {
    #[serde(rename = "id")]
    pub structure_id: StructureId,
    pub state: PendingState,
}

/// Resources to be published, by root path.
///
/// ```json
/// {
///   "/news/":   { "id": "…", "state": "deleted" },
///   "/events/": { "id": "…", "state": "new" }
/// }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(from = "BTreeMap<RootPath, PendingResource>")]
pub struct PendingPublish {
    by_path: BTreeMap<RootPath, PendingResource>,
    by_id: FxHashMap<StructureId, RootPath>,
}

impl From<BTreeMap<RootPath, PendingResource>> for PendingPublish {
    fn from(by_path: BTreeMap<RootPath, PendingResource>) -> Self {
        let by_id = by_path
            .iter()
            .map(|(path, resource)| (resource.structure_id, path.clone()))
            .collect();
        Self { by_path, by_id }
    }
}

impl FromIterator<(RootPath, PendingResource)> for PendingPublish {
    fn from_iter<I: IntoIterator<Item = (RootPath, PendingResource)>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<BTreeMap<_, _>>())
    }
}

impl PendingPublish {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: RootPath, structure_id: StructureId, state: PendingState) {
        if let Some(old) = self.by_path.insert(
            path.clone(),
            PendingResource {
                structure_id,
                state,
            },
        ) {
            self.by_id.remove(&old.structure_id);
        }
        self.by_id.insert(structure_id, path);
    }

    pub fn with(mut self, path: &str, structure_id: StructureId, state: PendingState) -> Self {
        self.insert(RootPath::file(path), structure_id, state);
        self
    }

    pub fn from_json(content: &str) -> serde_json::Result<Self> {
        serde_json::from_str(content)
    }

    /// Pending resource at `path`, in file or folder form.
    pub fn get(&self, path: &RootPath) -> Option<&PendingResource> {
        self.by_path.get(path).or_else(|| {
            if path.is_folder() {
                let file = path.as_str().trim_end_matches('/');
                (!file.is_empty())
                    .then(|| self.by_path.get(&RootPath::file(file)))
                    .flatten()
            } else {
                self.by_path.get(&path.to_folder())
            }
        })
    }

    pub fn get_by_id(&self, id: StructureId) -> Option<&PendingResource> {
        self.by_id.get(&id).and_then(|path| self.by_path.get(path))
    }

    pub fn contains_path(&self, path: &RootPath) -> bool {
        self.get(path).is_some()
    }

    pub fn contains_id(&self, id: StructureId) -> bool {
        self.by_id.contains_key(&id)
    }

    /// Pending deletion, looked up by id first and then by path.
    pub fn is_deleted(&self, id: StructureId, path: &RootPath) -> bool {
        self.get_by_id(id)
            .or_else(|| self.get(path))
            .is_some_and(|resource| resource.state == PendingState::Deleted)
    }

    pub fn len(&self) -> usize {
        self.by_path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_path.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json() {
        let id = StructureId::random();
        let json = format!(r#"{{ "/news/": {{ "id": "{id}", "state": "deleted" }} }}"#);
        let pending = PendingPublish::from_json(&json).unwrap();

        assert_eq!(pending.len(), 1);
        assert!(pending.contains_id(id));
        assert!(pending.contains_path(&RootPath::folder("/news")));
        assert!(pending.contains_path(&RootPath::file("/news")));
        assert!(pending.is_deleted(id, &RootPath::folder("/news")));
        assert!(!pending.contains_path(&RootPath::folder("/events")));
    }

    #[test]
    fn test_insert_replaces_by_path() {
        let (a, b) = (StructureId::random(), StructureId::random());
        let pending = PendingPublish::new()
            .with("/s/x.sitemap", a, PendingState::Changed)
            .with("/s/x.sitemap", b, PendingState::New);

        assert_eq!(pending.len(), 1);
        assert!(!pending.contains_id(a));
        assert_eq!(pending.get_by_id(b).map(|r| r.state), Some(PendingState::New));
        assert!(!pending.is_deleted(b, &RootPath::file("/s/x.sitemap")));
    }
}
