//! In-memory repository backend.

use std::collections::BTreeMap;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use super::{
    ContentRepository, RepoResult, RepositoryError, Resource, ResourceKind, ResourceState,
    SitemapDocument, SitemapFile,
};
use crate::core::{RootPath, StructureId};

#[derive(Debug, Clone)]
struct Stored {
    resource: Resource,
    properties: BTreeMap<String, String>,
    content: Option<String>,
}

#[derive(Debug, Default)]
struct State {
    by_path: BTreeMap<RootPath, Stored>,
    by_id: FxHashMap<StructureId, RootPath>,
}

/// A mutable in-memory repository for one project.
///
/// Folder paths are stored in folder form (`/news/`), files as given.
/// Lookups by path accept either form for folders.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    state: RwLock<State>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a resource.
    pub fn insert(&self, resource: Resource, content: Option<String>) -> StructureId {
        let id = resource.structure_id;
        let mut state = self.state.write();
        if let Some(old) = state.by_path.remove(&resource.root_path) {
            state.by_id.remove(&old.resource.structure_id);
        }
        state.by_id.insert(id, resource.root_path.clone());
        state.by_path.insert(
            resource.root_path.clone(),
            Stored {
                resource,
                properties: BTreeMap::new(),
                content,
            },
        );
        id
    }

    pub fn add_folder(&self, path: &str) -> StructureId {
        self.add_folder_with_id(path, StructureId::random())
    }

    pub fn add_folder_with_id(&self, path: &str, id: StructureId) -> StructureId {
        let resource = Resource::new(id, RootPath::folder(path), "folder", ResourceKind::Folder);
        self.insert(resource, None)
    }

    /// Store a sitemap document under the sitemap type name.
    pub fn add_sitemap(&self, path: &str, document: &SitemapDocument) -> StructureId {
        self.add_document(path, "sitemap", StructureId::random(), document.to_json())
    }

    /// Store an arbitrary document with explicit type and id.
    pub fn add_document(
        &self,
        path: &str,
        type_name: &str,
        id: StructureId,
        content: String,
    ) -> StructureId {
        let resource = Resource::new(
            id,
            RootPath::file(path),
            type_name,
            ResourceKind::StructuredContent,
        );
        self.insert(resource, Some(content))
    }

    /// Store a structured content item (no content needed).
    pub fn add_content(&self, path: &str, type_name: &str) -> StructureId {
        let resource = Resource::new(
            StructureId::random(),
            RootPath::file(path),
            type_name,
            ResourceKind::StructuredContent,
        );
        self.insert(resource, None)
    }

    /// Replace the content of an existing file.
    pub fn replace_content(&self, path: &str, content: String) -> RepoResult<()> {
        let mut state = self.state.write();
        let stored = lookup_mut(&mut state, path)?;
        stored.content = Some(content);
        Ok(())
    }

    pub fn set_property(&self, path: &str, name: &str, value: &str) -> RepoResult<()> {
        let mut state = self.state.write();
        let stored = lookup_mut(&mut state, path)?;
        stored.properties.insert(name.to_string(), value.to_string());
        Ok(())
    }

    pub fn remove_property(&self, path: &str, name: &str) -> RepoResult<()> {
        let mut state = self.state.write();
        let stored = lookup_mut(&mut state, path)?;
        stored.properties.remove(name);
        Ok(())
    }

    pub fn set_state(&self, path: &str, resource_state: ResourceState) -> RepoResult<()> {
        let mut state = self.state.write();
        let stored = lookup_mut(&mut state, path)?;
        stored.resource.state = resource_state;
        Ok(())
    }

    /// Remove a resource entirely (not just mark it deleted).
    pub fn remove(&self, path: &str) -> Option<Resource> {
        let mut state = self.state.write();
        let key = resolve_key(&state, path)?;
        let stored = state.by_path.remove(&key)?;
        state.by_id.remove(&stored.resource.structure_id);
        Some(stored.resource)
    }

    pub fn len(&self) -> usize {
        self.state.read().by_path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().by_path.is_empty()
    }
}

/// Find the stored key for a path, trying the folder form as well.
fn resolve_key(state: &State, path: &str) -> Option<RootPath> {
    let file = RootPath::file(path);
    if state.by_path.contains_key(&file) {
        return Some(file);
    }
    let folder = RootPath::folder(path);
    state.by_path.contains_key(&folder).then_some(folder)
}

fn lookup<'a>(state: &'a State, path: &RootPath) -> Option<&'a Stored> {
    resolve_key(state, path.as_str()).and_then(|key| state.by_path.get(&key))
}

fn lookup_mut<'a>(state: &'a mut State, path: &str) -> RepoResult<&'a mut Stored> {
    let key = resolve_key(state, path).ok_or_else(|| RepositoryError::NotFound(RootPath::file(path)))?;
    state
        .by_path
        .get_mut(&key)
        .ok_or(RepositoryError::NotFound(key))
}

impl ContentRepository for MemoryRepository {
    fn read_resource(&self, path: &RootPath) -> RepoResult<Resource> {
        let state = self.state.read();
        lookup(&state, path)
            .map(|s| s.resource.clone())
            .ok_or_else(|| RepositoryError::NotFound(path.clone()))
    }

    fn read_resource_by_id(&self, id: StructureId) -> RepoResult<Resource> {
        let state = self.state.read();
        state
            .by_id
            .get(&id)
            .and_then(|path| state.by_path.get(path))
            .map(|s| s.resource.clone())
            .ok_or(RepositoryError::IdNotFound(id))
    }

    fn read_file(&self, path: &RootPath) -> RepoResult<SitemapFile> {
        let state = self.state.read();
        let stored = lookup(&state, path)
            .filter(|s| !s.resource.state.is_deleted())
            .ok_or_else(|| RepositoryError::NotFound(path.clone()))?;
        let content = stored
            .content
            .clone()
            .ok_or_else(|| RepositoryError::NoContent(path.clone()))?;
        Ok(SitemapFile {
            resource: stored.resource.clone(),
            content,
        })
    }

    fn read_property(
        &self,
        resource: &Resource,
        name: &str,
        search: bool,
    ) -> RepoResult<Option<String>> {
        let state = self.state.read();
        let stored = lookup(&state, &resource.root_path)
            .ok_or_else(|| RepositoryError::NotFound(resource.root_path.clone()))?;
        if let Some(value) = stored.properties.get(name) {
            return Ok(Some(value.clone()));
        }
        if !search {
            return Ok(None);
        }

        let mut current = resource.root_path.parent();
        while let Some(folder) = current {
            if let Some(value) = state.by_path.get(&folder).and_then(|s| s.properties.get(name)) {
                return Ok(Some(value.clone()));
            }
            current = folder.parent();
        }
        Ok(None)
    }

    fn resources_with_property(&self, name: &str) -> RepoResult<Vec<Resource>> {
        let state = self.state.read();
        Ok(state
            .by_path
            .values()
            .filter(|s| !s.resource.state.is_deleted() && s.properties.contains_key(name))
            .map(|s| s.resource.clone())
            .collect())
    }
}
