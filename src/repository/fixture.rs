//! JSON repository fixtures.
//!
//! Describes both projects of a repository in one file:
//!
//! ```json
//! {
//!   "offline": {
//!     "resources": [
//!       { "path": "/news/", "properties": { "sitemap": "/s/news.sitemap" } },
//!       { "path": "/s/news.sitemap", "type": "sitemap", "document": { "locales": {} } }
//!     ]
//!   },
//!   "online": { "resources": [] }
//! }
//! ```
//!
//! Paths ending in `/` are folders unless `kind` says otherwise.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::{
    MemoryRepository, RepoResult, RepositoryError, Resource, ResourceKind, ResourceState,
};
use crate::core::{RootPath, StructureId};

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RepositoryFixture {
    pub offline: ProjectFixture,
    pub online: ProjectFixture,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectFixture {
    pub resources: Vec<ResourceFixture>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResourceFixture {
    pub path: String,
    #[serde(rename = "type")]
    pub type_name: Option<String>,
    pub id: Option<StructureId>,
    pub kind: Option<ResourceKind>,
    #[serde(default)]
    pub state: ResourceState,
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
    /// Sitemap document, stored as the resource's file content.
    pub document: Option<serde_json::Value>,
}

impl RepositoryFixture {
    pub fn from_json(content: &str) -> RepoResult<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn load(path: &Path) -> RepoResult<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| RepositoryError::Io(path.to_path_buf(), err))?;
        Self::from_json(&content)
    }

    /// Materialize both projects.
    pub fn into_repositories(self) -> RepoResult<(MemoryRepository, MemoryRepository)> {
        Ok((self.offline.into_repository()?, self.online.into_repository()?))
    }
}

impl ProjectFixture {
    pub fn into_repository(self) -> RepoResult<MemoryRepository> {
        let repo = MemoryRepository::new();
        for fixture in self.resources {
            fixture.insert_into(&repo)?;
        }
        Ok(repo)
    }
}

impl ResourceFixture {
    fn insert_into(self, repo: &MemoryRepository) -> RepoResult<()> {
        let kind = self.kind.unwrap_or(if self.path.ends_with('/') {
            ResourceKind::Folder
        } else {
            ResourceKind::StructuredContent
        });
        let root_path = match kind {
            ResourceKind::Folder => RootPath::folder(&self.path),
            _ => RootPath::file(&self.path),
        };
        let type_name = self.type_name.unwrap_or_else(|| match kind {
            ResourceKind::Folder => "folder".to_string(),
            _ => "file".to_string(),
        });
        let content = self.document.map(|doc| doc.to_string());

        let mut resource = Resource::new(
            self.id.unwrap_or_else(StructureId::random),
            root_path.clone(),
            type_name,
            kind,
        );
        resource.state = self.state;
        repo.insert(resource, content);

        for (name, value) in &self.properties {
            repo.set_property(root_path.as_str(), name, value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::ContentRepository;
    use std::io::Write;

    const FIXTURE: &str = r#"{
        "offline": {
            "resources": [
                { "path": "/news/", "id": "6f1c9a53-0d54-4b4e-9f0e-5d8f7c3f7a11",
                  "state": "changed", "properties": { "sitemap": "/s/news.sitemap" } },
                { "path": "/s/news.sitemap", "type": "sitemap",
                  "document": { "locales": { "en": { "name": "" } } } }
            ]
        },
        "online": {
            "resources": [ { "path": "/news/" } ]
        }
    }"#;

    #[test]
    fn test_fixture_materializes_both_projects() {
        let (offline, online) = RepositoryFixture::from_json(FIXTURE)
            .unwrap()
            .into_repositories()
            .unwrap();

        let news = offline.read_resource(&RootPath::folder("/news")).unwrap();
        assert!(news.is_folder());
        assert_eq!(news.state, ResourceState::Changed);
        assert_eq!(
            news.structure_id,
            StructureId::parse("6f1c9a53-0d54-4b4e-9f0e-5d8f7c3f7a11").unwrap()
        );
        assert_eq!(offline.resources_with_property("sitemap").unwrap().len(), 1);

        let file = offline.read_file(&RootPath::file("/s/news.sitemap")).unwrap();
        assert_eq!(file.resource.type_name, "sitemap");
        let doc = offline.parse_sitemap(&file).unwrap();
        assert_eq!(doc.locales.len(), 1);

        assert_eq!(online.len(), 1);
        assert!(online.resources_with_property("sitemap").unwrap().is_empty());
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        let err = RepositoryFixture::from_json(r#"{ "offline": { "resourcez": [] } }"#);
        assert!(matches!(err, Err(RepositoryError::Fixture(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(FIXTURE.as_bytes()).unwrap();
        let fixture = RepositoryFixture::load(file.path()).unwrap();
        assert_eq!(fixture.offline.resources.len(), 2);

        let missing = RepositoryFixture::load(Path::new("/definitely/not/here.json"));
        assert!(matches!(missing, Err(RepositoryError::Io(..))));
    }
}
