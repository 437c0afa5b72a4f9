//! Repository error types.

use std::path::PathBuf;

use thiserror::Error;

use crate::core::{RootPath, StructureId};

pub type RepoResult<T> = Result<T, RepositoryError>;

/// Errors raised by a [`ContentRepository`](super::ContentRepository).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("resource `{0}` not found")]
    NotFound(RootPath),

    #[error("resource with structure id {0} not found")]
    IdNotFound(StructureId),

    #[error("resource `{0}` has no content")]
    NoContent(RootPath),

    #[error("property `{name}` missing on `{path}`")]
    MissingProperty { path: RootPath, name: String },

    #[error("malformed sitemap document `{path}`")]
    Malformed {
        path: RootPath,
        #[source]
        source: serde_json::Error,
    },

    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("repository fixture parsing error")]
    Fixture(#[from] serde_json::Error),

    #[error("repository backend error: {0}")]
    Backend(String),
}

impl RepositoryError {
    /// Whether the error means the resource does not exist (as opposed to being unreadable).
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::IdNotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_classification() {
        assert!(RepositoryError::NotFound(RootPath::file("/a")).is_not_found());
        assert!(RepositoryError::IdNotFound(StructureId::random()).is_not_found());
        assert!(!RepositoryError::NoContent(RootPath::file("/a")).is_not_found());
        assert!(!RepositoryError::Backend("down".into()).is_not_found());
    }

    #[test]
    fn test_display() {
        let err = RepositoryError::MissingProperty {
            path: RootPath::folder("/news/"),
            name: "sitemap".into(),
        };
        let display = err.to_string();
        assert!(display.contains("sitemap"));
        assert!(display.contains("/news/"));
    }
}
