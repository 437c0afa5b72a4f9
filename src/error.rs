//! Cache error types.

use thiserror::Error;

use crate::repository::RepositoryError;

pub type Result<T, E = CacheError> = std::result::Result<T, E>;

/// Errors surfaced by cache lookups.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("repository error")]
    Repository(#[from] RepositoryError),

    #[error("sitemap cache has been shut down")]
    ShutDown,
}

impl CacheError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Repository(err) if err.is_not_found())
    }
}
