//! Root path type for repository paths.
//!
//! - Internal representation: always decoded, always starts with `/`
//! - Folder paths (sitemap entries, entry points, site roots) end with `/`
//! - Link targets are decoded and stripped of query and fragment on input

use std::borrow::Borrow;
use std::fmt;
use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Absolute repository path
///
/// Invariants:
/// - Always decoded (no percent-encoding)
/// - Always starts with `/`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RootPath(Arc<str>);

impl RootPath {
    /// The repository root `/`.
    pub fn root() -> Self {
        Self(Arc::from("/"))
    }

    /// Create a folder path (with trailing slash). Normalizes leading/trailing slashes.
    pub fn folder(path: &str) -> Self {
        let trimmed = path.trim().trim_matches('/');
        if trimmed.is_empty() {
            return Self::root();
        }
        Self(Arc::from(format!("/{trimmed}/")))
    }

    /// Create a file path (no trailing slash normalization).
    pub fn file(path: &str) -> Self {
        let trimmed = path.trim();
        if trimmed.is_empty() {
            return Self::root();
        }
        if trimmed.starts_with('/') {
            Self(Arc::from(trimmed))
        } else {
            Self(Arc::from(format!("/{trimmed}")))
        }
    }

    /// Create from a link target (decode percent-encoding, strip query and fragment).
    ///
    /// The trailing slash is preserved as given.
    pub fn from_link(link: &str) -> Self {
        let path = strip_query_fragment(link.trim());
        Self::file(&path)
    }

    /// Get the decoded path as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check if this is a folder path (ends with `/`).
    #[inline]
    pub fn is_folder(&self) -> bool {
        self.0.ends_with('/')
    }

    /// Return the folder form of this path.
    pub fn to_folder(&self) -> Self {
        if self.is_folder() {
            self.clone()
        } else {
            Self::folder(&self.0)
        }
    }

    /// Check if path starts with the given prefix.
    #[inline]
    pub fn starts_with(&self, prefix: &str) -> bool {
        self.0.starts_with(prefix)
    }

    /// Check if this path lies inside (or is) the given folder.
    pub fn is_under(&self, folder: &RootPath) -> bool {
        let folder = folder.as_str();
        let folder = folder.trim_end_matches('/');
        self.0.starts_with(folder)
            && self.0[folder.len()..]
                .chars()
                .next()
                .is_none_or(|c| c == '/')
    }

    /// Append a relative path. `self` is treated as a folder.
    ///
    /// `/sites/default/` + `news/` -> `/sites/default/news/`
    pub fn join(&self, relative: &str) -> Self {
        let relative = relative.trim_start_matches('/');
        let base = self.0.trim_end_matches('/');
        Self(Arc::from(format!("{base}/{relative}")))
    }

    /// Get parent folder path.
    ///
    /// `/news/a/` -> `/news/`, `/news/` -> `/`, `/` -> `None`
    pub fn parent(&self) -> Option<Self> {
        let trimmed = self.0.trim_end_matches('/');
        if trimmed.is_empty() {
            return None;
        }
        match trimmed.rfind('/') {
            Some(0) | None => Some(Self::root()),
            Some(pos) => Some(Self::folder(&trimmed[..pos])),
        }
    }

    /// Get the last path segment.
    ///
    /// `/news/a/` -> `a`, `/file.xml` -> `file.xml`, `/` -> `None`
    pub fn last_segment(&self) -> Option<&str> {
        self.0.split('/').rev().find(|s| !s.is_empty())
    }

    /// Iterate over non-empty path components.
    pub fn components(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|s| !s.is_empty())
    }
}

/// Strip query string and fragment from a path using url crate.
fn strip_query_fragment(path: &str) -> String {
    use percent_encoding::percent_decode_str;

    // Use a dummy base URL to parse the path
    static BASE: OnceLock<Option<url::Url>> = OnceLock::new();
    let base = BASE.get_or_init(|| url::Url::parse("http://x").ok());

    match base.as_ref().map(|base| base.join(path)) {
        Some(Ok(parsed)) => percent_decode_str(parsed.path())
            .decode_utf8()
            .map(|s| s.into_owned())
            .unwrap_or_else(|_| parsed.path().to_string()),
        // Fallback to simple split if url parsing fails
        _ => path.split(['?', '#']).next().unwrap_or(path).to_string(),
    }
}

impl fmt::Display for RootPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RootPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for RootPath {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RootPath {
    fn from(s: &str) -> Self {
        Self::file(s)
    }
}

impl Serialize for RootPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for RootPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::file(&s))
    }
}
