//! `[sites]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [sites]
//! roots = ["/sites/default/", "/sites/shop/"]
//! ```

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::core::RootPath;
use crate::utils::ClosestPathMatcher;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SitesConfig {
    /// Site root folders.
    pub roots: Vec<String>,

    #[serde(skip)]
    matcher: OnceLock<ClosestPathMatcher>,
}

impl PartialEq for SitesConfig {
    fn eq(&self, other: &Self) -> bool {
        self.roots == other.roots
    }
}

impl SitesConfig {
    pub const ROOTS: FieldPath = FieldPath::new("sites.roots");

    pub fn new<I, S>(roots: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            roots: roots.into_iter().map(|r| r.as_ref().to_string()).collect(),
            matcher: OnceLock::new(),
        }
    }

    /// Normalized site roots.
    pub fn root_paths(&self) -> impl Iterator<Item = RootPath> + '_ {
        self.roots.iter().map(|r| RootPath::folder(r))
    }

    /// The site root containing `path`, if any.
    ///
    /// The longest configured root that is a component prefix of `path` wins.
    pub fn site_root_of(&self, path: &RootPath) -> Option<RootPath> {
        let matcher = self.matcher.get_or_init(|| {
            let mut matcher = ClosestPathMatcher::new();
            for root in self.root_paths() {
                matcher.add_path(root.as_str());
            }
            matcher
        });
        matcher.closest_prefix(path.as_str()).map(RootPath::folder)
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        for root in &self.roots {
            if !root.starts_with('/') {
                diag.error_with_hint(
                    Self::ROOTS,
                    format!("site root `{root}` is not absolute"),
                    format!("write it as `/{}/`", root.trim_matches('/')),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_site_root_of() {
        let sites = SitesConfig::new(["/sites/default", "/sites/shop/"]);

        let root = sites.site_root_of(&RootPath::folder("/sites/shop/news/"));
        assert_eq!(root.as_ref().map(RootPath::as_str), Some("/sites/shop/"));

        let root = sites.site_root_of(&RootPath::file("/sites/default/a.xml"));
        assert_eq!(root.as_ref().map(RootPath::as_str), Some("/sites/default/"));

        // Shares `/sites/` with both roots, but neither is a prefix
        assert_eq!(sites.site_root_of(&RootPath::folder("/sites/other/")), None);
        assert_eq!(sites.site_root_of(&RootPath::folder("/shared/")), None);

        // Nested roots: the shorter root still owns paths outside the longer one
        let sites = SitesConfig::new(["/sites/default/shop/", "/sites/default/"]);
        let root = sites.site_root_of(&RootPath::file("/sites/default/news/a.xml"));
        assert_eq!(root.as_ref().map(RootPath::as_str), Some("/sites/default/"));
        let root = sites.site_root_of(&RootPath::file("/sites/default/shop/a.xml"));
        assert_eq!(
            root.as_ref().map(RootPath::as_str),
            Some("/sites/default/shop/")
        );
    }

    #[test]
    fn test_no_roots() {
        let sites = SitesConfig::default();
        assert_eq!(sites.site_root_of(&RootPath::folder("/news/")), None);
    }

    #[test]
    fn test_sites_validate() {
        let config = test_parse_config("[sites]\nroots = [\"/ok/\", \"bad\"]");
        let mut diag = ConfigDiagnostics::new();
        config.sites.validate(&mut diag);
        assert_eq!(diag.len(), 1);
        assert!(diag.errors()[0].message.contains("bad"));
    }
}
