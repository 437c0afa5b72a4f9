//! Per-sitemap runtime information.
//!
//! Runtime infos live in an arena owned by the tables; an entry refers to the
//! info of its owning sitemap by [`SitemapInfoId`], and each info refers to
//! the info of the sitemap it is nested in the same way.

use serde::Serialize;

use crate::core::{Locale, RootPath, StructureId};
use crate::repository::DetailPageConfig;

/// Index of a [`SitemapRuntimeInfo`] in its tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct SitemapInfoId(pub(crate) usize);

impl SitemapInfoId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Detail page of one content type, resolved to an absolute path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailPageInfo {
    pub type_name: String,
    pub uri: RootPath,
}

/// Detail page configuration of one sitemap mounted at one entry point,
/// for one locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SitemapRuntimeInfo {
    pub sitemap: RootPath,
    pub sitemap_id: StructureId,
    pub entry_point: RootPath,
    pub locale: Locale,
    pub parent: Option<SitemapInfoId>,
    pub detail_pages: Vec<DetailPageInfo>,
}

impl SitemapRuntimeInfo {
    /// Relative detail page URIs are resolved against `entry_point`.
    pub fn new(
        sitemap: RootPath,
        sitemap_id: StructureId,
        entry_point: RootPath,
        locale: Locale,
        parent: Option<SitemapInfoId>,
        configs: &[DetailPageConfig],
    ) -> Self {
        let detail_pages = configs
            .iter()
            .map(|config| DetailPageInfo {
                type_name: config.type_name.clone(),
                uri: if config.uri.starts_with('/') {
                    RootPath::file(&config.uri)
                } else {
                    entry_point.join(&config.uri)
                },
            })
            .collect();
        Self {
            sitemap,
            sitemap_id,
            entry_point,
            locale,
            parent,
            detail_pages,
        }
    }

    /// First detail page configured for `type_name`.
    pub fn detail_page_for(&self, type_name: &str) -> Option<&RootPath> {
        self.detail_pages
            .iter()
            .find(|page| page.type_name == type_name)
            .map(|page| &page.uri)
    }
}
