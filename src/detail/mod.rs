//! Detail page resolution: which page renders a content item.
//!
//! Lookup order:
//!
//! 1. the sitemap of the linking page (`link_source_uri`) and its parents
//! 2. the root-level sitemap of the item's own site
//! 3. the item's (inherited) detail-view property
//!
//! The first hit wins.

use crate::cache::DualProjectCache;
use crate::core::{Locale, Project, RootPath};
use crate::debug;
use crate::error::Result;
use crate::repository::Resource;

pub struct DetailPageResolver<'a> {
    cache: &'a DualProjectCache,
}

impl<'a> DetailPageResolver<'a> {
    pub fn new(cache: &'a DualProjectCache) -> Self {
        Self { cache }
    }

    /// Detail page of `resource`, seen from the page at `link_source_uri`.
    pub fn detail_page(
        &self,
        project: Project,
        locale: &Locale,
        resource: &Resource,
        link_source_uri: Option<&str>,
    ) -> Result<Option<RootPath>> {
        let config = self.cache.config();
        if !resource.is_structured_content() || !config.types.has_detail_pages(&resource.type_name) {
            return Ok(None);
        }

        let tables = self.cache.tables(project)?;
        let type_name = resource.type_name.as_str();

        if let Some(source) = link_source_uri
            && let Some(entry) = tables.entry_by_uri(locale, &RootPath::from_link(source))
            && let Some(info) = entry.sitemap_info()
            && let Some(page) = tables.detail_page_in_chain(info, type_name)
        {
            debug!("detail"; "`{}` via sitemap of `{}`", resource.root_path, source);
            return Ok(Some(page.clone()));
        }

        let site_root = config.sites.site_root_of(&resource.root_path);
        if let Some(root) = &site_root
            && let Some(info) = tables.root_info(root, locale)
            && let Some(page) = tables
                .sitemap_info(info)
                .and_then(|info| info.detail_page_for(type_name))
        {
            debug!("detail"; "`{}` via root sitemap of `{}`", resource.root_path, root);
            return Ok(Some(page.clone()));
        }

        let property = &config.properties.detail_view;
        let value = self
            .cache
            .repository(project)
            .read_property(resource, property, true)?;
        let Some(value) = value.filter(|v| !v.trim().is_empty()) else {
            return Ok(None);
        };
        Ok(Some(absolutize(value.trim(), site_root.as_ref())))
    }
}

/// Resolve a detail-view property value against the item's site root.
///
/// Values already under the site root are kept; everything else is
/// prefixed with it. Without a site root the value is taken as absolute.
fn absolutize(value: &str, site_root: Option<&RootPath>) -> RootPath {
    let path = RootPath::file(value);
    match site_root {
        Some(root) if !path.is_under(root) => root.join(value),
        _ => path,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::property::PropertyValue;
    use crate::repository::{ContentRepository, MemoryRepository, RawEntry, SitemapDocument};
    use crate::testing::{self, dual, mount};

    fn en() -> Locale {
        Locale::new("en")
    }

    fn item(repo: &MemoryRepository, path: &str, type_name: &str) -> Resource {
        repo.add_content(path, type_name);
        repo.read_resource(&RootPath::file(path)).unwrap()
    }

    /// Root sitemap at `/site/news/` with an `article` detail page, and an
    /// `events` node backed by a sub-sitemap with its own.
    fn nested(repo: &MemoryRepository) {
        let sub = SitemapDocument::new()
            .with_locale("en", RawEntry::new("").with_child(RawEntry::new("x")))
            .with_detail_page("article", "detail/");
        let sub_id = repo.add_sitemap("/site/shared/events.sitemap", &sub);
        let main = SitemapDocument::new()
            .with_locale(
                "en",
                RawEntry::new("")
                    .with_child(RawEntry::new("a"))
                    .with_child(
                        RawEntry::new("events")
                            .with_property("sitemap", PropertyValue::simple(sub_id.to_string())),
                    ),
            )
            .with_detail_page("article", "/site/article-detail");
        mount(repo, "/site/news/", "/site/news/news.sitemap", &main);
    }

    #[test]
    fn test_property_fallback_outside_site() {
        let offline = Arc::new(MemoryRepository::new());
        let online = Arc::new(MemoryRepository::new());
        let article = item(&online, "/content/article.xml", "article");
        online
            .set_property("/content/article.xml", "detailview", "/pages/article-detail")
            .unwrap();

        let cache = dual(&offline, &online);
        let page = cache
            .detail_pages()
            .detail_page(Project::Online, &en(), &article, None)
            .unwrap();
        assert_eq!(page, Some(RootPath::file("/pages/article-detail")));
    }

    #[test]
    fn test_property_inherited_from_folder() {
        let offline = Arc::new(MemoryRepository::new());
        let online = Arc::new(MemoryRepository::new());
        online.add_folder("/site/content/");
        online
            .set_property("/site/content/", "detailview", "/pages/detail")
            .unwrap();
        let article = item(&online, "/site/content/article.xml", "article");

        let cache = dual(&offline, &online);
        let page = cache
            .detail_pages()
            .detail_page(Project::Online, &en(), &article, None)
            .unwrap();
        assert_eq!(page, Some(RootPath::file("/site/pages/detail")));
    }

    #[test]
    fn test_root_sitemap_of_site() {
        let offline = Arc::new(MemoryRepository::new());
        let online = Arc::new(MemoryRepository::new());
        nested(&online);
        let article = item(&online, "/site/content/article.xml", "article");

        let cache = dual(&offline, &online);
        let resolver = cache.detail_pages();
        let page = resolver
            .detail_page(Project::Online, &en(), &article, None)
            .unwrap();
        assert_eq!(page, Some(RootPath::file("/site/article-detail")));

        let page = resolver
            .detail_page(Project::Online, &en(), &article, Some("/site/news/a/"))
            .unwrap();
        assert_eq!(page, Some(RootPath::file("/site/article-detail")));
    }

    #[test]
    fn test_linking_sitemap_first() {
        let offline = Arc::new(MemoryRepository::new());
        let online = Arc::new(MemoryRepository::new());
        nested(&online);
        let article = item(&online, "/site/content/article.xml", "article");

        let cache = dual(&offline, &online);
        let page = cache
            .detail_pages()
            .detail_page(Project::Online, &en(), &article, Some("/site/news/events/x/"))
            .unwrap();
        assert_eq!(page, Some(RootPath::file("/site/news/events/detail/")));
    }

    #[test]
    fn test_ineligible_resources() {
        let offline = Arc::new(MemoryRepository::new());
        let online = Arc::new(MemoryRepository::new());
        nested(&online);
        let folder_id = online.add_folder("/site/content/");
        let folder = online.read_resource_by_id(folder_id).unwrap();
        let event = item(&online, "/site/content/event.xml", "event");
        let article = item(&online, "/site/content/article.xml", "article");
        let orphan = item(&online, "/content/orphan.xml", "article");

        let mut config = testing::config();
        config.types.structured_content = vec!["article".into()];
        let offline: Arc<dyn ContentRepository> = offline;
        let online: Arc<dyn ContentRepository> = online;
        let cache = DualProjectCache::new(config, offline, online);
        let resolver = cache.detail_pages();

        let resolve = |resource: &Resource| {
            resolver
                .detail_page(Project::Online, &en(), resource, None)
                .unwrap()
        };
        assert_eq!(resolve(&folder), None);
        assert_eq!(resolve(&event), None);
        assert_eq!(resolve(&orphan), None);
        assert_eq!(resolve(&article), Some(RootPath::file("/site/article-detail")));
    }

    #[test]
    fn test_absolutize() {
        let root = RootPath::folder("/sites/default");
        assert_eq!(
            absolutize("/sites/default/detail", Some(&root)).as_str(),
            "/sites/default/detail"
        );
        assert_eq!(absolutize("/detail", Some(&root)).as_str(), "/sites/default/detail");
        assert_eq!(absolutize("detail/", Some(&root)).as_str(), "/sites/default/detail/");
        assert_eq!(absolutize("/pages/article-detail", None).as_str(), "/pages/article-detail");
        assert_eq!(absolutize("pages/x", None).as_str(), "/pages/x");
    }
}
