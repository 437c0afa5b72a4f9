//! Decoded sitemap documents.
//!
//! A sitemap document carries, per locale, one raw entry tree plus the
//! property definitions and detail-page configuration shared by all locales.
//!
//! ```json
//! {
//!   "properties": { "template": { "default": "/t/page" } },
//!   "detailPages": [ { "type": "article", "uri": "article-detail/" } ],
//!   "locales": {
//!     "en": { "id": "…", "name": "", "children": [ { "name": "news" } ] }
//!   }
//! }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{RepoResult, RepositoryError};
use crate::core::{Locale, RootPath};
use crate::property::{PropertyDefinitions, PropertyMap, PropertyValue};

/// Detail page declared by a sitemap for one content type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailPageConfig {
    #[serde(rename = "type")]
    pub type_name: String,
    /// Absolute, or relative to the sitemap's entry point.
    pub uri: String,
}

impl DetailPageConfig {
    pub fn new(type_name: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            uri: uri.into(),
        }
    }
}

/// Raw entry as stored in the document.
///
/// Ids are strings here; malformed ones are only detected while building.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Structure id of the resource this entry stands for.
    #[serde(rename = "resource", skip_serializing_if = "Option::is_none")]
    pub structure_id: Option<String>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: PropertyMap,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RawEntry>,
}

impl RawEntry {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_structure_id(mut self, id: impl Into<String>) -> Self {
        self.structure_id = Some(id.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_property(mut self, name: impl Into<String>, value: PropertyValue) -> Self {
        self.properties.insert(name.into(), value);
        self
    }

    pub fn with_child(mut self, child: RawEntry) -> Self {
        self.children.push(child);
        self
    }
}

/// A parsed sitemap document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SitemapDocument {
    pub properties: PropertyDefinitions,
    pub detail_pages: Vec<DetailPageConfig>,
    pub locales: BTreeMap<Locale, RawEntry>,
}

impl SitemapDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a document from its JSON text.
    pub fn from_json(path: &RootPath, content: &str) -> RepoResult<Self> {
        serde_json::from_str(content).map_err(|source| RepositoryError::Malformed {
            path: path.clone(),
            source,
        })
    }

    pub fn to_json(&self) -> String {
        // Maps with string keys only; serialization cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn with_locale(mut self, locale: &str, root: RawEntry) -> Self {
        self.locales.insert(Locale::new(locale), root);
        self
    }

    pub fn with_detail_page(mut self, type_name: &str, uri: &str) -> Self {
        self.detail_pages.push(DetailPageConfig::new(type_name, uri));
        self
    }

    pub fn with_definitions(mut self, properties: PropertyDefinitions) -> Self {
        self.properties = properties;
        self
    }

    /// Root entry of the given locale.
    pub fn root(&self, locale: &Locale) -> Option<&RawEntry> {
        self.locales.get(locale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_document() {
        let json = r#"{
            "properties": { "template": { "default": "/t/page" } },
            "detailPages": [ { "type": "article", "uri": "detail/" } ],
            "locales": {
                "en": {
                    "id": "not-a-uuid",
                    "name": "home",
                    "properties": { "A": "1", "B": { "value": "x", "inherit": "y" } },
                    "children": [ { "name": "news", "title": "News" } ]
                }
            }
        }"#;
        let doc = SitemapDocument::from_json(&RootPath::file("/s.json"), json).unwrap();

        assert_eq!(doc.properties.default_value("template"), Some("/t/page"));
        assert_eq!(doc.detail_pages, vec![DetailPageConfig::new("article", "detail/")]);

        let root = doc.root(&Locale::new("en")).unwrap();
        assert_eq!(root.name, "home");
        assert_eq!(root.id.as_deref(), Some("not-a-uuid"));
        assert_eq!(root.properties["A"], PropertyValue::simple("1"));
        assert_eq!(root.properties["B"].effective(), Some("x"));
        assert_eq!(root.properties["B"].for_descendants(), Some("y"));
        assert_eq!(root.children[0].title.as_deref(), Some("News"));
        assert!(doc.root(&Locale::new("de")).is_none());
    }

    #[test]
    fn test_malformed_document() {
        let err = SitemapDocument::from_json(&RootPath::file("/s.json"), "{ nope").unwrap_err();
        assert!(matches!(err, RepositoryError::Malformed { .. }));
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_json_roundtrip_of_builder() {
        let doc = SitemapDocument::new()
            .with_detail_page("article", "/detail/")
            .with_locale(
                "en",
                RawEntry::new("")
                    .with_child(RawEntry::new("a").with_property("A", PropertyValue::simple("1"))),
            );
        let parsed = SitemapDocument::from_json(&RootPath::file("/s"), &doc.to_json()).unwrap();
        assert_eq!(parsed, doc);
    }
}
