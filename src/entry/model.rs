//! Immutable sitemap entries.

use std::sync::Arc;

use serde::Serialize;

use crate::core::{EntryId, Locale, RootPath, StructureId};
use crate::property::{ComputedProperties, PropertyMap};
use crate::structure::SitemapInfoId;

/// One node of a built sitemap tree.
///
/// Entries are created by a rebuild and never change afterwards. They belong
/// to the snapshot that produced them; look them up again after an
/// invalidation instead of holding on to them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SitemapEntry {
    pub(crate) id: EntryId,
    pub(crate) structure_id: StructureId,
    pub(crate) locale: Locale,
    pub(crate) name: String,
    pub(crate) title: Option<String>,
    pub(crate) original_uri: String,
    pub(crate) root_path: RootPath,
    pub(crate) entry_point: RootPath,
    pub(crate) position: usize,
    pub(crate) is_root_entry: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) content_id: Option<StructureId>,
    pub(crate) own_properties: PropertyMap,
    pub(crate) computed_properties: ComputedProperties,
    #[serde(skip)]
    pub(crate) sitemap_info: Option<SitemapInfoId>,
    pub(crate) sub_entries: Vec<Arc<SitemapEntry>>,
}

impl SitemapEntry {
    #[inline]
    pub fn id(&self) -> EntryId {
        self.id
    }

    /// Structure id of the backing resource. Entries that don't declare one
    /// are backed by their sitemap document.
    #[inline]
    pub fn structure_id(&self) -> StructureId {
        self.structure_id
    }

    #[inline]
    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    /// URL path segment; empty for the root entry of a root-level tree.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Path relative to the owning sitemap (`""`, `"a/"`, `"a/b/"`).
    #[inline]
    pub fn original_uri(&self) -> &str {
        &self.original_uri
    }

    #[inline]
    pub fn root_path(&self) -> &RootPath {
        &self.root_path
    }

    /// Root path under which the owning sitemap is mounted.
    #[inline]
    pub fn entry_point(&self) -> &RootPath {
        &self.entry_point
    }

    /// 0-based index among siblings.
    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    #[inline]
    pub fn is_root_entry(&self) -> bool {
        self.is_root_entry
    }

    /// Set when the entry is the detail view of a content item.
    #[inline]
    pub fn content_id(&self) -> Option<StructureId> {
        self.content_id
    }

    #[inline]
    pub fn own_properties(&self) -> &PropertyMap {
        &self.own_properties
    }

    #[inline]
    pub fn computed_properties(&self) -> &ComputedProperties {
        &self.computed_properties
    }

    /// Computed value of one property.
    pub fn property(&self, name: &str) -> Option<&str> {
        self.computed_properties.get(name).map(String::as_str)
    }

    #[inline]
    pub fn sitemap_info(&self) -> Option<SitemapInfoId> {
        self.sitemap_info
    }

    #[inline]
    pub fn sub_entries(&self) -> &[Arc<SitemapEntry>] {
        &self.sub_entries
    }

    /// Derive the detail entry of a content item shown below this entry.
    ///
    /// `/news/` + `<id>` -> `/news/<id>/`
    ///
    /// The id is derived from the detail path, so it is stable but never
    /// equal to the parent's.
    pub fn with_detail(&self, content_id: StructureId) -> Self {
        let segment = content_id.to_string();
        let root_path = self.root_path.to_folder().join(&format!("{segment}/"));
        Self {
            id: EntryId::synthesize(self.structure_id, &self.locale, root_path.as_str()),
            root_path,
            original_uri: format!("{}{segment}/", self.original_uri),
            name: segment,
            is_root_entry: false,
            content_id: Some(content_id),
            sitemap_info: None,
            sub_entries: Vec::new(),
            ..self.clone()
        }
    }

    /// Pre-order walk over this entry and all descendants.
    pub fn walk(&self) -> impl Iterator<Item = &SitemapEntry> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let entry = stack.pop()?;
            stack.extend(entry.sub_entries.iter().rev().map(Arc::as_ref));
            Some(entry)
        })
    }
}
