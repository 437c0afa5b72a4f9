use std::sync::Arc;

use super::SitemapEntry;
use crate::core::{EntryId, Locale, RootPath, StructureId};
use crate::property::{ComputedProperties, PropertyMap};
use crate::structure::SitemapInfoId;

/// Entry under construction: every field except the children is known
/// before the subtree is visited.
#[derive(Debug, Clone)]
pub(crate) struct EntryDraft {
    pub id: EntryId,
    pub structure_id: StructureId,
    pub locale: Locale,
    pub name: String,
    pub title: Option<String>,
    pub original_uri: String,
    pub root_path: RootPath,
    pub entry_point: RootPath,
    pub position: usize,
    pub is_root_entry: bool,
    pub own_properties: PropertyMap,
    pub computed_properties: ComputedProperties,
    pub sitemap_info: Option<SitemapInfoId>,
}

impl EntryDraft {
    /// Attach the finished children and seal the entry.
    pub fn freeze(self, sub_entries: Vec<Arc<SitemapEntry>>) -> SitemapEntry {
        SitemapEntry {
            id: self.id,
            structure_id: self.structure_id,
            locale: self.locale,
            name: self.name,
            title: self.title,
            original_uri: self.original_uri,
            root_path: self.root_path,
            entry_point: self.entry_point,
            position: self.position,
            is_root_entry: self.is_root_entry,
            content_id: None,
            own_properties: self.own_properties,
            computed_properties: self.computed_properties,
            sitemap_info: self.sitemap_info,
            sub_entries,
        }
    }
}
