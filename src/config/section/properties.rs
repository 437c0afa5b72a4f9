//! `[properties]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [properties]
//! entry-point = "sitemap"       # Marks folders a sitemap is mounted on
//! sub-sitemap = "sitemap"       # Entry property referencing a nested sitemap
//! detail-view = "detailview"    # Fallback detail page of a content item
//! export-name = "exportname"    # Export name of a site root
//! nav-pos = "navPos"            # Injected sibling index
//! ```

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

/// Names of the repository and sitemap properties the cache reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct PropertiesConfig {
    /// Repository property marking an entry point; its value is the backing
    /// sitemap path (absolute or site-relative).
    pub entry_point: String,

    /// Entry property whose value is the structure id of a sub-sitemap.
    pub sub_sitemap: String,

    /// Repository property naming a content item's detail page.
    pub detail_view: String,

    /// Repository property holding a site root's export name.
    pub export_name: String,

    /// Computed property set to the entry's sibling index.
    pub nav_pos: String,
}

impl PropertiesConfig {
    pub const ENTRY_POINT: FieldPath = FieldPath::new("properties.entry-point");
    pub const SUB_SITEMAP: FieldPath = FieldPath::new("properties.sub-sitemap");
    pub const DETAIL_VIEW: FieldPath = FieldPath::new("properties.detail-view");
    pub const EXPORT_NAME: FieldPath = FieldPath::new("properties.export-name");
    pub const NAV_POS: FieldPath = FieldPath::new("properties.nav-pos");

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        let fields = [
            (Self::ENTRY_POINT, &self.entry_point),
            (Self::SUB_SITEMAP, &self.sub_sitemap),
            (Self::DETAIL_VIEW, &self.detail_view),
            (Self::EXPORT_NAME, &self.export_name),
            (Self::NAV_POS, &self.nav_pos),
        ];
        for (field, value) in fields {
            if value.trim().is_empty() {
                diag.error(field, "property name must not be empty");
            }
        }
    }
}

impl Default for PropertiesConfig {
    fn default() -> Self {
        Self {
            entry_point: "sitemap".into(),
            sub_sitemap: "sitemap".into(),
            detail_view: "detailview".into(),
            export_name: "exportname".into(),
            nav_pos: "navPos".into(),
        }
    }
}
