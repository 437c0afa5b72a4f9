//! `[types]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [types]
//! sitemap = "sitemap"                       # Type name of sitemap documents
//! schema = "/system/schemas/sitemap.xsd"    # Sitemap schema resource
//! structured-content = ["article", "event"] # Types with detail pages (empty = all)
//! ```

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::core::RootPath;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct TypesConfig {
    /// Resource type name of sitemap documents.
    pub sitemap: String,

    /// Root path of the sitemap schema; a change to it invalidates the cache.
    pub schema: Option<String>,

    /// Type names eligible for detail pages. Empty accepts every
    /// structured content type.
    pub structured_content: Vec<String>,
}

impl TypesConfig {
    pub const SITEMAP: FieldPath = FieldPath::new("types.sitemap");
    pub const SCHEMA: FieldPath = FieldPath::new("types.schema");

    pub fn is_sitemap(&self, type_name: &str) -> bool {
        self.sitemap == type_name
    }

    pub fn is_schema(&self, path: &RootPath) -> bool {
        self.schema
            .as_deref()
            .is_some_and(|schema| RootPath::file(schema) == *path)
    }

    /// Whether content of this type can have a detail page.
    pub fn has_detail_pages(&self, type_name: &str) -> bool {
        self.structured_content.is_empty() || self.structured_content.iter().any(|t| t == type_name)
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.sitemap.trim().is_empty() {
            diag.error(Self::SITEMAP, "type name must not be empty");
        }
        if let Some(schema) = &self.schema
            && !schema.starts_with('/')
        {
            diag.error_with_hint(
                Self::SCHEMA,
                format!("schema path `{schema}` is not absolute"),
                format!("write it as `/{schema}`"),
            );
        }
    }
}

impl Default for TypesConfig {
    fn default() -> Self {
        Self {
            sitemap: "sitemap".into(),
            schema: None,
            structured_content: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_types_config() {
        let config = test_parse_config(
            "[types]\nschema = \"/system/sitemap.xsd\"\nstructured-content = [\"article\"]",
        );
        assert!(config.types.is_sitemap("sitemap"));
        assert!(config.types.is_schema(&RootPath::file("/system/sitemap.xsd")));
        assert!(!config.types.is_schema(&RootPath::file("/other.xsd")));
        assert!(config.types.has_detail_pages("article"));
        assert!(!config.types.has_detail_pages("event"));
    }

    #[test]
    fn test_empty_content_list_accepts_all() {
        let config = test_parse_config("");
        assert!(config.types.has_detail_pages("anything"));
        assert!(!config.types.is_schema(&RootPath::file("/x")));
    }

    #[test]
    fn test_relative_schema_is_rejected() {
        let config = test_parse_config("[types]\nschema = \"system/sitemap.xsd\"");
        let mut diag = ConfigDiagnostics::new();
        config.types.validate(&mut diag);
        assert!(diag.has_errors());
        assert!(diag.errors()[0].hint.is_some());
    }
}
