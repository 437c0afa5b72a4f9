//! Cache configuration management for `sitemap.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── properties # [properties]
//! │   ├── sites      # [sites]
//! │   └── types      # [types]
//! ├── types/         # Utility types
//! │   ├── error      # ConfigError, ConfigDiagnostics
//! │   └── field      # FieldPath
//! └── mod.rs         # SitemapConfig (this file)
//! ```
//!
//! # Sections
//!
//! | Section        | Purpose                                          |
//! |----------------|--------------------------------------------------|
//! | `[properties]` | Entry point, sub-sitemap, detail view, nav names |
//! | `[types]`      | Sitemap type name, schema, content types         |
//! | `[sites]`      | Site roots                                       |

pub mod section;
pub mod types;

pub use section::{PropertiesConfig, SitesConfig, TypesConfig};
pub use types::{ConfigDiagnostic, ConfigDiagnostics, ConfigError, FieldPath};

use crate::log;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing sitemap.toml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SitemapConfig {
    /// Property names read from the repository and sitemap documents
    #[serde(default)]
    pub properties: PropertiesConfig,

    /// Resource type names
    #[serde(default)]
    pub types: TypesConfig,

    /// Site roots
    #[serde(default)]
    pub sites: SitesConfig,
}

impl SitemapConfig {
    /// Load and validate configuration from a file.
    ///
    /// Unknown fields are reported as warnings, not errors.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        let mut diag = ConfigDiagnostics::new();
        for field in fields {
            diag.warn(field.as_str(), format!("unknown field in {display_path}, ignoring"));
        }
        diag.print_warnings();
    }

    /// Validate all sections.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut diag = ConfigDiagnostics::new();
        self.properties.validate(&mut diag);
        self.types.validate(&mut diag);
        self.sites.validate(&mut diag);

        if diag.has_errors() {
            log!("error"; "invalid configuration");
        }
        diag.into_result().map_err(ConfigError::Diagnostics)
    }
}

// ============================================================================
// test helpers
// ============================================================================

#[cfg(test)]
pub fn test_parse_config(content: &str) -> SitemapConfig {
    let (parsed, ignored) = SitemapConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(test_parse_config(""), SitemapConfig::default());
        assert!(SitemapConfig::default().validate().is_ok());
    }

    #[test]
    fn test_from_str() {
        let config = SitemapConfig::from_str("[sites]\nroots = [\"/site/\"]").unwrap();
        assert_eq!(config.sites.roots, vec!["/site/".to_string()]);
        assert!(SitemapConfig::from_str("[sites\n").is_err());
    }

    #[test]
    fn test_unknown_fields_collected() {
        let (config, ignored) =
            SitemapConfig::parse_with_ignored("[properties]\nbogus = 1\n[extra]\nx = 2").unwrap();
        assert_eq!(config.properties, PropertiesConfig::default());
        assert!(ignored.contains(&"properties.bogus".to_string()));
        assert!(ignored.contains(&"extra".to_string()));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sitemap.toml");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "[properties]\nentry-point = \"mount\"\nunknown = true").unwrap();

        let config = SitemapConfig::load(&path).unwrap();
        assert_eq!(config.properties.entry_point, "mount");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = SitemapConfig::load(&dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(..)));
    }

    #[test]
    fn test_load_rejects_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sitemap.toml");
        fs::write(&path, "[sites]\nroots = [\"relative\"]").unwrap();

        let err = SitemapConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Diagnostics(_)));
    }
}
