//! Configuration section definitions.
//!
//! Each module corresponds to a section in `sitemap.toml`:
//!
//! | Module       | TOML Section   | Purpose                                  |
//! |--------------|----------------|------------------------------------------|
//! | `properties` | `[properties]` | Names of the properties the cache reads  |
//! | `sites`      | `[sites]`      | Site roots                               |
//! | `types`      | `[types]`      | Resource type names                      |

mod properties;
mod sites;
mod types;

pub use properties::PropertiesConfig;
pub use sites::SitesConfig;
pub use types::TypesConfig;
