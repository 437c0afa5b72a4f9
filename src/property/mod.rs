//! Sitemap properties: declared values, definitions, and inheritance.

mod state;
mod value;

pub use state::PropertyInheritanceState;
pub use value::{ComputedProperties, PropertyDefinition, PropertyDefinitions, PropertyMap, PropertyValue};
