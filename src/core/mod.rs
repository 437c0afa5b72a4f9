//! Core types - pure abstractions shared across the codebase.

mod id;
mod locale;
mod path;
mod project;

pub use id::{EntryId, StructureId};
pub use locale::Locale;
pub use path::RootPath;
pub use project::Project;
