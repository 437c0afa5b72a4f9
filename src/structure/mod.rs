//! Sitemap structure: building trees and caching their index tables.
//!
//! ```text
//! StructureCache ──owns──> ContextSelector   (which repository serves a read)
//!       │                  DocumentCache     (parsed documents by structure id)
//!       └──rebuilds──────> SitemapTreeBuilder ──produces──> SitemapTables
//! ```

mod builder;
mod cache;
mod context;
mod documents;
mod runtime;
mod tables;

pub use builder::SitemapTreeBuilder;
pub use cache::StructureCache;
pub use context::{ContextSelector, ProjectContext};
pub use documents::DocumentCache;
pub use runtime::{DetailPageInfo, SitemapInfoId, SitemapRuntimeInfo};
pub use tables::{ActiveSitemaps, SitemapTables};

pub(crate) use builder::error_chain;
