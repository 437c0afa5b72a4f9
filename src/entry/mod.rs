//! Sitemap tree nodes.
//!
//! Built in two phases: the builder fills an [`EntryDraft`] while descending,
//! then freezes it into an immutable [`SitemapEntry`] once all children are
//! done.

mod draft;
mod model;

pub(crate) use draft::EntryDraft;
pub use model::SitemapEntry;
