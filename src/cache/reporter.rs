//! Rebuild reporting.

use std::time::Duration;

use serde::Serialize;

/// Sizes of one freshly built snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub generation: u64,
    pub entries: usize,
    pub paths: usize,
    pub ids: usize,
    pub active_sitemaps: usize,
    pub sitemap_infos: usize,
    pub entry_points: usize,
}

/// Receives statistics after every rebuild (memory accounting, metrics).
pub trait CacheReporter: Send + Sync {
    fn on_rebuild(&self, label: &str, stats: &CacheStats, elapsed: Duration);
}

/// Reporter writing one log line per rebuild.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl CacheReporter for LogReporter {
    fn on_rebuild(&self, label: &str, stats: &CacheStats, elapsed: Duration) {
        crate::log!(
            "cache";
            "{label}: {} entries, {} sitemaps, {} ({:.1?})",
            stats.entries,
            stats.sitemap_infos,
            crate::utils::plural_count(stats.entry_points, "entry point"),
            elapsed
        );
    }
}
