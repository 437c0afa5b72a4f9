//! JSON output of command results.

use std::fs;
use std::io::Write;

use anyhow::{Context, Result};
use serde::Serialize;
use sitemap_cache::{CacheStats, Locale, Project, RootPath, StructureId, log};

use super::Cli;

/// One row of `active`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ActiveSitemap<'a> {
    pub locale: &'a Locale,
    pub entry_point: &'a RootPath,
    pub sitemap: &'a RootPath,
}

#[derive(Debug, Serialize)]
pub(super) struct LinkCheck<'a> {
    pub path: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<StructureId>,
    pub valid: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct DetailPage<'a> {
    pub resource: &'a RootPath,
    pub detail_page: Option<RootPath>,
}

#[derive(Debug, Serialize)]
pub(super) struct ProjectStats {
    pub project: Project,
    #[serde(flatten)]
    pub stats: CacheStats,
}

/// Serialize `value` to stdout or to `--output`.
pub(super) fn write_json<T: Serialize + ?Sized>(value: &T, cli: &Cli) -> Result<()> {
    let formatted = if cli.pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };

    if let Some(ref output_path) = cli.output {
        let mut file = fs::File::create(output_path)
            .with_context(|| format!("cannot create `{}`", output_path.display()))?;
        writeln!(file, "{}", formatted)?;
        log!("output"; "wrote {}", output_path.display());
    } else {
        println!("{}", formatted);
    }

    Ok(())
}
