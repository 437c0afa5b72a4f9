//! Command-line interface module.

mod args;
mod output;

pub use args::{Cli, Commands, Scope};

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use sitemap_cache::{
    DualProjectCache, EntryId, Locale, PendingPublish, Project, RootPath, StructureId, debug,
};

use output::{ActiveSitemap, DetailPage, LinkCheck, ProjectStats, write_json};

/// Run the parsed command against `cache`.
pub fn run(cli: &Cli, cache: &DualProjectCache) -> Result<()> {
    match &cli.command {
        Commands::Active { project } => active(cli, cache, *project),
        Commands::Entry { scope, id, uri } => entry(cli, cache, scope, *id, uri.as_deref()),
        Commands::Tree { scope } => tree(cli, cache, scope),
        Commands::CheckLink { pending, id, path } => check_link(cli, cache, pending, *id, path),
        Commands::DetailPage { scope, path, from } => {
            detail_page(cli, cache, scope, path, from.as_deref())
        }
        Commands::Stats => stats(cli, cache),
    }
}

fn active(cli: &Cli, cache: &DualProjectCache, project: Project) -> Result<()> {
    let active = cache.active_sitemaps(project)?;
    let rows: Vec<_> = active
        .iter()
        .map(|((locale, entry_point), sitemap)| ActiveSitemap {
            locale,
            entry_point,
            sitemap,
        })
        .collect();
    write_json(&rows, cli)
}

fn entry(
    cli: &Cli,
    cache: &DualProjectCache,
    scope: &Scope,
    id: Option<EntryId>,
    uri: Option<&str>,
) -> Result<()> {
    let locale = Locale::new(&scope.locale);
    let (found, key) = match (id, uri) {
        (Some(id), _) => (cache.entry_by_id(scope.project, &locale, id)?, id.to_string()),
        (None, Some(uri)) => (cache.entry_by_uri(scope.project, &locale, uri)?, uri.to_string()),
        (None, None) => anyhow::bail!("either --id or --uri is required"),
    };
    let entry = found.with_context(|| {
        format!("no {} entry `{key}` in the {} project", locale, scope.project)
    })?;
    write_json(entry.as_ref(), cli)
}

fn tree(cli: &Cli, cache: &DualProjectCache, scope: &Scope) -> Result<()> {
    let locale = Locale::new(&scope.locale);
    let tables = cache.tables(scope.project)?;
    let roots: Vec<_> = tables
        .roots()
        .iter()
        .filter(|root| root.locale() == &locale)
        .collect();
    debug!("tree"; "{} roots for {}", roots.len(), locale);
    write_json(&roots, cli)
}

fn check_link(
    cli: &Cli,
    cache: &DualProjectCache,
    pending: &Path,
    id: Option<StructureId>,
    path: &str,
) -> Result<()> {
    let content = fs::read_to_string(pending)
        .with_context(|| format!("cannot read pending set `{}`", pending.display()))?;
    let resources = PendingPublish::from_json(&content)
        .with_context(|| format!("malformed pending set `{}`", pending.display()))?;
    debug!("publish"; "simulating publish of {} resources", resources.len());

    let simulation = cache.publish_simulation(resources)?;
    let valid = simulation.check_link(id, path);
    write_json(&LinkCheck { path, id, valid }, cli)
}

fn detail_page(
    cli: &Cli,
    cache: &DualProjectCache,
    scope: &Scope,
    path: &str,
    from: Option<&str>,
) -> Result<()> {
    let locale = Locale::new(&scope.locale);
    let root_path = RootPath::file(path);
    let resource = cache
        .repository(scope.project)
        .read_resource(&root_path)
        .with_context(|| format!("no resource `{root_path}` in the {} project", scope.project))?;

    let detail_page = cache
        .detail_pages()
        .detail_page(scope.project, &locale, &resource, from)?;
    write_json(
        &DetailPage {
            resource: &resource.root_path,
            detail_page,
        },
        cli,
    )
}

fn stats(cli: &Cli, cache: &DualProjectCache) -> Result<()> {
    let rows = [Project::Offline, Project::Online]
        .into_iter()
        .map(|project| -> Result<ProjectStats> {
            let stats = cache.tables(project)?.stats();
            Ok(ProjectStats { project, stats })
        })
        .collect::<Result<Vec<_>>>()?;
    write_json(&rows, cli)
}
