//! sitemap-cache - inspect sitemap trees built from a repository fixture.

mod cli;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{ColorChoice, Parser};
use cli::Cli;
use sitemap_cache::cache::LogReporter;
use sitemap_cache::repository::RepositoryFixture;
use sitemap_cache::{DualProjectCache, SitemapConfig, debug, logger};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = load_config(&cli)?;
    let fixture = RepositoryFixture::load(&cli.repository)
        .with_context(|| format!("cannot load repository `{}`", cli.repository.display()))?;
    let (offline, online) = fixture.into_repositories()?;

    let mut cache = DualProjectCache::new(config, Arc::new(offline), Arc::new(online));
    if cli.verbose {
        cache = cache.with_reporter(Arc::new(LogReporter));
    }

    let result = cli::run(&cli, &cache);
    cache.shutdown();
    result
}

/// Load the config file, falling back to defaults when it does not exist.
fn load_config(cli: &Cli) -> Result<SitemapConfig> {
    if !cli.config.exists() {
        debug!("config"; "`{}` not found, using defaults", cli.config.display());
        return Ok(SitemapConfig::default());
    }
    SitemapConfig::load(&cli.config)
        .with_context(|| format!("invalid config `{}`", cli.config.display()))
}
