//! Command-line interface definitions.

use std::path::PathBuf;

use clap::{ColorChoice, Parser, Subcommand};
use sitemap_cache::{EntryId, Project, StructureId};

/// Sitemap tree cache inspector
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: sitemap.toml)
    #[arg(short = 'C', long, global = true, default_value = "sitemap.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Repository fixture with offline and online resources (JSON)
    #[arg(short, long, global = true, default_value = "repository.json", value_hint = clap::ValueHint::FilePath)]
    pub repository: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Pretty-print JSON output
    #[arg(short, long, global = true)]
    pub pretty: bool,

    /// Write output to file instead of stdout
    #[arg(short, long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// List active sitemaps per locale and entry point
    #[command(visible_alias = "a")]
    Active {
        #[arg(short = 'P', long, value_enum, default_value_t = Project::Online)]
        project: Project,
    },

    /// Look up a single sitemap entry by id or uri
    #[command(visible_alias = "e")]
    Entry {
        #[command(flatten)]
        scope: Scope,

        /// Entry id
        #[arg(long, conflicts_with = "uri", required_unless_present = "uri")]
        id: Option<EntryId>,

        /// Entry uri (repository path, detail uris included)
        #[arg(long)]
        uri: Option<String>,
    },

    /// Print the full sitemap trees of one locale
    #[command(visible_alias = "t")]
    Tree {
        #[command(flatten)]
        scope: Scope,
    },

    /// Check whether a link survives a pending publish
    #[command(visible_alias = "c")]
    CheckLink {
        /// Pending publish set (JSON: path -> {id, state})
        #[arg(long, value_hint = clap::ValueHint::FilePath)]
        pending: PathBuf,

        /// Structure id of the link target
        #[arg(long)]
        id: Option<StructureId>,

        /// Link target path
        #[arg(value_name = "PATH")]
        path: String,
    },

    /// Resolve the detail page of a content resource
    #[command(visible_alias = "d")]
    DetailPage {
        #[command(flatten)]
        scope: Scope,

        /// Root path of the content resource
        #[arg(value_name = "PATH")]
        path: String,

        /// Uri of the linking page
        #[arg(short, long)]
        from: Option<String>,
    },

    /// Build both projects and print table sizes
    #[command(visible_alias = "s")]
    Stats,
}

/// Project and locale of a lookup.
#[derive(clap::Args, Debug, Clone)]
pub struct Scope {
    /// Project to read from
    #[arg(short = 'P', long, value_enum, default_value_t = Project::Online)]
    pub project: Project,

    /// Locale of the tree
    #[arg(short, long, default_value = "en")]
    pub locale: String,
}
