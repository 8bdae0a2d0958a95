//! CLI argument definitions for packs.
//!
//! All `clap` structures live here so that `main.rs` stays focused on
//! dispatching subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use packs_core::{PackType, SearchOptions, SortOrder};

/// packs -- skills, context, and prompts for AI agents.
#[derive(Parser)]
#[command(
    name = "packs",
    version,
    about = "packs -- skills, context, and prompts for AI agents",
    long_about = "Discover, fetch, and share packs: small markdown files that teach AI agents \
                  how to do things. Installed packs land in your agent's skills directory."
)]
pub struct Cli {
    /// Log debug output to stderr.
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch a pack and install it. When stdout is piped the content is
    /// printed instead.
    Get {
        /// Pack name (`commit-message`, `react-query@2.1.0`) or GitHub
        /// reference (`@user/repo/path`, `gh:user/repo/path`).
        reference: String,

        /// Install under this directory instead of the detected one.
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Install even when stdout is piped.
        #[arg(long, short)]
        install: bool,

        /// Overwrite an already installed pack.
        #[arg(long, short)]
        force: bool,
    },

    /// Search the registry.
    Find {
        /// Search terms.
        query: Vec<String>,

        /// Filter by type: skill, context, or prompt.
        #[arg(long = "type", short = 't')]
        pack_type: Option<PackType>,

        /// Only packs carrying this tag (repeatable).
        #[arg(long = "tag")]
        tags: Vec<String>,

        /// Only packs by this author.
        #[arg(long)]
        author: Option<String>,

        /// Maximum number of results.
        #[arg(long, short, default_value_t = 20)]
        limit: i32,

        /// Skip this many results.
        #[arg(long, default_value_t = 0)]
        offset: i32,

        /// Result order: relevance, stars, newest, or name.
        #[arg(long, default_value = "stars")]
        sort: SortOrder,

        /// Output as JSON.
        #[arg(long, short)]
        json: bool,
    },

    /// Show details for a registry pack.
    Info {
        /// Pack name, optionally pinned (`name@version`).
        reference: String,

        /// Output as JSON.
        #[arg(long, short)]
        json: bool,
    },

    /// Submit a GitHub-hosted pack to the registry for indexing.
    Submit {
        /// `@user/repo/path`, `gh:user/repo/path` or `user/repo/path`.
        reference: String,
    },

    /// Show or manage configuration.
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

/// Actions for the configuration file.
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the config file path.
    Path,
    /// Overwrite the config file with defaults.
    Reset,
}

/// Build registry search options from `find` arguments.
pub fn search_options(
    query: &[String],
    pack_type: Option<PackType>,
    tags: Vec<String>,
    author: Option<String>,
    limit: i32,
    offset: i32,
    sort: SortOrder,
) -> SearchOptions {
    SearchOptions {
        query: query.join(" "),
        pack_type,
        tags,
        author,
        limit,
        offset,
        sort,
    }
}
