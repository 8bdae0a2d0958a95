//! CLI entry point for packs.
//!
//! This binary provides the `packs` command with subcommands for fetching
//! packs into an agent's skills directory, searching the registry, and
//! submitting new packs.

mod cli;
mod config;
mod find;
mod get;
mod helpers;
mod info;
mod submit;

use anyhow::Result;
use clap::Parser;

use crate::cli::{Cli, Commands, ConfigAction};

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    helpers::init_tracing(if cli.verbose { "debug" } else { "warn" });

    run(cli.command).await
}

async fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Get {
            reference,
            output,
            install,
            force,
        } => get::run(&reference, output, install, force).await,
        Commands::Find {
            query,
            pack_type,
            tags,
            author,
            limit,
            offset,
            sort,
            json,
        } => {
            let options =
                cli::search_options(&query, pack_type, tags, author, limit, offset, sort);
            find::run(options, json).await
        }
        Commands::Info { reference, json } => info::run(&reference, json).await,
        Commands::Submit { reference } => submit::run(&reference).await,
        Commands::Config { action } => match action {
            None => config::show(),
            Some(ConfigAction::Path) => config::path(),
            Some(ConfigAction::Reset) => config::reset(),
        },
    }
}
