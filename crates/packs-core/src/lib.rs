//! Pack resolution and installation for the packs registry client.
//!
//! A pack is a single markdown file (skill, context or prompt) meant to be
//! dropped into an AI agent's skills directory. This crate provides:
//!
//! - **Reference parsing**: `name`, `name@version`, `@user/repo/path` and
//!   `gh:user/repo/path` become a [`PackReference`].
//!
//! - **Fetching**: registry `Get` calls, and for GitHub references a fixed
//!   chain of `gh api` then raw-content HTTP, each trying `SKILL.md`,
//!   `CONTEXT.md` and `PROMPT.md` in turn.
//!
//! - **Resolution**: registry first, with an optional GitHub mirror as a
//!   fallback, plus a fire-and-forget telemetry event.
//!
//! - **Installation**: print to a pipe, or write
//!   `<skills-dir>/<name>/SKILL.md` into the detected agent's directory.
//!
//! - **Registry client**: search, get, submit and telemetry over the
//!   registry's JSON RPC protocol.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use packs_core::{
//!     AgentProbe, Fetcher, GitHubFetcher, InstallOptions, Installer, RegistryClient, Resolver,
//!     http_client, parse,
//! };
//!
//! # async fn run() -> packs_core::Result<()> {
//! let http = http_client();
//! let registry = Arc::new(RegistryClient::new("https://packs-api.fly.dev", http.clone()));
//! let resolver = Resolver::new(Fetcher::new(registry, GitHubFetcher::new(http)));
//!
//! let reference = parse("@hsbacot/packs/commit-message");
//! let fetched = resolver.resolve(&reference).await?;
//!
//! let installer = Installer::new(true, AgentProbe::from_env());
//! let decision = installer.decide(&fetched, &InstallOptions::default())?;
//! installer.execute(&decision, &fetched.content, &mut std::io::stdout())?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod detect;
pub mod error;
pub mod fetch;
pub mod github;
pub mod installer;
pub mod offline;
pub mod reference;
pub mod registry;
pub mod resolve;
pub mod telemetry;
pub mod types;

pub use config::{ConfigFile, Origin, Settings};
pub use detect::{Agent, AgentProbe};
pub use error::{PackError, Result};
pub use fetch::{CONTENT_FILES, Fetcher, GitHubFetcher, first_success};
pub use github::{FileSource, GhCli, RawGitHub, RepoLocation};
pub use installer::{InstallDecision, InstallMode, InstallOptions, Installer};
pub use reference::{PackReference, SourceKind, parse};
pub use registry::{PackRegistry, RegistryClient, Submission, http_client};
pub use resolve::{FallbackRepo, Resolver};
pub use telemetry::{TelemetryEvent, report_detached};
pub use types::{
    FetchResult, Pack, PackSummary, PackType, SearchOptions, SearchPage, SortOrder, SourceUsed,
};
