//! Shared helper functions used across CLI subcommands.
//!
//! Includes tracing initialization, wiring of the core resolver and
//! installer from loaded settings, and the presentation theme.

use std::io::IsTerminal;
use std::sync::Arc;

use anyhow::Result;
use packs_core::{
    AgentProbe, Fetcher, GitHubFetcher, Installer, PackType, RegistryClient, Resolver, Settings,
    http_client,
};
use tracing_subscriber::EnvFilter;

// ---------------------------------------------------------------------------
// Tracing
// ---------------------------------------------------------------------------

/// Initialize the tracing subscriber with the given default log level.
///
/// Logs go to stderr so that piped stdout carries only pack content.
pub fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

// ---------------------------------------------------------------------------
// Wiring
// ---------------------------------------------------------------------------

/// Loaded settings plus the clients built from them.
pub struct App {
    pub settings: Settings,
    http: reqwest::Client,
    registry: Arc<RegistryClient>,
}

impl App {
    /// Load settings from the config file and environment.
    pub fn load() -> Result<Self> {
        let settings = Settings::load()?;
        tracing::debug!(
            config = %settings.config_path.display(),
            registry = %settings.registry_url,
            telemetry = settings.telemetry,
            "settings loaded"
        );

        let http = http_client();
        let registry = Arc::new(RegistryClient::new(&settings.registry_url, http.clone()));
        Ok(Self {
            settings,
            http,
            registry,
        })
    }

    pub fn registry(&self) -> &RegistryClient {
        &self.registry
    }

    /// A resolver honouring the configured fallback and telemetry settings.
    pub fn resolver(&self) -> Resolver {
        let fetcher = Fetcher::new(self.registry.clone(), GitHubFetcher::new(self.http.clone()));
        Resolver::new(fetcher)
            .with_fallback(self.settings.fallback.clone())
            .with_telemetry(self.settings.telemetry)
    }

    /// An installer for this process's stdout and working directory.
    pub fn installer(&self) -> Installer {
        Installer::new(std::io::stdout().is_terminal(), AgentProbe::from_env())
            .with_skills_dir(self.settings.skills_dir.clone())
    }
}

// ---------------------------------------------------------------------------
// Presentation
// ---------------------------------------------------------------------------

/// Icons and column widths for human-readable output.
#[derive(Debug, Clone)]
pub struct Theme {
    pub pack_icon: &'static str,
    pub context_icon: &'static str,
    pub prompt_icon: &'static str,
    pub name_width: usize,
    pub version_width: usize,
    pub stars_width: usize,
    pub description_width: usize,
    pub label_width: usize,
    pub rule_width: usize,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            pack_icon: "📦",
            context_icon: "📚",
            prompt_icon: "💬",
            name_width: 24,
            version_width: 8,
            stars_width: 4,
            description_width: 40,
            label_width: 14,
            rule_width: 50,
        }
    }
}

impl Theme {
    pub fn icon(&self, pack_type: PackType) -> &'static str {
        match pack_type {
            PackType::Context => self.context_icon,
            PackType::Prompt => self.prompt_icon,
            PackType::Skill | PackType::Unknown => self.pack_icon,
        }
    }

    pub fn rule(&self) -> String {
        "─".repeat(self.rule_width)
    }

    /// Cut `text` to `width` characters, ending in `...` when shortened.
    pub fn truncate(&self, text: &str, width: usize) -> String {
        if text.chars().count() <= width {
            return text.to_owned();
        }
        let kept: String = text.chars().take(width.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
