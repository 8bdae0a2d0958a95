//! Configuration loading.
//!
//! Settings come from `~/.packs/config.toml` and are overridden by
//! environment variables:
//!
//! | Variable             | Overrides                |
//! |----------------------|--------------------------|
//! | `PACKS_API_URL`      | `registry`               |
//! | `PACKS_REGISTRY`     | `registry` (alias)       |
//! | `PACKS_SKILLS_DIR`   | `skills_dir`             |
//! | `PACKS_NO_TELEMETRY` | `telemetry` (`1` = off)  |
//! | `PACKS_CONFIG`       | location of the file     |

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PackError, Result};
use crate::registry::DEFAULT_REGISTRY_URL;
use crate::resolve::{DEFAULT_FALLBACK_REPO, FallbackRepo};
use crate::telemetry::ENV_NO_TELEMETRY;

pub const ENV_API_URL: &str = "PACKS_API_URL";
pub const ENV_REGISTRY: &str = "PACKS_REGISTRY";
pub const ENV_SKILLS_DIR: &str = "PACKS_SKILLS_DIR";
pub const ENV_CONFIG: &str = "PACKS_CONFIG";

/// Contents written by `packs config reset`.
pub const DEFAULT_CONFIG_TOML: &str = r#"# packs configuration
# https://packs.sh

registry = "https://packs-api.fly.dev"
telemetry = true

# Override the auto-detected skills directory:
# skills_dir = "~/.packs/skills"

# GitHub location tried when the registry cannot serve a pack.
# Set to "" to disable.
# fallback_repo = "tunajam/packs-registry/packs"
"#;

/// The on-disk config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub registry: Option<String>,
    pub skills_dir: Option<String>,
    pub telemetry: Option<bool>,
    pub fallback_repo: Option<String>,
}

impl ConfigFile {
    /// Read the file at `path`; a missing file yields defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(PackError::io(
                    format!("failed to read {}", path.display()),
                    e,
                ));
            }
        };

        toml::from_str(&text).map_err(|e| PackError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}

/// Where a setting's value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Default,
    File,
    Env,
}

/// Effective settings after merging file and environment.
#[derive(Debug, Clone)]
pub struct Settings {
    pub config_path: PathBuf,
    pub registry_url: String,
    pub registry_origin: Origin,
    /// `None` means auto-detect.
    pub skills_dir: Option<PathBuf>,
    pub skills_dir_origin: Origin,
    pub telemetry: bool,
    pub telemetry_origin: Origin,
    pub fallback: Option<FallbackRepo>,
}

impl Settings {
    /// Load settings for the current process.
    pub fn load() -> Result<Self> {
        let home = home_dir();
        let path = config_path(&home, process_env(ENV_CONFIG));
        let file = ConfigFile::load(&path)?;
        Self::resolve(path, file, &home, process_env)
    }

    /// Merge `file` with environment values looked up through `env`.
    pub fn resolve(
        config_path: PathBuf,
        file: ConfigFile,
        home: &Path,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let (registry_url, registry_origin) =
            match env(ENV_API_URL).or_else(|| env(ENV_REGISTRY)) {
                Some(url) => (url, Origin::Env),
                None => match file.registry {
                    Some(url) => (url, Origin::File),
                    None => (DEFAULT_REGISTRY_URL.to_owned(), Origin::Default),
                },
            };

        if let Err(e) = url::Url::parse(&registry_url) {
            return Err(PackError::Config {
                path: config_path,
                reason: format!("invalid registry URL `{registry_url}`: {e}"),
            });
        }

        let (skills_dir, skills_dir_origin) = match env(ENV_SKILLS_DIR) {
            Some(dir) => (Some(expand_home(&dir, home)), Origin::Env),
            None => match file.skills_dir.as_deref().filter(|d| !d.is_empty()) {
                Some(dir) => (Some(expand_home(dir, home)), Origin::File),
                None => (None, Origin::Default),
            },
        };

        let (telemetry, telemetry_origin) = match env(ENV_NO_TELEMETRY) {
            Some(v) if v == "1" => (false, Origin::Env),
            _ => match file.telemetry {
                Some(enabled) => (enabled, Origin::File),
                None => (true, Origin::Default),
            },
        };

        let fallback_spec = file
            .fallback_repo
            .unwrap_or_else(|| DEFAULT_FALLBACK_REPO.to_owned());
        let fallback = if fallback_spec.trim().is_empty() {
            None
        } else {
            Some(fallback_spec.parse::<FallbackRepo>().map_err(|reason| PackError::Config {
                path: config_path.clone(),
                reason,
            })?)
        };

        Ok(Self {
            config_path,
            registry_url,
            registry_origin,
            skills_dir,
            skills_dir_origin,
            telemetry,
            telemetry_origin,
            fallback,
        })
    }
}

/// Config file location for the current process, without reading it.
pub fn current_config_path() -> PathBuf {
    config_path(&home_dir(), process_env(ENV_CONFIG))
}

/// `$PACKS_CONFIG`, or `~/.packs/config.toml`.
pub fn config_path(home: &Path, override_path: Option<String>) -> PathBuf {
    match override_path {
        Some(path) => PathBuf::from(path),
        None => home.join(".packs").join("config.toml"),
    }
}

/// Write [`DEFAULT_CONFIG_TOML`] to `path`, creating parent directories.
pub fn reset(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            PackError::io(format!("failed to create {}", parent.display()), e)
        })?;
    }
    std::fs::write(path, DEFAULT_CONFIG_TOML)
        .map_err(|e| PackError::io(format!("failed to write {}", path.display()), e))
}

fn home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

fn expand_home(path: &str, home: &Path) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => home.join(rest),
        None if path == "~" => home.to_path_buf(),
        None => PathBuf::from(path),
    }
}
