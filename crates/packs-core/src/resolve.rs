//! Resolution order.
//!
//! GitHub references go straight to GitHub. Registry references ask the
//! registry first and, when a fallback repository is configured, retry
//! through GitHub at `<fallback>/<name>` if the registry cannot serve the
//! pack. Leaving the fallback unset disables that second step.
//!
//! After a successful fetch a telemetry event is sent in the background.

use std::fmt;
use std::str::FromStr;

use crate::error::{PackError, Result};
use crate::fetch::{CONTENT_FILES, Fetcher};
use crate::reference::PackReference;
use crate::telemetry::{TelemetryEvent, report_detached};
use crate::types::FetchResult;

/// GitHub location mirrored from the registry.
pub const DEFAULT_FALLBACK_REPO: &str = "tunajam/packs-registry/packs";

/// A GitHub directory holding one pack per subdirectory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackRepo {
    pub owner: String,
    pub repo: String,
    pub prefix: Option<String>,
}

impl FallbackRepo {
    /// The GitHub reference for `name` inside this repository.
    pub fn reference_for(&self, name: &str) -> PackReference {
        let path = match &self.prefix {
            Some(prefix) => format!("{prefix}/{name}"),
            None => name.to_owned(),
        };
        PackReference::github(&self.owner, &self.repo, Some(&path))
    }
}

impl FromStr for FallbackRepo {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim().trim_matches('/');
        let mut parts = trimmed.splitn(3, '/');
        let owner = parts.next().filter(|p| !p.is_empty());
        let repo = parts.next().filter(|p| !p.is_empty());
        match (owner, repo) {
            (Some(owner), Some(repo)) => Ok(Self {
                owner: owner.to_owned(),
                repo: repo.to_owned(),
                prefix: parts.next().filter(|p| !p.is_empty()).map(str::to_owned),
            }),
            _ => Err(format!(
                "invalid fallback_repo `{s}` (expected owner/repo or owner/repo/path)"
            )),
        }
    }
}

impl fmt::Display for FallbackRepo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)?;
        if let Some(prefix) = &self.prefix {
            write!(f, "/{prefix}")?;
        }
        Ok(())
    }
}

/// Resolves pack references to content.
pub struct Resolver {
    fetcher: Fetcher,
    fallback: Option<FallbackRepo>,
    telemetry: bool,
}

impl Resolver {
    /// A resolver with no registry fallback and telemetry off.
    pub fn new(fetcher: Fetcher) -> Self {
        Self {
            fetcher,
            fallback: None,
            telemetry: false,
        }
    }

    pub fn with_fallback(mut self, fallback: Option<FallbackRepo>) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn with_telemetry(mut self, enabled: bool) -> Self {
        self.telemetry = enabled;
        self
    }

    pub fn fetcher(&self) -> &Fetcher {
        &self.fetcher
    }

    /// Fetch `reference`, applying the registry fallback policy.
    pub async fn resolve(&self, reference: &PackReference) -> Result<FetchResult> {
        let result = if reference.is_github() {
            self.fetcher.fetch(reference).await?
        } else {
            self.resolve_registry(reference).await?
        };

        if self.telemetry {
            let event = TelemetryEvent::new(
                &result.resolved_name,
                result.source_used,
                reference.version.as_deref(),
            );
            report_detached(self.fetcher.registry().clone(), event);
        }

        Ok(result)
    }

    async fn resolve_registry(&self, reference: &PackReference) -> Result<FetchResult> {
        let registry_err = match self.fetcher.fetch(reference).await {
            Ok(result) => return Ok(result),
            Err(e) => e,
        };

        let Some(fallback) = &self.fallback else {
            return Err(if registry_err.is_not_found() {
                PackError::NotFound {
                    reference: reference.to_string(),
                    tried: vec!["registry".to_owned()],
                }
            } else {
                registry_err
            });
        };

        tracing::warn!(
            pack = %reference,
            error = %registry_err,
            fallback = %fallback,
            "registry fetch failed, trying GitHub fallback"
        );

        let github_ref = fallback.reference_for(&reference.name);
        match self.fetcher.fetch(&github_ref).await {
            Ok(mut result) => {
                result.resolved_name = reference.name.clone();
                Ok(result)
            }
            Err(e) if e.is_not_found() => Err(PackError::NotFound {
                reference: reference.to_string(),
                tried: vec![
                    "registry".to_owned(),
                    format!(
                        "gh:{}/{} ({})",
                        fallback,
                        reference.name,
                        CONTENT_FILES.join(", ")
                    ),
                ],
            }),
            Err(e) => Err(e),
        }
    }
}
