//! GitHub content sources.
//!
//! Two mechanisms read a single file out of a repository:
//!
//! - [`GhCli`] shells out to the `gh` tool, which carries the user's auth and
//!   so works for private repositories, org SSO, and past anonymous rate
//!   limits.
//! - [`RawGitHub`] issues an unauthenticated GET against the raw-content host
//!   on the default branch.
//!
//! Both report a miss as `None`; the fetcher decides what to try next.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;

use crate::registry::HTTP_TIMEOUT;
use crate::types::SourceUsed;

/// Default raw-content host.
pub const DEFAULT_RAW_BASE_URL: &str = "https://raw.githubusercontent.com";

/// Branch assumed for raw-content fetches.
pub const DEFAULT_BRANCH: &str = "main";

/// A file location inside a GitHub repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoLocation {
    pub owner: String,
    pub repo: String,
    pub path: Option<String>,
}

impl RepoLocation {
    /// `<path>/<filename>`, or just `<filename>` at the repository root.
    pub fn file_path(&self, filename: &str) -> String {
        match &self.path {
            Some(path) => format!("{path}/{filename}"),
            None => filename.to_owned(),
        }
    }
}

/// A mechanism that can read one file from a repository.
#[async_trait]
pub trait FileSource: Send + Sync {
    /// Recorded in [`crate::FetchResult::source_used`] on success.
    fn mechanism(&self) -> SourceUsed;

    /// Whether this mechanism can be used on this machine at all.
    fn is_available(&self) -> bool {
        true
    }

    /// Read `filename` from `location`, or `None` if it is not there.
    async fn fetch_file(&self, location: &RepoLocation, filename: &str) -> Option<Vec<u8>>;
}

// ---------------------------------------------------------------------------
// gh CLI
// ---------------------------------------------------------------------------

/// Reads files through `gh api`.
///
/// Each call is bounded by the same timeout as registry requests; a `gh`
/// that outlives it is killed and the attempt counts as a miss.
#[derive(Debug, Clone)]
pub struct GhCli {
    program: String,
    timeout: Duration,
}

impl GhCli {
    pub fn new() -> Self {
        Self::with_program("gh")
    }

    /// Use a different executable name or path.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            timeout: HTTP_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The API path requested for a file.
    pub fn api_path(location: &RepoLocation, filename: &str) -> String {
        format!(
            "/repos/{}/{}/contents/{}",
            location.owner,
            location.repo,
            location.file_path(filename)
        )
    }
}

impl Default for GhCli {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FileSource for GhCli {
    fn mechanism(&self) -> SourceUsed {
        SourceUsed::GitHubTool
    }

    fn is_available(&self) -> bool {
        find_on_path(&self.program).is_some()
    }

    async fn fetch_file(&self, location: &RepoLocation, filename: &str) -> Option<Vec<u8>> {
        let api_path = Self::api_path(location, filename);

        let child = tokio::process::Command::new(&self.program)
            .args(["api", api_path.as_str(), "-H", "Accept: application/vnd.github.raw+json"])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn();

        let child = match child {
            Ok(child) => child,
            Err(e) => {
                tracing::debug!(path = %api_path, error = %e, "failed to run gh");
                return None;
            }
        };

        // On timeout the child is dropped and killed via `kill_on_drop`.
        match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(Ok(out)) if out.status.success() && !out.stdout.is_empty() => Some(out.stdout),
            Ok(Ok(out)) => {
                tracing::debug!(
                    path = %api_path,
                    status = ?out.status.code(),
                    "gh api returned no content"
                );
                None
            }
            Ok(Err(e)) => {
                tracing::debug!(path = %api_path, error = %e, "failed to wait for gh");
                None
            }
            Err(_) => {
                tracing::warn!(
                    path = %api_path,
                    timeout_secs = self.timeout.as_secs_f64(),
                    "gh api timed out"
                );
                None
            }
        }
    }
}

/// Locate an executable on `PATH`.
///
/// A program given with a directory component is checked as-is.
pub fn find_on_path(program: &str) -> Option<PathBuf> {
    let candidate = PathBuf::from(program);
    if candidate.components().count() > 1 {
        return candidate.is_file().then_some(candidate);
    }

    let path = std::env::var_os("PATH")?;
    std::env::split_paths(&path).find_map(|dir| {
        let full = dir.join(program);
        if full.is_file() {
            return Some(full);
        }
        if cfg!(windows) {
            let exe = dir.join(format!("{program}.exe"));
            if exe.is_file() {
                return Some(exe);
            }
        }
        None
    })
}

// ---------------------------------------------------------------------------
// Raw content
// ---------------------------------------------------------------------------

/// Reads files from the raw-content host without authentication.
#[derive(Debug, Clone)]
pub struct RawGitHub {
    base_url: String,
    branch: String,
    http: reqwest::Client,
}

impl RawGitHub {
    pub fn new(http: reqwest::Client) -> Self {
        Self::with_base_url(http, DEFAULT_RAW_BASE_URL)
    }

    /// Point at a different raw-content host.
    pub fn with_base_url(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            branch: DEFAULT_BRANCH.to_owned(),
            http,
        }
    }

    /// The URL requested for a file.
    pub fn file_url(&self, location: &RepoLocation, filename: &str) -> String {
        format!(
            "{}/{}/{}/{}/{}",
            self.base_url,
            location.owner,
            location.repo,
            self.branch,
            location.file_path(filename)
        )
    }
}

#[async_trait]
impl FileSource for RawGitHub {
    fn mechanism(&self) -> SourceUsed {
        SourceUsed::GitHubRaw
    }

    async fn fetch_file(&self, location: &RepoLocation, filename: &str) -> Option<Vec<u8>> {
        let url = self.file_url(location, filename);

        let response = match self.http.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!(url = %url, error = %e, "raw fetch failed");
                return None;
            }
        };

        if response.status() != reqwest::StatusCode::OK {
            tracing::debug!(url = %url, status = %response.status(), "raw fetch miss");
            return None;
        }

        match response.bytes().await {
            Ok(body) => Some(body.to_vec()),
            Err(e) => {
                tracing::debug!(url = %url, error = %e, "failed to read raw body");
                None
            }
        }
    }
}
