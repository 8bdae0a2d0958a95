//! Pack reference parsing.
//!
//! Accepted spellings:
//!
//! ```text
//! commit-message              registry, latest version
//! commit-message@1.0.0        registry, pinned version
//! @user/repo/path/to/pack     GitHub shorthand
//! gh:user/repo/path/to/pack   GitHub explicit
//! ```
//!
//! Parsing never fails. A GitHub reference with fewer than two segments is
//! accepted here and rejected by the fetcher.

use std::fmt;

/// Version used when a registry reference carries no `@version`.
pub const LATEST: &str = "latest";

const GITHUB_PREFIX: &str = "gh:";

/// How a reference is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Registry,
    GitHubDirect,
}

/// A parsed pack reference.
#[derive(Debug, Clone, Eq)]
pub struct PackReference {
    /// The string as typed.
    pub raw_input: String,
    pub source_kind: SourceKind,
    /// Registry name, or the installable name derived from the GitHub path.
    pub name: String,
    /// Always set for registry references, never for GitHub ones.
    pub version: Option<String>,
    pub github_owner: Option<String>,
    pub github_repo: Option<String>,
    pub github_path: Option<String>,
}

/// Two references are equal when they resolve to the same source.
/// `raw_input` is informational and does not take part in the comparison.
impl PartialEq for PackReference {
    fn eq(&self, other: &Self) -> bool {
        self.source_kind == other.source_kind
            && self.name == other.name
            && self.version == other.version
            && self.github_owner == other.github_owner
            && self.github_repo == other.github_repo
            && self.github_path == other.github_path
    }
}

/// Parse a raw pack identifier.
pub fn parse(raw_input: &str) -> PackReference {
    let normalized = match raw_input.strip_prefix('@') {
        Some(rest) => format!("{GITHUB_PREFIX}{rest}"),
        None => raw_input.to_owned(),
    };

    match normalized.strip_prefix(GITHUB_PREFIX) {
        Some(rest) => parse_github(raw_input, rest),
        None => parse_registry(raw_input, &normalized),
    }
}

fn parse_github(raw_input: &str, rest: &str) -> PackReference {
    let mut parts = rest.splitn(3, '/');
    let owner = parts.next().unwrap_or_default().to_owned();
    let repo = parts.next().map(str::to_owned);
    let path = parts
        .next()
        .map(|p| p.trim_end_matches('/'))
        .filter(|p| !p.is_empty())
        .map(str::to_owned);

    let name = match (&path, &repo) {
        (Some(path), _) => path.rsplit('/').next().unwrap_or(path).to_owned(),
        (None, Some(repo)) => repo.clone(),
        (None, None) => owner.clone(),
    };

    PackReference {
        raw_input: raw_input.to_owned(),
        source_kind: SourceKind::GitHubDirect,
        name,
        version: None,
        github_owner: Some(owner),
        github_repo: repo,
        github_path: path,
    }
}

fn parse_registry(raw_input: &str, input: &str) -> PackReference {
    let (name, version) = match input.split_once('@') {
        Some((name, version)) => (name, version),
        None => (input, LATEST),
    };

    PackReference {
        raw_input: raw_input.to_owned(),
        source_kind: SourceKind::Registry,
        name: name.to_owned(),
        version: Some(version.to_owned()),
        github_owner: None,
        github_repo: None,
        github_path: None,
    }
}

impl PackReference {
    /// Build a GitHub-direct reference from its parts.
    pub fn github(owner: &str, repo: &str, path: Option<&str>) -> Self {
        let raw = match path {
            Some(path) => format!("{GITHUB_PREFIX}{owner}/{repo}/{path}"),
            None => format!("{GITHUB_PREFIX}{owner}/{repo}"),
        };
        parse(&raw)
    }

    pub fn is_github(&self) -> bool {
        self.source_kind == SourceKind::GitHubDirect
    }

    /// The version to request from the registry.
    pub fn version_or_latest(&self) -> &str {
        self.version.as_deref().unwrap_or(LATEST)
    }

    /// `owner/repo[/path]` for GitHub references.
    ///
    /// Returns `None` for registry references and for GitHub references
    /// missing the repository segment.
    pub fn github_ref(&self) -> Option<String> {
        let owner = self.github_owner.as_deref().filter(|o| !o.is_empty())?;
        let repo = self.github_repo.as_deref().filter(|r| !r.is_empty())?;
        Some(match &self.github_path {
            Some(path) => format!("{owner}/{repo}/{path}"),
            None => format!("{owner}/{repo}"),
        })
    }
}

impl fmt::Display for PackReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.source_kind {
            SourceKind::Registry => write!(f, "{}@{}", self.name, self.version_or_latest()),
            SourceKind::GitHubDirect => match self.github_ref() {
                Some(r) => write!(f, "{GITHUB_PREFIX}{r}"),
                None => f.write_str(&self.raw_input),
            },
        }
    }
}
