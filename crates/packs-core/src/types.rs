//! Shared pack types.
//!
//! A pack is a single markdown content file (`SKILL.md`, `CONTEXT.md` or
//! `PROMPT.md`) plus registry metadata. Everything here is created per
//! invocation and never persisted.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The kind of content a pack carries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackType {
    /// Procedural instructions (how to do X).
    Skill,
    /// Domain knowledge (what is X).
    Context,
    /// Ready-to-use prompts.
    Prompt,
    #[default]
    Unknown,
}

impl PackType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Skill => "skill",
            Self::Context => "context",
            Self::Prompt => "prompt",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for PackType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PackType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "skill" => Ok(Self::Skill),
            "context" => Ok(Self::Context),
            "prompt" => Ok(Self::Prompt),
            other => Err(format!(
                "unknown pack type `{other}` (expected skill, context or prompt)"
            )),
        }
    }
}

/// Which fetch mechanism produced the content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceUsed {
    /// The packs registry `Get` call.
    Registry,
    /// The authenticated `gh` helper tool.
    GitHubTool,
    /// Unauthenticated raw-content HTTP.
    GitHubRaw,
}

impl SourceUsed {
    /// Stable label used in telemetry events and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Registry => "registry",
            Self::GitHubTool => "github-gh",
            Self::GitHubRaw => "github-raw",
        }
    }
}

impl fmt::Display for SourceUsed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a successful content retrieval.
#[derive(Debug, Clone)]
pub struct FetchResult {
    /// Raw markdown of the pack's content file.
    pub content: Vec<u8>,

    /// The pack's installable short name.
    pub resolved_name: String,

    /// Mechanism that succeeded.
    pub source_used: SourceUsed,

    /// Candidate filename that produced the content (GitHub sources only).
    pub filename: Option<String>,
}

/// A pack as listed in search results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackSummary {
    pub name: String,
    pub version: String,
    #[serde(rename = "type")]
    pub pack_type: PackType,
    pub description: String,
    pub author: String,
    pub stars: i32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

/// A full pack including its content.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pack {
    pub summary: PackSummary,
    pub content: String,
    pub github_ref: Option<String>,
}

/// Result ordering for registry searches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    Relevance,
    #[default]
    Stars,
    Newest,
    Name,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Relevance => "relevance",
            Self::Stars => "stars",
            Self::Newest => "newest",
            Self::Name => "name",
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "relevance" => Ok(Self::Relevance),
            "stars" => Ok(Self::Stars),
            "newest" => Ok(Self::Newest),
            "name" => Ok(Self::Name),
            other => Err(format!(
                "unknown sort order `{other}` (expected relevance, stars, newest or name)"
            )),
        }
    }
}

/// Parameters for a registry search.
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    pub query: String,
    pub pack_type: Option<PackType>,
    pub tags: Vec<String>,
    pub author: Option<String>,
    pub limit: i32,
    pub offset: i32,
    pub sort: SortOrder,
}

/// A page of search results.
#[derive(Debug, Clone, Default)]
pub struct SearchPage {
    pub packs: Vec<PackSummary>,
    pub total: i32,
}
