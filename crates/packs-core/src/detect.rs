//! Agent skills directory detection.
//!
//! Each supported agent keeps skills in its own place. Detection probes for
//! marker directories and files in a fixed order and falls back to a
//! generic directory under the home directory.

use std::fmt;
use std::path::{Path, PathBuf};

/// Agent tooling whose skills directory convention is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Agent {
    /// `~/.claude/skills`
    ClaudeCode,
    /// `./skills` in the current workspace.
    Clawdbot,
    /// `~/.codex/skills`
    Codex,
    /// `~/.cursor/skills`
    Cursor,
    /// `~/.packs/skills`
    Generic,
}

impl fmt::Display for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ClaudeCode => "Claude Code",
            Self::Clawdbot => "Clawdbot",
            Self::Codex => "Codex",
            Self::Cursor => "Cursor",
            Self::Generic => "generic",
        })
    }
}

/// Probes a home directory and a working directory for agent markers.
#[derive(Debug, Clone)]
pub struct AgentProbe {
    home: PathBuf,
    cwd: PathBuf,
}

impl AgentProbe {
    pub fn new(home: impl Into<PathBuf>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            home: home.into(),
            cwd: cwd.into(),
        }
    }

    /// Probe the current user's home and the process working directory.
    pub fn from_env() -> Self {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let home = dirs::home_dir().unwrap_or_else(|| cwd.clone());
        Self::new(home, cwd)
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Detect the agent in use and its skills directory.
    pub fn detect(&self) -> (Agent, PathBuf) {
        if self.home.join(".claude").is_dir() {
            return (Agent::ClaudeCode, self.home.join(".claude").join("skills"));
        }

        if self.cwd.join("skills").is_dir()
            || self.cwd.join("AGENTS.md").is_file()
            || self.cwd.join("SOUL.md").is_file()
        {
            return (Agent::Clawdbot, self.cwd.join("skills"));
        }

        if self.home.join(".codex").is_dir() {
            return (Agent::Codex, self.home.join(".codex").join("skills"));
        }

        if self.home.join(".cursor").is_dir() {
            return (Agent::Cursor, self.home.join(".cursor").join("skills"));
        }

        (Agent::Generic, self.home.join(".packs").join("skills"))
    }

    /// Shorthand for the detected directory alone.
    pub fn skills_dir(&self) -> PathBuf {
        let (agent, dir) = self.detect();
        tracing::debug!(agent = %agent, dir = %dir.display(), "detected skills directory");
        dir
    }
}
