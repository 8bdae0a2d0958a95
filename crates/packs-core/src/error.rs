//! Error types for pack resolution and installation.

use std::path::PathBuf;

/// Errors surfaced by the resolve, fetch, and install steps.
#[derive(Debug, thiserror::Error)]
pub enum PackError {
    #[error(
        "invalid GitHub reference: `{reference}`\n\
         Expected format: @user/repo or @user/repo/path (or gh:user/repo/path)"
    )]
    InvalidReference { reference: String },

    #[error("pack not found: `{reference}`\nTried: {}", tried.join(", "))]
    NotFound {
        reference: String,
        tried: Vec<String>,
    },

    #[error("invalid pack name: `{name}`\nPack names must be a single path segment")]
    InvalidName { name: String },

    #[error("pack already exists: {}\nUse --force to overwrite", path.display())]
    AlreadyExists { path: PathBuf },

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("registry error ({code}): {message}")]
    Registry { code: String, message: String },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error in `{}`: {reason}", path.display())]
    Config { path: PathBuf, reason: String },
}

impl PackError {
    /// Wrap an I/O error with a short description of what was being done.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Whether this error means the requested pack does not exist upstream.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } => true,
            Self::Registry { code, .. } => code == "not_found",
            _ => false,
        }
    }

    /// Whether the registry could not be reached or could not answer.
    pub fn is_unavailable(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Registry { code, .. } => code == "unavailable",
            _ => false,
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, PackError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_lists_tried_filenames() {
        let err = PackError::NotFound {
            reference: "user/repo/pack".into(),
            tried: vec!["SKILL.md".into(), "CONTEXT.md".into(), "PROMPT.md".into()],
        };
        let msg = err.to_string();
        assert!(msg.contains("user/repo/pack"));
        assert!(msg.contains("Tried: SKILL.md, CONTEXT.md, PROMPT.md"));
    }

    #[test]
    fn already_exists_suggests_force() {
        let err = PackError::AlreadyExists {
            path: PathBuf::from("/tmp/skills/commit-message"),
        };
        assert!(err.to_string().contains("--force"));
    }

    #[test]
    fn invalid_reference_states_expected_syntax() {
        let err = PackError::InvalidReference {
            reference: "onlyowner".into(),
        };
        assert!(err.to_string().contains("@user/repo/path"));
    }

    #[test]
    fn registry_not_found_code_is_not_found() {
        let err = PackError::Registry {
            code: "not_found".into(),
            message: "no such pack".into(),
        };
        assert!(err.is_not_found());

        let err = PackError::Registry {
            code: "unavailable".into(),
            message: "down".into(),
        };
        assert!(!err.is_not_found());
        assert!(err.is_unavailable());
    }

    #[test]
    fn missing_pack_is_not_unavailable() {
        let err = PackError::Registry {
            code: "not_found".into(),
            message: "no such pack".into(),
        };
        assert!(!err.is_unavailable());
    }
}
