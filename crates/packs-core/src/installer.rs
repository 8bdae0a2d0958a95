//! Pack installation.
//!
//! Installation is split in two: [`Installer::decide`] works out where the
//! content should go, and [`Installer::execute`] carries that out. When
//! stdout is piped and nothing asked for a disk install, content is printed
//! instead of written, so `packs get foo | pbcopy` just works.
//!
//! Installed packs always land at `<skills-dir>/<name>/SKILL.md`, whatever
//! filename the content was fetched as.

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::detect::AgentProbe;
use crate::error::{PackError, Result};
use crate::types::FetchResult;

/// Filename every installed pack is written under.
pub const INSTALLED_FILENAME: &str = "SKILL.md";

/// Where the content goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallMode {
    PrintToStdout,
    WriteToDisk,
}

/// The installer's verdict for one fetch result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallDecision {
    pub mode: InstallMode,
    /// Full path of the installed content file, when writing to disk.
    pub destination_path: Option<PathBuf>,
    /// The pack directory already existed and will be overwritten.
    pub overwritten: bool,
    allow_overwrite: bool,
}

impl InstallDecision {
    /// The pack directory (`<skills-dir>/<name>`), when writing to disk.
    pub fn pack_dir(&self) -> Option<&Path> {
        self.destination_path.as_deref().and_then(Path::parent)
    }
}

/// Flags from the `get` command.
#[derive(Debug, Clone, Default)]
pub struct InstallOptions {
    /// Install under this directory instead of the detected one.
    pub output_dir: Option<PathBuf>,
    /// Write to disk even when stdout is piped.
    pub force_install: bool,
    /// Replace an existing pack directory.
    pub force_overwrite: bool,
}

/// Decides and performs pack installation.
#[derive(Debug, Clone)]
pub struct Installer {
    stdout_is_terminal: bool,
    configured_skills_dir: Option<PathBuf>,
    probe: AgentProbe,
}

impl Installer {
    pub fn new(stdout_is_terminal: bool, probe: AgentProbe) -> Self {
        Self {
            stdout_is_terminal,
            configured_skills_dir: None,
            probe,
        }
    }

    /// Use a fixed skills directory instead of probing for one.
    pub fn with_skills_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.configured_skills_dir = dir;
        self
    }

    /// The directory packs go to when no output dir is given.
    pub fn skills_dir(&self) -> PathBuf {
        match &self.configured_skills_dir {
            Some(dir) => dir.clone(),
            None => self.probe.skills_dir(),
        }
    }

    /// Work out what to do with `result`.
    ///
    /// A disk install fails with [`PackError::InvalidName`] when the resolved
    /// name is not a single plain path segment.
    pub fn decide(
        &self,
        result: &FetchResult,
        options: &InstallOptions,
    ) -> Result<InstallDecision> {
        if !self.stdout_is_terminal && options.output_dir.is_none() && !options.force_install {
            return Ok(InstallDecision {
                mode: InstallMode::PrintToStdout,
                destination_path: None,
                overwritten: false,
                allow_overwrite: options.force_overwrite,
            });
        }

        validate_name(&result.resolved_name)?;

        let base = match &options.output_dir {
            Some(dir) => dir.clone(),
            None => self.skills_dir(),
        };
        let pack_dir = base.join(&result.resolved_name);
        let overwritten = options.force_overwrite && pack_dir.exists();

        Ok(InstallDecision {
            mode: InstallMode::WriteToDisk,
            destination_path: Some(pack_dir.join(INSTALLED_FILENAME)),
            overwritten,
            allow_overwrite: options.force_overwrite,
        })
    }

    /// Carry out `decision`, printing `content` to `stdout` or writing it
    /// to disk.
    ///
    /// An existing pack directory without overwrite permission fails with
    /// [`PackError::AlreadyExists`] before anything is written.
    pub fn execute(
        &self,
        decision: &InstallDecision,
        content: &[u8],
        stdout: &mut dyn Write,
    ) -> Result<()> {
        let destination = match (decision.mode, &decision.destination_path) {
            (InstallMode::PrintToStdout, _) => {
                stdout
                    .write_all(content)
                    .and_then(|()| stdout.flush())
                    .map_err(|e| PackError::io("failed to write to stdout", e))?;
                return Ok(());
            }
            (InstallMode::WriteToDisk, Some(path)) => path,
            (InstallMode::WriteToDisk, None) => {
                return Err(PackError::io(
                    "install destination missing",
                    std::io::Error::from(std::io::ErrorKind::InvalidInput),
                ));
            }
        };

        let pack_dir = decision.pack_dir().unwrap_or(destination.as_path());
        if pack_dir.exists() && !decision.allow_overwrite {
            return Err(PackError::AlreadyExists {
                path: pack_dir.to_path_buf(),
            });
        }

        std::fs::create_dir_all(pack_dir).map_err(|e| {
            PackError::io(
                format!("failed to create directory {}", pack_dir.display()),
                e,
            )
        })?;

        std::fs::write(destination, content).map_err(|e| {
            PackError::io(format!("failed to write {}", destination.display()), e)
        })?;

        tracing::info!(
            path = %destination.display(),
            overwritten = decision.overwritten,
            "pack installed"
        );
        Ok(())
    }
}

/// A pack name becomes one directory under the skills dir, so it must not
/// be empty, `.`/`..`, or contain a separator.
fn validate_name(name: &str) -> Result<()> {
    let bad = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\'])
        || name.contains('\0');
    if bad {
        return Err(PackError::InvalidName {
            name: name.to_owned(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SourceUsed;

    fn result(name: &str, content: &str) -> FetchResult {
        FetchResult {
            content: content.as_bytes().to_vec(),
            resolved_name: name.to_owned(),
            source_used: SourceUsed::Registry,
            filename: None,
        }
    }

    fn installer(tty: bool, skills: &Path) -> Installer {
        Installer::new(tty, AgentProbe::new(skills, skills)).with_skills_dir(Some(skills.into()))
    }

    #[test]
    fn piped_without_flags_prints() {
        let tmp = tempfile::tempdir().unwrap();
        let decision = installer(false, tmp.path())
            .decide(&result("commit-message", "x"), &InstallOptions::default())
            .unwrap();
        assert_eq!(decision.mode, InstallMode::PrintToStdout);
        assert!(decision.destination_path.is_none());
    }

    #[test]
    fn piped_prints_even_when_destination_exists() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir(tmp.path().join("commit-message")).unwrap();
        let decision = installer(false, tmp.path())
            .decide(&result("commit-message", "x"), &InstallOptions::default())
            .unwrap();
        assert_eq!(decision.mode, InstallMode::PrintToStdout);
    }

    #[test]
    fn piped_with_install_flag_writes() {
        let tmp = tempfile::tempdir().unwrap();
        let options = InstallOptions {
            force_install: true,
            ..Default::default()
        };
        let decision = installer(false, tmp.path())
            .decide(&result("humanizer", "x"), &options)
            .unwrap();
        assert_eq!(decision.mode, InstallMode::WriteToDisk);
        assert_eq!(
            decision.destination_path,
            Some(tmp.path().join("humanizer").join("SKILL.md"))
        );
    }

    #[test]
    fn piped_with_output_dir_writes_there() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("my-skills");
        let options = InstallOptions {
            output_dir: Some(out.clone()),
            ..Default::default()
        };
        let decision = installer(false, tmp.path())
            .decide(&result("humanizer", "x"), &options)
            .unwrap();
        assert_eq!(decision.mode, InstallMode::WriteToDisk);
        assert_eq!(decision.pack_dir(), Some(out.join("humanizer").as_path()));
    }

    #[test]
    fn terminal_writes_to_detected_dir_when_unconfigured() {
        let home = tempfile::tempdir().unwrap();
        let cwd = tempfile::tempdir().unwrap();
        std::fs::create_dir(home.path().join(".claude")).unwrap();

        let installer = Installer::new(true, AgentProbe::new(home.path(), cwd.path()));
        let decision = installer
            .decide(&result("docx", "x"), &InstallOptions::default())
            .unwrap();
        assert_eq!(
            decision.destination_path,
            Some(home.path().join(".claude/skills/docx/SKILL.md"))
        );
    }

    #[test]
    fn execute_print_writes_content_only() {
        let tmp = tempfile::tempdir().unwrap();
        let installer = installer(false, tmp.path());
        let fetched = result("commit-message", "# Commit\n");
        let decision = installer
            .decide(&fetched, &InstallOptions::default())
            .unwrap();

        let mut out = Vec::new();
        installer.execute(&decision, &fetched.content, &mut out).unwrap();
        assert_eq!(out, b"# Commit\n");
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0);
    }

    #[test]
    fn execute_creates_nested_dirs() {
        let tmp = tempfile::tempdir().unwrap();
        let skills = tmp.path().join("a/b/skills");
        let installer = installer(true, &skills);
        let fetched = result("commit-message", "content");
        let decision = installer
            .decide(&fetched, &InstallOptions::default())
            .unwrap();

        installer
            .execute(&decision, &fetched.content, &mut std::io::sink())
            .unwrap();
        assert_eq!(
            std::fs::read_to_string(skills.join("commit-message/SKILL.md")).unwrap(),
            "content"
        );
        assert!(!decision.overwritten);
    }

    #[test]
    fn existing_dir_without_force_fails_without_writing() {
        let tmp = tempfile::tempdir().unwrap();
        let pack_dir = tmp.path().join("commit-message");
        std::fs::create_dir(&pack_dir).unwrap();

        let installer = installer(true, tmp.path());
        let fetched = result("commit-message", "new");
        let decision = installer
            .decide(&fetched, &InstallOptions::default())
            .unwrap();

        for _ in 0..2 {
            let err = installer
                .execute(&decision, &fetched.content, &mut std::io::sink())
                .unwrap_err();
            assert!(matches!(err, PackError::AlreadyExists { ref path } if *path == pack_dir));
            assert_eq!(std::fs::read_dir(&pack_dir).unwrap().count(), 0);
        }
    }

    #[test]
    fn existing_dir_with_force_is_overwritten() {
        let tmp = tempfile::tempdir().unwrap();
        let pack_dir = tmp.path().join("commit-message");
        std::fs::create_dir(&pack_dir).unwrap();
        std::fs::write(pack_dir.join("SKILL.md"), "old").unwrap();

        let installer = installer(true, tmp.path());
        let fetched = result("commit-message", "new");
        let options = InstallOptions {
            force_overwrite: true,
            ..Default::default()
        };
        let decision = installer.decide(&fetched, &options).unwrap();
        assert!(decision.overwritten);

        installer
            .execute(&decision, &fetched.content, &mut std::io::sink())
            .unwrap();
        assert_eq!(
            std::fs::read_to_string(pack_dir.join("SKILL.md")).unwrap(),
            "new"
        );
    }

    #[test]
    fn names_that_escape_the_skills_dir_are_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let skills = tmp.path().join("skills");
        let installer = installer(true, &skills);

        for name in ["../escaped", "a/b", "a\\b", "..", "."] {
            let err = installer
                .decide(&result(name, "x"), &InstallOptions::default())
                .unwrap_err();
            assert!(matches!(err, PackError::InvalidName { .. }), "{name}");
        }
        assert!(!tmp.path().join("escaped").exists());
    }

    #[test]
    fn empty_name_never_targets_the_skills_root() {
        let tmp = tempfile::tempdir().unwrap();
        let installer = installer(true, tmp.path());
        let options = InstallOptions {
            force_overwrite: true,
            ..Default::default()
        };

        let err = installer.decide(&result("", "x"), &options).unwrap_err();
        assert!(matches!(err, PackError::InvalidName { ref name } if name.is_empty()));
        assert!(!tmp.path().join("SKILL.md").exists());
    }

    #[test]
    fn printing_does_not_care_about_the_name() {
        let tmp = tempfile::tempdir().unwrap();
        let decision = installer(false, tmp.path())
            .decide(&result("", "x"), &InstallOptions::default())
            .unwrap();
        assert_eq!(decision.mode, InstallMode::PrintToStdout);
    }
}
