//! `packs get` -- fetch a pack and install it, or print it when piped.

use std::path::PathBuf;

use anyhow::Result;
use packs_core::{InstallDecision, InstallMode, InstallOptions, parse};

use crate::helpers::App;

pub async fn run(
    reference: &str,
    output: Option<PathBuf>,
    install: bool,
    force: bool,
) -> Result<()> {
    let app = App::load()?;
    let reference = parse(reference);
    tracing::debug!(reference = %reference, kind = ?reference.source_kind, "resolving");

    let fetched = app.resolver().resolve(&reference).await?;

    let installer = app.installer();
    let options = InstallOptions {
        output_dir: output,
        force_install: install,
        force_overwrite: force,
    };
    let decision = installer.decide(&fetched, &options)?;

    {
        let mut stdout = std::io::stdout().lock();
        installer.execute(&decision, &fetched.content, &mut stdout)?;
    }

    if let Some(line) = confirmation(&fetched.resolved_name, &decision) {
        println!("{line}");
    }
    Ok(())
}

/// The line printed after a disk install.
fn confirmation(name: &str, decision: &InstallDecision) -> Option<String> {
    if decision.mode != InstallMode::WriteToDisk {
        return None;
    }
    let dir = decision.pack_dir()?;
    let verb = if decision.overwritten {
        "Reinstalled"
    } else {
        "Installed"
    };
    Some(format!("✓ {verb} {name} to {}", dir.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use packs_core::{AgentProbe, FetchResult, Installer, SourceUsed};

    fn decide(tty: bool, dir: &std::path::Path, force: bool) -> InstallDecision {
        let fetched = FetchResult {
            content: b"x".to_vec(),
            resolved_name: "humanizer".into(),
            source_used: SourceUsed::Registry,
            filename: None,
        };
        Installer::new(tty, AgentProbe::new(dir, dir))
            .with_skills_dir(Some(dir.into()))
            .decide(
                &fetched,
                &InstallOptions {
                    force_overwrite: force,
                    ..Default::default()
                },
            )
            .unwrap()
    }

    #[test]
    fn printed_content_gets_no_confirmation() {
        let dir = std::env::temp_dir();
        assert!(confirmation("humanizer", &decide(false, &dir, false)).is_none());
    }

    #[test]
    fn disk_install_names_pack_dir() {
        let dir = PathBuf::from("/nonexistent/skills");
        let line = confirmation("humanizer", &decide(true, &dir, false)).unwrap();
        assert_eq!(
            line,
            format!("✓ Installed humanizer to {}", dir.join("humanizer").display())
        );
    }
}
