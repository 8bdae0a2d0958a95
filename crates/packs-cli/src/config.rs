//! `packs config` -- show the effective configuration, print the config file
//! path, or reset the file to defaults.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use packs_core::config::{current_config_path, reset as reset_file};
use packs_core::{Agent, AgentProbe, Origin, Settings};

use crate::helpers::Theme;

pub fn show() -> Result<()> {
    let settings = Settings::load()?;
    let detected = match settings.skills_dir {
        Some(_) => None,
        None => Some(AgentProbe::from_env().detect()),
    };

    let mut stdout = std::io::stdout().lock();
    write_settings(&mut stdout, &settings, detected, &Theme::default())
}

pub fn path() -> Result<()> {
    println!("{}", current_config_path().display());
    Ok(())
}

pub fn reset() -> Result<()> {
    let path = current_config_path();
    reset_file(&path).context("failed to reset configuration")?;
    println!("✓ Reset configuration to defaults: {}", path.display());
    Ok(())
}

fn origin_note(origin: Origin) -> &'static str {
    match origin {
        Origin::Default => "",
        Origin::File => " (from config)",
        Origin::Env => " (from env)",
    }
}

fn write_settings(
    out: &mut dyn Write,
    settings: &Settings,
    detected: Option<(Agent, PathBuf)>,
    theme: &Theme,
) -> Result<()> {
    let w = theme.label_width;
    let file_note = if settings.config_path.exists() {
        ""
    } else {
        " (not created)"
    };

    let skills = match (&settings.skills_dir, detected) {
        (Some(dir), _) => format!(
            "{}{}",
            dir.display(),
            origin_note(settings.skills_dir_origin)
        ),
        (None, Some((agent, dir))) => format!("{} (detected: {agent})", dir.display()),
        (None, None) => "(auto-detect)".to_owned(),
    };

    let telemetry = if settings.telemetry {
        "enabled"
    } else {
        "disabled"
    };

    let fallback = match &settings.fallback {
        Some(repo) => repo.to_string(),
        None => "disabled".to_owned(),
    };

    writeln!(out, "\n  {} packs configuration", theme.pack_icon)?;
    writeln!(out, "  {}\n", theme.rule())?;
    row(
        out,
        w,
        "Config file:",
        &format!("{}{file_note}", settings.config_path.display()),
    )?;
    row(
        out,
        w,
        "Registry:",
        &format!(
            "{}{}",
            settings.registry_url,
            origin_note(settings.registry_origin)
        ),
    )?;
    row(out, w, "Skills dir:", &skills)?;
    row(
        out,
        w,
        "Telemetry:",
        &format!("{telemetry}{}", origin_note(settings.telemetry_origin)),
    )?;
    row(out, w, "Fallback:", &fallback)?;
    writeln!(out)?;
    Ok(())
}

fn row(out: &mut dyn Write, width: usize, label: &str, value: &str) -> Result<()> {
    writeln!(out, "  {label:<width$} {value}")?;
    Ok(())
}
