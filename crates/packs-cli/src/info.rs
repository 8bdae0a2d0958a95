//! `packs info` -- show registry metadata for one pack.

use std::io::Write;

use anyhow::{Result, bail};
use packs_core::{Pack, PackError, PackRegistry, PackSummary, parse};
use serde::Serialize;

use crate::helpers::{App, Theme};

#[derive(Serialize)]
struct JsonInfo<'a> {
    #[serde(flatten)]
    summary: &'a PackSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    github_ref: Option<&'a str>,
}

pub async fn run(input: &str, json: bool) -> Result<()> {
    let reference = parse(input);
    if reference.is_github() {
        bail!("info looks up registry packs (name or name@version), got `{input}`");
    }

    let app = App::load()?;
    let version = reference.version_or_latest();
    let pack = match app.registry().get(&reference.name, version).await {
        Ok(pack) => pack,
        Err(e) if e.is_not_found() => {
            return Err(PackError::NotFound {
                reference: reference.to_string(),
                tried: vec!["registry".to_owned()],
            }
            .into());
        }
        Err(e) => return Err(e.into()),
    };

    let mut stdout = std::io::stdout().lock();
    if json {
        write_json(&mut stdout, &pack)
    } else {
        write_details(&mut stdout, &pack, &Theme::default())
    }
}

fn write_json(out: &mut dyn Write, pack: &Pack) -> Result<()> {
    let info = JsonInfo {
        summary: &pack.summary,
        github_ref: pack.github_ref.as_deref(),
    };
    serde_json::to_writer_pretty(&mut *out, &info)?;
    writeln!(out)?;
    Ok(())
}

fn write_details(out: &mut dyn Write, pack: &Pack, theme: &Theme) -> Result<()> {
    let s = &pack.summary;
    let w = theme.label_width;

    writeln!(out, "\n  {} {}", theme.icon(s.pack_type), s.name)?;
    writeln!(out, "  {}\n", theme.rule())?;
    writeln!(out, "  {:<w$} {}", "Version:", s.version)?;
    writeln!(out, "  {:<w$} {}", "Type:", s.pack_type)?;
    writeln!(out, "  {:<w$} {}", "Author:", s.author)?;
    writeln!(out, "  {:<w$} ★ {}", "Stars:", s.stars)?;
    if let Some(github_ref) = &pack.github_ref {
        writeln!(out, "  {:<w$} gh:{github_ref}", "Source:")?;
    }
    if !s.description.is_empty() {
        writeln!(out, "\n  {}", s.description)?;
    }
    if !s.tags.is_empty() {
        writeln!(out, "\n  Tags: {}", s.tags.join(", "))?;
    }
    writeln!(out, "\n  Install: packs get {}\n", s.name)?;
    Ok(())
}
