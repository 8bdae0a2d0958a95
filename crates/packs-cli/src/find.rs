//! `packs find` -- search the registry.
//!
//! When the registry cannot be reached the bundled offline catalog is
//! searched instead. That mode is always announced: a warning on stderr,
//! an "(offline mode)" header in the table, and `"source": "offline"` on
//! every JSON entry. A registry that answers with zero results is shown
//! as zero results.

use std::io::Write;

use anyhow::{Context, Result};
use packs_core::{PackRegistry, PackSummary, SearchOptions, SearchPage, offline};
use serde::Serialize;

use crate::helpers::{App, Theme};

/// Where a result page came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
enum Source {
    Registry,
    Offline,
}

#[derive(Serialize)]
struct JsonEntry<'a> {
    #[serde(flatten)]
    pack: &'a PackSummary,
    source: Source,
}

pub async fn run(options: SearchOptions, json: bool) -> Result<()> {
    let app = App::load()?;

    let (page, source) = match app.registry().search(&options).await {
        Ok(page) => (page, Source::Registry),
        Err(e) if e.is_unavailable() => {
            tracing::debug!(error = %e, "registry search failed");
            eprintln!("warning: registry unreachable ({e}); searching the offline catalog");
            (offline::search(&options), Source::Offline)
        }
        Err(e) => return Err(e).context("search failed"),
    };

    let mut stdout = std::io::stdout().lock();
    if json {
        write_json(&mut stdout, &page, source)?;
    } else {
        write_table(&mut stdout, &page, source, &Theme::default())?;
    }
    Ok(())
}

fn write_json(out: &mut dyn Write, page: &SearchPage, source: Source) -> Result<()> {
    let entries: Vec<JsonEntry<'_>> = page
        .packs
        .iter()
        .map(|pack| JsonEntry { pack, source })
        .collect();
    serde_json::to_writer_pretty(&mut *out, &entries)?;
    writeln!(out)?;
    Ok(())
}

fn write_table(
    out: &mut dyn Write,
    page: &SearchPage,
    source: Source,
    theme: &Theme,
) -> Result<()> {
    if page.packs.is_empty() {
        writeln!(out, "No packs found.")?;
        return Ok(());
    }

    let count = page.packs.len();
    match source {
        Source::Registry => writeln!(out, "\n  Found {count} packs (total: {}):\n", page.total)?,
        Source::Offline => writeln!(out, "\n  Found {count} packs (offline mode):\n")?,
    }

    for pack in &page.packs {
        writeln!(
            out,
            "  {} {:<name_w$} {:<version_w$}  ★ {:<stars_w$}  {}",
            theme.icon(pack.pack_type),
            pack.name,
            pack.version,
            pack.stars,
            theme.truncate(&pack.description, theme.description_width),
            name_w = theme.name_width,
            version_w = theme.version_width,
            stars_w = theme.stars_width,
        )?;
    }

    writeln!(out, "\n  Run: packs get <name> to install\n")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use packs_core::PackType;

    fn page() -> SearchPage {
        SearchPage {
            packs: vec![PackSummary {
                name: "react-query".into(),
                version: "2.1.0".into(),
                pack_type: PackType::Context,
                description: "React Query patterns and best practices".into(),
                author: "tunajam".into(),
                stars: 1247,
                tags: vec!["react".into()],
            }],
            total: 9,
        }
    }

    fn render_json(page: &SearchPage, source: Source) -> serde_json::Value {
        let mut out = Vec::new();
        write_json(&mut out, page, source).unwrap();
        serde_json::from_slice(&out).unwrap()
    }

    fn render_table(page: &SearchPage, source: Source) -> String {
        let mut out = Vec::new();
        write_table(&mut out, page, source, &Theme::default()).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn json_entries_are_flat_and_labelled() {
        let json = render_json(&page(), Source::Registry);
        assert_eq!(json[0]["name"], "react-query");
        assert_eq!(json[0]["type"], "context");
        assert_eq!(json[0]["stars"], 1247);
        assert_eq!(json[0]["tags"][0], "react");
        assert_eq!(json[0]["source"], "registry");
    }

    #[test]
    fn offline_json_is_labelled_offline() {
        let json = render_json(&offline::search(&SearchOptions::default()), Source::Offline);
        let entries = json.as_array().unwrap();
        assert_eq!(entries.len(), 12);
        assert!(entries.iter().all(|e| e["source"] == "offline"));
    }

    #[test]
    fn empty_registry_result_stays_empty() {
        assert_eq!(render_json(&SearchPage::default(), Source::Registry), serde_json::json!([]));
        assert_eq!(render_table(&SearchPage::default(), Source::Registry), "No packs found.\n");
    }

    #[test]
    fn table_rows() {
        let table = render_table(&page(), Source::Registry);
        assert!(table.contains("Found 1 packs (total: 9)"));
        assert!(table.contains("📚 react-query              2.1.0     ★ 1247  React Query patterns"));
        assert!(table.contains("packs get <name>"));
    }

    #[test]
    fn offline_table_is_announced() {
        let table = render_table(&page(), Source::Offline);
        assert!(table.contains("(offline mode)"));
    }
}
