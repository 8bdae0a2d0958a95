//! Built-in catalog for offline search.
//!
//! Used only when the registry cannot be reached. Results from here are
//! always labelled as offline by the caller and never stand in for a
//! successful, empty registry response.

use crate::types::{PackSummary, PackType, SearchOptions, SearchPage, SortOrder};

fn entry(
    name: &str,
    version: &str,
    pack_type: PackType,
    description: &str,
    author: &str,
    stars: i32,
) -> PackSummary {
    PackSummary {
        name: name.to_owned(),
        version: version.to_owned(),
        pack_type,
        description: description.to_owned(),
        author: author.to_owned(),
        stars,
        tags: Vec::new(),
    }
}

/// The bundled catalog.
#[rustfmt::skip]
pub fn catalog() -> Vec<PackSummary> {
    use PackType::{Context, Skill};

    vec![
        entry("commit-message", "1.0.0", Skill, "Generate conventional commit messages", "tunajam", 892),
        entry("pr-description", "1.0.0", Skill, "Write PR descriptions from branch diff", "tunajam", 654),
        entry("humanizer", "1.0.0", Skill, "Remove AI patterns from writing", "blader", 543),
        entry("claudeception", "1.0.0", Skill, "Extract learnings into reusable skills", "blader", 421),
        entry("test-driven-development", "1.0.0", Skill, "TDD workflow for features and bugfixes", "obra", 389),
        entry("brainstorming", "1.0.0", Skill, "Structured ideation and design exploration", "obra", 312),
        entry("changelog-generator", "1.0.0", Skill, "Generate changelogs from git history", "composio", 287),
        entry("git-worktrees", "1.0.0", Skill, "Work with isolated git worktrees", "obra", 245),
        entry("react-query", "2.1.0", Context, "React Query patterns and best practices", "tunajam", 1247),
        entry("drizzle-orm", "1.0.0", Context, "Drizzle ORM conventions and patterns", "tunajam", 876),
        entry("mcp-builder", "1.0.0", Skill, "Build MCP servers for LLM integrations", "composio", 534),
        entry("youtube-transcript", "1.0.0", Skill, "Fetch and summarize YouTube transcripts", "tapestry", 423),
    ]
}

/// Search the bundled catalog with the same options the registry takes.
pub fn search(options: &SearchOptions) -> SearchPage {
    let query = options.query.to_lowercase();

    let mut packs: Vec<PackSummary> = catalog()
        .into_iter()
        .filter(|p| {
            query.is_empty()
                || p.name.to_lowercase().contains(&query)
                || p.description.to_lowercase().contains(&query)
        })
        .filter(|p| options.pack_type.is_none_or(|t| p.pack_type == t))
        .filter(|p| {
            options
                .author
                .as_deref()
                .is_none_or(|a| p.author.eq_ignore_ascii_case(a))
        })
        .filter(|p| options.tags.iter().all(|t| p.tags.contains(t)))
        .collect();

    match options.sort {
        SortOrder::Stars => packs.sort_by(|a, b| b.stars.cmp(&a.stars)),
        SortOrder::Name => packs.sort_by(|a, b| a.name.cmp(&b.name)),
        SortOrder::Relevance | SortOrder::Newest => {}
    }

    let total = i32::try_from(packs.len()).unwrap_or(i32::MAX);
    let offset = usize::try_from(options.offset).unwrap_or(0);
    let packs = packs.into_iter().skip(offset);
    let packs = match usize::try_from(options.limit) {
        Ok(limit) if limit > 0 => packs.take(limit).collect(),
        _ => packs.collect(),
    };

    SearchPage { packs, total }
}
