//! Content fetching.
//!
//! A GitHub-direct reference is resolved by walking a fixed plan of
//! attempts: every available mechanism, in order, crossed with every content
//! filename, in order. The first attempt that yields content wins and the
//! rest are never tried.
//!
//! A registry reference is a single `Get` call. Falling back from the
//! registry to GitHub is the resolver's business, not the fetcher's.

use std::sync::Arc;

use crate::error::{PackError, Result};
use crate::github::{FileSource, GhCli, RawGitHub, RepoLocation};
use crate::reference::{PackReference, SourceKind};
use crate::registry::PackRegistry;
use crate::types::{FetchResult, SourceUsed};

/// Content filenames, in priority order.
pub const CONTENT_FILES: [&str; 3] = ["SKILL.md", "CONTEXT.md", "PROMPT.md"];

/// One step of a GitHub fetch plan.
#[derive(Clone, Copy)]
pub struct Attempt<'a> {
    pub source: &'a dyn FileSource,
    pub filename: &'static str,
}

impl std::fmt::Debug for Attempt<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Attempt")
            .field("mechanism", &self.source.mechanism())
            .field("filename", &self.filename)
            .finish()
    }
}

/// Run `attempts` in order and return the first `Some`.
pub async fn first_success<I, F, Fut, T>(attempts: I) -> Option<T>
where
    I: IntoIterator<Item = F>,
    F: FnOnce() -> Fut,
    Fut: std::future::Future<Output = Option<T>>,
{
    for attempt in attempts {
        if let Some(value) = attempt().await {
            return Some(value);
        }
    }
    None
}

/// Fetches pack content from GitHub through an ordered list of mechanisms.
pub struct GitHubFetcher {
    sources: Vec<Box<dyn FileSource>>,
}

impl GitHubFetcher {
    /// `gh` first, then unauthenticated raw content.
    pub fn new(http: reqwest::Client) -> Self {
        Self::with_sources(vec![Box::new(GhCli::new()), Box::new(RawGitHub::new(http))])
    }

    /// Use an explicit, ordered list of mechanisms.
    pub fn with_sources(sources: Vec<Box<dyn FileSource>>) -> Self {
        Self { sources }
    }

    /// The attempts a fetch would make, in order, skipping unavailable
    /// mechanisms.
    pub fn plan(&self) -> Vec<Attempt<'_>> {
        self.sources
            .iter()
            .filter(|s| {
                let available = s.is_available();
                if !available {
                    tracing::debug!(mechanism = %s.mechanism(), "mechanism unavailable");
                }
                available
            })
            .flat_map(|source| {
                CONTENT_FILES.into_iter().map(move |filename| Attempt {
                    source: source.as_ref(),
                    filename,
                })
            })
            .collect()
    }

    /// Fetch a GitHub-direct reference.
    pub async fn fetch(&self, reference: &PackReference) -> Result<FetchResult> {
        let location = location_of(reference)?;
        let plan = self.plan();

        let found = first_success(plan.iter().map(|attempt| {
            let location = &location;
            move || async move {
                tracing::debug!(
                    mechanism = %attempt.source.mechanism(),
                    file = %location.file_path(attempt.filename),
                    "trying"
                );
                attempt
                    .source
                    .fetch_file(location, attempt.filename)
                    .await
                    .map(|content| (content, attempt.source.mechanism(), attempt.filename))
            }
        }))
        .await;

        match found {
            Some((content, source_used, filename)) => {
                tracing::info!(
                    pack = %reference.name,
                    source = %source_used,
                    file = filename,
                    "fetched pack"
                );
                Ok(FetchResult {
                    content,
                    resolved_name: reference.name.clone(),
                    source_used,
                    filename: Some(filename.to_owned()),
                })
            }
            None => Err(PackError::NotFound {
                reference: reference.github_ref().unwrap_or_else(|| reference.name.clone()),
                tried: CONTENT_FILES.iter().map(|f| (*f).to_owned()).collect(),
            }),
        }
    }
}

fn location_of(reference: &PackReference) -> Result<RepoLocation> {
    let owner = reference.github_owner.as_deref().filter(|o| !o.is_empty());
    let repo = reference.github_repo.as_deref().filter(|r| !r.is_empty());

    match (owner, repo) {
        (Some(owner), Some(repo)) => Ok(RepoLocation {
            owner: owner.to_owned(),
            repo: repo.to_owned(),
            path: reference.github_path.clone(),
        }),
        _ => Err(PackError::InvalidReference {
            reference: reference.raw_input.clone(),
        }),
    }
}

/// Fetches any pack reference: registry references through the registry,
/// GitHub references through [`GitHubFetcher`].
pub struct Fetcher {
    registry: Arc<dyn PackRegistry>,
    github: GitHubFetcher,
}

impl Fetcher {
    pub fn new(registry: Arc<dyn PackRegistry>, github: GitHubFetcher) -> Self {
        Self { registry, github }
    }

    pub fn registry(&self) -> &Arc<dyn PackRegistry> {
        &self.registry
    }

    pub fn github(&self) -> &GitHubFetcher {
        &self.github
    }

    pub async fn fetch(&self, reference: &PackReference) -> Result<FetchResult> {
        match reference.source_kind {
            SourceKind::GitHubDirect => self.github.fetch(reference).await,
            SourceKind::Registry => {
                let version = reference.version_or_latest();
                let pack = self.registry.get(&reference.name, version).await?;
                tracing::info!(
                    pack = %pack.summary.name,
                    version = %pack.summary.version,
                    "fetched from registry"
                );
                let resolved_name = if pack.summary.name.is_empty() {
                    reference.name.clone()
                } else {
                    pack.summary.name
                };
                Ok(FetchResult {
                    content: pack.content.into_bytes(),
                    resolved_name,
                    source_used: SourceUsed::Registry,
                    filename: None,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::parse;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Serves the files it was given and records every request.
    struct FakeSource {
        mechanism: SourceUsed,
        available: bool,
        files: Vec<(&'static str, &'static str)>,
        calls: Arc<Mutex<Vec<String>>>,
    }

    impl FakeSource {
        fn new(
            mechanism: SourceUsed,
            files: Vec<(&'static str, &'static str)>,
            calls: &Arc<Mutex<Vec<String>>>,
        ) -> Self {
            Self {
                mechanism,
                available: true,
                files,
                calls: calls.clone(),
            }
        }
    }

    #[async_trait]
    impl FileSource for FakeSource {
        fn mechanism(&self) -> SourceUsed {
            self.mechanism
        }

        fn is_available(&self) -> bool {
            self.available
        }

        async fn fetch_file(&self, location: &RepoLocation, filename: &str) -> Option<Vec<u8>> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("{}:{}", self.mechanism, filename));
            let wanted = location.file_path(filename);
            self.files
                .iter()
                .find(|(path, _)| *path == wanted)
                .map(|(_, body)| body.as_bytes().to_vec())
        }
    }

    fn calls() -> Arc<Mutex<Vec<String>>> {
        Arc::new(Mutex::new(Vec::new()))
    }

    #[test]
    fn plan_is_mechanism_major_in_filename_order() {
        let log = calls();
        let fetcher = GitHubFetcher::with_sources(vec![
            Box::new(FakeSource::new(SourceUsed::GitHubTool, vec![], &log)),
            Box::new(FakeSource::new(SourceUsed::GitHubRaw, vec![], &log)),
        ]);
        let plan: Vec<_> = fetcher
            .plan()
            .iter()
            .map(|a| (a.source.mechanism(), a.filename))
            .collect();
        assert_eq!(
            plan,
            vec![
                (SourceUsed::GitHubTool, "SKILL.md"),
                (SourceUsed::GitHubTool, "CONTEXT.md"),
                (SourceUsed::GitHubTool, "PROMPT.md"),
                (SourceUsed::GitHubRaw, "SKILL.md"),
                (SourceUsed::GitHubRaw, "CONTEXT.md"),
                (SourceUsed::GitHubRaw, "PROMPT.md"),
            ]
        );
    }

    #[test]
    fn unavailable_mechanism_is_skipped() {
        let log = calls();
        let mut tool = FakeSource::new(SourceUsed::GitHubTool, vec![], &log);
        tool.available = false;
        let fetcher = GitHubFetcher::with_sources(vec![
            Box::new(tool),
            Box::new(FakeSource::new(SourceUsed::GitHubRaw, vec![], &log)),
        ]);
        let plan = fetcher.plan();
        assert_eq!(plan.len(), 3);
        assert!(plan.iter().all(|a| a.source.mechanism() == SourceUsed::GitHubRaw));
    }

    #[tokio::test]
    async fn context_md_short_circuits_before_prompt_md() {
        let log = calls();
        let fetcher = GitHubFetcher::with_sources(vec![Box::new(FakeSource::new(
            SourceUsed::GitHubRaw,
            vec![("docs/react-query/CONTEXT.md", "# React Query")],
            &log,
        ))]);

        let result = fetcher
            .fetch(&parse("gh:tunajam/packs/docs/react-query"))
            .await
            .unwrap();

        assert_eq!(result.content, b"# React Query");
        assert_eq!(result.filename.as_deref(), Some("CONTEXT.md"));
        assert_eq!(result.resolved_name, "react-query");
        assert_eq!(
            *log.lock().unwrap(),
            vec!["github-raw:SKILL.md", "github-raw:CONTEXT.md"]
        );
    }

    #[tokio::test]
    async fn tool_success_is_recorded_and_raw_never_tried() {
        let log = calls();
        let fetcher = GitHubFetcher::with_sources(vec![
            Box::new(FakeSource::new(
                SourceUsed::GitHubTool,
                vec![("commit-message/SKILL.md", "# Commit")],
                &log,
            )),
            Box::new(FakeSource::new(
                SourceUsed::GitHubRaw,
                vec![("commit-message/SKILL.md", "# Other")],
                &log,
            )),
        ]);

        let result = fetcher
            .fetch(&parse("@hsbacot/packs/commit-message"))
            .await
            .unwrap();
        assert_eq!(result.source_used, SourceUsed::GitHubTool);
        assert_eq!(result.content, b"# Commit");
        assert_eq!(*log.lock().unwrap(), vec!["github-gh:SKILL.md"]);
    }

    #[tokio::test]
    async fn tool_failure_falls_back_to_raw() {
        let log = calls();
        let fetcher = GitHubFetcher::with_sources(vec![
            Box::new(FakeSource::new(SourceUsed::GitHubTool, vec![], &log)),
            Box::new(FakeSource::new(
                SourceUsed::GitHubRaw,
                vec![("PROMPT.md", "prompt body")],
                &log,
            )),
        ]);

        let result = fetcher.fetch(&parse("gh:user/prompts")).await.unwrap();
        assert_eq!(result.source_used, SourceUsed::GitHubRaw);
        assert_eq!(result.resolved_name, "prompts");
        assert_eq!(log.lock().unwrap().len(), 6);
    }

    #[tokio::test]
    async fn exhausted_plan_is_not_found_listing_files() {
        let log = calls();
        let fetcher = GitHubFetcher::with_sources(vec![Box::new(FakeSource::new(
            SourceUsed::GitHubRaw,
            vec![],
            &log,
        ))]);

        let err = fetcher.fetch(&parse("@user/repo/missing")).await.unwrap_err();
        match &err {
            PackError::NotFound { reference, tried } => {
                assert_eq!(reference, "user/repo/missing");
                assert_eq!(tried, &["SKILL.md", "CONTEXT.md", "PROMPT.md"]);
            }
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn single_segment_reference_fails_at_fetch_time() {
        let log = calls();
        let fetcher = GitHubFetcher::with_sources(vec![Box::new(FakeSource::new(
            SourceUsed::GitHubRaw,
            vec![],
            &log,
        ))]);

        let err = fetcher.fetch(&parse("gh:onlyowner")).await.unwrap_err();
        assert!(matches!(err, PackError::InvalidReference { .. }));
        assert!(log.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn first_success_stops_at_first_some() {
        let seen = Mutex::new(Vec::new());
        let result = first_success((1..=5).map(|i| {
            let seen = &seen;
            move || async move {
                seen.lock().unwrap().push(i);
                (i == 2).then_some(i * 10)
            }
        }))
        .await;
        assert_eq!(result, Some(20));
        assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
    }
}
