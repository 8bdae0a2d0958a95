//! `packs submit` -- ask the registry to index a GitHub-hosted pack.

use anyhow::{Context, Result, bail};
use packs_core::{PackRegistry, parse};

use crate::helpers::App;

pub async fn run(input: &str) -> Result<()> {
    let github_ref = submission_ref(input)?;
    let app = App::load()?;

    println!("\n  📦 Submitting {github_ref}...\n");
    let submission = app
        .registry()
        .submit(&github_ref)
        .await
        .context("failed to submit")?;

    println!("  ✓ Submitted to registry");
    if !submission.message.is_empty() {
        println!("  ℹ {}", submission.message);
    }
    println!("\n  Pack submitted successfully!");
    if submission.version.is_empty() {
        println!("  Available via: packs get {}\n", submission.name);
    } else {
        println!(
            "  Available via: packs get {}@{}\n",
            submission.name, submission.version
        );
    }
    Ok(())
}

/// `owner/repo/path` for a GitHub reference that names a path.
///
/// A bare `user/repo/path` is read as a GitHub reference too.
fn submission_ref(input: &str) -> Result<String> {
    let reference = if input.starts_with('@') || input.starts_with("gh:") {
        parse(input)
    } else {
        parse(&format!("gh:{input}"))
    };
    match reference.github_ref() {
        Some(github_ref) if reference.github_path.is_some() => Ok(github_ref),
        _ => bail!(
            "invalid reference: {input}\n\
             Expected format: @user/repo/path, gh:user/repo/path or user/repo/path"
        ),
    }
}
