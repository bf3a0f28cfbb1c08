//! Glue between command-line inputs and the release workflow

pub mod orchestration;

pub use orchestration::{
    run_release_workflow, Outcome, ReleaseReport, ReleaseWorkflowArgs, Stage, TagUpdate,
};

use crate::error::{ReleaseError, Result};
use crate::git::Repository;
use crate::host::RepoSlug;
use tracing::debug;

/// Pick the commit to release: the explicit value if given, otherwise HEAD of
/// the local repository.
pub fn resolve_commit_sha(explicit: Option<&str>, repo: Option<&dyn Repository>) -> Result<String> {
    if let Some(sha) = explicit.map(str::trim).filter(|s| !s.is_empty()) {
        return Ok(sha.to_string());
    }

    match repo {
        Some(repo) => {
            let sha = repo.head_sha()?;
            debug!("Using HEAD {} as the release commit", sha);
            Ok(sha)
        }
        None => Err(ReleaseError::invalid_input(
            "Commit sha is required: pass --sha, set GITHUB_SHA, or run inside a git repository",
        )),
    }
}

/// Pick the repository: the explicit "owner/name" if given, otherwise the slug
/// parsed from `remote`'s URL.
pub fn resolve_repo_slug(
    explicit: Option<&str>,
    repo: Option<&dyn Repository>,
    remote: &str,
) -> Result<RepoSlug> {
    if let Some(slug) = explicit.map(str::trim).filter(|s| !s.is_empty()) {
        return RepoSlug::parse(slug);
    }

    match repo {
        Some(repo) => {
            let url = repo.remote_url(remote)?;
            debug!("Deriving repository from remote {} ({})", remote, url);
            RepoSlug::from_remote_url(&url)
        }
        None => Err(ReleaseError::config(
            "Repository is required: pass --repository or run inside a git repository",
        )),
    }
}
