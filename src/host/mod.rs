//! Hosting platform abstraction layer
//!
//! This module provides a trait-based abstraction over the release hosting
//! API, allowing the release workflow to run against GitHub or against an
//! in-memory double in tests.
//!
//! # Overview
//!
//! - [ReleaseHost]: releases and tag refs on the hosting platform
//! - [AssetReader]: local files attached to a release
//!
//! Implementations:
//!
//! - [github::GithubClient]: GitHub REST API over `reqwest`
//! - [FsAssetReader]: reads assets from the local filesystem
//! - [mock::MockHost]: in-memory implementation of both traits for testing
//!
//! Code that drives a release should depend on the traits rather than the
//! concrete clients.

pub mod github;
pub mod mock;

pub use github::GithubClient;
pub use mock::{HostCall, MockHost};

use crate::domain::{ReleaseRecord, TagRef};
use crate::error::{ReleaseError, Result};
use async_trait::async_trait;
use regex::Regex;
use std::fmt;
use std::path::Path;

/// Largest page size the GitHub releases endpoint accepts
pub const MAX_PER_PAGE: u32 = 100;

/// Request to create an annotated tag object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagObjectRequest {
    pub tag_name: String,
    pub message: String,
    pub target_sha: String,
}

/// Request to create a release object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseRequest {
    pub tag_name: String,
    pub title: String,
    pub body: String,
}

/// A release object as returned on creation
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct CreatedRelease {
    pub id: u64,
    pub tag_name: String,
}

/// One asset to attach to a created release
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetUpload {
    pub release_id: u64,
    pub asset_name: String,
    pub content: Vec<u8>,
}

/// Releases and tag refs of one repository on the hosting platform
///
/// Implementors are bound to a single repository at construction time.
///
/// ## Error Handling
///
/// A missing tag is `Ok(None)` from [ReleaseHost::get_tag_ref]. Deleting a ref
/// that is already gone fails with [ReleaseError::NotFound] so callers can tell
/// it apart from real failures. All other platform failures surface as
/// [ReleaseError::Api] or [ReleaseError::Http] and are never retried here.
#[async_trait]
pub trait ReleaseHost: Send + Sync {
    /// Fetch one page of releases (pages start at 1)
    async fn list_releases(&self, page: u32, per_page: u32) -> Result<Vec<ReleaseRecord>>;

    /// Fetch every release, requesting pages until one comes back empty
    async fn list_all_releases(&self, per_page: u32) -> Result<Vec<ReleaseRecord>> {
        let mut page = 1;
        let mut results = Vec::new();

        loop {
            let batch = self.list_releases(page, per_page).await?;
            if batch.is_empty() {
                break;
            }
            results.extend(batch);
            page += 1;
        }

        Ok(results)
    }

    /// Look up `refs/tags/<tag_name>`
    ///
    /// # Returns
    /// * `Ok(Some(TagRef))` - The tag exists
    /// * `Ok(None)` - The tag does not exist
    /// * `Err` - Any other platform failure
    async fn get_tag_ref(&self, tag_name: &str) -> Result<Option<TagRef>>;

    /// Delete a ref by its full path (e.g., "refs/tags/v1")
    async fn delete_tag_ref(&self, ref_path: &str) -> Result<()>;

    /// Create an annotated tag object and return its sha
    async fn create_tag_object(&self, request: &TagObjectRequest) -> Result<String>;

    /// Create `refs/tags/<tag_name>` pointing at `sha`
    async fn create_tag_ref(&self, tag_name: &str, sha: &str) -> Result<()>;

    async fn create_release(&self, request: &ReleaseRequest) -> Result<CreatedRelease>;

    async fn upload_release_asset(&self, asset: &AssetUpload) -> Result<()>;
}

/// Source of release asset contents
#[async_trait]
pub trait AssetReader: Send + Sync {
    async fn read_file_bytes(&self, path: &Path) -> Result<Vec<u8>>;
}

/// Reads assets from the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct FsAssetReader;

#[async_trait]
impl AssetReader for FsAssetReader {
    async fn read_file_bytes(&self, path: &Path) -> Result<Vec<u8>> {
        Ok(tokio::fs::read(path).await?)
    }
}

/// `owner/name` of a hosted repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSlug {
    pub owner: String,
    pub name: String,
}

impl RepoSlug {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        RepoSlug {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Parse "owner/name", as found in `GITHUB_REPOSITORY`
    pub fn parse(slug: &str) -> Result<Self> {
        match slug.trim().split_once('/') {
            Some((owner, name))
                if !owner.is_empty() && !name.is_empty() && !name.contains('/') =>
            {
                Ok(RepoSlug::new(owner, name))
            }
            _ => Err(ReleaseError::config(format!(
                "Repository must be in 'owner/name' form, got '{}'",
                slug
            ))),
        }
    }

    /// Extract the slug from a git remote URL
    ///
    /// Accepts scp-like SSH (`git@github.com:owner/name.git`), `ssh://` and
    /// `https://` forms, with or without the `.git` suffix.
    pub fn from_remote_url(url: &str) -> Result<Self> {
        let re = Regex::new(
            r"^(?:[a-z+]+://)?(?:[^@/]+@)?[^/:]+(?::\d+)?[:/]([^/]+)/([^/]+?)(?:\.git)?/?$",
        )
        .map_err(|e| ReleaseError::config(format!("Invalid remote pattern: {}", e)))?;

        let caps = re.captures(url.trim()).ok_or_else(|| {
            ReleaseError::config(format!("Cannot derive repository from remote '{}'", url))
        })?;
        Ok(RepoSlug::new(&caps[1], &caps[2]))
    }
}

impl fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}
