use crate::error::{ReleaseError, Result};
use crate::git::Repository;
use std::collections::HashMap;

/// Mock repository for testing without actual git operations
#[derive(Default)]
pub struct MockRepository {
    head: Option<String>,
    remotes: HashMap<String, String>,
}

impl MockRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the commit HEAD points at
    pub fn set_head(&mut self, sha: impl Into<String>) {
        self.head = Some(sha.into());
    }

    /// Add a remote with its URL
    pub fn add_remote(&mut self, name: impl Into<String>, url: impl Into<String>) {
        self.remotes.insert(name.into(), url.into());
    }
}

impl Repository for MockRepository {
    fn head_sha(&self) -> Result<String> {
        self.head
            .clone()
            .ok_or_else(|| ReleaseError::config("HEAD does not point at a commit"))
    }

    fn remote_url(&self, remote: &str) -> Result<String> {
        self.remotes
            .get(remote)
            .cloned()
            .ok_or_else(|| ReleaseError::config(format!("Cannot find remote '{}'", remote)))
    }
}
