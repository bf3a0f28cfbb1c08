use crate::error::{ReleaseError, Result};
use git2::Repository as Git2Repo;
use std::path::Path;

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Self::from_git2(repo))
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }
}

impl super::Repository for Git2Repository {
    fn head_sha(&self) -> Result<String> {
        let commit = self.repo.head()?.peel_to_commit()?;
        Ok(commit.id().to_string())
    }

    fn remote_url(&self, remote: &str) -> Result<String> {
        let found = self.repo.find_remote(remote).map_err(|e| {
            ReleaseError::config(format!("Cannot find remote '{}': {}", remote, e))
        })?;

        found
            .url()
            .map(str::to_string)
            .ok_or_else(|| ReleaseError::config(format!("Remote '{}' has no URL", remote)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::Repository;
    use tempfile::TempDir;

    fn init_repo_with_commit() -> (TempDir, Git2Repo, git2::Oid) {
        let dir = TempDir::new().unwrap();
        let repo = Git2Repo::init(dir.path()).unwrap();
        let oid = {
            let sig = git2::Signature::now("Test", "test@example.com").unwrap();
            let tree_id = repo.index().unwrap().write_tree().unwrap();
            let tree = repo.find_tree(tree_id).unwrap();
            repo.commit(Some("HEAD"), &sig, &sig, "initial", &tree, &[])
                .unwrap()
        };
        (dir, repo, oid)
    }

    #[test]
    fn test_head_sha() {
        let (_dir, repo, oid) = init_repo_with_commit();
        let repo = Git2Repository::from_git2(repo);
        assert_eq!(repo.head_sha().unwrap(), oid.to_string());
    }

    #[test]
    fn test_head_sha_unborn() {
        let dir = TempDir::new().unwrap();
        let repo = Git2Repository::from_git2(Git2Repo::init(dir.path()).unwrap());
        assert!(repo.head_sha().is_err());
    }

    #[test]
    fn test_remote_url() {
        let (dir, repo, _) = init_repo_with_commit();
        repo.remote("origin", "git@github.com:octo/hello.git")
            .unwrap();

        let repo = Git2Repository::open(dir.path()).unwrap();
        assert_eq!(
            repo.remote_url("origin").unwrap(),
            "git@github.com:octo/hello.git"
        );
        assert!(repo.remote_url("upstream").is_err());
    }
}
