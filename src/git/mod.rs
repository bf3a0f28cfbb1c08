//! Local git repository access
//!
//! The release workflow itself talks only to the hosting platform. The local
//! checkout is consulted by the CLI to fill in what the caller left out: the
//! commit being released (HEAD) and the repository slug (from a remote URL).
//!
//! - [repository::Git2Repository]: A real implementation using the `git2` crate
//! - [mock::MockRepository]: A mock implementation for testing

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::error::Result;

/// Common git operation trait for abstraction
pub trait Repository {
    /// Full sha of the commit HEAD points at
    ///
    /// # Returns
    /// * `Ok(String)` - 40-character hex sha
    /// * `Err` - If HEAD is unborn or there's a Git error
    fn head_sha(&self) -> Result<String>;

    /// URL configured for a remote
    ///
    /// # Arguments
    /// * `remote` - Name of the remote (e.g., "origin", "upstream")
    ///
    /// # Returns
    /// * `Ok(String)` - The remote's fetch URL
    /// * `Err` - If the remote doesn't exist or has no valid UTF-8 URL
    fn remote_url(&self, remote: &str) -> Result<String>;
}
