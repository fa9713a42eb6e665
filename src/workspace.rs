//! The repository the commands operate on.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info};

use crate::git::{GitApi, GitError};
use crate::ports::GitRepo;

/// An opened repository.
#[derive(Clone)]
pub struct Workspace {
    root: PathBuf,
    api: GitApi,
}

impl Workspace {
    /// Resolves the repository root through `git rev-parse --show-toplevel`.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::NoRepository`] when git ran but found no
    /// repository. Failures to run git at all (spawn, timeout, replay) are
    /// returned unchanged.
    pub async fn open(repo: Arc<dyn GitRepo>, max_count: Option<usize>) -> Result<Self, GitError> {
        let root = match repo.toplevel().await {
            Ok(output) => output.trim().to_string(),
            Err(e @ GitError::Exit { .. }) => {
                debug!(error = %e, "repository discovery failed");
                return Err(GitError::NoRepository);
            }
            Err(e) => return Err(e),
        };
        if root.is_empty() {
            return Err(GitError::NoRepository);
        }
        info!(root = %root, "opened repository");
        Ok(Self { root: PathBuf::from(root), api: GitApi::new(repo, max_count) })
    }

    /// Top-level directory of the working tree.
    #[must_use]
    pub fn root(&self) -> &std::path::Path {
        &self.root
    }

    /// Queries against the repository.
    #[must_use]
    pub fn api(&self) -> &GitApi {
        &self.api
    }
}
