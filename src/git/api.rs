//! Structured git queries built from the [`GitRepo`] port and the parsers.

use std::sync::Arc;

use tracing::{debug, instrument};

use super::error::GitError;
use super::model::{Commit, RefSet, Snapshot, Stash};
use super::parse;
use crate::ports::GitRepo;

/// Parsed view over a repository port.
///
/// Calls are strictly sequential: every method awaits one `git` process
/// before starting the next.
#[derive(Clone)]
pub struct GitApi {
    repo: Arc<dyn GitRepo>,
    max_count: Option<usize>,
}

impl GitApi {
    /// Creates an API over the given port. `max_count` limits `log` output.
    #[must_use]
    pub fn new(repo: Arc<dyn GitRepo>, max_count: Option<usize>) -> Self {
        Self { repo, max_count }
    }

    /// Reads all refs.
    ///
    /// # Errors
    ///
    /// Returns the process error when `git show-ref` fails.
    pub async fn refs(&self) -> Result<RefSet, GitError> {
        let output = self.repo.show_ref().await?;
        Ok(parse::parse_show_ref(&output))
    }

    /// Reads the stash list.
    ///
    /// # Errors
    ///
    /// Returns the process error when `git stash list` fails.
    pub async fn stashes(&self) -> Result<Vec<Stash>, GitError> {
        let output = self.repo.stash_list().await?;
        Ok(parse::parse_stash_list(&output))
    }

    /// Reads the commit history, including stash commits but not their
    /// index and untracked snapshots.
    ///
    /// # Errors
    ///
    /// Returns the process error or a parse error for truncated records.
    pub async fn log(&self, stashes: &[Stash]) -> Result<Vec<Commit>, GitError> {
        let hashes: Vec<String> = stashes.iter().map(|stash| stash.hash.clone()).collect();
        let output = self.repo.log(&hashes, self.max_count).await?;
        Ok(parse::parse_log(&output, stashes)?)
    }

    /// Reads refs, stashes and history into one graph snapshot.
    ///
    /// # Errors
    ///
    /// Returns the first failing query's error.
    #[instrument(skip(self))]
    pub async fn snapshot(&self) -> Result<Snapshot, GitError> {
        let refs = self.refs().await?;
        let stashes = self.stashes().await?;
        let commits = self.log(&stashes).await?;
        debug!(
            commits = commits.len(),
            branches = refs.branches.len(),
            stashes = stashes.len(),
            "loaded graph snapshot"
        );
        Ok(Snapshot::new(refs, commits))
    }

    /// Reads one commit with its changed files and change counts.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::InvalidRevision`] for revisions that could be read
    /// as options, otherwise the process or parse error.
    #[instrument(skip(self))]
    pub async fn show(&self, revision: &str) -> Result<Commit, GitError> {
        validate_revision(revision)?;
        let output = self.repo.show(revision).await?;
        let mut commit = parse::parse_show(&output)?;
        let stat = self.repo.short_stat(revision).await?;
        commit.short_stat = parse::parse_short_stat(&stat);
        Ok(commit)
    }
}

fn validate_revision(revision: &str) -> Result<(), GitError> {
    if revision.is_empty()
        || revision.starts_with('-')
        || revision.chars().any(|c| c.is_whitespace() || c.is_control())
    {
        return Err(GitError::InvalidRevision(revision.to_string()));
    }
    Ok(())
}
