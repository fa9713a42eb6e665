//! Git repository port for the commands the graph needs.

use std::future::Future;
use std::pin::Pin;

use crate::git::GitError;

/// Boxed future type alias used by [`GitRepo`] to keep the trait dyn-compatible.
pub type GitFuture<'a> = Pin<Box<dyn Future<Output = Result<String, GitError>> + Send + 'a>>;

/// Runs read-only `git` queries and returns their raw standard output.
///
/// Abstracting git access allows deterministic replay and testing
/// without requiring a real repository.
pub trait GitRepo: Send + Sync {
    /// Returns the output of `rev-parse --show-toplevel`.
    fn toplevel(&self) -> GitFuture<'_>;

    /// Returns the output of `show-ref --head --dereference`.
    fn show_ref(&self) -> GitFuture<'_>;

    /// Returns the output of `stash list` as `<hash> <name>` lines.
    fn stash_list(&self) -> GitFuture<'_>;

    /// Returns `log` output over all refs plus the given stash commits.
    fn log<'a>(&'a self, stash_hashes: &'a [String], max_count: Option<usize>) -> GitFuture<'a>;

    /// Returns `show --name-status` output for one revision.
    fn show<'a>(&'a self, revision: &'a str) -> GitFuture<'a>;

    /// Returns `show --shortstat` output for one revision.
    fn short_stat<'a>(&'a self, revision: &'a str) -> GitFuture<'a>;
}
