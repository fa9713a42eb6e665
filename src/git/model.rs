//! Structured commit, ref and stash data parsed from `git` output.

use serde::{Deserialize, Serialize};

/// A single commit in the graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Commit {
    /// Full object hash.
    pub hash: String,
    /// First line of the commit message.
    pub message: String,
    /// Parent hashes in order. Empty for root commits, two or more for merges.
    pub parents: Vec<String>,
    /// Author name (`%an`).
    pub author_name: String,
    /// Author email (`%ae`).
    pub author_email: String,
    /// Author date (`%ad`) in strict ISO-8601.
    pub commit_date: String,
    /// Author date as `%aI`, absent when git left the field empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_date: Option<String>,
    /// Change counts, only present on commit detail lookups.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_stat: Option<ShortStat>,
    /// Changed files, only present on commit detail lookups.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<FileChange>>,
    /// Name of the stash ref this commit represents, e.g. `stash@{0}`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stash: Option<String>,
}

/// Summary counts of a commit's diff.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortStat {
    /// Number of files changed.
    pub files: u32,
    /// Number of inserted lines.
    pub insertions: u32,
    /// Number of deleted lines.
    pub deletions: u32,
}

/// One entry of `--name-status` output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileChange {
    /// Path of the file after the change.
    pub path: String,
    /// Raw status letter(s), e.g. `M`, `A`, `R100`.
    pub status: String,
    /// Previous path for renames and copies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_path: Option<String>,
}

/// A named pointer to a commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ref {
    /// Short name (`main`, `v1.0`, `feature/x`).
    pub name: String,
    /// Hash the ref points to.
    pub hash: String,
}

impl Ref {
    /// Creates a ref from its name and hash.
    pub fn new(name: impl Into<String>, hash: impl Into<String>) -> Self {
        Self { name: name.into(), hash: hash.into() }
    }
}

/// Remote-tracking branches grouped under their remote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Remote {
    /// Remote name, e.g. `origin`.
    pub name: String,
    /// Hash of `refs/remotes/<name>/HEAD`, when the remote has one.
    #[serde(rename = "HEAD")]
    pub head: Option<String>,
    /// Remote branches in `show-ref` order.
    pub branches: Vec<Ref>,
}

impl Remote {
    /// Creates an empty remote bucket.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), head: None, branches: Vec::new() }
    }
}

/// A `git stash list` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stash {
    /// Stash ref name, e.g. `stash@{0}`.
    pub name: String,
    /// Hash of the stash commit.
    pub hash: String,
}

/// Refs partitioned by category, as parsed from `show-ref --head`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefSet {
    /// Repository HEAD hash.
    pub head: Option<String>,
    /// Local branches.
    pub branches: Vec<Ref>,
    /// Tags, peeled to commits when `--dereference` output is present.
    pub tags: Vec<Ref>,
    /// Remotes in first-appearance order.
    pub remotes: Vec<Remote>,
    /// Lines that could not be classified.
    pub warnings: Vec<super::error::ParseWarning>,
}

/// Full graph payload sent to the webview.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Repository HEAD hash.
    #[serde(rename = "HEAD")]
    pub head: Option<String>,
    /// Local branches.
    pub branches: Vec<Ref>,
    /// Tags.
    pub tags: Vec<Ref>,
    /// Remotes and their branches.
    pub remotes: Vec<Remote>,
    /// Commits in `git log --date-order` order, stash internals removed.
    pub commits: Vec<Commit>,
}

impl Snapshot {
    /// Assembles a snapshot from parsed refs and commits.
    #[must_use]
    pub fn new(refs: RefSet, commits: Vec<Commit>) -> Self {
        Self {
            head: refs.head,
            branches: refs.branches,
            tags: refs.tags,
            remotes: refs.remotes,
            commits,
        }
    }
}
