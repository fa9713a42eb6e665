//! Live git adapter using the `git` CLI.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::{debug, trace};

use crate::git::parse::COMMIT_FORMAT;
use crate::git::GitError;
use crate::ports::git::{GitFuture, GitRepo};

/// How to reach the repository: binary, working directory and timeout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitOptions {
    /// Path or name of the git binary.
    pub binary: PathBuf,
    /// Directory the commands run in.
    pub workdir: PathBuf,
    /// Upper bound for a single invocation.
    pub timeout: Duration,
}

impl GitOptions {
    /// Options running `git` from `PATH` inside `workdir` with a 30 second timeout.
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            binary: PathBuf::from("git"),
            workdir: workdir.into(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Live git adapter that shells out to the `git` CLI.
///
/// Each call spawns one child process. The child is killed when the call's
/// future is dropped or the timeout elapses.
pub struct LiveGitRepo {
    options: GitOptions,
}

impl LiveGitRepo {
    /// Creates a live adapter with the given options.
    #[must_use]
    pub fn new(options: GitOptions) -> Self {
        Self { options }
    }

    async fn exec(&self, args: Vec<String>) -> Result<String, GitError> {
        let command = args.join(" ");
        debug!(%command, workdir = %self.options.workdir.display(), "running git");

        let child = Command::new(&self.options.binary)
            .args(["-c", "core.quotepath=false"])
            .args(&args)
            .current_dir(&self.options.workdir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| GitError::Spawn {
                program: self.options.binary.display().to_string(),
                message: e.to_string(),
            })?;

        let timeout = self.options.timeout;
        let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Ok(result) => result.map_err(|e| GitError::Spawn {
                program: self.options.binary.display().to_string(),
                message: e.to_string(),
            })?,
            Err(_) => {
                return Err(GitError::Timeout {
                    command,
                    millis: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
                })
            }
        };

        if !output.status.success() {
            return Err(GitError::Exit {
                command,
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        trace!(%command, bytes = output.stdout.len(), "git finished");
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

fn strings<const N: usize>(args: [&str; N]) -> Vec<String> {
    args.into_iter().map(String::from).collect()
}

impl GitRepo for LiveGitRepo {
    fn toplevel(&self) -> GitFuture<'_> {
        Box::pin(self.exec(strings(["rev-parse", "--show-toplevel"])))
    }

    fn show_ref(&self) -> GitFuture<'_> {
        Box::pin(async move {
            match self.exec(strings(["show-ref", "--head", "--dereference"])).await {
                // show-ref exits 1 without output when the repository has no refs yet.
                Err(GitError::Exit { code: Some(1), stderr, .. }) if stderr.is_empty() => {
                    Ok(String::new())
                }
                other => other,
            }
        })
    }

    fn stash_list(&self) -> GitFuture<'_> {
        Box::pin(self.exec(strings(["stash", "list", "--format=%H %gd"])))
    }

    fn log<'a>(&'a self, stash_hashes: &'a [String], max_count: Option<usize>) -> GitFuture<'a> {
        let mut args = strings([
            "log",
            "--all",
            "--date-order",
            "--date=iso-strict",
            format!("--pretty=format:{COMMIT_FORMAT}").as_str(),
        ]);
        if let Some(max_count) = max_count {
            args.push(format!("--max-count={max_count}"));
        }
        args.extend(stash_hashes.iter().cloned());
        Box::pin(self.exec(args))
    }

    fn show<'a>(&'a self, revision: &'a str) -> GitFuture<'a> {
        Box::pin(self.exec(strings([
            "show",
            "--date=iso-strict",
            format!("--pretty=format:{COMMIT_FORMAT}").as_str(),
            "--name-status",
            revision,
            "--",
        ])))
    }

    fn short_stat<'a>(&'a self, revision: &'a str) -> GitFuture<'a> {
        Box::pin(self.exec(strings(["show", "--shortstat", "--pretty=format:", revision, "--"])))
    }
}
