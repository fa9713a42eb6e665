//! Replaying adapter for the `GitRepo` port.

use std::sync::Mutex;

use serde_json::Value;

use crate::cassette::replayer::CassetteReplayer;
use crate::git::GitError;
use crate::ports::git::{GitFuture, GitRepo};

/// Replays recorded git operations from a cassette.
///
/// Without a replayer every call fails with [`GitError::Replay`].
pub struct ReplayingGitRepo {
    replayer: Option<Mutex<CassetteReplayer>>,
}

impl ReplayingGitRepo {
    /// Creates a new replaying git repo from a cassette replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Some(Mutex::new(replayer)) }
    }

    /// A repo with no cassette behind it.
    #[must_use]
    pub fn unconfigured() -> Self {
        Self { replayer: None }
    }

    fn answer(&self, method: &'static str) -> GitFuture<'_> {
        let result = self.next_output(method).and_then(|output| extract_result(&output, method));
        Box::pin(async move { result })
    }

    fn next_output(&self, method: &str) -> Result<Value, GitError> {
        let replayer = self
            .replayer
            .as_ref()
            .ok_or_else(|| GitError::Replay(format!("no git cassette loaded for git::{method}")))?;
        let mut replayer =
            replayer.lock().map_err(|_| GitError::Replay("replayer lock poisoned".into()))?;
        let interaction =
            replayer.next_interaction("git", method).map_err(|e| GitError::Replay(e.to_string()))?;
        Ok(interaction.output.clone())
    }
}

/// Reads `{"ok": output}` or `{"err": GitError}` back into a result.
fn extract_result(output: &Value, method: &str) -> Result<String, GitError> {
    if let Some(err) = output.get("err") {
        return Err(serde_json::from_value(err.clone()).unwrap_or_else(|e| {
            GitError::Replay(format!("git::{method}: undecodable recorded error: {e}"))
        }));
    }
    match output.get("ok").and_then(Value::as_str) {
        Some(text) => Ok(text.to_string()),
        None => Err(GitError::Replay(format!(
            "git::{method}: expected {{ok: <string>}}, got {output}"
        ))),
    }
}

impl GitRepo for ReplayingGitRepo {
    fn toplevel(&self) -> GitFuture<'_> {
        self.answer("toplevel")
    }

    fn show_ref(&self) -> GitFuture<'_> {
        self.answer("show_ref")
    }

    fn stash_list(&self) -> GitFuture<'_> {
        self.answer("stash_list")
    }

    fn log<'a>(&'a self, _stash_hashes: &'a [String], _max_count: Option<usize>) -> GitFuture<'a> {
        self.answer("log")
    }

    fn show<'a>(&'a self, _revision: &'a str) -> GitFuture<'a> {
        self.answer("show")
    }

    fn short_stat<'a>(&'a self, _revision: &'a str) -> GitFuture<'a> {
        self.answer("short_stat")
    }
}
