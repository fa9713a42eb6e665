//! Recording adapter for the `GitRepo` port.

use std::sync::{Arc, Mutex};

use serde::Serialize;

use super::record_result;
use crate::cassette::recorder::CassetteRecorder;
use crate::ports::git::{GitFuture, GitRepo};

/// Records git interactions while delegating to an inner implementation.
pub struct RecordingGitRepo {
    inner: Box<dyn GitRepo>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingGitRepo {
    /// Creates a new recording git repo wrapping the given implementation.
    pub fn new(inner: Box<dyn GitRepo>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }

    fn wrap<'a, I>(&'a self, method: &'static str, input: I, call: GitFuture<'a>) -> GitFuture<'a>
    where
        I: Serialize + Send + 'a,
    {
        Box::pin(async move {
            let result = call.await;
            record_result(&self.recorder, "git", method, &input, &result);
            result
        })
    }
}

#[derive(Serialize)]
struct LogInput<'a> {
    stash_hashes: &'a [String],
    max_count: Option<usize>,
}

#[derive(Serialize)]
struct RevisionInput<'a> {
    revision: &'a str,
}

impl GitRepo for RecordingGitRepo {
    fn toplevel(&self) -> GitFuture<'_> {
        self.wrap("toplevel", (), self.inner.toplevel())
    }

    fn show_ref(&self) -> GitFuture<'_> {
        self.wrap("show_ref", (), self.inner.show_ref())
    }

    fn stash_list(&self) -> GitFuture<'_> {
        self.wrap("stash_list", (), self.inner.stash_list())
    }

    fn log<'a>(&'a self, stash_hashes: &'a [String], max_count: Option<usize>) -> GitFuture<'a> {
        let input = LogInput { stash_hashes, max_count };
        self.wrap("log", input, self.inner.log(stash_hashes, max_count))
    }

    fn show<'a>(&'a self, revision: &'a str) -> GitFuture<'a> {
        self.wrap("show", RevisionInput { revision }, self.inner.show(revision))
    }

    fn short_stat<'a>(&'a self, revision: &'a str) -> GitFuture<'a> {
        self.wrap("short_stat", RevisionInput { revision }, self.inner.short_stat(revision))
    }
}
