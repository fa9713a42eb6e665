//! Errors and warnings raised while running or parsing `git`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Malformed git output that cannot be turned into a commit.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParseError {
    /// A record had fewer fields than the format string produces.
    #[error("record {index} is truncated: expected 7 fields, found {fields}")]
    TruncatedRecord {
        /// Zero-based index of the record in the output.
        index: usize,
        /// Number of fields actually present.
        fields: usize,
    },
    /// `git show` produced no commit record.
    #[error("no commit record in output")]
    MissingRecord,
    /// A `--name-status` line had no path.
    #[error("malformed file status line: {line:?}")]
    MalformedFileLine {
        /// The offending line.
        line: String,
    },
}

/// A `show-ref` or `stash list` line that was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseWarning {
    /// The line is not `<hash> <refname>`.
    #[error("line {line_no}: expected `<hash> <ref>`, got {line:?}")]
    MalformedLine {
        /// One-based line number.
        line_no: usize,
        /// The offending line.
        line: String,
    },
    /// A `refs/remotes/` ref without a `<remote>/<branch>` split.
    #[error("line {line_no}: malformed remote ref {refname:?}")]
    MalformedRemoteRef {
        /// One-based line number.
        line_no: usize,
        /// The full ref name.
        refname: String,
    },
    /// A ref outside the heads, tags and remotes namespaces.
    #[error("line {line_no}: unrecognized ref {refname:?}")]
    UnrecognizedRef {
        /// One-based line number.
        line_no: usize,
        /// The full ref name.
        refname: String,
    },
}

/// Failure of a git operation.
///
/// Serializable so recorded cassettes can reproduce the exact error.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum GitError {
    /// The git binary could not be started.
    #[error("failed to run `{program}`: {message}")]
    Spawn {
        /// Program that was executed.
        program: String,
        /// OS error text.
        message: String,
    },
    /// git exited with a non-zero status.
    #[error("`git {command}` failed with {}: {stderr}", describe_status(.code))]
    Exit {
        /// Subcommand and arguments.
        command: String,
        /// Exit code, `None` when killed by a signal.
        code: Option<i32>,
        /// Trimmed standard error.
        stderr: String,
    },
    /// git did not finish within the configured timeout.
    #[error("`git {command}` timed out after {millis} ms")]
    Timeout {
        /// Subcommand and arguments.
        command: String,
        /// Timeout that elapsed.
        millis: u64,
    },
    /// git output could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// A revision argument that could be mistaken for an option.
    #[error("invalid revision {0:?}")]
    InvalidRevision(String),
    /// No repository is open in the workspace.
    #[error("There are no Git repositories in the current workspace.")]
    NoRepository,
    /// A recorded cassette could not answer the call.
    #[error("cassette replay failed: {0}")]
    Replay(String),
}

fn describe_status(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "a signal".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_error_mentions_code_and_stderr() {
        let err = GitError::Exit {
            command: "log".into(),
            code: Some(128),
            stderr: "fatal: not a git repository".into(),
        };
        let text = err.to_string();
        assert!(text.contains("exit code 128"));
        assert!(text.contains("not a git repository"));
    }

    #[test]
    fn git_error_survives_json_round_trip() {
        let err = GitError::Parse(ParseError::TruncatedRecord { index: 2, fields: 3 });
        let value = serde_json::to_value(&err).unwrap();
        let back: GitError = serde_json::from_value(value).unwrap();
        assert_eq!(back, err);
    }
}
