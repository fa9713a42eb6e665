//! Git data model, output parsers and the query API.

pub mod api;
pub mod error;
pub mod model;
pub mod parse;

pub use api::GitApi;
pub use error::{GitError, ParseError, ParseWarning};
pub use model::{Commit, FileChange, Ref, RefSet, Remote, ShortStat, Snapshot, Stash};
