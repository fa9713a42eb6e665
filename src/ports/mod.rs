//! Port traits defining external boundaries.
//!
//! Each trait is a boundary between the graph core and something outside
//! the process: the `git` CLI and the source of random nonces.
//! Implementations live in `src/adapters/`.

pub mod git;
pub mod id_gen;

pub use git::{GitFuture, GitRepo};
pub use id_gen::IdGenerator;
