//! Live adapters for real external interactions.

pub mod git;
pub mod id_gen;

pub use git::{GitOptions, LiveGitRepo};
pub use id_gen::LiveIdGenerator;
