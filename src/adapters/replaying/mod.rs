//! Replaying adapters that replay recorded interactions.

pub mod git;
pub mod id_gen;

pub use git::ReplayingGitRepo;
pub use id_gen::ReplayingIdGenerator;
