//! Service context bundling all port trait objects.

use std::path::Path;
use std::sync::Arc;

use crate::adapters::live::{GitOptions, LiveGitRepo, LiveIdGenerator};
use crate::adapters::recording::git::RecordingGitRepo;
use crate::adapters::recording::id_gen::RecordingIdGenerator;
use crate::adapters::replaying::{ReplayingGitRepo, ReplayingIdGenerator};
use crate::cassette::config::CassetteConfig;
use crate::cassette::session::RecordingSession;
use crate::ports::git::GitRepo;
use crate::ports::id_gen::IdGenerator;

/// Bundles all port trait objects into a single context.
///
/// Constructors wire up different adapter implementations (live,
/// recording, replaying). The git port is shared with the page handlers,
/// hence the `Arc`.
pub struct ServiceContext {
    /// Git repository the graph is read from.
    pub git: Arc<dyn GitRepo>,
    /// Nonce source for rendered pages.
    pub id_gen: Box<dyn IdGenerator>,
}

impl ServiceContext {
    /// Creates a live context running `git` as configured.
    #[must_use]
    pub fn live(options: &GitOptions) -> Self {
        Self {
            git: Arc::new(LiveGitRepo::new(options.clone())),
            id_gen: Box::new(LiveIdGenerator::new()),
        }
    }

    /// Creates a recording context around live adapters.
    ///
    /// Cassettes land in a timestamped directory below `root` once the
    /// returned session is finished, which requires this context to be
    /// dropped first.
    ///
    /// # Errors
    ///
    /// Returns an error if the session directory cannot be created.
    pub fn recording_at(
        root: &Path,
        options: &GitOptions,
    ) -> Result<(Self, RecordingSession), String> {
        let session = RecordingSession::new(root, options)?;
        let ctx = Self {
            git: Arc::new(RecordingGitRepo::new(
                Box::new(LiveGitRepo::new(options.clone())),
                Arc::clone(&session.git),
            )),
            id_gen: Box::new(RecordingIdGenerator::new(
                Box::new(LiveIdGenerator::new()),
                Arc::clone(&session.id_gen),
            )),
        };
        Ok((ctx, session))
    }

    /// Creates a replaying context from a monolithic cassette file or a
    /// recording session directory.
    ///
    /// # Errors
    ///
    /// Returns an error if a cassette file cannot be read or parsed.
    pub fn replaying(path: &Path) -> Result<Self, String> {
        Self::replaying_from(&CassetteConfig::from_path(path))
    }

    /// Creates a replaying context from per-port cassette files.
    ///
    /// A git port without a cassette fails every call with a replay
    /// error; an ID generator without one panics when asked for an ID.
    ///
    /// # Errors
    ///
    /// Returns an error if any configured cassette file cannot be read or parsed.
    pub fn replaying_from(config: &CassetteConfig) -> Result<Self, String> {
        let replayers = config.load_all()?;

        Ok(Self {
            git: match replayers.git {
                Some(r) => Arc::new(ReplayingGitRepo::new(r)),
                None => Arc::new(ReplayingGitRepo::unconfigured()),
            },
            id_gen: match replayers.id_gen {
                Some(r) => Box::new(ReplayingIdGenerator::new(r)),
                None => Box::new(PanickingIdGenerator),
            },
        })
    }
}

struct PanickingIdGenerator;
impl IdGenerator for PanickingIdGenerator {
    fn generate_id(&self) -> String {
        panic!("IdGenerator port not configured in CassetteConfig: no cassette loaded for id_gen");
    }
}
