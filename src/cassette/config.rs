//! Cassette configuration for composable per-port replay.

use std::path::{Path, PathBuf};

use super::format::Cassette;
use super::replayer::CassetteReplayer;

/// Per-port cassette file paths. Ports without a cassette fail every call
/// during replay.
#[derive(Debug, Clone, Default)]
pub struct CassetteConfig {
    /// Path to the git port cassette file.
    pub git: Option<PathBuf>,
    /// Path to the ID generator port cassette file.
    pub id_gen: Option<PathBuf>,
}

/// Per-port replayers, each with its own interaction stream.
#[derive(Debug)]
pub struct PortReplayers {
    /// Replayer for the git port.
    pub git: Option<CassetteReplayer>,
    /// Replayer for the ID generator port.
    pub id_gen: Option<CassetteReplayer>,
}

impl CassetteConfig {
    /// Uses one cassette holding every port's interactions.
    pub fn monolithic(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self { git: Some(path.clone()), id_gen: Some(path) }
    }

    /// Uses the `git.cassette.yaml` and `id_gen.cassette.yaml` files a
    /// recording session leaves in `dir`, skipping missing ones.
    #[must_use]
    pub fn from_session_dir(dir: &Path) -> Self {
        let existing = |port: &str| {
            let path = dir.join(format!("{port}.cassette.yaml"));
            path.is_file().then_some(path)
        };
        Self { git: existing("git"), id_gen: existing("id_gen") }
    }

    /// Picks [`Self::from_session_dir`] for directories and
    /// [`Self::monolithic`] for files.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        if path.is_dir() {
            Self::from_session_dir(path)
        } else {
            Self::monolithic(path)
        }
    }

    /// Load a single cassette file and create a replayer.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_port_cassette(path: &Path) -> Result<CassetteReplayer, String> {
        Ok(CassetteReplayer::new(&Cassette::load(path)?))
    }

    /// Load all configured per-port cassette files and create replayers.
    ///
    /// # Errors
    ///
    /// Returns an error if any configured cassette file cannot be read or parsed.
    pub fn load_all(&self) -> Result<PortReplayers, String> {
        Ok(PortReplayers {
            git: self.git.as_deref().map(Self::load_port_cassette).transpose()?,
            id_gen: self.id_gen.as_deref().map(Self::load_port_cassette).transpose()?,
        })
    }
}
