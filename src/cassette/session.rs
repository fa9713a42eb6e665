//! Recording session managing per-port cassette recorders.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use tracing::{info, warn};

use super::recorder::CassetteRecorder;
use crate::adapters::live::git::GitOptions;

/// Manages per-port `CassetteRecorder` instances for a recording session.
///
/// Each port gets its own recorder writing to a separate cassette file.
/// All cassettes are stored in a timestamped directory.
pub struct RecordingSession {
    /// Recorder for git interactions.
    pub git: Arc<Mutex<CassetteRecorder>>,
    /// Recorder for ID generator interactions.
    pub id_gen: Arc<Mutex<CassetteRecorder>>,
    output_dir: PathBuf,
}

impl RecordingSession {
    /// Create a new recording session in `<root>/<timestamp>/`.
    ///
    /// The cassettes are stamped with the HEAD of the repository `git`
    /// reaches through `options`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The cassette directory already exists
    /// - The directory cannot be created
    pub fn new(root: &Path, options: &GitOptions) -> Result<Self, String> {
        let timestamp = Utc::now().format("%Y-%m-%dT%H-%M-%S%.3f").to_string();
        let output_dir = root.join(&timestamp);

        if output_dir.exists() {
            return Err(format!("Cassette directory already exists: {}", output_dir.display()));
        }

        std::fs::create_dir_all(&output_dir)
            .map_err(|e| format!("Failed to create cassette directory: {e}"))?;

        let commit = head_commit(options);

        let make_recorder = |port: &str| -> Arc<Mutex<CassetteRecorder>> {
            let path = output_dir.join(format!("{port}.cassette.yaml"));
            let name = format!("{timestamp}-{port}");
            Arc::new(Mutex::new(CassetteRecorder::new(path, &name, &commit)))
        };

        Ok(Self { git: make_recorder("git"), id_gen: make_recorder("id_gen"), output_dir })
    }

    /// Directory the cassettes are written to.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Finish all recorders and write cassette files to disk.
    ///
    /// Consumes the session and writes each port's cassette file. Every
    /// adapter holding a recorder must have been dropped first.
    ///
    /// # Errors
    ///
    /// Returns an error if any cassette file cannot be written.
    pub fn finish(self) -> Result<PathBuf, String> {
        fn finish_one(arc: Arc<Mutex<CassetteRecorder>>, port: &str) -> Result<(), String> {
            let recorder = Arc::try_unwrap(arc)
                .map_err(|_| format!("Recording adapter for {port} still has references"))?
                .into_inner()
                .map_err(|e| format!("Recorder lock for {port} poisoned: {e}"))?;
            let count = recorder.len();
            let path =
                recorder.finish().map_err(|e| format!("Failed to write {port} cassette: {e}"))?;
            info!(port, count, path = %path.display(), "cassette written");
            Ok(())
        }

        finish_one(self.git, "git")?;
        finish_one(self.id_gen, "id_gen")?;

        Ok(self.output_dir)
    }
}

/// HEAD of the recorded repository, or "unknown" with a warning if unavailable.
fn head_commit(options: &GitOptions) -> String {
    let hash = std::process::Command::new(&options.binary)
        .args(["rev-parse", "HEAD"])
        .current_dir(&options.workdir)
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map(|s| s.trim().to_string());

    hash.unwrap_or_else(|| {
        warn!(
            workdir = %options.workdir.display(),
            "could not read HEAD; stamping cassettes 'unknown'"
        );
        "unknown".to_string()
    })
}
