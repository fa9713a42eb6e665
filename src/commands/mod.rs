//! Command dispatch and handlers.

pub mod graph;
pub mod html;
pub mod refs;
pub mod serve;
pub mod settings;
pub mod show;
pub mod stashes;

use std::env;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::cassette::session::RecordingSession;
use crate::cli::{Cli, Command};
use crate::config::Settings;
use crate::context::ServiceContext;
use crate::workspace::Workspace;

/// Directory to record cassettes into.
pub const RECORD_ENV: &str = "GITREE_RECORD";
/// Cassette file or session directory to replay.
pub const REPLAY_ENV: &str = "GITREE_REPLAY";

/// Dispatch a parsed command to its handler.
///
/// Loads `.env` and the settings, builds the service context and runs the
/// handler on a single-threaded runtime. When `GITREE_REPLAY` is set, git
/// and nonces come from that cassette; otherwise, when `GITREE_RECORD` is
/// set to a directory, all port interactions are recorded to per-port
/// cassette files below it.
///
/// # Errors
///
/// Returns an error string if setup or the selected command handler fails.
pub fn dispatch(cli: &Cli) -> Result<(), String> {
    crate::logging::init(cli.verbose);
    if let Ok(path) = dotenvy::dotenv() {
        debug!(path = %path.display(), "loaded environment file");
    }

    let workdir = match &cli.repo {
        Some(dir) => dir.clone(),
        None => env::current_dir().map_err(|e| format!("cannot determine current directory: {e}"))?,
    };
    let (mut settings, _) =
        Settings::load(cli.config.as_deref(), &workdir).map_err(|e| e.to_string())?;
    settings.apply_env().map_err(|e| e.to_string())?;
    let options = settings.git_options(&workdir);

    let (ctx, session) = if let Ok(path) = env::var(REPLAY_ENV) {
        info!(cassette = %path, "replaying git from cassette");
        (ServiceContext::replaying(Path::new(&path))?, None)
    } else if let Ok(dir) = env::var(RECORD_ENV) {
        let (ctx, session) = ServiceContext::recording_at(&PathBuf::from(dir), &options)?;
        (ctx, Some(session))
    } else {
        (ServiceContext::live(&options), None)
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to start runtime: {e}"))?;
    let result = runtime.block_on(dispatch_with_context(&cli.command, &ctx, &settings));
    drop(runtime);

    // Finish recording after command completes (even on error)
    if let Some(session) = session {
        // Drop context first to release Arc references
        drop(ctx);
        finish_recording(session)?;
    }

    result
}

/// Dispatch a command with the given service context.
async fn dispatch_with_context(
    command: &Command,
    ctx: &ServiceContext,
    settings: &Settings,
) -> Result<(), String> {
    match command {
        Command::Graph { pretty } => graph::run(ctx, settings, *pretty).await,
        Command::Show { hash } => show::run(ctx, settings, hash).await,
        Command::Refs => refs::run(ctx, settings).await,
        Command::Stashes => stashes::run(ctx, settings).await,
        Command::Html { page } => html::run(ctx, settings, *page).await,
        Command::Serve { page } => serve::run(ctx, settings, *page).await,
        Command::Settings => settings::run(settings),
    }
}

/// Opens the repository or fails with the no-repository message.
pub(crate) async fn open_workspace(
    ctx: &ServiceContext,
    settings: &Settings,
) -> Result<Workspace, String> {
    Workspace::open(ctx.git.clone(), settings.git.max_count)
        .await
        .map_err(|e| e.to_string())
}

/// Serializes a command's JSON output.
pub(crate) fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<String, String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    json.map_err(|e| format!("failed to serialize output: {e}"))
}

/// Finish a recording session and report the output directory.
fn finish_recording(session: RecordingSession) -> Result<(), String> {
    let output_dir = session.finish()?;
    eprintln!("Recording saved to: {}", output_dir.display());
    Ok(())
}
