//! `gitree show` command.

use crate::config::Settings;
use crate::context::ServiceContext;

/// Execute the `show` command.
///
/// # Errors
///
/// Returns an error string if no repository is open, the revision is
/// rejected or git fails.
pub async fn run(ctx: &ServiceContext, settings: &Settings, hash: &str) -> Result<(), String> {
    let workspace = super::open_workspace(ctx, settings).await?;
    let commit = workspace.api().show(hash).await.map_err(|e| e.to_string())?;
    println!("{}", super::to_json(&commit, true)?);
    Ok(())
}
