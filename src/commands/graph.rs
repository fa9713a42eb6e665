//! `gitree graph` command.

use crate::config::Settings;
use crate::context::ServiceContext;

/// Execute the `graph` command.
///
/// Prints refs and history as one JSON snapshot, the payload the graph
/// page receives in its `commits` message.
///
/// # Errors
///
/// Returns an error string if no repository is open or a git query fails.
pub async fn run(ctx: &ServiceContext, settings: &Settings, pretty: bool) -> Result<(), String> {
    let workspace = super::open_workspace(ctx, settings).await?;
    let snapshot = workspace.api().snapshot().await.map_err(|e| e.to_string())?;
    println!("{}", super::to_json(&snapshot, pretty)?);
    Ok(())
}
