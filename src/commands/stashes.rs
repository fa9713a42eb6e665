//! `gitree stashes` command.

use crate::config::Settings;
use crate::context::ServiceContext;
use crate::git::Stash;

/// Execute the `stashes` command.
///
/// # Errors
///
/// Returns an error string if no repository is open or `git stash list` fails.
pub async fn run(ctx: &ServiceContext, settings: &Settings) -> Result<(), String> {
    let workspace = super::open_workspace(ctx, settings).await?;
    let stashes = workspace.api().stashes().await.map_err(|e| e.to_string())?;
    print!("{}", render(&stashes));
    Ok(())
}

/// One `<name>  <hash>` line per entry, newest first as git lists them.
#[must_use]
pub fn render(stashes: &[Stash]) -> String {
    if stashes.is_empty() {
        return "No stashes.\n".to_string();
    }
    let width = stashes.iter().map(|s| s.name.len()).max().unwrap_or(0);
    stashes.iter().map(|s| format!("{:<width$}  {}\n", s.name, s.hash)).collect()
}
