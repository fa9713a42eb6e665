//! `gitree refs` command.

use crate::config::Settings;
use crate::context::ServiceContext;
use crate::git::RefSet;

/// Execute the `refs` command.
///
/// Displays a table of HEAD, branches, tags and remote branches, followed
/// by the `show-ref` lines that could not be classified.
///
/// # Errors
///
/// Returns an error string if no repository is open or `git show-ref` fails.
pub async fn run(ctx: &ServiceContext, settings: &Settings) -> Result<(), String> {
    let workspace = super::open_workspace(ctx, settings).await?;
    let refs = workspace.api().refs().await.map_err(|e| e.to_string())?;
    print!("{}", render(&refs));
    Ok(())
}

/// Formats refs as an aligned `KIND NAME HASH` table.
#[must_use]
pub fn render(refs: &RefSet) -> String {
    let mut rows: Vec<(&str, String, &str)> = Vec::new();
    if let Some(head) = &refs.head {
        rows.push(("head", "HEAD".to_string(), head.as_str()));
    }
    rows.extend(refs.branches.iter().map(|r| ("branch", r.name.clone(), r.hash.as_str())));
    rows.extend(refs.tags.iter().map(|r| ("tag", r.name.clone(), r.hash.as_str())));
    for remote in &refs.remotes {
        if let Some(head) = &remote.head {
            rows.push(("remote", format!("{}/HEAD", remote.name), head.as_str()));
        }
        rows.extend(remote.branches.iter().map(|r| {
            ("remote", format!("{}/{}", remote.name, r.name), r.hash.as_str())
        }));
    }

    if rows.is_empty() && refs.warnings.is_empty() {
        return "No refs found.\n".to_string();
    }

    let kind_width = rows.iter().map(|r| r.0.len()).max().unwrap_or(4).max(4);
    let name_width = rows.iter().map(|r| r.1.len()).max().unwrap_or(4).max(4);

    let mut out = format!("{:<kind_width$}  {:<name_width$}  HASH\n", "KIND", "NAME");
    out.push_str(&format!("{:-<kind_width$}  {:-<name_width$}  ----\n", "", ""));
    for (kind, name, hash) in &rows {
        out.push_str(&format!("{kind:<kind_width$}  {name:<name_width$}  {hash}\n"));
    }

    if !refs.warnings.is_empty() {
        out.push_str(&format!("\n{} line(s) skipped:\n", refs.warnings.len()));
        for warning in &refs.warnings {
            out.push_str(&format!("  {warning}\n"));
        }
    }
    out
}
