//! `gitree html` command.

use crate::config::Settings;
use crate::context::ServiceContext;
use crate::pages::{self, PageKind};
use crate::webview::html;

/// Execute the `html` command.
///
/// The graph page is only rendered inside a repository; the settings page
/// renders anywhere.
///
/// # Errors
///
/// Returns an error string if the graph page is requested outside a
/// repository or rendering fails.
pub async fn run(ctx: &ServiceContext, settings: &Settings, kind: PageKind) -> Result<(), String> {
    if kind.needs_repository() {
        super::open_workspace(ctx, settings).await?;
    }
    let page = pages::build(kind, None);
    let document = html::render(
        &page,
        &settings.webview_config(),
        &settings.assets.resource_uri,
        ctx.id_gen.as_ref(),
    )
    .map_err(|e| format!("failed to render page: {e}"))?;
    print!("{document}");
    Ok(())
}
