//! The graph and settings pages.

use std::sync::Arc;

use clap::ValueEnum;
use tracing::{instrument, warn};

use crate::git::GitApi;
use crate::protocol::{ExtensionMessage, PageMessage};
use crate::webview::{HandlerFuture, MessageHandler, Page};

/// Product name shown in titles.
pub const NAME: &str = "Gitree";

/// Which page to render or serve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum PageKind {
    /// The commit graph.
    #[default]
    Graph,
    /// The settings panel.
    Settings,
}

impl PageKind {
    /// Whether the page reads from a repository.
    #[must_use]
    pub fn needs_repository(self) -> bool {
        matches!(self, Self::Graph)
    }
}

/// Answers graph page requests from the repository.
pub struct GraphHandler {
    api: GitApi,
}

impl GraphHandler {
    /// Serves the graph from `api`.
    #[must_use]
    pub fn new(api: GitApi) -> Self {
        Self { api }
    }

    async fn commits(&self) -> ExtensionMessage {
        match self.api.snapshot().await {
            Ok(data) => ExtensionMessage::Commits { data },
            Err(e) => {
                warn!(error = %e, "graph load failed");
                ExtensionMessage::Error { id: None, message: e.to_string() }
            }
        }
    }

    #[instrument(skip(self))]
    async fn commit(&self, id: u64, hash: &str) -> ExtensionMessage {
        match self.api.show(hash).await {
            Ok(data) => ExtensionMessage::Commit { id, data },
            Err(e) => {
                warn!(error = %e, "commit lookup failed");
                ExtensionMessage::Error { id: Some(id), message: e.to_string() }
            }
        }
    }
}

impl MessageHandler for GraphHandler {
    fn handle(&self, message: PageMessage) -> HandlerFuture<'_> {
        Box::pin(async move {
            let reply = match message {
                PageMessage::Init | PageMessage::Refresh => self.commits().await,
                PageMessage::GetCommit { id, params } => self.commit(id, &params.hash).await,
            };
            vec![reply]
        })
    }
}

/// The graph page, answering from `api`.
#[must_use]
pub fn graph_page(api: GitApi) -> Page {
    Page::new(NAME, "Graph").with_handler(Arc::new(GraphHandler::new(api)))
}

/// The settings page. It posts nothing the host has to answer.
#[must_use]
pub fn settings_page() -> Page {
    Page::new(format!("{NAME} Settings"), "Settings")
}

/// Builds the page of the given kind. `api` is only used by the graph.
#[must_use]
pub fn build(kind: PageKind, api: Option<GitApi>) -> Page {
    match (kind, api) {
        (PageKind::Graph, Some(api)) => graph_page(api),
        (PageKind::Graph, None) => Page::new(NAME, "Graph"),
        (PageKind::Settings, _) => settings_page(),
    }
}
