//! Event loop connecting a page to its message handler.

use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

use super::page::Page;
use super::subscriptions::Subscriptions;
use crate::protocol::{ExtensionMessage, PageMessage};

/// Something that happened to the hosted page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// The page posted a message.
    Message(PageMessage),
    /// The page was shown or hidden.
    VisibilityChanged(bool),
    /// The user asked for a reload from outside the page.
    Refresh,
    /// The page sent something that is not a page message; carries the
    /// decoding error.
    Invalid(String),
}

/// Hosts one page: feeds its events to the page's handler one at a time
/// and posts the replies to the outbound channel.
#[derive(Debug)]
pub struct WebviewHost {
    page: Page,
    outbox: mpsc::UnboundedSender<ExtensionMessage>,
    visible: bool,
    subscriptions: Subscriptions,
}

impl WebviewHost {
    /// Hosts `page`, posting messages to `outbox`.
    #[must_use]
    pub fn new(page: Page, outbox: mpsc::UnboundedSender<ExtensionMessage>) -> Self {
        Self { page, outbox, visible: true, subscriptions: Subscriptions::new() }
    }

    /// The hosted page.
    #[must_use]
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Whether the page was last reported visible.
    #[must_use]
    pub fn visible(&self) -> bool {
        self.visible
    }

    /// Resources released when the host is dropped.
    pub fn subscriptions_mut(&mut self) -> &mut Subscriptions {
        &mut self.subscriptions
    }

    /// Posts a message to the page. Returns `false` when nobody listens
    /// anymore.
    pub fn post(&self, message: ExtensionMessage) -> bool {
        match self.outbox.send(message) {
            Ok(()) => true,
            Err(mpsc::error::SendError(message)) => {
                debug!(?message, "page is gone; message dropped");
                false
            }
        }
    }

    /// Tells the page to reload.
    pub fn refresh(&self) -> bool {
        self.post(ExtensionMessage::Refresh)
    }

    /// Processes one event to completion.
    #[instrument(skip(self), fields(page = %self.page.path))]
    pub async fn handle(&mut self, event: HostEvent) {
        match event {
            HostEvent::Message(message) => {
                let Some(handler) = self.page.handler.clone() else {
                    debug!(?message, "page has no handler; message ignored");
                    return;
                };
                for reply in handler.handle(message).await {
                    if !self.post(reply) {
                        break;
                    }
                }
            }
            HostEvent::VisibilityChanged(visible) => {
                if self.visible != visible {
                    debug!(visible, "visibility changed");
                    self.visible = visible;
                }
            }
            HostEvent::Refresh => {
                self.refresh();
            }
            HostEvent::Invalid(reason) => {
                let message = format!("invalid message: {reason}");
                self.post(ExtensionMessage::Error { id: None, message });
            }
        }
    }

    /// Processes events in arrival order until every sender of `inbox` is
    /// gone, then releases the host's subscriptions.
    pub async fn run(mut self, mut inbox: mpsc::UnboundedReceiver<HostEvent>) {
        info!(page = %self.page.path, "host started");
        while let Some(event) = inbox.recv().await {
            self.handle(event).await;
        }
        self.subscriptions.dispose();
        info!(page = %self.page.path, "host stopped");
    }
}

impl Drop for WebviewHost {
    fn drop(&mut self) {
        if !self.subscriptions.is_empty() {
            warn!(pending = self.subscriptions.len(), "host dropped while running; disposing");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::CommitParams;
    use crate::webview::page::{HandlerFuture, MessageHandler};
    use pretty_assertions::assert_eq;
    use std::sync::{Arc, Mutex};

    /// Replies with an error message naming each request.
    struct Echo {
        seen: Mutex<Vec<PageMessage>>,
    }

    impl MessageHandler for Echo {
        fn handle(&self, message: PageMessage) -> HandlerFuture<'_> {
            Box::pin(async move {
                self.seen.lock().unwrap().push(message.clone());
                // Yield so a concurrent handler would interleave.
                tokio::task::yield_now().await;
                let id = match &message {
                    PageMessage::GetCommit { id, .. } => Some(*id),
                    _ => None,
                };
                vec![ExtensionMessage::Error { id, message: format!("{message:?}") }]
            })
        }
    }

    fn get(id: u64, hash: &str) -> HostEvent {
        let params = CommitParams { hash: hash.into() };
        HostEvent::Message(PageMessage::GetCommit { id, params })
    }

    #[tokio::test]
    async fn replies_follow_event_order() {
        let echo = Arc::new(Echo { seen: Mutex::new(Vec::new()) });
        let page = Page::new("Test", "Test").with_handler(echo.clone());
        let (out_tx, mut out_rx) = mpsc::unbounded_channel();
        let (in_tx, in_rx) = mpsc::unbounded_channel();

        for event in [get(1, "a"), HostEvent::Refresh, get(2, "b")] {
            in_tx.send(event).unwrap();
        }
        drop(in_tx);
        WebviewHost::new(page, out_tx).run(in_rx).await;

        let mut ids = Vec::new();
        while let Some(message) = out_rx.recv().await {
            ids.push(match message {
                ExtensionMessage::Error { id, .. } => id,
                ExtensionMessage::Refresh => None,
                other => panic!("unexpected {other:?}"),
            });
        }
        assert_eq!(ids, [Some(1), None, Some(2)]);
        assert_eq!(echo.seen.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn invalid_input_is_answered_after_earlier_requests() {
        let echo = Arc::new(Echo { seen: Mutex::new(Vec::new()) });
        let page = Page::new("Test", "Test").with_handler(echo);
        let (out_tx, mut out_rx) = mpsc::unbounded_channel();
        let (in_tx, in_rx) = mpsc::unbounded_channel();

        in_tx.send(get(1, "a")).unwrap();
        in_tx.send(HostEvent::Invalid("expected value".into())).unwrap();
        drop(in_tx);
        WebviewHost::new(page, out_tx).run(in_rx).await;

        assert!(matches!(out_rx.recv().await, Some(ExtensionMessage::Error { id: Some(1), .. })));
        assert_eq!(
            out_rx.recv().await,
            Some(ExtensionMessage::Error {
                id: None,
                message: "invalid message: expected value".into()
            })
        );
    }

    #[tokio::test]
    async fn pages_without_handler_ignore_messages() {
        let (out_tx, mut out_rx) = mpsc::unbounded_channel();
        let mut host = WebviewHost::new(Page::new("Settings", "Settings"), out_tx);

        host.handle(HostEvent::Message(PageMessage::Init)).await;
        host.handle(HostEvent::VisibilityChanged(false)).await;
        assert!(!host.visible());
        drop(host);

        assert_eq!(out_rx.recv().await, None);
    }

    #[tokio::test]
    async fn run_disposes_subscriptions_when_inbox_closes() {
        let disposed = Arc::new(Mutex::new(false));
        let (out_tx, _out_rx) = mpsc::unbounded_channel();
        let (in_tx, in_rx) = mpsc::unbounded_channel::<HostEvent>();
        let mut host = WebviewHost::new(Page::new("Graph", "Graph"), out_tx);
        let flag = Arc::clone(&disposed);
        host.subscriptions_mut().push(move || *flag.lock().unwrap() = true);

        drop(in_tx);
        host.run(in_rx).await;
        assert!(*disposed.lock().unwrap());
    }

    #[test]
    fn post_reports_closed_outbox() {
        let (out_tx, out_rx) = mpsc::unbounded_channel();
        let host = WebviewHost::new(Page::new("Graph", "Graph"), out_tx);
        assert!(host.refresh());
        drop(out_rx);
        assert!(!host.refresh());
    }
}
