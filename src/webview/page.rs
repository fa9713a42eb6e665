//! Pages a host can show.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::protocol::{ExtensionMessage, PageMessage};

/// Boxed future returned by [`MessageHandler::handle`].
pub type HandlerFuture<'a> = Pin<Box<dyn Future<Output = Vec<ExtensionMessage>> + Send + 'a>>;

/// Answers messages coming from a page.
pub trait MessageHandler: Send + Sync {
    /// Handles one message and returns the replies to post, in order.
    fn handle(&self, message: PageMessage) -> HandlerFuture<'_>;
}

/// A page: what the document is called, which assets it loads and who
/// answers its messages.
#[derive(Clone)]
pub struct Page {
    /// Window or view title.
    pub title: String,
    /// Asset stem: the page loads `css/<path>.css` and `js/<path>.js`.
    pub path: String,
    /// Message handler; pages without one ignore incoming messages.
    pub handler: Option<Arc<dyn MessageHandler>>,
}

impl Page {
    /// A page without a message handler.
    pub fn new(title: impl Into<String>, path: impl Into<String>) -> Self {
        Self { title: title.into(), path: path.into(), handler: None }
    }

    /// Attaches a message handler.
    #[must_use]
    pub fn with_handler(mut self, handler: Arc<dyn MessageHandler>) -> Self {
        self.handler = Some(handler);
        self
    }
}

impl std::fmt::Debug for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Page")
            .field("title", &self.title)
            .field("path", &self.path)
            .field("handler", &self.handler.is_some())
            .finish()
    }
}
