//! Webview hosting: pages, the host event loop, document rendering and
//! scoped resource release.

pub mod host;
pub mod html;
pub mod page;
pub mod subscriptions;

pub use host::{HostEvent, WebviewHost};
pub use page::{HandlerFuture, MessageHandler, Page};
pub use subscriptions::Subscriptions;
