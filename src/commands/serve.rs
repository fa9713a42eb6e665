//! `gitree serve` command: the message protocol over stdio.
//!
//! Every stdin line is one [`PageMessage`] as JSON; every stdout line is
//! one [`ExtensionMessage`]. End of input stops the host. On unix,
//! `SIGHUP` posts a `refresh` to the page.

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::config::Settings;
use crate::context::ServiceContext;
use crate::pages::{self, PageKind};
use crate::protocol::{ExtensionMessage, PageMessage};
use crate::webview::{HostEvent, Page, WebviewHost};

/// Execute the `serve` command.
///
/// # Errors
///
/// Returns an error string if the graph page is requested outside a
/// repository or stdout cannot be written.
pub async fn run(ctx: &ServiceContext, settings: &Settings, kind: PageKind) -> Result<(), String> {
    let api = if kind.needs_repository() {
        Some(super::open_workspace(ctx, settings).await?.api().clone())
    } else {
        None
    };
    serve(pages::build(kind, api), tokio::io::stdin(), tokio::io::stdout()).await
}

/// Hosts `page`, reading page messages from `input` and writing replies to
/// `output`, until `input` ends.
///
/// # Errors
///
/// Returns an error string if `output` cannot be written.
pub async fn serve<R, W>(page: Page, input: R, output: W) -> Result<(), String>
where
    R: AsyncRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (out_tx, out_rx) = mpsc::unbounded_channel();
    let (event_tx, event_rx) = mpsc::unbounded_channel();

    let writer = tokio::spawn(write_messages(out_rx, output));
    let mut host = WebviewHost::new(page, out_tx);
    #[cfg(unix)]
    host.subscriptions_mut().push_task(tokio::spawn(forward_hangups(event_tx.downgrade())));
    host.subscriptions_mut().push_task(tokio::spawn(read_messages(input, event_tx)));

    host.run(event_rx).await;

    writer
        .await
        .map_err(|e| format!("output task failed: {e}"))?
        .map_err(|e| format!("failed to write message: {e}"))
}

async fn read_messages<R: AsyncRead + Unpin>(input: R, events: mpsc::UnboundedSender<HostEvent>) {
    let mut lines = BufReader::new(input).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                warn!(error = %e, "failed to read page message");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        let event = match serde_json::from_str::<PageMessage>(&line) {
            Ok(message) => HostEvent::Message(message),
            Err(e) => {
                warn!(error = %e, line = %line, "invalid page message");
                HostEvent::Invalid(e.to_string())
            }
        };
        if events.send(event).is_err() {
            break;
        }
    }
    debug!("page input closed");
}

async fn write_messages<W: AsyncWrite + Unpin>(
    mut messages: mpsc::UnboundedReceiver<ExtensionMessage>,
    mut output: W,
) -> std::io::Result<()> {
    while let Some(message) = messages.recv().await {
        let mut line = serde_json::to_vec(&message).map_err(std::io::Error::other)?;
        line.push(b'\n');
        output.write_all(&line).await?;
        output.flush().await?;
    }
    output.shutdown().await
}

#[cfg(unix)]
async fn forward_hangups(events: mpsc::WeakUnboundedSender<HostEvent>) {
    use tokio::signal::unix::{signal, SignalKind};

    let mut hangups = match signal(SignalKind::hangup()) {
        Ok(hangups) => hangups,
        Err(e) => {
            warn!(error = %e, "cannot listen for SIGHUP; refresh by signal disabled");
            return;
        }
    };
    while hangups.recv().await.is_some() {
        let Some(events) = events.upgrade() else { break };
        debug!("SIGHUP received");
        if events.send(HostEvent::Refresh).is_err() {
            break;
        }
    }
}
