//! Display client: one WebSocket to the monitor, one renderer
//!
//! Each text frame is decoded as a [`Snapshot`] and rendered before the
//! next frame is read. Undecodable frames are logged and dropped. The
//! connection is never re-established: when it ends, [`listen`] returns
//! and the caller decides what to do.

use futures::StreamExt;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use url::Url;

use crate::error::{MonitorError, MonitorResult};
use crate::render::{auto_print_enabled, Printer, Renderer, VoteView};
use crate::types::Snapshot;

/// Where a display connects and whether it auto-prints, derived from its page URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayTarget {
    pub ws_url: String,
    pub auto_print: bool,
}

impl DisplayTarget {
    /// `http://host:8000/noautoprint` → `ws://host:8000/ws`, auto-print off
    pub fn from_page_url(page_url: &str) -> MonitorResult<Self> {
        let url = Url::parse(page_url)?;
        let host = url
            .host_str()
            .ok_or_else(|| MonitorError::Config(format!("no host in {}", page_url)))?;
        let host = match url.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        };
        Ok(Self {
            ws_url: format!("ws://{}/ws", host),
            auto_print: auto_print_enabled(url.path()),
        })
    }
}

/// Decode and render one text frame. Returns the snapshot when it was rendered.
pub fn dispatch<V, P>(renderer: &mut Renderer<V, P>, text: &str) -> Option<Snapshot>
where
    V: VoteView,
    P: Printer<V>,
{
    match Snapshot::from_json(text) {
        Ok(snapshot) => {
            renderer.render(&snapshot);
            Some(snapshot)
        }
        Err(e) => {
            log::warn!("Discarding malformed snapshot: {}", e);
            None
        }
    }
}

/// Connect to `ws_url` and render every snapshot until the stream ends.
///
/// `after_render` runs after each successful render, e.g. to persist the
/// board. Always returns an error describing why the stream stopped.
pub async fn listen<V, P, F>(
    ws_url: &str,
    renderer: &mut Renderer<V, P>,
    mut after_render: F,
) -> MonitorResult<()>
where
    V: VoteView,
    P: Printer<V>,
    F: FnMut(&Renderer<V, P>, &Snapshot),
{
    let (mut stream, _) = connect_async(ws_url).await?;
    log::info!("Connected to {}", ws_url);

    while let Some(message) = stream.next().await {
        match message? {
            Message::Text(text) => {
                if let Some(snapshot) = dispatch(renderer, text.as_str()) {
                    after_render(renderer, &snapshot);
                }
            }
            Message::Close(frame) => {
                let reason = frame
                    .map(|f| f.reason.as_str().to_string())
                    .unwrap_or_else(|| "no reason given".to_string());
                return Err(MonitorError::Closed(reason));
            }
            // Pings are answered by the protocol layer
            _ => {}
        }
    }
    Err(MonitorError::Closed("stream ended".to_string()))
}
