//! Server-rendered vote board
//!
//! `/` and `/noautoprint` serve the same read-only board for the latest
//! snapshot, built by the same [`Renderer`] the display client uses. The page
//! carries no script: browsers pick up new snapshots through a periodic
//! refresh and never print. Printing, and the `/noautoprint` opt-out, belong
//! to `vote-display`, which reads its policy from the URL it is given.

use crate::error::MonitorResult;
use crate::render::{Document, DomView, LogPrinter, Renderer};
use crate::types::Snapshot;

/// Seconds between browser reloads of the board
pub const PAGE_REFRESH_SECS: u32 = 2;

/// Render `snapshot` into a full HTML page
pub fn render_page(snapshot: &Snapshot) -> MonitorResult<String> {
    let mut doc = Document::vote_board();
    doc.refresh_secs = Some(PAGE_REFRESH_SECS);

    let view = DomView::attach(doc)?;
    let mut renderer = Renderer::new(view, LogPrinter, false);
    renderer.render(snapshot);
    Ok(renderer.into_view().into_document().to_html())
}
