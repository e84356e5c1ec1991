//! Snapshot renderer
//!
//! Maps each incoming [`Snapshot`] onto the vote board. The board is rebuilt
//! from the snapshot alone on every call; the only state carried between
//! calls is the auto-print one-shot.
//!
//! ## Effects per render
//! - document title, meeting / agenda / date-time texts
//! - vote columns rebuilt from scratch
//! - YES / ABST / NO counters
//! - footer shown only while results are published
//! - at most one print per `"Stop"` period when auto-print is enabled

pub mod dom;
pub mod print;
pub mod view;

pub use dom::{Document, Node, NodePath, Selector};
pub use print::{auto_print_enabled, CommandPrinter, CountingPrinter, LogPrinter, Printer};
pub use view::{Column, DomView, ViewField, VoteCell, VoteView};

use crate::types::{Snapshot, VoteEntry, VoteOption};

pub struct Renderer<V, P> {
    view: V,
    printer: P,
    auto_print: bool,
    printed: bool,
}

impl<V: VoteView, P: Printer<V>> Renderer<V, P> {
    pub fn new(view: V, printer: P, auto_print: bool) -> Self {
        Self {
            view,
            printer,
            auto_print,
            printed: false,
        }
    }

    /// Apply one snapshot to the view
    pub fn render(&mut self, snapshot: &Snapshot) {
        self.view.set_document_title(snapshot.title());
        self.view.set_meeting_title(snapshot.meeting_title());
        self.view.set_agenda_title(snapshot.agenda_title());
        self.view.set_datetime(snapshot.datetime());

        self.view.replace_columns(build_columns(snapshot.columns()));

        for option in VoteOption::ALL {
            self.view
                .set_counter(option, &snapshot.count(option).to_string());
        }

        self.view.set_footer_visible(snapshot.show_results());

        if snapshot.is_stopped() {
            if self.auto_print && !self.printed {
                self.printed = true;
                if let Err(e) = self.printer.print(&self.view) {
                    log::error!("Print request failed: {}", e);
                }
            }
        } else {
            self.printed = false;
        }
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn printer(&self) -> &P {
        &self.printer
    }

    pub fn auto_print(&self) -> bool {
        self.auto_print
    }

    /// True once print fired for the current Stop period
    pub fn printed(&self) -> bool {
        self.printed
    }

    pub fn into_view(self) -> V {
        self.view
    }
}

/// Build the cell layout for every column
pub fn build_columns(columns: &[Vec<VoteEntry>]) -> Vec<Column> {
    columns
        .iter()
        .map(|column| column.iter().map(vote_cell).collect())
        .collect()
}

fn vote_cell(entry: &VoteEntry) -> VoteCell {
    VoteCell {
        class_name: format!("vote {}", entry.result().to_lowercase()),
        result: entry.result().to_string(),
        delegate: entry.delegate().to_string(),
    }
}
