//! View handles the renderer writes into

use crate::error::{MonitorError, MonitorResult};
use crate::types::VoteOption;

use super::dom::{Document, Node, NodePath, Selector};

/// One rendered delegate/result pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteCell {
    /// Full class attribute, e.g. `"vote yes"`
    pub class_name: String,
    pub result: String,
    pub delegate: String,
}

pub type Column = Vec<VoteCell>;

/// The fixed page elements a renderer updates
pub trait VoteView {
    fn set_document_title(&mut self, title: &str);
    fn set_meeting_title(&mut self, text: &str);
    fn set_agenda_title(&mut self, text: &str);
    fn set_datetime(&mut self, text: &str);
    /// Drop every existing column and insert `columns` in order
    fn replace_columns(&mut self, columns: Vec<Column>);
    fn set_counter(&mut self, option: VoteOption, text: &str);
    fn set_footer_visible(&mut self, visible: bool);
}

#[derive(Debug, Clone)]
struct Handles {
    votes: NodePath,
    meeting: NodePath,
    agenda: NodePath,
    datetime: NodePath,
    footer: NodePath,
    yes: NodePath,
    abst: NodePath,
    no: NodePath,
}

/// [`VoteView`] over an in-memory [`Document`]
#[derive(Debug, Clone)]
pub struct DomView {
    doc: Document,
    handles: Handles,
}

impl DomView {
    /// Locate every required element, failing on the first one missing
    pub fn attach(doc: Document) -> MonitorResult<Self> {
        let counter = |ancestor: &'static [&'static str]| {
            lookup(
                &doc,
                Selector::Descendant {
                    ancestor,
                    target: "vote-count",
                },
            )
        };

        let handles = Handles {
            votes: lookup(&doc, Selector::Id("votes"))?,
            meeting: lookup(&doc, Selector::Id("meeting-title"))?,
            agenda: lookup(&doc, Selector::Id("agenda-title"))?,
            datetime: lookup(&doc, Selector::Id("datetime"))?,
            footer: lookup(&doc, Selector::Tag("footer"))?,
            yes: counter(&["vote", "footer", "yes"])?,
            abst: counter(&["vote", "footer", "abst"])?,
            no: counter(&["vote", "footer", "no"])?,
        };
        Ok(Self { doc, handles })
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    pub fn into_document(self) -> Document {
        self.doc
    }

    /// The vote-columns container
    pub fn columns_node(&self) -> &Node {
        self.node(&self.handles.votes)
    }

    pub fn footer_node(&self) -> &Node {
        self.node(&self.handles.footer)
    }

    pub fn text_of(&self, field: ViewField) -> String {
        let path = match field {
            ViewField::Meeting => &self.handles.meeting,
            ViewField::Agenda => &self.handles.agenda,
            ViewField::Datetime => &self.handles.datetime,
            ViewField::Counter(option) => self.counter_path(option),
        };
        self.node(path).text_content()
    }

    fn counter_path(&self, option: VoteOption) -> &NodePath {
        match option {
            VoteOption::Yes => &self.handles.yes,
            VoteOption::Abst => &self.handles.abst,
            VoteOption::No => &self.handles.no,
        }
    }

    fn node(&self, path: &[usize]) -> &Node {
        // Handles were resolved against this document and the layout above
        // the columns container never changes.
        self.doc.node(path).unwrap_or(&self.doc.body)
    }

    fn set_text(&mut self, path: NodePath, text: &str) {
        if let Some(node) = self.doc.node_mut(&path) {
            node.text = text.to_string();
        }
    }
}

fn lookup(doc: &Document, selector: Selector<'_>) -> MonitorResult<NodePath> {
    doc.query(selector)
        .ok_or_else(|| MonitorError::MissingElement(selector.describe()))
}

/// Text-bearing elements that can be read back from a [`DomView`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewField {
    Meeting,
    Agenda,
    Datetime,
    Counter(VoteOption),
}

impl VoteView for DomView {
    fn set_document_title(&mut self, title: &str) {
        self.doc.title = title.to_string();
    }

    fn set_meeting_title(&mut self, text: &str) {
        self.set_text(self.handles.meeting.clone(), text);
    }

    fn set_agenda_title(&mut self, text: &str) {
        self.set_text(self.handles.agenda.clone(), text);
    }

    fn set_datetime(&mut self, text: &str) {
        self.set_text(self.handles.datetime.clone(), text);
    }

    fn replace_columns(&mut self, columns: Vec<Column>) {
        let children = columns
            .into_iter()
            .map(|column| {
                column.into_iter().fold(Node::new("div").with_class("column"), |col, cell| {
                    col.with_child(
                        Node::new("div")
                            .with_class(&cell.class_name)
                            .with_child(
                                Node::new("div").with_class("vote-result").with_text(&cell.result),
                            )
                            .with_child(
                                Node::new("div").with_class("vote-label").with_text(&cell.delegate),
                            ),
                    )
                })
            })
            .collect();
        if let Some(votes) = self.doc.node_mut(&self.handles.votes) {
            votes.children = children;
        }
    }

    fn set_counter(&mut self, option: VoteOption, text: &str) {
        let path = self.counter_path(option).clone();
        self.set_text(path, text);
    }

    fn set_footer_visible(&mut self, visible: bool) {
        if let Some(footer) = self.doc.node_mut(&self.handles.footer) {
            footer.display = Some(if visible { "flex" } else { "none" }.to_string());
        }
    }
}
