//! Minimal in-memory document for the vote board
//!
//! Elements are addressed by [`NodePath`] handles: the child indices from the
//! body down to the element. The fixed layout never changes shape above the
//! vote-columns container, so handles resolved once at startup stay valid.

use std::fmt::Write;

use html_escape::{encode_double_quoted_attribute, encode_text};

/// A single element with optional text content and child elements
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Node {
    pub tag: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub text: String,
    /// Inline `display` style, `None` when unset
    pub display: Option<String>,
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    /// Set classes from a space-separated list
    pub fn with_class(mut self, class: &str) -> Self {
        self.classes = class.split_whitespace().map(str::to_string).collect();
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub fn with_display(mut self, display: &str) -> Self {
        self.display = Some(display.to_string());
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn has_classes(&self, classes: &[&str]) -> bool {
        classes.iter().all(|c| self.has_class(c))
    }

    pub fn class_name(&self) -> String {
        self.classes.join(" ")
    }

    /// Concatenated text of this node and all descendants
    pub fn text_content(&self) -> String {
        let mut out = self.text.clone();
        for child in &self.children {
            out.push_str(&child.text_content());
        }
        out
    }

    pub fn is_hidden(&self) -> bool {
        self.display.as_deref() == Some("none")
    }

    fn write_html(&self, out: &mut String, depth: usize) {
        let indent = "  ".repeat(depth);
        let _ = write!(out, "{}<{}", indent, self.tag);
        if let Some(id) = &self.id {
            let _ = write!(out, " id=\"{}\"", encode_double_quoted_attribute(id));
        }
        if !self.classes.is_empty() {
            let classes = self.class_name();
            let _ = write!(out, " class=\"{}\"", encode_double_quoted_attribute(&classes));
        }
        if let Some(display) = &self.display {
            let _ = write!(out, " style=\"display: {}\"", encode_double_quoted_attribute(display));
        }
        out.push('>');
        out.push_str(&encode_text(&self.text));
        if !self.children.is_empty() {
            out.push('\n');
            for child in &self.children {
                child.write_html(out, depth + 1);
            }
            out.push_str(&indent);
        }
        let _ = writeln!(out, "</{}>", self.tag);
    }
}

/// Handle to an element: child indices from the body root
pub type NodePath = Vec<usize>;

/// Ways the renderer locates the elements it depends on
#[derive(Debug, Clone, Copy)]
pub enum Selector<'a> {
    Id(&'a str),
    Tag(&'a str),
    /// An element with class `target` below an element carrying all `ancestor` classes
    Descendant {
        ancestor: &'a [&'a str],
        target: &'a str,
    },
}

impl Selector<'_> {
    pub fn describe(&self) -> String {
        match self {
            Selector::Id(id) => format!("#{}", id),
            Selector::Tag(tag) => tag.to_string(),
            Selector::Descendant { ancestor, target } => {
                format!(".{} .{}", ancestor.join("."), target)
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub title: String,
    /// Emit a `<meta http-equiv="refresh">` with this period when set
    pub refresh_secs: Option<u32>,
    pub stylesheet: Option<String>,
    pub body: Node,
}

impl Document {
    pub fn new(body: Node) -> Self {
        Self {
            body,
            ..Default::default()
        }
    }

    /// The vote board layout: header titles, vote columns and the results footer
    pub fn vote_board() -> Self {
        let header = Node::new("header")
            .with_child(Node::new("div").with_id("meeting-title"))
            .with_child(Node::new("div").with_id("agenda-title"))
            .with_child(Node::new("div").with_id("datetime"));

        let mut footer = Node::new("footer").with_display("none");
        for (label, class) in [("YES", "yes"), ("ABST", "abst"), ("NO", "no")] {
            footer = footer.with_child(
                Node::new("div")
                    .with_class(&format!("vote footer {}", class))
                    .with_child(Node::new("div").with_class("vote-result").with_text(label))
                    .with_child(Node::new("div").with_class("vote-count").with_text("0")),
            );
        }

        let body = Node::new("body")
            .with_child(header)
            .with_child(Node::new("main").with_id("votes"))
            .with_child(footer);
        Self::new(body)
    }

    /// Resolve a selector to a handle, depth-first
    pub fn query(&self, selector: Selector<'_>) -> Option<NodePath> {
        let mut path = Vec::new();
        if find(&self.body, selector, false, &mut path) {
            Some(path)
        } else {
            None
        }
    }

    pub fn node(&self, path: &[usize]) -> Option<&Node> {
        let mut node = &self.body;
        for &index in path {
            node = node.children.get(index)?;
        }
        Some(node)
    }

    pub fn node_mut(&mut self, path: &[usize]) -> Option<&mut Node> {
        let mut node = &mut self.body;
        for &index in path {
            node = node.children.get_mut(index)?;
        }
        Some(node)
    }

    pub fn to_html(&self) -> String {
        let mut out = String::from("<!DOCTYPE html>\n<html>\n<head>\n");
        out.push_str("  <meta charset=\"utf-8\">\n");
        if let Some(secs) = self.refresh_secs {
            let _ = writeln!(out, "  <meta http-equiv=\"refresh\" content=\"{}\">", secs);
        }
        let _ = writeln!(out, "  <title>{}</title>", encode_text(&self.title));
        if let Some(href) = &self.stylesheet {
            let href = encode_double_quoted_attribute(href);
            let _ = writeln!(out, "  <link rel=\"stylesheet\" href=\"{}\">", href);
        }
        out.push_str("</head>\n");
        self.body.write_html(&mut out, 0);
        out.push_str("</html>\n");
        out
    }
}

fn find(node: &Node, selector: Selector<'_>, inside_ancestor: bool, path: &mut NodePath) -> bool {
    let (matched, inside) = match selector {
        Selector::Id(id) => (node.id.as_deref() == Some(id), false),
        Selector::Tag(tag) => (node.tag == tag, false),
        Selector::Descendant { ancestor, target } => (
            inside_ancestor && node.has_class(target),
            inside_ancestor || node.has_classes(ancestor),
        ),
    };
    if matched {
        return true;
    }
    for (index, child) in node.children.iter().enumerate() {
        path.push(index);
        if find(child, selector, inside, path) {
            return true;
        }
        path.pop();
    }
    false
}
