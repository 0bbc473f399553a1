//! Output buffer and traversal shared by the tree-walking converters.

use crate::classify::{significant_children, Child};
use crate::node::{Document, Element, Node};

/// Append-only output for one conversion
#[derive(Debug)]
pub struct OutputBuffer {
    out: String,
    indent: String,
    prettify: bool,
}

impl OutputBuffer {
    /// Create a buffer. `indent` is written once per depth level when
    /// `prettify` is on; otherwise lines are concatenated.
    pub fn new(indent: &str, prettify: bool) -> Self {
        Self {
            out: String::with_capacity(1024),
            indent: indent.to_string(),
            prettify,
        }
    }

    /// Start a new line at `depth` and write `text` on it
    pub fn line(&mut self, depth: usize, text: &str) {
        if self.prettify {
            if !self.out.is_empty() {
                self.out.push('\n');
            }
            if !text.is_empty() {
                for _ in 0..depth {
                    self.out.push_str(&self.indent);
                }
            }
        }
        self.out.push_str(text);
    }

    /// Whether lines are separated and indented
    pub fn is_pretty(&self) -> bool {
        self.prettify
    }

    /// Consume the buffer and return the text
    pub fn finish(self) -> String {
        self.out
    }
}

/// A target format that can be written one node at a time.
///
/// Implementors decide how each node looks; the traversal order (document
/// order, children after their parent, whitespace handled by
/// [`significant_children`]) is shared.
pub trait Emit {
    /// Whether comment nodes reach `emit_node`
    fn preserve_comments(&self) -> bool;

    /// Write one node (and, for elements, its subtree) at `depth`
    fn emit_node(&self, node: &Node, depth: usize, out: &mut OutputBuffer);

    /// Write a collapsed whitespace run that sits between inline siblings
    fn emit_space(&self, depth: usize, out: &mut OutputBuffer);

    /// The children this emitter visits for an element
    fn children_of<'a>(&self, element: &'a Element) -> Vec<Child<'a>> {
        significant_children(&element.children, self.preserve_comments())
    }

    /// The root nodes this emitter visits for a document
    fn roots_of<'a>(&self, document: &'a Document) -> Vec<Child<'a>> {
        significant_children(&document.children, self.preserve_comments())
    }

    /// Write a list of children, each starting at `depth`
    fn emit_children(&self, children: &[Child<'_>], depth: usize, out: &mut OutputBuffer) {
        for child in children {
            match child {
                Child::Node(node) => self.emit_node(node, depth, out),
                Child::Space => self.emit_space(depth, out),
            }
        }
    }
}
