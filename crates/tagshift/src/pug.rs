//! HTML → Pug conversion.

pub use tagshift_core::{Indent, PugOptions};

use crate::attributes::{map_attribute, AttributeStyle};
use crate::classify::Child;
use crate::emit::{Emit, OutputBuffer};
use crate::node::{Document, Element, HtmlParser, Node};
use crate::utilities::{collapse_whitespace, escape_text, is_preformatted, is_raw_text, is_void};
use crate::Result;

/// Converts HTML to Pug templates
#[derive(Debug, Clone, Default)]
pub struct PugConverter {
    options: PugOptions,
}

impl PugConverter {
    /// Create a converter with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a converter with custom options
    pub fn with_options(options: PugOptions) -> Self {
        Self { options }
    }

    /// Get the current options
    pub fn options(&self) -> &PugOptions {
        &self.options
    }

    /// Convert an HTML string using the bundled parser
    #[cfg(feature = "html")]
    pub fn convert(&self, html: &str) -> Result<String> {
        self.convert_with(&crate::html::ScraperParser::default(), html)
    }

    /// Convert an HTML string using a caller-supplied parser
    pub fn convert_with(&self, parser: &dyn HtmlParser, html: &str) -> Result<String> {
        tracing::debug!(input_len = html.len(), "converting HTML to Pug");
        let document = parser.parse(html)?;
        Ok(self.convert_document(&document))
    }

    /// Convert an already parsed document
    pub fn convert_document(&self, document: &Document) -> String {
        let roots = self.roots_of(document);
        let mut out = OutputBuffer::new(&self.options.indent.unit(), true);
        self.emit_children(&roots, 0, &mut out);
        out.finish()
    }

    /// Tag name, `#id` / `.class` shorthand and the remaining attributes
    fn head(&self, element: &Element) -> String {
        let mut shorthand = String::new();
        let mut attrs = Vec::new();

        for (name, value) in &element.attributes {
            match name.as_str() {
                "id" if is_identifier(value) => {
                    shorthand.push('#');
                    shorthand.push_str(value);
                }
                "class"
                    if !value.trim().is_empty() && value.split_whitespace().all(is_identifier) =>
                {
                    for class in value.split_whitespace() {
                        shorthand.push('.');
                        shorthand.push_str(class);
                    }
                }
                _ => attrs.push(map_attribute(name, value, AttributeStyle::Pug)),
            }
        }

        let mut head = if element.tag_name == "div" && !shorthand.is_empty() {
            shorthand
        } else {
            format!("{}{shorthand}", element.tag_name)
        };
        if !attrs.is_empty() {
            head.push('(');
            head.push_str(&attrs.join(", "));
            head.push(')');
        }
        head
    }

    fn emit_element(&self, element: &Element, depth: usize, out: &mut OutputBuffer) {
        let head = self.head(element);

        if is_void(&element.tag_name) {
            out.line(depth, &head);
            return;
        }
        if is_preformatted(&element.tag_name) {
            self.emit_preformatted(element, head, depth, out);
            return;
        }

        let children = self.children_of(element);
        match children.as_slice() {
            [] => out.line(depth, &head),
            [Child::Node(Node::Text(text))] if self.options.combine_text_with_tag => {
                let text = collapse_whitespace(text);
                out.line(depth, &format!("{head} {}", escape_pug_text(text.trim())));
            }
            _ => {
                out.line(depth, &head);
                self.emit_children(&children, depth + 1, out);
            }
        }
    }

    /// Write a text run as a piped line. Edge whitespace survives only on
    /// the sides that touch an inline sibling.
    fn emit_text(
        &self,
        text: &str,
        keep_leading: bool,
        keep_trailing: bool,
        depth: usize,
        out: &mut OutputBuffer,
    ) {
        let collapsed = collapse_whitespace(text);
        let mut text = collapsed.as_str();
        if !keep_leading {
            text = text.trim_start();
        }
        if !keep_trailing {
            text = text.trim_end();
        }
        if !text.is_empty() {
            out.line(depth, &format!("| {}", escape_pug_text(text)));
        }
    }

    /// pre, textarea, script and style keep their text line for line
    fn emit_preformatted(
        &self,
        element: &Element,
        head: String,
        depth: usize,
        out: &mut OutputBuffer,
    ) {
        let raw = is_raw_text(&element.tag_name);
        let escape = |line: &str| {
            if raw {
                escape_interpolation(line)
            } else {
                escape_pug_text(line)
            }
        };

        match element.children.as_slice() {
            [] => out.line(depth, &head),
            [Node::Text(text)] if text.contains('\n') => {
                out.line(depth, &format!("{head}."));
                let body = text.strip_suffix('\n').unwrap_or(text);
                for line in body.split('\n') {
                    out.line(depth + 1, &escape(line));
                }
            }
            [Node::Text(text)] => out.line(depth, &format!("{head} {}", escape(text))),
            children => {
                out.line(depth, &head);
                for child in children {
                    match child {
                        Node::Text(text) => {
                            for line in text.split('\n') {
                                let line = escape(line);
                                out.line(depth + 1, format!("| {line}").trim_end());
                            }
                        }
                        Node::Element(inner) if is_void(&inner.tag_name) => {
                            out.line(depth + 1, &self.head(inner));
                        }
                        Node::Element(inner) => {
                            self.emit_preformatted(inner, self.head(inner), depth + 1, out);
                        }
                        Node::Comment(comment) if self.options.preserve_comments => {
                            out.line(depth + 1, &pug_comment(comment));
                        }
                        Node::Comment(_) => {}
                    }
                }
            }
        }
    }
}

impl Emit for PugConverter {
    fn preserve_comments(&self) -> bool {
        self.options.preserve_comments
    }

    fn emit_node(&self, node: &Node, depth: usize, out: &mut OutputBuffer) {
        match node {
            Node::Element(element) => self.emit_element(element, depth, out),
            Node::Text(text) => self.emit_text(text, false, false, depth, out),
            Node::Comment(comment) => out.line(depth, &pug_comment(comment)),
        }
    }

    fn emit_space(&self, depth: usize, out: &mut OutputBuffer) {
        out.line(depth, "= \" \"");
    }

    fn emit_children(&self, children: &[Child<'_>], depth: usize, out: &mut OutputBuffer) {
        for (i, child) in children.iter().enumerate() {
            match child {
                Child::Node(Node::Text(text)) => {
                    let keep_leading = i > 0 && children[i - 1].flows_inline();
                    let keep_trailing = children.get(i + 1).is_some_and(Child::flows_inline);
                    self.emit_text(text, keep_leading, keep_trailing, depth, out);
                }
                Child::Node(node) => self.emit_node(node, depth, out),
                Child::Space => self.emit_space(depth, out),
            }
        }
    }
}

/// Pug shorthand accepts letters, digits, `-` and `_`, not starting with a digit
fn is_identifier(value: &str) -> bool {
    !value.is_empty()
        && !value.starts_with(|c: char| c.is_ascii_digit())
        && value.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Escape text for Pug: HTML specials plus interpolation openers
fn escape_pug_text(text: &str) -> String {
    escape_interpolation(&escape_text(text))
}

fn escape_interpolation(text: &str) -> String {
    text.replace("#{", "\\#{").replace("#[", "\\#[")
}

fn pug_comment(comment: &str) -> String {
    format!("// {}", collapse_whitespace(comment).trim())
}
