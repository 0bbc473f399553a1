//! HTML → JSX conversion.

pub use tagshift_core::JsxOptions;

use crate::attributes::{map_attributes, AttributeStyle};
use crate::classify::Child;
use crate::emit::{Emit, OutputBuffer};
use crate::node::{Document, Element, HtmlParser, Node};
use crate::utilities::{collapse_whitespace, is_preformatted, is_raw_text, is_void};
use crate::Result;

const INDENT: &str = "  ";
/// An explicit space that survives JSX line trimming
const SPACE: &str = "{\" \"}";

/// Converts HTML to JSX markup
#[derive(Debug, Clone, Default)]
pub struct JsxConverter {
    options: JsxOptions,
}

impl JsxConverter {
    /// Create a converter with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a converter with custom options
    pub fn with_options(options: JsxOptions) -> Self {
        Self { options }
    }

    /// Get the current options
    pub fn options(&self) -> &JsxOptions {
        &self.options
    }

    /// Convert an HTML string using the bundled parser
    #[cfg(feature = "html")]
    pub fn convert(&self, html: &str) -> Result<String> {
        self.convert_with(&crate::html::ScraperParser::default(), html)
    }

    /// Convert an HTML string using a caller-supplied parser
    pub fn convert_with(&self, parser: &dyn HtmlParser, html: &str) -> Result<String> {
        tracing::debug!(input_len = html.len(), "converting HTML to JSX");
        let document = parser.parse(html)?;
        Ok(self.convert_document(&document))
    }

    /// Convert an already parsed document
    pub fn convert_document(&self, document: &Document) -> String {
        let roots = self.roots_of(document);
        if roots.is_empty() {
            return String::new();
        }

        let mut out = OutputBuffer::new(INDENT, self.options.prettify);
        if roots.len() > 1 && self.options.use_fragment_wrapper {
            out.line(0, "<>");
            self.emit_children(&roots, 1, &mut out);
            out.line(0, "</>");
        } else {
            self.emit_children(&roots, 0, &mut out);
        }
        out.finish()
    }

    /// `<tag attr="…"` without the closing `>`
    fn open_tag(&self, element: &Element) -> String {
        let style = AttributeStyle::Jsx {
            camel_case: self.options.camel_case_attributes,
        };
        let attrs = map_attributes(element, style);
        if attrs.is_empty() {
            format!("<{}", element.tag_name)
        } else {
            format!("<{} {}", element.tag_name, attrs.join(" "))
        }
    }

    fn emit_element(&self, element: &Element, depth: usize, out: &mut OutputBuffer) {
        let tag = &element.tag_name;
        let open = self.open_tag(element);

        // Void elements never get children, even if the parser attached some
        if is_void(tag) {
            out.line(depth, &format!("{open} />"));
            return;
        }
        if is_preformatted(tag) {
            out.line(depth, &format!("{open}>{}</{tag}>", self.preformatted(element)));
            return;
        }

        let children = self.children_of(element);
        if children.is_empty() {
            out.line(depth, &format!("{open}></{tag}>"));
            return;
        }

        if children.iter().all(Child::flows_inline) {
            let inner = self.inline(&children);
            let inner = if out.is_pretty() { inner.trim() } else { inner.as_str() };
            out.line(depth, &format!("{open}>{inner}</{tag}>"));
            return;
        }

        out.line(depth, &format!("{open}>"));
        self.emit_children(&children, depth + 1, out);
        out.line(depth, &format!("</{tag}>"));
    }

    /// Write a text run on its own line. When pretty, edge whitespace that
    /// touches an inline sibling becomes `{" "}` and is dropped elsewhere.
    fn emit_text(
        &self,
        text: &str,
        keep_leading: bool,
        keep_trailing: bool,
        depth: usize,
        out: &mut OutputBuffer,
    ) {
        let collapsed = collapse_whitespace(text);
        if !out.is_pretty() {
            if !collapsed.is_empty() {
                out.line(depth, &escape_jsx_text(&collapsed));
            }
            return;
        }

        let core = collapsed.trim();
        if core.is_empty() {
            return;
        }
        let leading = if keep_leading && collapsed.starts_with(' ') { SPACE } else { "" };
        let trailing = if keep_trailing && collapsed.ends_with(' ') { SPACE } else { "" };
        out.line(depth, &format!("{leading}{}{trailing}", escape_jsx_text(core)));
    }

    /// Render children on a single line
    fn inline(&self, children: &[Child<'_>]) -> String {
        children
            .iter()
            .map(|child| match child {
                Child::Space => " ".to_string(),
                Child::Node(Node::Text(text)) => escape_jsx_text(&collapse_whitespace(text)),
                Child::Node(Node::Comment(comment)) => jsx_comment(comment),
                Child::Node(Node::Element(element)) => self.inline_element(element),
            })
            .collect()
    }

    fn inline_element(&self, element: &Element) -> String {
        let tag = &element.tag_name;
        let open = self.open_tag(element);

        if is_void(tag) {
            return format!("{open} />");
        }
        let inner = if is_preformatted(tag) {
            self.preformatted(element)
        } else {
            self.inline(&self.children_of(element))
        };
        format!("{open}>{inner}</{tag}>")
    }

    /// Content of pre, textarea, script and style, with whitespace kept
    fn preformatted(&self, element: &Element) -> String {
        if is_raw_text(&element.tag_name) {
            let text: String = element.children.iter().map(Node::text_content).collect();
            return if text.is_empty() {
                text
            } else {
                template_literal(&text)
            };
        }

        element
            .children
            .iter()
            .map(|child| match child {
                Node::Text(text) if text.contains('\n') => template_literal(text),
                Node::Text(text) => escape_jsx_text(text),
                Node::Comment(comment) if self.options.preserve_comments => jsx_comment(comment),
                Node::Comment(_) => String::new(),
                Node::Element(inner) => {
                    let open = self.open_tag(inner);
                    if is_void(&inner.tag_name) {
                        format!("{open} />")
                    } else {
                        format!("{open}>{}</{}>", self.preformatted(inner), inner.tag_name)
                    }
                }
            })
            .collect()
    }
}

impl Emit for JsxConverter {
    fn preserve_comments(&self) -> bool {
        self.options.preserve_comments
    }

    fn emit_node(&self, node: &Node, depth: usize, out: &mut OutputBuffer) {
        match node {
            Node::Element(element) => self.emit_element(element, depth, out),
            Node::Text(text) => self.emit_text(text, false, false, depth, out),
            Node::Comment(comment) => out.line(depth, &jsx_comment(comment)),
        }
    }

    fn emit_space(&self, depth: usize, out: &mut OutputBuffer) {
        if out.is_pretty() {
            out.line(depth, SPACE);
        } else {
            out.line(depth, " ");
        }
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

/// Escape text so JSX reads it literally
fn escape_jsx_text(text: &str) -> String {
    let mut result = String::with_capacity(text.len());

    for c in text.chars() {
        match c {
            '{' => result.push_str("{\"{\"}"),
            '}' => result.push_str("{\"}\"}"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '&' => result.push_str("&amp;"),
            _ => result.push(c),
        }
    }

    result
}

/// Wrap text in a template literal expression: {`…`}
fn template_literal(text: &str) -> String {
    let escaped = text
        .replace('\\', "\\\\")
        .replace('`', "\\`")
        .replace("${", "\\${");
    format!("{{`{escaped}`}}")
}

fn jsx_comment(comment: &str) -> String {
    format!("{{/* {} */}}", comment.trim().replace("*/", "* /"))
}
