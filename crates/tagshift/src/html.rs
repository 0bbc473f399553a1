//! HTML parsing support.
//!
//! This module parses HTML strings with scraper (html5ever) and converts the
//! result to the [`Node`] structure used by the converters.

use scraper::{ElementRef, Html, Node as ScraperNode};

use crate::node::{Document, Element, HtmlParser, Node};
use crate::{ConversionError, Result};

/// How parse errors reported by html5ever are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseMode {
    /// Recover from every error, like a browser does
    #[default]
    Lenient,
    /// Reject the input on the first reported parse error
    Strict,
}

/// The bundled html5ever-backed parser
#[derive(Debug, Clone, Copy, Default)]
pub struct ScraperParser {
    mode: ParseMode,
}

impl ScraperParser {
    /// Create a parser with the given error policy
    pub fn new(mode: ParseMode) -> Self {
        Self { mode }
    }

    /// A parser that rejects markup html5ever reports errors for
    pub fn strict() -> Self {
        Self::new(ParseMode::Strict)
    }
}

impl HtmlParser for ScraperParser {
    fn parse(&self, html: &str) -> Result<Document> {
        let fragment = Html::parse_fragment(html);

        if self.mode == ParseMode::Strict {
            if let Some(error) = fragment.errors.first() {
                tracing::warn!(%error, errors = fragment.errors.len(), "rejecting malformed markup");
                return Err(ConversionError::InvalidMarkup(error.to_string()));
            }
        }

        let root = fragment.root_element();
        Ok(Document::new(convert_children(root)))
    }
}

/// Parse an HTML fragment with the default (lenient) parser.
///
/// # Example
///
/// ```rust
/// use tagshift::parse_html;
///
/// let document = parse_html("<h1>Hello <em>World</em></h1>").unwrap();
/// assert_eq!(document.children.len(), 1);
/// assert_eq!(document.children[0].tag_name(), "h1");
/// ```
pub fn parse_html(html: &str) -> Result<Document> {
    ScraperParser::default().parse(html)
}

fn convert_children(element: ElementRef) -> Vec<Node> {
    let mut children = Vec::new();

    for child in element.children() {
        match child.value() {
            ScraperNode::Text(text) => children.push(Node::text(&text.text)),
            ScraperNode::Comment(comment) => children.push(Node::comment(&comment.comment)),
            ScraperNode::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    children.push(scraper_to_node(child_element));
                }
            }
            _ => {}
        }
    }

    children
}

/// Convert a scraper ElementRef to our Node structure
fn scraper_to_node(element: ElementRef) -> Node {
    let mut node = Element::new(element.value().name());

    for (name, value) in element.value().attrs() {
        node.set_attr(name, value);
    }
    node.children = convert_children(element);

    Node::Element(node)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_html() {
        let document = parse_html("<p>Hello World</p>").unwrap();
        assert_eq!(document.children.len(), 1);
        assert_eq!(document.children[0].tag_name(), "p");
        assert_eq!(document.children[0].text_content(), "Hello World");
    }

    #[test]
    fn test_parse_keeps_attribute_order() {
        let document = parse_html(r#"<div data-b="2" data-a="1"></div>"#).unwrap();
        let element = document.children[0].as_element().unwrap();
        let names: Vec<&str> = element.attributes.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["data-b", "data-a"]);
    }

    #[test]
    fn test_parse_comments_and_entities() {
        let document = parse_html("<!-- note -->&copy; 2024").unwrap();
        assert_eq!(document.children[0], Node::comment(" note "));
        assert_eq!(document.children[1], Node::text("\u{a9} 2024"));
    }

    #[test]
    fn test_parse_empty() {
        let document = parse_html("").unwrap();
        assert!(document.is_empty());
    }

    #[test]
    fn test_lenient_parser_recovers() {
        let document = parse_html("<div><span>open</div>").unwrap();
        assert_eq!(document.children[0].tag_name(), "div");
    }

    #[test]
    fn test_strict_parser_rejects_misnested_tags() {
        let result = ScraperParser::strict().parse("<div><span>open</div>");
        assert!(matches!(result, Err(ConversionError::InvalidMarkup(_))));
    }

    #[test]
    fn test_strict_parser_accepts_clean_markup() {
        let document = ScraperParser::strict().parse("<p>Hi</p>").unwrap();
        assert_eq!(document.children.len(), 1);
    }
}
