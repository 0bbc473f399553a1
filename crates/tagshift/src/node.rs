//! DOM node structure shared by every tree-walking converter.
//!
//! Any HTML parser can build this structure; the converters never see the
//! parser's own types. Attribute and child order always follow the source
//! document so output stays reproducible.

use indexmap::IndexMap;

use crate::Result;

/// A parsed HTML node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Element with ordered attributes and children
    Element(Element),
    /// Text content, already entity-decoded by the parser
    Text(String),
    /// Comment content without the `<!--` `-->` delimiters
    Comment(String),
}

/// An element node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Tag name, lower-case for HTML elements
    pub tag_name: String,
    /// Attributes in declaration order
    pub attributes: IndexMap<String, String>,
    /// Child nodes in document order
    pub children: Vec<Node>,
}

impl Element {
    /// Create an element with no attributes or children
    pub fn new(tag_name: &str) -> Self {
        Self {
            tag_name: tag_name.to_string(),
            attributes: IndexMap::new(),
            children: Vec::new(),
        }
    }

    /// Set an attribute, keeping its original position if it already exists
    pub fn set_attr(&mut self, name: &str, value: &str) {
        self.attributes.insert(name.to_string(), value.to_string());
    }
}

impl Node {
    /// Create a new element node
    pub fn element(tag_name: &str) -> Self {
        Node::Element(Element::new(tag_name))
    }

    /// Create a new element node with attributes
    pub fn element_with_attrs(tag_name: &str, attrs: Vec<(&str, &str)>) -> Self {
        let mut element = Element::new(tag_name);
        for (name, value) in attrs {
            element.set_attr(name, value);
        }
        Node::Element(element)
    }

    /// Create a new text node
    pub fn text(content: &str) -> Self {
        Node::Text(content.to_string())
    }

    /// Create a new comment node
    pub fn comment(content: &str) -> Self {
        Node::Comment(content.to_string())
    }

    /// Check if this is a text node
    pub fn is_text(&self) -> bool {
        matches!(self, Node::Text(_))
    }

    /// Check if this is a comment node
    pub fn is_comment(&self) -> bool {
        matches!(self, Node::Comment(_))
    }

    /// The element, if this is one
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(element) => Some(element),
            Node::Text(_) | Node::Comment(_) => None,
        }
    }

    /// Get the tag name (empty for text and comments)
    pub fn tag_name(&self) -> &str {
        self.as_element().map_or("", |e| e.tag_name.as_str())
    }

    /// Get all child nodes
    pub fn children(&self) -> impl Iterator<Item = &Node> {
        self.as_element().into_iter().flat_map(|e| e.children.iter())
    }

    /// Add a child node. Text and comment nodes ignore it.
    pub fn add_child(&mut self, child: Node) {
        if let Node::Element(element) = self {
            element.children.push(child);
        }
    }

    /// Get all text content from this node and descendants
    pub fn text_content(&self) -> String {
        match self {
            Node::Text(text) => text.clone(),
            Node::Comment(_) => String::new(),
            Node::Element(_) => self.children().map(Node::text_content).collect(),
        }
    }
}

/// A parsed HTML fragment: the ordered list of root nodes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub children: Vec<Node>,
}

impl Document {
    /// Create a document from its root nodes
    pub fn new(children: Vec<Node>) -> Self {
        Self { children }
    }

    /// Check whether the document has no nodes at all
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

/// Turns HTML text into a [`Document`].
///
/// The tree walkers only depend on this trait, so a host can supply its own
/// parser (a browser DOM bridge, a stricter validator) instead of the
/// bundled html5ever one.
pub trait HtmlParser {
    /// Parse an HTML fragment. Fails only when the parser rejects the markup.
    fn parse(&self, html: &str) -> Result<Document>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_element() {
        let node = Node::element("div");
        assert!(node.as_element().is_some());
        assert_eq!(node.tag_name(), "div");
    }

    #[test]
    fn test_create_text() {
        let node = Node::text("Hello World");
        assert!(node.is_text());
        assert_eq!(node.text_content(), "Hello World");
        assert_eq!(node.tag_name(), "");
    }

    #[test]
    fn test_attribute_order_is_kept() {
        let node = Node::element_with_attrs("div", vec![("data-b", "2"), ("data-a", "1")]);
        let names: Vec<&str> = node
            .as_element()
            .unwrap()
            .attributes
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(names, vec!["data-b", "data-a"]);
    }

    #[test]
    fn test_children() {
        let mut parent = Node::element("div");
        parent.add_child(Node::text("Hello"));
        parent.add_child(Node::element("span"));
        parent.add_child(Node::comment("note"));

        assert_eq!(parent.children().count(), 3);
        assert!(parent.children().nth(2).is_some_and(Node::is_comment));
    }

    #[test]
    fn test_text_content_skips_comments() {
        let mut div = Node::element("div");
        div.add_child(Node::text("Hello "));
        div.add_child(Node::comment("hidden"));
        let mut span = Node::element("span");
        span.add_child(Node::text("World"));
        div.add_child(span);

        assert_eq!(div.text_content(), "Hello World");
    }
}
