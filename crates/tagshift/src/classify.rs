//! Per-node layout decisions shared by the JSX and Pug emitters.

use crate::node::Node;
use crate::utilities::{is_blank, is_inline, is_void};

/// What kind of node this is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Element,
    Text,
    Comment,
}

/// Layout facts about a single node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub kind: NodeKind,
    /// Never has a closing tag or children in the output
    pub is_void: bool,
    /// Flows with the surrounding text instead of starting its own line
    pub is_inline: bool,
}

/// Classify a node
pub fn classify(node: &Node) -> Classification {
    match node {
        Node::Element(element) => Classification {
            kind: NodeKind::Element,
            is_void: is_void(&element.tag_name),
            is_inline: is_inline(&element.tag_name),
        },
        Node::Text(_) => Classification {
            kind: NodeKind::Text,
            is_void: false,
            is_inline: true,
        },
        Node::Comment(_) => Classification {
            kind: NodeKind::Comment,
            is_void: false,
            is_inline: false,
        },
    }
}

/// A child as seen by the emitters after whitespace handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Child<'a> {
    Node(&'a Node),
    /// A collapsed whitespace run between two inline siblings
    Space,
}

impl Child<'_> {
    /// Check whether this child can share a line with its siblings
    pub fn flows_inline(&self) -> bool {
        match self {
            Child::Node(node) => classify(node).is_inline,
            Child::Space => true,
        }
    }
}

/// Whitespace-only text node
pub fn is_whitespace_text(node: &Node) -> bool {
    matches!(node, Node::Text(text) if is_blank(text))
}

/// The children an emitter should visit, in order.
///
/// Comments are removed first unless `preserve_comments` is set. A
/// whitespace-only text node is dropped when all its siblings are text (so a
/// lone whitespace child makes the parent empty). Otherwise each run of
/// whitespace-only text becomes one [`Child::Space`] when the nearest
/// siblings on both sides flow inline, and disappears when either side is a
/// block, a comment or the edge of the parent.
pub fn significant_children(children: &[Node], preserve_comments: bool) -> Vec<Child<'_>> {
    let kept: Vec<&Node> = children
        .iter()
        .filter(|n| preserve_comments || !n.is_comment())
        .collect();
    let has_non_text = kept.iter().any(|n| !n.is_text());

    let mut result = Vec::with_capacity(kept.len());
    for (i, node) in kept.iter().enumerate() {
        if !is_whitespace_text(node) {
            result.push(Child::Node(*node));
            continue;
        }
        if !has_non_text || matches!(result.last(), Some(Child::Space)) {
            continue;
        }

        let before = kept[..i].iter().rev().find(|n| !is_whitespace_text(n));
        let after = kept[i + 1..].iter().find(|n| !is_whitespace_text(n));
        if let (Some(before), Some(after)) = (before, after) {
            if classify(before).is_inline && classify(after).is_inline {
                result.push(Child::Space);
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inline(tag: &str, text: &str) -> Node {
        let mut node = Node::element(tag);
        node.add_child(Node::text(text));
        node
    }

    #[test]
    fn test_classify() {
        let img = classify(&Node::element("img"));
        assert_eq!(img.kind, NodeKind::Element);
        assert!(img.is_void);
        assert!(img.is_inline);

        let div = classify(&Node::element("div"));
        assert!(!div.is_void);
        assert!(!div.is_inline);

        assert_eq!(classify(&Node::text("x")).kind, NodeKind::Text);
        assert!(classify(&Node::text("x")).is_inline);
        assert_eq!(classify(&Node::comment("x")).kind, NodeKind::Comment);
    }

    #[test]
    fn test_sole_whitespace_child_is_dropped() {
        let children = vec![Node::text("   \n ")];
        assert!(significant_children(&children, false).is_empty());
    }

    #[test]
    fn test_whitespace_between_blocks_is_dropped() {
        let children = vec![
            Node::text("\n  "),
            Node::element("p"),
            Node::text("\n  "),
            Node::element("p"),
            Node::text("\n"),
        ];
        let result = significant_children(&children, false);
        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|c| matches!(c, Child::Node(n) if n.tag_name() == "p")));
    }

    #[test]
    fn test_whitespace_between_inlines_becomes_space() {
        let children = vec![inline("b", "a"), Node::text(" "), inline("i", "b")];
        let result = significant_children(&children, false);
        assert_eq!(result.len(), 3);
        assert_eq!(result[1], Child::Space);
    }

    #[test]
    fn test_comments_are_filtered_before_whitespace_rule() {
        let children = vec![
            inline("b", "a"),
            Node::text(" "),
            Node::comment("x"),
            Node::text(" "),
            inline("i", "b"),
        ];

        let dropped = significant_children(&children, false);
        assert_eq!(dropped.len(), 3);
        assert_eq!(dropped[1], Child::Space);

        let kept = significant_children(&children, true);
        assert_eq!(kept.len(), 3);
        assert!(matches!(kept[1], Child::Node(Node::Comment(_))));
    }

    #[test]
    fn test_text_is_kept_verbatim() {
        let children = vec![Node::text(" Hello  "), inline("strong", "world")];
        let result = significant_children(&children, false);
        assert_eq!(result[0], Child::Node(&children[0]));
    }
}
