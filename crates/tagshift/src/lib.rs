//! # tagshift
//!
//! Convert HTML to JSX, Pug and Markdown, convert Markdown back to HTML, and
//! encode, decode or strip HTML.
//!
//! The JSX and Pug converters walk a parsed [`Document`]. Parsing sits behind
//! the [`HtmlParser`] trait: the default `html` feature provides
//! [`ScraperParser`] (html5ever), and any other parser that can build a
//! [`Document`] can be plugged in with `convert_with`. The Markdown converters
//! are ordered pattern pipelines over the raw string and need no parser.
//!
//! ## Example (HTML string)
//!
//! ```rust
//! use tagshift::{convert_html_to_jsx, JsxOptions};
//!
//! let jsx = convert_html_to_jsx(r#"<label for="name">Name</label>"#, &JsxOptions::default()).unwrap();
//! assert_eq!(jsx, r#"<label htmlFor="name">Name</label>"#);
//! ```
//!
//! ## Example (Node-based)
//!
//! ```rust
//! use tagshift::{Document, Node, PugConverter};
//!
//! let mut p = Node::element_with_attrs("p", vec![("class", "lead")]);
//! p.add_child(Node::text("Hello"));
//!
//! let pug = PugConverter::new().convert_document(&Document::new(vec![p]));
//! assert_eq!(pug, "p.lead Hello");
//! ```

mod attributes;
mod classify;
mod emit;
mod entities;
#[cfg(feature = "html")]
pub mod html;
pub mod jsx;
pub mod markdown;
pub mod node;
pub mod pug;
mod strip;
mod utilities;

pub use attributes::style_to_object;
pub use classify::{classify, Classification, NodeKind};
pub use entities::{decode_html_entities, encode_html_entities};
#[cfg(feature = "html")]
pub use html::{parse_html, ParseMode, ScraperParser};
pub use jsx::JsxConverter;
pub use markdown::{html_to_markdown, markdown_to_html};
pub use node::{Document, Element, HtmlParser, Node};
pub use pug::PugConverter;
pub use strip::remove_html_tags;
pub use tagshift_core::{EncoderOptions, Indent, JsxOptions, PugOptions, TagRemoverOptions};
pub use utilities::{escape_attribute, escape_text};

/// Error type for tagshift operations
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    /// The parser reported markup it would not accept
    #[error("invalid-markup: {0}")]
    InvalidMarkup(String),
}

impl ConversionError {
    /// Stable machine-readable reason
    pub fn reason(&self) -> &'static str {
        match self {
            ConversionError::InvalidMarkup(_) => "invalid-markup",
        }
    }
}

pub type Result<T> = std::result::Result<T, ConversionError>;

/// Convert an HTML string to JSX
#[cfg(feature = "html")]
pub fn convert_html_to_jsx(html: &str, options: &JsxOptions) -> Result<String> {
    JsxConverter::with_options(options.clone()).convert(html)
}

/// Convert an HTML string to Pug
#[cfg(feature = "html")]
pub fn convert_html_to_pug(html: &str, options: &PugOptions) -> Result<String> {
    PugConverter::with_options(options.clone()).convert(html)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_reason() {
        let err = ConversionError::InvalidMarkup("unexpected end tag".to_string());
        assert_eq!(err.reason(), "invalid-markup");
        assert_eq!(err.to_string(), "invalid-markup: unexpected end tag");
    }

    #[cfg(feature = "html")]
    #[test]
    fn test_facade_empty_input() {
        assert_eq!(convert_html_to_jsx("", &JsxOptions::default()).unwrap(), "");
        assert_eq!(convert_html_to_pug("", &PugOptions::default()).unwrap(), "");
    }
}
