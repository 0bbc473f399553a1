//! tagshift-core - static tables and option types
//!
//! This crate holds the read-only data shared by every tagshift converter:
//! the HTML entity table, the HTML → JSX attribute-name table, and the
//! per-converter option structs. It has no dependencies so it can be reused
//! by any host that wants the tables without pulling in a parser.
//!
//! # Example
//!
//! ```rust
//! use tagshift_core::{entity_char, entity_name, jsx_attribute_name};
//!
//! assert_eq!(entity_name('©'), Some("copy"));
//! assert_eq!(entity_char("copy"), Some('©'));
//! assert_eq!(jsx_attribute_name("class"), Some("className"));
//! ```

mod attribute_names;
mod entities;
mod options;

pub use attribute_names::{jsx_attribute_name, JSX_ATTRIBUTE_NAMES};
pub use entities::{entity_char, entity_name, ENTITY_TABLE};
pub use options::{EncoderOptions, Indent, JsxOptions, PugOptions, TagRemoverOptions};
