//! Attribute translation for the JSX and Pug emitters.

use tagshift_core::jsx_attribute_name;

use crate::node::Element;
use crate::utilities::{escape_attribute, is_boolean_attribute};

/// Target attribute syntax
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeStyle {
    /// `name="value"` with JSX prop names when `camel_case` is set
    Jsx { camel_case: bool },
    /// `name="value"` with JavaScript string escaping
    Pug,
}

/// Map every attribute of an element, in declaration order.
///
/// Each entry is ready to emit: `name="value"`, a bare `name`, or
/// `style={{ … }}` for JSX.
pub fn map_attributes(element: &Element, style: AttributeStyle) -> Vec<String> {
    element
        .attributes
        .iter()
        .map(|(name, value)| map_attribute(name, value, style))
        .collect()
}

/// Map a single attribute
pub fn map_attribute(name: &str, value: &str, style: AttributeStyle) -> String {
    let lower = name.to_lowercase();

    match style {
        AttributeStyle::Jsx { camel_case } => {
            if lower == "style" {
                return format!("style={{{}}}", style_to_object(value));
            }
            let name = if camel_case {
                jsx_attribute_name(&lower).map_or(lower.clone(), str::to_string)
            } else {
                lower.clone()
            };
            if is_boolean(&lower, value) {
                name
            } else {
                format!("{name}=\"{}\"", escape_attribute(value))
            }
        }
        AttributeStyle::Pug => {
            if is_boolean(&lower, value) {
                lower
            } else {
                format!("{lower}=\"{}\"", escape_js_string(value))
            }
        }
    }
}

/// Valueless attributes, or boolean ones whose value repeats the name
/// (`disabled="disabled"`)
fn is_boolean(name: &str, value: &str) -> bool {
    value.is_empty() || (is_boolean_attribute(name) && value.eq_ignore_ascii_case(name))
}

/// Convert an inline CSS declaration list to a JSX style object literal.
///
/// Declarations without a colon, or with an empty property or value, are
/// skipped.
///
/// ```rust
/// use tagshift::style_to_object;
///
/// assert_eq!(
///     style_to_object("color: red; font-size: 12px"),
///     r#"{ color: "red", fontSize: "12px" }"#
/// );
/// ```
pub fn style_to_object(css: &str) -> String {
    let mut entries = Vec::new();

    for declaration in css.split(';') {
        let Some((property, value)) = declaration.split_once(':') else {
            if !declaration.trim().is_empty() {
                tracing::trace!(declaration, "skipping style declaration without a colon");
            }
            continue;
        };
        let property = property.trim();
        let value = value.trim();
        if property.is_empty() || value.is_empty() {
            tracing::trace!(declaration, "skipping empty style declaration");
            continue;
        }

        let key = if property.starts_with("--") {
            format!("\"{}\"", escape_js_string(property))
        } else {
            css_property_to_camel_case(&property.to_lowercase())
        };
        entries.push(format!("{key}: \"{}\"", escape_js_string(value)));
    }

    if entries.is_empty() {
        "{}".to_string()
    } else {
        format!("{{ {} }}", entries.join(", "))
    }
}

/// `background-color` → `backgroundColor`, `-webkit-x` → `WebkitX`, `-ms-x` → `msX`
fn css_property_to_camel_case(property: &str) -> String {
    let property = property.strip_prefix("-ms-").map_or_else(
        || property.to_string(),
        |rest| format!("ms-{rest}"),
    );

    let mut result = String::with_capacity(property.len());
    let mut upper_next = false;
    for c in property.chars() {
        if c == '-' {
            upper_next = true;
        } else if upper_next {
            result.extend(c.to_uppercase());
            upper_next = false;
        } else {
            result.push(c);
        }
    }
    result
}

/// Escape for a double-quoted JavaScript string
fn escape_js_string(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
