//! Tag removal: reduce HTML to its readable text.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tagshift_core::TagRemoverOptions;

use crate::entities::decode_html_entities;
use crate::utilities::BLOCK_ELEMENTS;

/// Elements removed together with everything inside them
const DROPPED_WITH_CONTENT: &[&str] = &["script", "style", "noscript", "template", "head"];

static COMMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").expect("COMMENT: hardcoded regex is valid"));

static DROPPED_BLOCKS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    DROPPED_WITH_CONTENT
        .iter()
        .map(|tag| {
            let pattern = format!(r"(?is)<{tag}\b[^>]*>.*?</{tag}\s*>");
            let regex = Regex::new(&pattern).expect("DROPPED_BLOCKS: generated regex is valid");
            (*tag, regex)
        })
        .collect()
});

static LINE_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<br\s*/?>").expect("LINE_BREAK: hardcoded regex is valid"));

static BLOCK_CLOSE: Lazy<Regex> = Lazy::new(|| {
    let pattern = format!(r"(?i)</({})\s*>", BLOCK_ELEMENTS.join("|"));
    Regex::new(&pattern).expect("BLOCK_CLOSE: generated regex is valid")
});

static TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"</?([a-zA-Z][a-zA-Z0-9-]*)\b[^>]*>").expect("TAG: hardcoded regex is valid")
});

static DECLARATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<!(?:doctype|\[cdata\[)[^>]*>").expect("DECLARATION: hardcoded regex is valid")
});

static HORIZONTAL_SPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[ \t\x0C]+").expect("HORIZONTAL_SPACE: hardcoded regex is valid"));

/// Strip markup from `html`, keeping its text.
///
/// ```rust
/// use tagshift::{remove_html_tags, TagRemoverOptions};
///
/// let text = remove_html_tags("&copy; 2024 <b>Test</b>", &TagRemoverOptions::default());
/// assert_eq!(text, "© 2024 Test");
/// ```
pub fn remove_html_tags(html: &str, options: &TagRemoverOptions) -> String {
    tracing::debug!(input_len = html.len(), keep = ?options.keep_tags, "removing HTML tags");

    let mut text = drop_hidden_content(&html.replace("\r\n", "\n"), |tag| options.keeps(tag));

    if options.preserve_line_breaks {
        text = LINE_BREAK
            .replace_all(&text, |caps: &Captures<'_>| {
                if options.keeps("br") {
                    format!("{}\n", &caps[0])
                } else {
                    "\n".to_string()
                }
            })
            .into_owned();
        text = BLOCK_CLOSE
            .replace_all(&text, |caps: &Captures<'_>| {
                if options.keeps(&caps[1]) {
                    format!("{}\n", &caps[0])
                } else {
                    "\n".to_string()
                }
            })
            .into_owned();
    }

    text = DECLARATION.replace_all(&text, "").into_owned();
    text = TAG
        .replace_all(&text, |caps: &Captures<'_>| {
            if options.keeps(&caps[1]) {
                caps[0].to_string()
            } else {
                String::new()
            }
        })
        .into_owned();

    if options.convert_entities {
        text = decode_html_entities(&text);
    }

    if options.normalize_whitespace {
        text = normalize_whitespace(&text);
    }

    text
}

/// Remove comments, and the non-rendered elements `keep` rejects together
/// with their content
pub(crate) fn drop_hidden_content(html: &str, keep: impl Fn(&str) -> bool) -> String {
    let mut text = COMMENT.replace_all(html, "").into_owned();
    for (tag, regex) in DROPPED_BLOCKS.iter() {
        if !keep(tag) {
            text = regex.replace_all(&text, "").into_owned();
        }
    }
    text
}

/// Collapse horizontal whitespace, trim every line, allow at most one blank
/// line in a row and trim the result.
fn normalize_whitespace(text: &str) -> String {
    let mut lines: Vec<String> = Vec::new();

    for line in text.lines() {
        let line = HORIZONTAL_SPACE.replace_all(line, " ");
        let line = line.trim();
        if line.is_empty() && lines.last().is_some_and(String::is_empty) {
            continue;
        }
        lines.push(line.to_string());
    }

    lines.join("\n").trim().to_string()
}
