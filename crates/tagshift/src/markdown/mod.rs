//! Markdown conversion in both directions.
//!
//! Both directions are ordered pattern pipelines over the whole input
//! string rather than tree walks. Fragments that later passes must not touch
//! (code blocks, code spans, rendered blocks) are moved into a [`Stash`] and
//! replaced by control-character placeholders until the end of the pipeline.

mod to_html;
mod to_markdown;

pub use to_html::markdown_to_html;
pub use to_markdown::html_to_markdown;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Marks a block placeholder: `\u{3}N\u{3}`
const BLOCK_MARK: char = '\u{3}';
/// Marks an inline placeholder: `\u{4}N\u{4}`
const INLINE_MARK: char = '\u{4}';

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^([ >]*)\x03(\d+)\x03|\x03(\d+)\x03|\x04(\d+)\x04")
        .expect("PLACEHOLDER: hardcoded regex is valid")
});

/// Normalise line endings and drop the control characters used as markers
fn normalize_input(input: &str) -> String {
    input
        .replace("\r\n", "\n")
        .replace('\r', "\n")
        .chars()
        .filter(|c| !matches!(c, '\u{1}'..='\u{4}'))
        .collect()
}

/// Fragments held out of the pipeline
#[derive(Debug, Default)]
struct Stash {
    items: Vec<String>,
}

impl Stash {
    /// Hold a block; the placeholder should sit on its own line
    fn block(&mut self, content: String) -> String {
        self.items.push(content);
        format!("{BLOCK_MARK}{}{BLOCK_MARK}", self.items.len() - 1)
    }

    /// Hold an inline fragment
    fn inline(&mut self, content: String) -> String {
        self.items.push(content);
        format!("{INLINE_MARK}{}{INLINE_MARK}", self.items.len() - 1)
    }

    /// Put every held fragment back. A block placeholder preceded on its
    /// line by indentation or `>` markers gets that prefix on every line of
    /// its content; blank lines keep only the markers.
    fn restore(&self, text: &str) -> String {
        PLACEHOLDER
            .replace_all(text, |caps: &Captures<'_>| {
                let (prefix, index) = match (caps.get(2), caps.get(3), caps.get(4)) {
                    (Some(index), _, _) => (caps.get(1).map_or("", |m| m.as_str()), index),
                    (_, Some(index), _) | (_, _, Some(index)) => ("", index),
                    _ => return caps[0].to_string(),
                };
                let Some(content) = index
                    .as_str()
                    .parse::<usize>()
                    .ok()
                    .and_then(|i| self.items.get(i))
                else {
                    return caps[0].to_string();
                };

                let content = self.restore(content);
                if prefix.is_empty() {
                    return content;
                }
                content
                    .split('\n')
                    .map(|line| {
                        if line.is_empty() {
                            prefix.trim_end().to_string()
                        } else {
                            format!("{prefix}{line}")
                        }
                    })
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_input() {
        assert_eq!(normalize_input("a\r\nb\rc\u{1}\u{3}d"), "a\nb\ncd");
    }

    #[test]
    fn test_stash_restores_nested_placeholders() {
        let mut stash = Stash::default();
        let code = stash.inline("<code>x</code>".to_string());
        let block = stash.block(format!("<p>{code}</p>"));
        assert_eq!(stash.restore(&format!("{block}\ntail")), "<p><code>x</code></p>\ntail");
    }

    #[test]
    fn test_stash_indents_block_lines() {
        let mut stash = Stash::default();
        let block = stash.block("```\na\n\nb\n```".to_string());
        assert_eq!(stash.restore(&format!("- item\n  {block}")), "- item\n  ```\n  a\n\n  b\n  ```");
    }

    #[test]
    fn test_stash_quotes_block_lines() {
        let mut stash = Stash::default();
        let block = stash.block("```\na\n\nb\n```".to_string());
        assert_eq!(
            stash.restore(&format!("> {block}")),
            "> ```\n> a\n>\n> b\n> ```"
        );
    }
}
