//! HTML → Markdown as an ordered list of substitutions.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::{normalize_input, Stash};
use crate::entities::decode_html_entities;
use crate::strip::drop_hidden_content;
use crate::utilities::collapse_whitespace;

/// Continuation indent inside list items, turned into a space at the end
const INDENT: char = '\u{1}';
/// Hard line break, turned into two trailing spaces at the end
const HARD_BREAK: char = '\u{2}';

macro_rules! pattern {
    ($name:ident, $re:expr) => {
        static $name: Lazy<Regex> = Lazy::new(|| {
            Regex::new($re).expect(concat!(stringify!($name), ": hardcoded regex is valid"))
        });
    };
}

pattern!(TAG_NAME, r"<(/?)([a-zA-Z][a-zA-Z0-9]*)");
pattern!(BETWEEN_TAGS, r">[ \t]*\n\s*<");
pattern!(PRE, r"(?s)<pre\b([^>]*)>(.*?)</pre\s*>");
pattern!(CODE_OPEN, r"^\s*<code\b([^>]*)>");
pattern!(LANGUAGE, r"\b(?:language|lang)-([A-Za-z0-9_+#.-]+)");
pattern!(CODE, r"(?s)<code\b[^>]*>(.*?)</code\s*>");
pattern!(ANY_TAG, r"<[^>]+>");
pattern!(HEADING, r"(?s)<h([1-6])\b[^>]*>(.*?)</h[1-6]\s*>");
pattern!(TABLE, r"(?s)<table\b[^>]*>(.*?)</table\s*>");
pattern!(ROW, r"(?s)<tr\b[^>]*>(.*?)</tr\s*>");
pattern!(CELL, r"(?s)<t[hd]\b[^>]*>(.*?)</t[hd]\s*>");
pattern!(CELL_BLOCK, r"</?(?:p|div|br)\b[^>]*>");
pattern!(PARAGRAPH, r"(?s)<p(?:\s[^>]*)?>(.*?)</p\s*>");
pattern!(RULE, r"<hr\b[^>]*>");
pattern!(BREAK, r"<br\b[^>]*>\n?");
pattern!(LIST_OPEN, r"<(ul|ol)\b([^>]*)>");
pattern!(LIST_CLOSE, r"</(?:ul|ol)\s*>");
pattern!(ITEM_OPEN, r"<li\b[^>]*>");
pattern!(ITEM_CLOSE, r"</li\s*>");
pattern!(CHECKBOX, r#"^\s*<input\b[^>]*type\s*=\s*["']?checkbox["']?[^>]*>\s*"#);
pattern!(CHECKED, r"\schecked\b");
pattern!(QUOTE_OPEN, r"<blockquote\b[^>]*>");
pattern!(QUOTE_CLOSE, r"</blockquote\s*>");
pattern!(STRONG, r"(?s)<(?:strong|b)\b[^>]*>(.*?)</(?:strong|b)\s*>");
pattern!(EMPHASIS, r"(?s)<(?:em|i)\b[^>]*>(.*?)</(?:em|i)\s*>");
pattern!(STRIKE, r"(?s)<(?:del|s|strike)\b[^>]*>(.*?)</(?:del|s|strike)\s*>");
pattern!(IMAGE, r"<img\b([^>]*)>");
pattern!(LINK, r"(?s)<a\b([^>]*)>(.*?)</a\s*>");
pattern!(
    ATTRIBUTE,
    r#"([a-zA-Z_:][-a-zA-Z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#
);
pattern!(
    BLOCK_TAG,
    r"</?(?:address|article|aside|body|dd|details|div|dl|dt|fieldset|figcaption|figure|footer|form|h[1-6]|header|html|li|main|nav|ol|p|pre|section|summary|table|tbody|td|tfoot|th|thead|tr|ul)\b[^>]*>"
);
pattern!(RESIDUAL_TAG, r"</?[a-zA-Z][^>]*>|<![^>]*>");
pattern!(HORIZONTAL_SPACE, r"[ \t]+");

/// Convert HTML to Markdown.
///
/// Block structure is converted first (code blocks, headings, tables,
/// paragraphs, rules, breaks, lists, blockquotes), then inline markup, then
/// leftover tags are stripped, entities decoded and whitespace tidied.
///
/// ```rust
/// use tagshift::html_to_markdown;
///
/// let markdown = html_to_markdown("<h1>Title</h1><p>Hello <strong>world</strong></p>");
/// assert_eq!(markdown, "# Title\n\nHello **world**");
/// ```
pub fn html_to_markdown(html: &str) -> String {
    tracing::debug!(input_len = html.len(), "converting HTML to Markdown");

    let mut stash = Stash::default();
    let text = normalize_input(html);
    let text = drop_hidden_content(&text, |_| false);
    let text = TAG_NAME.replace_all(&text, |caps: &Captures<'_>| {
        format!("<{}{}", &caps[1], caps[2].to_ascii_lowercase())
    });
    let text = BETWEEN_TAGS.replace_all(&text, ">\n<");

    let text = PRE.replace_all(&text, |caps: &Captures<'_>| {
        format!("\n\n{}\n\n", stash.block(fenced_code(&caps[1], &caps[2])))
    });
    let text = CODE.replace_all(&text, |caps: &Captures<'_>| stash.inline(code_span(&caps[1])));

    let text = HEADING.replace_all(&text, |caps: &Captures<'_>| {
        let level: usize = caps[1].parse().unwrap_or(1);
        format!("\n\n{} {}\n\n", "#".repeat(level), collapse_whitespace(&caps[2]).trim())
    });
    let text = TABLE.replace_all(&text, |caps: &Captures<'_>| {
        format!("\n\n{}\n\n", table(&caps[1]))
    });
    let text = PARAGRAPH.replace_all(&text, |caps: &Captures<'_>| {
        format!("\n\n{}\n\n", collapse_whitespace(&caps[1]).trim())
    });
    let text = RULE.replace_all(&text, "\n\n---\n\n");
    let text = BREAK.replace_all(&text, format!("{HARD_BREAK}\n").as_str());
    let text = lists(text.into_owned());
    let text = blockquotes(text);

    let text = STRONG.replace_all(&text, |caps: &Captures<'_>| wrap(&caps[1], "**"));
    let text = EMPHASIS.replace_all(&text, |caps: &Captures<'_>| wrap(&caps[1], "*"));
    let text = STRIKE.replace_all(&text, |caps: &Captures<'_>| wrap(&caps[1], "~~"));
    let text = IMAGE.replace_all(&text, |caps: &Captures<'_>| image(&caps[1]));
    let text = LINK.replace_all(&text, |caps: &Captures<'_>| link(&caps[1], &caps[2]));

    let text = BLOCK_TAG.replace_all(&text, "\n\n");
    let text = RESIDUAL_TAG.replace_all(&text, "");
    let text = decode_html_entities(&text);

    let text = tidy(&text)
        .replace(INDENT, " ")
        .replace(HARD_BREAK, "  ");
    stash.restore(&text)
}

/// `<pre>` content as a fenced code block
fn fenced_code(pre_attrs: &str, content: &str) -> String {
    let code_attrs = CODE_OPEN.captures(content).map(|caps| caps[1].to_string());
    let language = LANGUAGE
        .captures(pre_attrs)
        .or_else(|| code_attrs.as_deref().and_then(|attrs| LANGUAGE.captures(attrs)))
        .map_or(String::new(), |caps| caps[1].to_string());

    let code = decode_html_entities(&ANY_TAG.replace_all(content, ""));
    let code = code.trim_matches('\n');
    let fence = if code.contains("```") { "````" } else { "```" };
    format!("{fence}{language}\n{code}\n{fence}")
}

/// Inline `<code>` content as a backtick span
fn code_span(content: &str) -> String {
    let code = decode_html_entities(&ANY_TAG.replace_all(content, ""));
    let code = code.replace('\n', " ");
    if code.contains('`') {
        format!("`` {code} ``")
    } else {
        format!("`{code}`")
    }
}

/// Rows of a table, the first one used as the header
fn table(content: &str) -> String {
    let rows: Vec<Vec<String>> = ROW
        .captures_iter(content)
        .map(|row| {
            CELL.captures_iter(&row[1])
                .map(|cell| {
                    let text = CELL_BLOCK.replace_all(&cell[1], " ");
                    collapse_whitespace(&text).trim().replace('|', "\\|")
                })
                .collect()
        })
        .filter(|cells: &Vec<String>| !cells.is_empty())
        .collect();

    let Some(header) = rows.first() else {
        return String::new();
    };

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(format!("| {} |", header.join(" | ")));
    lines.push(format!("|{}", " --- |".repeat(header.len())));
    for row in &rows[1..] {
        lines.push(format!("| {} |", row.join(" | ")));
    }
    lines.join("\n")
}

/// Convert lists innermost first so nested lists are already Markdown when
/// their parent item is indented
fn lists(mut text: String) -> String {
    loop {
        let innermost = LIST_OPEN.captures_iter(&text).last().and_then(|open| {
            let start = attribute(&open[2], "start")
                .and_then(|value| value.trim().parse::<u64>().ok())
                .unwrap_or(1);
            Some((open.get(0)?.range(), &open[1] == "ol", start))
        });
        let Some((whole, ordered, start)) = innermost else {
            break;
        };

        let Some(close) = LIST_CLOSE.find_at(&text, whole.end) else {
            text.replace_range(whole, "");
            continue;
        };
        let rendered = list(&text[whole.end..close.start()], ordered, start);
        text.replace_range(whole.start..close.end(), &format!("\n\n{rendered}\n\n"));
    }
    text
}

fn list(body: &str, ordered: bool, start: u64) -> String {
    let mut lines = Vec::new();

    for (i, item) in ITEM_OPEN.split(body).skip(1).enumerate() {
        let marker = if ordered {
            format!("{}. ", start.saturating_add(i as u64))
        } else {
            "- ".to_string()
        };

        let item = ITEM_CLOSE.replace_all(item, "");
        let (task, item) = match CHECKBOX.find(&item) {
            Some(m) if CHECKED.is_match(m.as_str()) => ("[x] ", &item[m.end()..]),
            Some(m) => ("[ ] ", &item[m.end()..]),
            None => ("", &item[..]),
        };

        let continuation: String = std::iter::repeat(INDENT).take(marker.len()).collect();
        let mut content = item.lines().map(str::trim).filter(|line| !line.is_empty());
        lines.push(format!("{marker}{task}{}", content.next().unwrap_or_default()));
        lines.extend(content.map(|line| format!("{continuation}{line}")));
    }

    lines.join("\n")
}

/// Convert blockquotes innermost first so nested quotes stack their `>`
fn blockquotes(mut text: String) -> String {
    while let Some(open) = QUOTE_OPEN.find_iter(&text).last() {
        let range = open.range();
        let Some(close) = QUOTE_CLOSE.find_at(&text, range.end) else {
            text.replace_range(range, "");
            continue;
        };

        let mut quoted: Vec<String> = Vec::new();
        for line in text[range.end..close.start()].lines().map(str::trim) {
            if line.is_empty() {
                if quoted.last().is_some_and(|last| last != ">") {
                    quoted.push(">".to_string());
                }
            } else {
                quoted.push(format!("> {line}"));
            }
        }
        if quoted.last().is_some_and(|last| last == ">") {
            quoted.pop();
        }

        text.replace_range(range.start..close.end(), &format!("\n\n{}\n\n", quoted.join("\n")));
    }
    text
}

/// Wrap inline content in a delimiter, keeping edge whitespace outside it
fn wrap(content: &str, delimiter: &str) -> String {
    let core = content.trim();
    if core.is_empty() {
        return content.to_string();
    }
    let start = content.len() - content.trim_start().len();
    let end = content.trim_end().len();
    format!(
        "{}{delimiter}{core}{delimiter}{}",
        &content[..start],
        &content[end..]
    )
}

fn image(attrs: &str) -> String {
    let Some(src) = attribute(attrs, "src") else {
        return String::new();
    };
    let alt = attribute(attrs, "alt").unwrap_or_default();
    match attribute(attrs, "title") {
        Some(title) => format!("![{alt}]({src} \"{title}\")"),
        None => format!("![{alt}]({src})"),
    }
}

fn link(attrs: &str, content: &str) -> String {
    let text = collapse_whitespace(content).trim().to_string();
    let Some(href) = attribute(attrs, "href") else {
        return text;
    };
    let text = if text.is_empty() { href.clone() } else { text };
    match attribute(attrs, "title") {
        Some(title) => format!("[{text}]({href} \"{title}\")"),
        None => format!("[{text}]({href})"),
    }
}

/// Value of a named attribute in a raw attribute string
fn attribute(attrs: &str, name: &str) -> Option<String> {
    ATTRIBUTE
        .captures_iter(attrs)
        .find(|caps| caps[1].eq_ignore_ascii_case(name))
        .and_then(|caps| caps.get(2).or(caps.get(3)).or(caps.get(4)))
        .map(|value| value.as_str().to_string())
}

/// Trim and collapse each line, keep at most one blank line in a row
fn tidy(text: &str) -> String {
    let mut lines: Vec<String> = Vec::new();

    for line in text.lines() {
        let line = HORIZONTAL_SPACE.replace_all(line, " ");
        let line = line.trim_matches(|c| c == ' ' || c == '\t');
        let line = if line == HARD_BREAK.to_string() { "" } else { line };
        if line.is_empty() && lines.last().map_or(true, String::is_empty) {
            continue;
        }
        lines.push(line.replace(&format!(" {HARD_BREAK}"), &HARD_BREAK.to_string()));
    }

    while lines.last().is_some_and(String::is_empty) {
        lines.pop();
    }
    if let Some(last) = lines.last_mut() {
        if last.ends_with(HARD_BREAK) {
            last.pop();
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headings_and_paragraphs() {
        assert_eq!(
            html_to_markdown("<h1>Title</h1><p>Hello <strong>world</strong></p>"),
            "# Title\n\nHello **world**"
        );
        assert_eq!(html_to_markdown("<H3 id=\"x\">Deep\n title</H3>"), "### Deep title");
    }

    #[test]
    fn test_inline_markup() {
        assert_eq!(
            html_to_markdown("<p><b>bold</b>, <em>em</em>, <del>gone</del> and <i> spaced </i>!</p>"),
            "**bold**, *em*, ~~gone~~ and *spaced* !"
        );
    }

    #[test]
    fn test_links_and_images() {
        assert_eq!(
            html_to_markdown(r#"<p><a href="https://x.test/?a=1&amp;b=2" title="X">site</a></p>"#),
            r#"[site](https://x.test/?a=1&b=2 "X")"#
        );
        assert_eq!(
            html_to_markdown(r#"<img src="/a.png" alt="A">"#),
            "![A](/a.png)"
        );
        assert_eq!(html_to_markdown("<a>plain</a>"), "plain");
        assert_eq!(html_to_markdown(r#"<img alt="no source">"#), "");
    }

    #[test]
    fn test_code_blocks_are_left_alone() {
        let html = "<pre><code class=\"language-rust\">let x = &amp;y; // <b>not bold</b>\n</code></pre>";
        assert_eq!(html_to_markdown(html), "```rust\nlet x = &y; // not bold\n```");
        assert_eq!(
            html_to_markdown("<p>Run <code>a &lt; b</code> now</p>"),
            "Run `a < b` now"
        );
    }

    #[test]
    fn test_unordered_and_ordered_lists() {
        assert_eq!(html_to_markdown("<ul><li>One</li><li>Two</li></ul>"), "- One\n- Two");
        assert_eq!(
            html_to_markdown("<ol start=\"3\">\n  <li>Three</li>\n  <li>Four</li>\n</ol>"),
            "3. Three\n4. Four"
        );
    }

    #[test]
    fn test_huge_start_number_saturates() {
        let html = r#"<ol start="18446744073709551615"><li>a</li><li>b</li></ol>"#;
        assert_eq!(
            html_to_markdown(html),
            "18446744073709551615. a\n18446744073709551615. b"
        );
    }

    #[test]
    fn test_nested_lists() {
        let html = "<ul><li>A<ul><li>A1</li><li>A2</li></ul></li><li>B</li></ul>";
        assert_eq!(html_to_markdown(html), "- A\n  - A1\n  - A2\n- B");

        let html = "<ol><li>First<ul><li>sub</li></ul></li></ol>";
        assert_eq!(html_to_markdown(html), "1. First\n   - sub");
    }

    #[test]
    fn test_task_list() {
        let html = r#"<ul><li><input type="checkbox" checked disabled> done</li><li><input type="checkbox" disabled> todo</li></ul>"#;
        assert_eq!(html_to_markdown(html), "- [x] done\n- [ ] todo");
    }

    #[test]
    fn test_blockquotes() {
        assert_eq!(
            html_to_markdown("<blockquote><p>One</p><p>Two</p></blockquote>"),
            "> One\n>\n> Two"
        );
        assert_eq!(
            html_to_markdown("<blockquote>Outer<blockquote>Inner</blockquote></blockquote>"),
            "> Outer\n>\n> > Inner"
        );
    }

    #[test]
    fn test_code_block_inside_blockquote() {
        assert_eq!(
            html_to_markdown("<blockquote><pre><code>a\nb</code></pre></blockquote>"),
            "> ```\n> a\n> b\n> ```"
        );
        assert_eq!(
            html_to_markdown("<blockquote><p>Intro</p><pre><code>a\n\nb</code></pre></blockquote>"),
            "> Intro\n>\n> ```\n> a\n>\n> b\n> ```"
        );
    }

    #[test]
    fn test_list_inside_blockquote() {
        assert_eq!(
            html_to_markdown("<blockquote><ul><li>one</li><li>two<ul><li>deep</li></ul></li></ul></blockquote>"),
            "> - one\n> - two\n>   - deep"
        );
    }

    #[test]
    fn test_code_block_inside_list_item() {
        assert_eq!(
            html_to_markdown("<ul><li>item<pre><code>x = 1\ny = 2</code></pre></li></ul>"),
            "- item\n  ```\n  x = 1\n  y = 2\n  ```"
        );
    }

    #[test]
    fn test_table() {
        let html = "<table><thead><tr><th>Name</th><th>Value</th></tr></thead>\
                    <tbody><tr><td>a|b</td><td><b>1</b></td></tr></tbody></table>";
        assert_eq!(
            html_to_markdown(html),
            "| Name | Value |\n| --- | --- |\n| a\\|b | **1** |"
        );
    }

    #[test]
    fn test_breaks_and_rules() {
        assert_eq!(html_to_markdown("<p>a<br>b</p><hr><p>c</p>"), "a  \nb\n\n---\n\nc");
    }

    #[test]
    fn test_hidden_content_and_residual_tags() {
        let html = "<head><title>x</title></head><script>var a;</script><!-- c --><div><span>kept</span> &copy;</div>";
        assert_eq!(html_to_markdown(html), "kept ©");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(html_to_markdown(""), "");
        assert_eq!(html_to_markdown("   \n"), "");
    }
}
