//! Markdown → HTML: inline substitutions, then a block pass with a line
//! scanner for lists, tables and paragraphs.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::{normalize_input, Stash, BLOCK_MARK};
use crate::utilities::{escape_attribute, escape_text};

macro_rules! pattern {
    ($name:ident, $re:expr) => {
        static $name: Lazy<Regex> = Lazy::new(|| {
            Regex::new($re).expect(concat!(stringify!($name), ": hardcoded regex is valid"))
        });
    };
}

pattern!(FENCE_OPEN, r"^( {0,3})(`{3,}|~{3,})[ \t]*([^\s`]*)");
pattern!(CODE_SPAN_DOUBLE, r"``[ ]?(.+?)[ ]?``");
pattern!(CODE_SPAN, r"`([^`\n]+)`");
pattern!(STRONG_STAR, r"\*\*([^\s*](?:[^\n]*?[^\s*])?)\*\*");
pattern!(STRONG_UNDERSCORE, r"(^|[^\w])__([^\s_](?:[^\n]*?[^\s_])?)__([^\w]|$)");
pattern!(EM_STAR, r"\*([^\s*](?:[^*\n]*[^\s*])?)\*");
pattern!(EM_UNDERSCORE, r"(^|[^\w])_([^\s_](?:[^_\n]*[^\s_])?)_([^\w]|$)");
pattern!(STRIKE, r"~~([^~\n]+)~~");
pattern!(
    IMAGE,
    r#"!\[([^\]]*)\]\(\s*<?([^)\s>]+)>?(?:\s+["']([^"']*)["'])?\s*\)"#
);
pattern!(
    LINK,
    r#"\[([^\]]+)\]\(\s*<?([^)\s>]+)>?(?:\s+["']([^"']*)["'])?\s*\)"#
);
pattern!(AUTOLINK, r"<(https?://[^>\s]+)>");
pattern!(HEADING, r"(?m)^[ \t]{0,3}(#{1,6})[ \t]+(.*?)(?:[ \t]+#+)?[ \t]*$");
pattern!(QUOTE, r"(?m)(?:^[ \t]{0,3}>[^\n]*(?:\n|$))+");
pattern!(QUOTE_MARKER, r"^[ \t]{0,3}> ?");
pattern!(
    RULE,
    r"(?m)^[ \t]{0,3}(?:(?:\*[ \t]*){3,}|(?:-[ \t]*){3,}|(?:_[ \t]*){3,})$"
);
pattern!(LIST_ITEM, r"^([ \t]*)([-*+]|(\d{1,9})[.)])[ \t]+(.*)$");
pattern!(TASK, r"^\[([ xX])\](?:[ \t]+|$)");
pattern!(
    TABLE_SEPARATOR,
    r"^[ \t]*\|?[ \t]*:?-+:?[ \t]*(?:\|[ \t]*:?-+:?[ \t]*)*\|?[ \t]*$"
);
pattern!(
    BLOCK_HTML,
    r"^[ \t]*(?:<!--|</?(?:address|article|aside|blockquote|details|dialog|div|dl|fieldset|figcaption|figure|footer|form|h[1-6]|header|hr|li|main|nav|ol|p|pre|section|summary|table|tbody|td|tfoot|th|thead|tr|ul)\b)"
);

/// Convert Markdown to HTML.
///
/// ```rust
/// use tagshift::markdown_to_html;
///
/// let html = markdown_to_html("# Title\n\nHello **world**");
/// assert_eq!(html, "<h1>Title</h1>\n<p>Hello <strong>world</strong></p>");
/// ```
pub fn markdown_to_html(markdown: &str) -> String {
    tracing::debug!(input_len = markdown.len(), "converting Markdown to HTML");

    let mut stash = Stash::default();
    let text = normalize_input(markdown);
    let text = code_fences(&text, &mut stash);

    let text = CODE_SPAN_DOUBLE.replace_all(&text, |caps: &Captures<'_>| {
        stash.inline(format!("<code>{}</code>", escape_text(&caps[1])))
    });
    let text = CODE_SPAN.replace_all(&text, |caps: &Captures<'_>| {
        stash.inline(format!("<code>{}</code>", escape_text(&caps[1])))
    });

    let text = STRONG_STAR.replace_all(&text, "<strong>${1}</strong>");
    let text = STRONG_UNDERSCORE.replace_all(&text, "${1}<strong>${2}</strong>${3}");
    let text = EM_STAR.replace_all(&text, "<em>${1}</em>");
    let text = EM_UNDERSCORE.replace_all(&text, "${1}<em>${2}</em>${3}");
    let text = STRIKE.replace_all(&text, "<del>${1}</del>");

    let text = IMAGE.replace_all(&text, |caps: &Captures<'_>| {
        let mut tag = format!(
            "<img src=\"{}\" alt=\"{}\"",
            escape_attribute(&caps[2]),
            escape_attribute(&caps[1])
        );
        if let Some(title) = caps.get(3) {
            tag.push_str(&format!(" title=\"{}\"", escape_attribute(title.as_str())));
        }
        tag.push('>');
        tag
    });
    let text = LINK.replace_all(&text, |caps: &Captures<'_>| {
        let title = caps
            .get(3)
            .map(|title| format!(" title=\"{}\"", escape_attribute(title.as_str())))
            .unwrap_or_default();
        format!("<a href=\"{}\"{title}>{}</a>", escape_attribute(&caps[2]), &caps[1])
    });
    let text = AUTOLINK.replace_all(&text, |caps: &Captures<'_>| {
        format!("<a href=\"{}\">{}</a>", escape_attribute(&caps[1]), escape_text(&caps[1]))
    });

    let html = render_blocks(&text, &mut stash);
    stash.restore(&html)
}

/// Replace fenced code blocks by placeholders. A fence opened inside a
/// blockquote ends with the quote, and an unclosed fence runs to the end of
/// the input.
fn code_fences(text: &str, stash: &mut Stash) -> String {
    let lines: Vec<&str> = text.split('\n').collect();
    let mut out = Vec::with_capacity(lines.len());
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];
        i += 1;

        let (depth, rest) = quote_depth(line);
        let Some(open) = FENCE_OPEN.captures(rest) else {
            out.push(line.to_string());
            continue;
        };
        let prefix = &line[..line.len() - rest.len()];
        let indent = &open[1];
        let fence = &open[2];
        let language = &open[3];

        let mut code = Vec::new();
        while let Some(inner) = lines.get(i).and_then(|line| strip_quotes(line, depth)) {
            i += 1;
            if closes_fence(inner, fence) {
                break;
            }
            code.push(strip_indent(inner, indent.len()));
        }

        let class = if language.is_empty() {
            String::new()
        } else {
            format!(" class=\"language-{}\"", escape_attribute(language))
        };
        let block = format!("<pre><code{class}>{}</code></pre>", escape_text(&code.join("\n")));
        out.push(format!("{prefix}{indent}{}", stash.block(block)));
    }

    out.join("\n")
}

/// Count the `>` markers opening a line and return the rest
fn quote_depth(line: &str) -> (usize, &str) {
    let mut depth = 0;
    let mut rest = line;
    while let Some(marker) = QUOTE_MARKER.find(rest) {
        rest = &rest[marker.end()..];
        depth += 1;
    }
    (depth, rest)
}

/// Remove exactly `depth` quote markers, or `None` if the line has fewer
fn strip_quotes(line: &str, depth: usize) -> Option<&str> {
    let mut rest = line;
    for _ in 0..depth {
        let marker = QUOTE_MARKER.find(rest)?;
        rest = &rest[marker.end()..];
    }
    Some(rest)
}

/// Remove up to `width` leading spaces
fn strip_indent(line: &str, width: usize) -> &str {
    let spaces = line.len() - line.trim_start_matches(' ').len();
    &line[spaces.min(width)..]
}

fn closes_fence(line: &str, fence: &str) -> bool {
    let line = line.trim();
    let Some(marker) = fence.chars().next() else {
        return false;
    };
    line.len() >= fence.len() && line.chars().all(|c| c == marker)
}

/// Headings, blockquotes and rules become placeholders, then the line
/// scanner builds everything else
fn render_blocks(text: &str, stash: &mut Stash) -> String {
    let text = HEADING.replace_all(text, |caps: &Captures<'_>| {
        let level = caps[1].len();
        stash.block(format!("<h{level}>{}</h{level}>", caps[2].trim()))
    });

    let text = QUOTE.replace_all(&text, |caps: &Captures<'_>| {
        let inner = caps[0]
            .lines()
            .map(|line| QUOTE_MARKER.replace(line, "").into_owned())
            .collect::<Vec<_>>()
            .join("\n");
        let body = render_blocks(&inner, stash);
        format!("{}\n", stash.block(format!("<blockquote>\n{body}\n</blockquote>")))
    });

    let text = RULE.replace_all(&text, |_: &Captures<'_>| stash.block("<hr>".to_string()));

    let lines: Vec<&str> = text.lines().collect();
    scan(&lines).join("\n")
}

/// Single pass over the lines: lists, tables, block HTML and paragraphs
fn scan(lines: &[&str]) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut paragraph: Vec<&str> = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];

        if line.trim().is_empty() {
            flush_paragraph(&mut paragraph, &mut blocks);
            i += 1;
        } else if LIST_ITEM.is_match(line) {
            flush_paragraph(&mut paragraph, &mut blocks);
            let (html, next) = list(lines, i);
            blocks.push(html);
            i = next;
        } else if line.contains('|')
            && lines.get(i + 1).is_some_and(|next| TABLE_SEPARATOR.is_match(next))
        {
            flush_paragraph(&mut paragraph, &mut blocks);
            let (html, next) = table(lines, i);
            blocks.push(html);
            i = next;
        } else if line.trim_start().starts_with(BLOCK_MARK) || BLOCK_HTML.is_match(line) {
            flush_paragraph(&mut paragraph, &mut blocks);
            blocks.push(line.trim().to_string());
            i += 1;
        } else {
            paragraph.push(line);
            i += 1;
        }
    }

    flush_paragraph(&mut paragraph, &mut blocks);
    blocks
}

/// Wrap the collected lines in `<p>`. Two trailing spaces or a trailing
/// backslash end a line with `<br>`.
fn flush_paragraph(lines: &mut Vec<&str>, blocks: &mut Vec<String>) {
    if lines.is_empty() {
        return;
    }

    let last = lines.len() - 1;
    let body = lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let text = line.trim();
            if i < last && line.ends_with("  ") {
                format!("{text}<br>")
            } else if i < last && text.ends_with('\\') {
                format!("{}<br>", text.trim_end_matches('\\').trim_end())
            } else {
                text.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n");

    blocks.push(format!("<p>{body}</p>"));
    lines.clear();
}

/// A list item's marker line
struct Marker {
    indent: usize,
    ordered: bool,
    number: u64,
    /// Where the item content starts; deeper lines belong to the item
    column: usize,
    content: String,
}

fn marker(line: &str) -> Option<Marker> {
    let caps = LIST_ITEM.captures(line)?;
    Some(Marker {
        indent: caps[1].len(),
        ordered: caps.get(3).is_some(),
        number: caps.get(3).and_then(|n| n.as_str().parse().ok()).unwrap_or(1),
        column: caps.get(4)?.start(),
        content: caps[4].to_string(),
    })
}

fn leading_whitespace(line: &str) -> usize {
    line.len() - line.trim_start_matches([' ', '\t']).len()
}

/// Parse the list starting at `start`; returns the HTML and the index of
/// the first line after it
fn list(lines: &[&str], start: usize) -> (String, usize) {
    let Some(first) = marker(lines[start]) else {
        return (String::new(), start + 1);
    };
    let sibling = |m: &Marker, column: usize| m.indent < column && m.ordered == first.ordered;

    let mut items: Vec<Vec<String>> = Vec::new();
    let mut column = first.column;
    let mut i = start;

    while i < lines.len() {
        let line = lines[i];

        if line.trim().is_empty() {
            let next = lines[i + 1..]
                .iter()
                .position(|l| !l.trim().is_empty())
                .map(|offset| i + 1 + offset);
            let continues = next.is_some_and(|n| match marker(lines[n]) {
                Some(m) if m.indent < column => sibling(&m, column),
                _ => leading_whitespace(lines[n]) >= column,
            });
            match (continues, next) {
                (true, Some(n)) => {
                    if let Some(item) = items.last_mut() {
                        item.push(String::new());
                    }
                    i = n;
                    continue;
                }
                _ => break,
            }
        }

        match marker(line) {
            Some(m) if m.indent < column => {
                if !sibling(&m, column) {
                    break;
                }
                column = m.column;
                items.push(vec![m.content]);
            }
            _ if leading_whitespace(line) >= column => {
                let indent = leading_whitespace(line).min(column);
                if let Some(item) = items.last_mut() {
                    item.push(line[indent..].to_string());
                }
            }
            None if !items.is_empty() => {
                // Lazy continuation of the item's text
                if let Some(item) = items.last_mut() {
                    item.push(line.trim().to_string());
                }
            }
            _ => break,
        }
        i += 1;
    }

    let tag = if first.ordered { "ol" } else { "ul" };
    let open = if first.ordered && first.number != 1 {
        format!("<ol start=\"{}\">", first.number)
    } else {
        format!("<{tag}>")
    };
    let body = items
        .iter()
        .map(|item| list_item(item))
        .collect::<Vec<_>>()
        .join("\n");

    (format!("{open}\n{body}\n</{tag}>"), i)
}

fn list_item(lines: &[String]) -> String {
    let split = lines
        .iter()
        .position(|line| {
            line.trim().is_empty() || line.starts_with(BLOCK_MARK) || LIST_ITEM.is_match(line)
        })
        .unwrap_or(lines.len());
    let (text, rest) = lines.split_at(split);
    let text = text.iter().map(|line| line.trim()).collect::<Vec<_>>().join("\n");

    let task = TASK.captures(&text).map(|caps| (&caps[1] != " ", caps[0].len()));
    let (checkbox, text) = match task {
        Some((checked, len)) => {
            let checked = if checked { " checked" } else { "" };
            (format!("<input type=\"checkbox\"{checked} disabled> "), text[len..].to_string())
        }
        None => (String::new(), text),
    };

    let rest: Vec<&str> = rest.iter().map(String::as_str).collect();
    let nested = scan(&rest).join("\n");
    if nested.is_empty() {
        format!("<li>{checkbox}{text}</li>")
    } else {
        format!("<li>{checkbox}{text}\n{nested}\n</li>")
    }
}

/// Parse the table whose header row is at `start`; the separator row
/// follows it
fn table(lines: &[&str], start: usize) -> (String, usize) {
    let header = split_row(lines[start]);
    let alignments: Vec<Option<&str>> = split_row(lines[start + 1])
        .iter()
        .map(|cell| match (cell.starts_with(':'), cell.ends_with(':')) {
            (true, true) => Some("center"),
            (false, true) => Some("right"),
            (true, false) => Some("left"),
            (false, false) => None,
        })
        .collect();

    let cell = |tag: &str, column: usize, text: &str| {
        match alignments.get(column).copied().flatten() {
            Some(align) => format!("<{tag} style=\"text-align: {align}\">{text}</{tag}>"),
            None => format!("<{tag}>{text}</{tag}>"),
        }
    };
    let row = |tag: &str, cells: &[String]| {
        let cells: String = (0..header.len())
            .map(|column| cell(tag, column, cells.get(column).map_or("", String::as_str)))
            .collect();
        format!("<tr>{cells}</tr>")
    };

    let mut html = vec![
        "<table>".to_string(),
        "<thead>".to_string(),
        row("th", &header),
        "</thead>".to_string(),
    ];

    let mut i = start + 2;
    let mut body = Vec::new();
    while i < lines.len() && !lines[i].trim().is_empty() && lines[i].contains('|') {
        body.push(row("td", &split_row(lines[i])));
        i += 1;
    }
    if !body.is_empty() {
        html.push("<tbody>".to_string());
        html.extend(body);
        html.push("</tbody>".to_string());
    }
    html.push("</table>".to_string());

    (html.join("\n"), i)
}

/// Split a table row on unescaped pipes
fn split_row(line: &str) -> Vec<String> {
    let line = line.trim();
    let line = line.strip_prefix('|').unwrap_or(line);
    let line = match line.strip_suffix('|') {
        Some(rest) if !rest.ends_with('\\') => rest,
        _ => line,
    };

    let mut cells = Vec::new();
    let mut cell = String::new();
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'|') => {
                cell.push('|');
                chars.next();
            }
            '|' => {
                cells.push(cell.trim().to_string());
                cell.clear();
            }
            _ => cell.push(c),
        }
    }
    cells.push(cell.trim().to_string());
    cells
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_and_paragraph() {
        assert_eq!(
            markdown_to_html("# Title\n\nHello **world**"),
            "<h1>Title</h1>\n<p>Hello <strong>world</strong></p>"
        );
        assert_eq!(markdown_to_html("### Closed ###"), "<h3>Closed</h3>");
        assert_eq!(markdown_to_html("#hashtag"), "<p>#hashtag</p>");
    }

    #[test]
    fn test_emphasis() {
        assert_eq!(
            markdown_to_html("**b** *i* __b__ _i_ ~~s~~ snake_case_name"),
            "<p><strong>b</strong> <em>i</em> <strong>b</strong> <em>i</em> <del>s</del> snake_case_name</p>"
        );
    }

    #[test]
    fn test_code() {
        assert_eq!(
            markdown_to_html("Run `a < b` **now**"),
            "<p>Run <code>a &lt; b</code> <strong>now</strong></p>"
        );
        assert_eq!(
            markdown_to_html("```rust\nlet x = *y * 2;\n# not a heading\n```"),
            "<pre><code class=\"language-rust\">let x = *y * 2;\n# not a heading</code></pre>"
        );
    }

    #[test]
    fn test_links_and_images() {
        assert_eq!(
            markdown_to_html(r#"[site](https://x.test "X") ![A](/a.png) <https://y.test>"#),
            "<p><a href=\"https://x.test\" title=\"X\">site</a> <img src=\"/a.png\" alt=\"A\"> \
             <a href=\"https://y.test\">https://y.test</a></p>"
        );
    }

    #[test]
    fn test_lists() {
        assert_eq!(markdown_to_html("- a\n- b"), "<ul>\n<li>a</li>\n<li>b</li>\n</ul>");
        assert_eq!(
            markdown_to_html("3. c\n4. d"),
            "<ol start=\"3\">\n<li>c</li>\n<li>d</li>\n</ol>"
        );
    }

    #[test]
    fn test_nested_list() {
        assert_eq!(
            markdown_to_html("- a\n  - a1\n- b"),
            "<ul>\n<li>a\n<ul>\n<li>a1</li>\n</ul>\n</li>\n<li>b</li>\n</ul>"
        );
    }

    #[test]
    fn test_task_list() {
        assert_eq!(
            markdown_to_html("- [x] done\n- [ ] todo"),
            "<ul>\n<li><input type=\"checkbox\" checked disabled> done</li>\n\
             <li><input type=\"checkbox\" disabled> todo</li>\n</ul>"
        );
    }

    #[test]
    fn test_table() {
        assert_eq!(
            markdown_to_html("| A | B |\n| --- | :-: |\n| 1 | x\\|y |"),
            "<table>\n<thead>\n<tr><th>A</th><th style=\"text-align: center\">B</th></tr>\n</thead>\n\
             <tbody>\n<tr><td>1</td><td style=\"text-align: center\">x|y</td></tr>\n</tbody>\n</table>"
        );
    }

    #[test]
    fn test_pipe_without_separator_is_not_a_table() {
        assert_eq!(markdown_to_html("a | b\nc | d"), "<p>a | b\nc | d</p>");
    }

    #[test]
    fn test_blockquote_and_rule() {
        assert_eq!(
            markdown_to_html("> quoted\n> **text**\n\n---"),
            "<blockquote>\n<p>quoted\n<strong>text</strong></p>\n</blockquote>\n<hr>"
        );
    }

    #[test]
    fn test_code_fence_inside_blockquote() {
        assert_eq!(
            markdown_to_html("> ```\n> let x = *a* + *b*;\n> ```"),
            "<blockquote>\n<pre><code>let x = *a* + *b*;</code></pre>\n</blockquote>"
        );
        assert_eq!(
            markdown_to_html("> ```\n> inside\nafter"),
            "<blockquote>\n<pre><code>inside</code></pre>\n</blockquote>\n<p>after</p>"
        );
    }

    #[test]
    fn test_code_fence_inside_list_item() {
        assert_eq!(
            markdown_to_html("- item\n  ```\n  x = *1*\n  ```\n- next"),
            "<ul>\n<li>item\n<pre><code>x = *1*</code></pre>\n</li>\n<li>next</li>\n</ul>"
        );
    }

    #[test]
    fn test_list_inside_blockquote() {
        assert_eq!(
            markdown_to_html("> - one\n> - two"),
            "<blockquote>\n<ul>\n<li>one</li>\n<li>two</li>\n</ul>\n</blockquote>"
        );
    }

    #[test]
    fn test_hard_breaks() {
        assert_eq!(markdown_to_html("a  \nb\\\nc"), "<p>a<br>\nb<br>\nc</p>");
    }

    #[test]
    fn test_block_html_passes_through() {
        assert_eq!(markdown_to_html("<div>raw</div>\n\ntext"), "<div>raw</div>\n<p>text</p>");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(markdown_to_html(""), "");
    }
}
