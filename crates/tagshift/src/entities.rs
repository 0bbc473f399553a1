//! HTML entity encoding and decoding.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tagshift_core::{entity_char, entity_name, EncoderOptions};

static ENTITY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&(?:#[xX]([0-9a-fA-F]{1,6})|#([0-9]{1,7})|([a-zA-Z][a-zA-Z0-9]{1,31}));")
        .expect("ENTITY: hardcoded regex is valid")
});

/// Encode text for safe inclusion in HTML.
///
/// `&`, `<`, `>`, `"` and `'` are always escaped. With `special_chars`, every
/// other character in the entity table is written as a named entity, or as a
/// decimal reference when `numeric_entities` is set.
///
/// ```rust
/// use tagshift::{encode_html_entities, EncoderOptions};
///
/// let encoded = encode_html_entities("© <b>", &EncoderOptions::default());
/// assert_eq!(encoded, "&copy; &lt;b&gt;");
/// ```
pub fn encode_html_entities(text: &str, options: &EncoderOptions) -> String {
    let mut result = String::with_capacity(text.len() + text.len() / 4);

    for c in text.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#39;"),
            _ if options.special_chars => match entity_name(c) {
                Some(_) if options.numeric_entities => {
                    result.push_str(&format!("&#{};", u32::from(c)));
                }
                Some(name) => {
                    result.push('&');
                    result.push_str(name);
                    result.push(';');
                }
                None => result.push(c),
            },
            _ => result.push(c),
        }
    }

    result
}

/// Decode numeric (`&#169;`, `&#xA9;`) and named (`&copy;`) references.
///
/// The input is scanned once, left to right, so decoded text is never
/// decoded again (`&amp;lt;` becomes `&lt;`). Unknown names and invalid code
/// points are left as written.
pub fn decode_html_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    ENTITY
        .replace_all(text, |caps: &Captures<'_>| {
            let decoded = if let Some(hex) = caps.get(1) {
                u32::from_str_radix(hex.as_str(), 16).ok().and_then(code_point)
            } else if let Some(dec) = caps.get(2) {
                dec.as_str().parse::<u32>().ok().and_then(code_point)
            } else {
                caps.get(3).and_then(|name| entity_char(name.as_str()))
            };

            match decoded {
                Some(c) => c.to_string(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

fn code_point(value: u32) -> Option<char> {
    char::from_u32(value).filter(|c| *c != '\0')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numeric() -> EncoderOptions {
        EncoderOptions {
            numeric_entities: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_encode_always_escapes_markup() {
        let options = EncoderOptions {
            special_chars: false,
            ..Default::default()
        };
        assert_eq!(
            encode_html_entities(r#"<a href="x">Tom & 'Jerry' ©</a>"#, &options),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39; ©&lt;/a&gt;"
        );
    }

    #[test]
    fn test_encode_named_entities() {
        let encoded = encode_html_entities("café © 2024 – α", &EncoderOptions::default());
        assert_eq!(encoded, "caf&eacute; &copy; 2024 &ndash; &alpha;");
    }

    #[test]
    fn test_encode_numeric_entities() {
        assert_eq!(encode_html_entities("© é", &numeric()), "&#169; &#233;");
    }

    #[test]
    fn test_encode_leaves_unlisted_chars() {
        assert_eq!(encode_html_entities("日本 🎉", &EncoderOptions::default()), "日本 🎉");
    }

    #[test]
    fn test_decode() {
        assert_eq!(decode_html_entities("&copy; &#169; &#xA9; &#XA9;"), "© © © ©");
        assert_eq!(decode_html_entities("&lt;p&gt; &amp; &quot;"), "<p> & \"");
        assert_eq!(decode_html_entities("&#128512;"), "😀");
    }

    #[test]
    fn test_decode_is_single_pass() {
        assert_eq!(decode_html_entities("&amp;lt;"), "&lt;");
    }

    #[test]
    fn test_decode_leaves_unknown_sequences() {
        assert_eq!(decode_html_entities("&bogus; &#xD800; &#0; & x"), "&bogus; &#xD800; &#0; & x");
        assert_eq!(decode_html_entities("AT&T"), "AT&T");
        assert_eq!(decode_html_entities("&copy"), "&copy");
    }

    #[test]
    fn test_round_trip() {
        let text = "<Tom & \"Jerry\"> © 2024 — naïve 'ß' ∑ 😀";
        assert_eq!(decode_html_entities(&encode_html_entities(text, &EncoderOptions::default())), text);
        assert_eq!(decode_html_entities(&encode_html_entities(text, &numeric())), text);
    }
}
