//! Configuration options for the converters

/// Options for HTML → JSX conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsxOptions {
    /// Emit one node per line with indentation. When false the output is a
    /// single line.
    pub prettify: bool,

    /// Rename HTML attributes to their JSX spelling (`class` → `className`)
    pub camel_case_attributes: bool,

    /// Wrap multiple root nodes in `<>` … `</>`
    pub use_fragment_wrapper: bool,

    /// Keep comments as `{/* … */}`
    pub preserve_comments: bool,
}

impl Default for JsxOptions {
    fn default() -> Self {
        Self {
            prettify: true,
            camel_case_attributes: true,
            use_fragment_wrapper: true,
            preserve_comments: false,
        }
    }
}

/// Indentation unit for Pug output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indent {
    /// Indent with this many spaces per level
    Spaces(u8),
    /// Indent with one tab per level
    Tabs,
}

impl Indent {
    /// The string written once per nesting level
    pub fn unit(&self) -> String {
        match self {
            Indent::Spaces(n) => " ".repeat(usize::from(*n)),
            Indent::Tabs => "\t".to_string(),
        }
    }
}

impl Default for Indent {
    fn default() -> Self {
        Indent::Spaces(2)
    }
}

/// Options for HTML → Pug conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PugOptions {
    /// Put a lone text child on the tag's own line (`p Hello`)
    pub combine_text_with_tag: bool,

    /// Keep comments as `// …`
    pub preserve_comments: bool,

    /// Indentation unit
    pub indent: Indent,
}

impl Default for PugOptions {
    fn default() -> Self {
        Self {
            combine_text_with_tag: true,
            preserve_comments: false,
            indent: Indent::default(),
        }
    }
}

/// Options for the entity encoder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncoderOptions {
    /// Also encode every character that has an entry in the entity table
    pub special_chars: bool,

    /// Use `&#NNN;` instead of `&name;` for those characters
    pub numeric_entities: bool,
}

impl Default for EncoderOptions {
    fn default() -> Self {
        Self {
            special_chars: true,
            numeric_entities: false,
        }
    }
}

/// Options for the tag remover
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRemoverOptions {
    /// Collapse whitespace runs, trim lines and drop repeated blank lines
    pub normalize_whitespace: bool,

    /// Decode entities in the remaining text
    pub convert_entities: bool,

    /// Turn `<br>` and closing block tags into line breaks
    pub preserve_line_breaks: bool,

    /// Tag names left in place (lower-case)
    pub keep_tags: Vec<String>,
}

impl Default for TagRemoverOptions {
    fn default() -> Self {
        Self {
            normalize_whitespace: true,
            convert_entities: true,
            preserve_line_breaks: true,
            keep_tags: Vec::new(),
        }
    }
}

impl TagRemoverOptions {
    /// Check whether a tag is on the keep list
    pub fn keeps(&self, tag: &str) -> bool {
        self.keep_tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}
