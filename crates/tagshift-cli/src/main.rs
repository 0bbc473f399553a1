use std::{
    fs,
    io::{self, Read, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use once_cell::sync::Lazy;
use regex::Regex;
use tagshift::{
    EncoderOptions, Indent, JsxConverter, JsxOptions, ParseMode, PugConverter, PugOptions,
    ScraperParser, TagRemoverOptions,
};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

static ENCODED_ENTITY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&(?:#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6}|[a-zA-Z][a-zA-Z0-9]{1,31});")
        .expect("ENCODED_ENTITY: hardcoded regex is valid")
});

/// Convert HTML to JSX, Pug or Markdown and back
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert HTML to JSX
    Jsx {
        #[command(flatten)]
        input: Input,

        /// Write everything on one line
        #[arg(long)]
        compact: bool,

        /// Keep HTML attribute names (`class` instead of `className`)
        #[arg(long)]
        html_attribute_names: bool,

        /// Do not wrap multiple root nodes in `<>` … `</>`
        #[arg(long)]
        no_fragment: bool,

        /// Keep comments as `{/* … */}`
        #[arg(long)]
        preserve_comments: bool,

        /// Fail on any markup error instead of recovering
        #[arg(long)]
        strict: bool,
    },

    /// Convert HTML to Pug
    Pug {
        #[command(flatten)]
        input: Input,

        /// Put text on its own `|` line even when it is the only child
        #[arg(long)]
        no_combine: bool,

        /// Keep comments as `// …`
        #[arg(long)]
        preserve_comments: bool,

        /// Indent with tabs instead of spaces
        #[arg(long, conflicts_with = "indent")]
        tabs: bool,

        /// Spaces per indentation level
        #[arg(long, default_value_t = 2)]
        indent: u8,

        /// Fail on any markup error instead of recovering
        #[arg(long)]
        strict: bool,
    },

    /// Convert HTML to Markdown
    Markdown {
        #[command(flatten)]
        input: Input,
    },

    /// Convert Markdown to HTML
    Html {
        #[command(flatten)]
        input: Input,
    },

    /// Encode text with HTML entities
    Encode {
        #[command(flatten)]
        input: Input,

        #[command(flatten)]
        encoder: EncoderArgs,
    },

    /// Decode HTML entities
    Decode {
        #[command(flatten)]
        input: Input,
    },

    /// Decode if the input contains entities, encode otherwise
    Entities {
        #[command(flatten)]
        input: Input,

        #[command(flatten)]
        encoder: EncoderArgs,
    },

    /// Remove HTML tags and keep the text
    Strip {
        #[command(flatten)]
        input: Input,

        /// Tags to keep (repeat or separate with commas)
        #[arg(long = "keep", value_delimiter = ',')]
        keep_tags: Vec<String>,

        /// Leave whitespace exactly as it is after stripping
        #[arg(long)]
        raw_whitespace: bool,

        /// Leave entities encoded
        #[arg(long)]
        raw_entities: bool,

        /// Do not turn `<br>` and closing block tags into line breaks
        #[arg(long)]
        no_line_breaks: bool,
    },
}

#[derive(Args, Debug)]
struct Input {
    /// File to read; standard input when omitted
    file: Option<PathBuf>,
}

impl Input {
    fn read(&self) -> Result<String> {
        match &self.file {
            Some(path) => fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display())),
            None => {
                let mut input = String::new();
                io::stdin()
                    .lock()
                    .read_to_string(&mut input)
                    .context("failed to read standard input")?;
                Ok(input)
            }
        }
    }
}

#[derive(Args, Debug)]
struct EncoderArgs {
    /// Only escape `& < > " '`
    #[arg(long)]
    basic: bool,

    /// Write `&#NNN;` instead of named entities
    #[arg(long)]
    numeric: bool,
}

impl EncoderArgs {
    fn options(&self) -> EncoderOptions {
        EncoderOptions {
            special_chars: !self.basic,
            numeric_entities: self.numeric,
        }
    }
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    let output = run(&cli.command)?;

    let mut stdout = io::stdout().lock();
    if output.is_empty() {
        return Ok(());
    }
    writeln!(stdout, "{output}")?;
    stdout.flush()?;
    Ok(())
}

#[tracing::instrument(skip_all)]
fn run(command: &Command) -> Result<String> {
    let output = match command {
        Command::Jsx {
            input,
            compact,
            html_attribute_names,
            no_fragment,
            preserve_comments,
            strict,
        } => {
            let options = JsxOptions {
                prettify: !compact,
                camel_case_attributes: !html_attribute_names,
                use_fragment_wrapper: !no_fragment,
                preserve_comments: *preserve_comments,
            };
            JsxConverter::with_options(options)
                .convert_with(&parser(*strict), &input.read()?)
                .context("failed to convert HTML to JSX")?
        }
        Command::Pug {
            input,
            no_combine,
            preserve_comments,
            tabs,
            indent,
            strict,
        } => {
            let options = PugOptions {
                combine_text_with_tag: !no_combine,
                preserve_comments: *preserve_comments,
                indent: if *tabs { Indent::Tabs } else { Indent::Spaces(*indent) },
            };
            PugConverter::with_options(options)
                .convert_with(&parser(*strict), &input.read()?)
                .context("failed to convert HTML to Pug")?
        }
        Command::Markdown { input } => tagshift::html_to_markdown(&input.read()?),
        Command::Html { input } => tagshift::markdown_to_html(&input.read()?),
        Command::Encode { input, encoder } => {
            tagshift::encode_html_entities(&input.read()?, &encoder.options())
        }
        Command::Decode { input } => tagshift::decode_html_entities(&input.read()?),
        Command::Entities { input, encoder } => {
            let text = input.read()?;
            if looks_encoded(&text) {
                tracing::debug!("input contains entities, decoding");
                tagshift::decode_html_entities(&text)
            } else {
                tracing::debug!("input has no entities, encoding");
                tagshift::encode_html_entities(&text, &encoder.options())
            }
        }
        Command::Strip {
            input,
            keep_tags,
            raw_whitespace,
            raw_entities,
            no_line_breaks,
        } => {
            let options = TagRemoverOptions {
                normalize_whitespace: !raw_whitespace,
                convert_entities: !raw_entities,
                preserve_line_breaks: !no_line_breaks,
                keep_tags: keep_tags.iter().map(|tag| tag.trim().to_lowercase()).collect(),
            };
            tagshift::remove_html_tags(&input.read()?, &options)
        }
    };
    Ok(output)
}

fn parser(strict: bool) -> ScraperParser {
    if strict {
        ScraperParser::strict()
    } else {
        ScraperParser::new(ParseMode::Lenient)
    }
}

/// Whether text already holds at least one entity reference
fn looks_encoded(text: &str) -> bool {
    ENCODED_ENTITY.is_match(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_entity_detection() {
        assert!(looks_encoded("Tom &amp; Jerry"));
        assert!(looks_encoded("&#169; 2024"));
        assert!(looks_encoded("&#xA9;"));
        assert!(!looks_encoded("Tom & Jerry"));
        assert!(!looks_encoded("a &b c;"));
        assert!(!looks_encoded("plain"));
    }

    #[test]
    fn test_strip_flags() {
        let args = ["tagshift", "strip", "--keep", "b,A", "--keep", "i", "in.html"];
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Command::Strip { input, keep_tags, .. } => {
                assert_eq!(keep_tags, vec!["b", "A", "i"]);
                assert_eq!(input.file, Some(PathBuf::from("in.html")));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_pug_tabs_conflict_with_indent() {
        assert!(Cli::try_parse_from(["tagshift", "pug", "--tabs", "--indent", "4"]).is_err());
    }
}
