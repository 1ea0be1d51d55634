//! Core rendering types.

use std::fmt::Write as _;

use super::escape_html;

/// The styled constructs an inline span can take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InlineKind {
    Bold,
    Italic,
    BoldItalic,
    Strikethrough,
    Code,
    /// `[text](href)`; only the text is visible.
    Link { href: String },
    /// `![alt](src)`; carries no visible text.
    Image { src: String, alt: String },
    /// A bare `http(s)://` URL, visible as itself.
    Autolink { href: String },
}

impl InlineKind {
    /// CSS class attached to the rendered element.
    pub const fn class(&self) -> &'static str {
        match self {
            Self::Bold => "mw-bold",
            Self::Italic => "mw-italic",
            Self::BoldItalic => "mw-bold mw-italic",
            Self::Strikethrough => "mw-strike",
            Self::Code => "mw-code",
            Self::Link { .. } => "mw-link",
            Self::Image { .. } => "mw-image",
            Self::Autolink { .. } => "mw-link mw-autolink",
        }
    }

    /// Links, images and autolinks can be opened in raw edit mode.
    pub const fn is_compound(&self) -> bool {
        matches!(
            self,
            Self::Link { .. } | Self::Image { .. } | Self::Autolink { .. }
        )
    }
}

/// One piece of a formatted line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    /// Unstyled text.
    Text(String),
    /// A styled run. `text` is what the reader sees: style spans keep their
    /// delimiters, links show their label, images show nothing.
    Span { kind: InlineKind, text: String },
}

impl Inline {
    /// The visible text of this piece.
    pub fn text(&self) -> &str {
        match self {
            Self::Text(text) | Self::Span { text, .. } => text,
        }
    }

    /// Markdown that produced this piece.
    pub fn source(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Span { kind, text } => span_source(kind, text),
        }
    }

    fn write_html(&self, out: &mut String) {
        match self {
            Self::Text(text) => out.push_str(&escape_html(text)),
            Self::Span { kind, text } => write_span_html(out, kind, text),
        }
    }
}

/// Rebuild the markdown for a span from its kind and current visible text.
pub fn span_source(kind: &InlineKind, text: &str) -> String {
    match kind {
        InlineKind::Link { href } => format!("[{text}]({href})"),
        InlineKind::Image { src, alt } => format!("![{alt}]({src})"),
        _ => text.to_string(),
    }
}

pub(crate) fn write_span_html(out: &mut String, kind: &InlineKind, text: &str) {
    let class = kind.class();
    let body = escape_html(text);
    let _ = match kind {
        InlineKind::Bold => write!(out, "<strong class=\"{class}\">{body}</strong>"),
        InlineKind::Italic => write!(out, "<em class=\"{class}\">{body}</em>"),
        InlineKind::BoldItalic => write!(
            out,
            "<strong class=\"mw-bold\"><em class=\"mw-italic\">{body}</em></strong>"
        ),
        InlineKind::Strikethrough => write!(out, "<del class=\"{class}\">{body}</del>"),
        InlineKind::Code => write!(out, "<code class=\"{class}\">{body}</code>"),
        InlineKind::Link { href } | InlineKind::Autolink { href } => write!(
            out,
            "<a href=\"{}\" class=\"{class}\">{body}</a>",
            escape_html(href)
        ),
        InlineKind::Image { src, alt } => write!(
            out,
            "<img src=\"{}\" alt=\"{}\" class=\"{class}\">",
            escape_html(src),
            escape_html(alt)
        ),
    };
}

/// Markup for a run of inline pieces.
pub fn inline_html(pieces: &[Inline]) -> String {
    let mut out = String::new();
    for piece in pieces {
        piece.write_html(&mut out);
    }
    out
}

/// A single rendered line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// `#`-prefixed heading. `marker` is the run of `#`, `gap` the whitespace after it.
    Heading {
        level: u8,
        marker: String,
        gap: String,
        content: Vec<Inline>,
    },
    /// Thematic break; `source` is the line that produced it.
    Rule { source: String },
    Blockquote { content: Vec<Inline> },
    ListItem {
        /// Leading whitespace exactly as written.
        indent: String,
        marker: String,
        gap: String,
        ordered: bool,
        content: Vec<Inline>,
    },
    Paragraph { content: Vec<Inline> },
    /// Line inside (or delimiting) a leading front-matter block, kept verbatim.
    YamlLine { text: String, delimiter: bool },
    Blank,
}

impl Block {
    /// The text a reader sees for this block, ignoring markup.
    pub fn visible_text(&self) -> String {
        match self {
            Self::Heading {
                marker,
                gap,
                content,
                ..
            }
            | Self::ListItem {
                marker,
                gap,
                content,
                ..
            } => {
                let mut text = format!("{marker}{gap}");
                text.extend(content.iter().map(Inline::text));
                text
            }
            Self::Blockquote { content } | Self::Paragraph { content } => {
                content.iter().map(Inline::text).collect()
            }
            Self::YamlLine { text, .. } => text.clone(),
            Self::Rule { .. } | Self::Blank => String::new(),
        }
    }

    /// Block-level markup. Blank lines produce nothing.
    pub fn to_html(&self) -> String {
        match self {
            Self::Heading {
                level,
                marker,
                gap,
                content,
            } => format!(
                "<h{level} class=\"mw-heading mw-h{level}\">{}{}</h{level}>",
                escape_html(&format!("{marker}{gap}")),
                inline_html(content)
            ),
            Self::Rule { .. } => "<hr class=\"mw-rule\">".to_string(),
            Self::Blockquote { content } => format!(
                "<blockquote class=\"mw-quote\">{}</blockquote>",
                inline_html(content)
            ),
            Self::ListItem {
                indent,
                marker,
                gap,
                ordered,
                content,
            } => format!(
                "<li class=\"mw-item {}\" data-indent=\"{}\">{}{}</li>",
                if *ordered { "mw-ordered" } else { "mw-bullet" },
                indent.chars().count(),
                escape_html(&format!("{marker}{gap}")),
                inline_html(content)
            ),
            Self::Paragraph { content } => {
                format!("<p class=\"mw-paragraph\">{}</p>", inline_html(content))
            }
            Self::YamlLine { text, delimiter } => format!(
                "<div class=\"mw-yaml{}\">{}</div>",
                if *delimiter { " mw-yaml-delimiter" } else { "" },
                escape_html(text)
            ),
            Self::Blank => String::new(),
        }
    }
}
