//! Inline span formatting.
//!
//! Rules run in a fixed order and never overlap: each rule only scans the
//! plain text left behind by the rules before it, so a span produced early
//! is opaque to everything after.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::types::{Inline, InlineKind, inline_html};

static BOLD_ITALIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*\*(.+?)\*\*\*").expect("valid regex"));
static BOLD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").expect("valid regex"));
static ITALIC: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*(.+?)\*").expect("valid regex"));
static STRIKE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"~~(.+?)~~").expect("valid regex"));
static CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`(.+?)`").expect("valid regex"));
static IMAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[(.+?)\]\((.+?)\)").expect("valid regex"));
static LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(.+?)\]\((.+?)\)").expect("valid regex"));
static AUTOLINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"https?://[^\s<>"()]+"#).expect("valid regex"));

#[derive(Debug, Clone, Copy)]
enum Rule {
    BoldItalic,
    Bold,
    Italic,
    Strike,
    Code,
    Image,
    Link,
    Autolink,
}

const RULES: [Rule; 8] = [
    Rule::BoldItalic,
    Rule::Bold,
    Rule::Italic,
    Rule::Strike,
    Rule::Code,
    Rule::Image,
    Rule::Link,
    Rule::Autolink,
];

impl Rule {
    fn regex(self) -> &'static Regex {
        match self {
            Self::BoldItalic => &*BOLD_ITALIC,
            Self::Bold => &*BOLD,
            Self::Italic => &*ITALIC,
            Self::Strike => &*STRIKE,
            Self::Code => &*CODE,
            Self::Image => &*IMAGE,
            Self::Link => &*LINK,
            Self::Autolink => &*AUTOLINK,
        }
    }

    fn span(self, caps: &Captures<'_>) -> Inline {
        let whole = caps[0].to_string();
        let (kind, text) = match self {
            Self::BoldItalic => (InlineKind::BoldItalic, whole),
            Self::Bold => (InlineKind::Bold, whole),
            Self::Italic => (InlineKind::Italic, whole),
            Self::Strike => (InlineKind::Strikethrough, whole),
            Self::Code => (InlineKind::Code, whole),
            Self::Image => (
                InlineKind::Image {
                    alt: caps[1].to_string(),
                    src: caps[2].to_string(),
                },
                String::new(),
            ),
            Self::Link => (
                InlineKind::Link {
                    href: caps[2].to_string(),
                },
                caps[1].to_string(),
            ),
            Self::Autolink => (InlineKind::Autolink { href: whole.clone() }, whole),
        };
        Inline::Span { kind, text }
    }

    /// Autolinks are skipped when the URL directly follows `"` or `(`.
    fn accepts(self, text: &str, start: usize) -> bool {
        match self {
            Self::Autolink => !matches!(text[..start].chars().next_back(), Some('"' | '(')),
            _ => true,
        }
    }
}

/// Split a line into plain text and styled spans.
pub fn format_inline(line: &str) -> Vec<Inline> {
    let mut pieces = vec![Inline::Text(line.to_string())];
    for rule in RULES {
        pieces = pieces
            .into_iter()
            .flat_map(|piece| match piece {
                Inline::Text(text) => apply_rule(rule, &text),
                span @ Inline::Span { .. } => vec![span],
            })
            .collect();
    }
    pieces
}

/// Inline markup for a line.
pub fn format_inline_html(line: &str) -> String {
    inline_html(&format_inline(line))
}

fn apply_rule(rule: Rule, text: &str) -> Vec<Inline> {
    let mut out = Vec::new();
    let mut cursor = 0;
    for caps in rule.regex().captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        if !rule.accepts(text, whole.start()) {
            continue;
        }
        if whole.start() > cursor {
            out.push(Inline::Text(text[cursor..whole.start()].to_string()));
        }
        out.push(rule.span(&caps));
        cursor = whole.end();
    }
    if cursor < text.len() {
        out.push(Inline::Text(text[cursor..].to_string()));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(pieces: &[Inline]) -> Vec<Option<InlineKind>> {
        pieces
            .iter()
            .map(|p| match p {
                Inline::Text(_) => None,
                Inline::Span { kind, .. } => Some(kind.clone()),
            })
            .collect()
    }

    #[test]
    fn test_plain_text_is_one_piece() {
        assert_eq!(
            format_inline("just words"),
            vec![Inline::Text("just words".to_string())]
        );
    }

    #[test]
    fn test_empty_line_has_no_pieces() {
        assert!(format_inline("").is_empty());
    }

    #[test]
    fn test_bold_and_italic_do_not_cross_consume() {
        let pieces = format_inline("**bold** and *italic*");
        assert_eq!(
            pieces,
            vec![
                Inline::Span {
                    kind: InlineKind::Bold,
                    text: "**bold**".to_string()
                },
                Inline::Text(" and ".to_string()),
                Inline::Span {
                    kind: InlineKind::Italic,
                    text: "*italic*".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_bold_italic_wins_over_bold() {
        let pieces = format_inline("***both***");
        assert_eq!(kinds(&pieces), vec![Some(InlineKind::BoldItalic)]);
        assert_eq!(pieces[0].text(), "***both***");
    }

    #[test]
    fn test_strike_and_code_keep_delimiters() {
        let pieces = format_inline("~~gone~~ `x`");
        assert_eq!(pieces[0].text(), "~~gone~~");
        assert_eq!(pieces[2].text(), "`x`");
        assert_eq!(
            kinds(&pieces),
            vec![Some(InlineKind::Strikethrough), None, Some(InlineKind::Code)]
        );
    }

    #[test]
    fn test_image_is_not_matched_as_link() {
        let pieces = format_inline("![alt](img.png)");
        assert_eq!(
            pieces,
            vec![Inline::Span {
                kind: InlineKind::Image {
                    src: "img.png".to_string(),
                    alt: "alt".to_string()
                },
                text: String::new(),
            }]
        );
    }

    #[test]
    fn test_link_hides_syntax() {
        let pieces = format_inline("see [docs](https://example.com/docs) now");
        assert_eq!(pieces.len(), 3);
        assert_eq!(pieces[1].text(), "docs");
        assert_eq!(pieces[1].source(), "[docs](https://example.com/docs)");
    }

    #[test]
    fn test_link_href_is_not_autolinked_again() {
        let pieces = format_inline("[a](https://x.io)");
        assert_eq!(
            kinds(&pieces),
            vec![Some(InlineKind::Link {
                href: "https://x.io".to_string()
            })]
        );
    }

    #[test]
    fn test_bare_url_becomes_autolink() {
        let pieces = format_inline("visit https://example.com today");
        assert_eq!(pieces[1].text(), "https://example.com");
        assert_eq!(
            kinds(&pieces)[1],
            Some(InlineKind::Autolink {
                href: "https://example.com".to_string()
            })
        );
    }

    #[test]
    fn test_url_after_paren_or_quote_is_left_alone() {
        assert_eq!(kinds(&format_inline("(https://a.b")), vec![None]);
        assert_eq!(kinds(&format_inline("\"http://a.b\"")), vec![None]);
    }

    #[test]
    fn test_html_output_escapes_text() {
        assert_eq!(
            format_inline_html("a < b **c**"),
            "a &lt; b <strong class=\"mw-bold\">**c**</strong>"
        );
    }
}
