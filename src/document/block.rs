//! Single-line block classification.

use std::sync::LazyLock;

use regex::Regex;

use super::inline::format_inline;
use super::types::Block;

static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{1,6})(\s+)(.+)$").expect("valid regex"));
static RULE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(-{3,}|\*{3,}|_{3,})$").expect("valid regex"));
static LIST_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\s*)([-*+]|\d+\.)(\s+)(.+)$").expect("valid regex"));

/// Prefix that turns a line into a blockquote.
pub const QUOTE_PREFIX: &str = "> ";

/// Classify one line and format its inline content.
///
/// Priority: heading, rule, blockquote, list item, paragraph, blank.
/// Front matter is the caller's concern; a bare `---` here is always a rule.
pub fn render_line(line: &str) -> Block {
    if let Some(caps) = HEADING.captures(line) {
        let marker = caps[1].to_string();
        return Block::Heading {
            level: u8::try_from(marker.len()).unwrap_or(6),
            marker,
            gap: caps[2].to_string(),
            content: format_inline(&caps[3]),
        };
    }

    if RULE.is_match(line) {
        return Block::Rule {
            source: line.to_string(),
        };
    }

    if let Some(rest) = line.strip_prefix(QUOTE_PREFIX) {
        return Block::Blockquote {
            content: format_inline(rest),
        };
    }

    if let Some(caps) = LIST_ITEM.captures(line) {
        let marker = caps[2].to_string();
        return Block::ListItem {
            indent: caps[1].to_string(),
            ordered: marker.ends_with('.'),
            marker,
            gap: caps[3].to_string(),
            content: format_inline(&caps[4]),
        };
    }

    if line.trim().is_empty() {
        Block::Blank
    } else {
        Block::Paragraph {
            content: format_inline(line),
        }
    }
}

/// Block-level markup for one line.
pub fn render_line_html(line: &str) -> String {
    render_line(line).to_html()
}
