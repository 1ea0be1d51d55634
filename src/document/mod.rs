//! Markdown rendering.
//!
//! This module handles:
//! - Inline span formatting (emphasis, code, links, images, autolinks)
//! - Classifying single lines into blocks
//! - Rendering a whole document, including a leading front-matter block

mod block;
mod inline;
mod render;
mod types;

pub use block::{QUOTE_PREFIX, render_line, render_line_html};
pub use inline::{format_inline, format_inline_html};
pub use render::{
    FRONT_MATTER_DELIMITER, FrontMatter, render_document, render_document_html, render_step,
};
pub use types::{Block, Inline, InlineKind, inline_html, span_source};
pub(crate) use types::write_span_html;

/// Escape HTML metacharacters in text and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
