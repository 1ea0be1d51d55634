//! Whole-document rendering.
//!
//! The document is rendered as a left fold over its lines. The only state
//! carried between lines is whether a leading front-matter block is open.

use super::block::render_line;
use super::types::Block;

/// Delimiter that opens and closes a leading front-matter block.
pub const FRONT_MATTER_DELIMITER: &str = "---";

/// Front-matter progress through a single rendering pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontMatter {
    /// No front matter seen (yet, or at all).
    Absent,
    /// Between the opening and closing delimiters.
    Open,
    /// The block has been closed; later delimiters are rules.
    Closed,
}

/// Render one line given the front-matter state before it.
///
/// Returns the block and the state for the next line.
pub fn render_step(state: FrontMatter, index: usize, line: &str) -> (FrontMatter, Block) {
    let is_delimiter = line == FRONT_MATTER_DELIMITER;
    match state {
        FrontMatter::Absent if index == 0 && is_delimiter => (
            FrontMatter::Open,
            Block::YamlLine {
                text: line.to_string(),
                delimiter: true,
            },
        ),
        FrontMatter::Open if is_delimiter => (
            FrontMatter::Closed,
            Block::YamlLine {
                text: line.to_string(),
                delimiter: true,
            },
        ),
        FrontMatter::Open => (
            FrontMatter::Open,
            Block::YamlLine {
                text: line.to_string(),
                delimiter: false,
            },
        ),
        FrontMatter::Absent | FrontMatter::Closed => (state, render_line(line)),
    }
}

/// Render markdown text into one block per line.
pub fn render_document(text: &str) -> Vec<Block> {
    let (_, blocks) = text.split('\n').enumerate().fold(
        (FrontMatter::Absent, Vec::new()),
        |(state, mut blocks), (index, line)| {
            let (next, block) = render_step(state, index, line);
            blocks.push(block);
            (next, blocks)
        },
    );
    blocks
}

/// Markup for a whole document.
pub fn render_document_html(text: &str) -> String {
    render_document(text)
        .iter()
        .map(Block::to_html)
        .filter(|html| !html.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
