//! Round-trip editing on top of the rendered surface.
//!
//! Provides the rope-backed document text, markdown extraction, caret
//! preservation, raw edit mode and list nesting, designed for integration
//! into the TEA architecture.

mod buffer;
mod caret;
mod edit_mode;
mod extract;
mod lists;

pub use buffer::{Anchor, SourceBuffer};
pub use caret::{capture_offset, restore_offset};
pub use edit_mode::{EditController, EditError, EditSession, source_for};
pub use extract::{Extraction, extract, extract_with_anchors};
pub use lists::{INDENT_WIDTH, indent, list_item_at_caret, outdent};
