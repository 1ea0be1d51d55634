// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. editor::EditError)
    clippy::module_name_repetitions
)]

//! # Markwright
//!
//! An in-place WYSIWYG markdown editing engine.
//!
//! Markwright renders flat markdown into styled elements on an editable
//! surface and turns whatever the user does to that surface back into
//! markdown:
//! - Every keystroke re-renders the whole document with the caret preserved
//! - Links, images, blockquotes and rules open as raw markdown on demand
//! - Tab / Shift+Tab nest list items
//! - A leading YAML front-matter block is kept verbatim
//! - Saves are debounced and sent to a pluggable gateway
//!
//! ## Architecture
//!
//! Markwright uses The Elm Architecture (TEA) pattern:
//! - **Model**: Editor state (markdown, surface, edit session, timers)
//! - **Message**: Host events and timer ticks
//! - **Update**: Pure state transitions
//! - **Effects**: Saving through a [`gateway::SaveGateway`]
//!
//! ## Modules
//!
//! - [`app`]: Editor state and message handling
//! - [`document`]: Markdown to blocks and markup
//! - [`surface`]: The editable node tree
//! - [`editor`]: Extraction, caret tracking, raw edit mode, list nesting
//! - [`gateway`]: Save validation, file storage and the JSON endpoint
//! - [`config`]: Flags and rc files

pub mod app;
pub mod config;
pub mod document;
pub mod editor;
pub mod gateway;
pub mod perf;
pub mod surface;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{App, Key, Message, Model};
    pub use crate::config::EditorOptions;
    pub use crate::document::{Block, render_document};
    pub use crate::editor::{SourceBuffer, extract};
    pub use crate::gateway::{FileStore, LocalEndpoint, SaveGateway};
    pub use crate::surface::{NodeId, NodeKind, Surface};
}
