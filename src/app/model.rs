use crate::config::EditorOptions;
use crate::document::render_document;
use crate::editor::{EditController, SourceBuffer, capture_offset, extract, restore_offset};
use crate::surface::{NodeId, Surface};

use super::timers::Debouncer;

/// The context menu offered over a compound element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextMenu {
    /// Element the "Edit" action opens.
    pub target: NodeId,
}

/// The complete editor state.
///
/// All state lives here - no global or scattered state.
#[derive(Debug, Clone)]
pub struct Model {
    /// The authoritative markdown.
    pub source: SourceBuffer,
    /// The rendered, user-editable surface.
    pub surface: Surface,
    pub edit: EditController,
    pub options: EditorOptions,
    pub context_menu: Option<ContextMenu>,
    pub auto_save: Debouncer<()>,
    pub long_press: Debouncer<NodeId>,
    /// List nesting changed on the surface since the last extraction.
    pub structure_changed: bool,
    /// A save should run once the current message is handled.
    pub save_requested: bool,
    /// Latest host time seen, in milliseconds.
    pub clock_ms: u64,
}

impl Default for Model {
    fn default() -> Self {
        Self::new("", EditorOptions::default())
    }
}

impl Model {
    /// Create a model for `text` and render it.
    pub fn new(text: &str, options: EditorOptions) -> Self {
        let mut model = Self {
            source: SourceBuffer::from_text(text),
            surface: Surface::new(),
            edit: EditController::new(),
            options,
            context_menu: None,
            auto_save: Debouncer::new(options.debounce_ms),
            long_press: Debouncer::new(options.long_press_ms),
            structure_changed: false,
            save_requested: false,
            clock_ms: 0,
        };
        model.render();
        model
    }

    /// Replace the whole surface with a fresh render of the markdown.
    pub fn render(&mut self) {
        let _scope = crate::perf::scope("render");
        let blocks = render_document(&self.source.text());
        self.surface.replace_blocks(&blocks);
        self.structure_changed = false;
    }

    /// Pull markdown out of the surface and re-render it, keeping the caret.
    pub fn rerender_from_surface(&mut self) {
        let offset = capture_offset(&self.surface);
        let text = extract(&self.surface);
        self.source.set_text(&text);
        self.render();
        restore_offset(&mut self.surface, offset);
        tracing::debug!(offset, bytes = text.len(), "re-rendered after input");
    }

    /// Load new markdown, dropping any raw edit in progress.
    pub fn set_content(&mut self, text: &str) {
        self.edit.reset();
        self.context_menu = None;
        self.long_press.cancel();
        self.auto_save.cancel();
        self.source = SourceBuffer::from_text(text);
        self.render();
    }

    /// Current markdown, including list nesting not yet written back.
    pub fn content(&self) -> String {
        if self.structure_changed {
            extract(&self.surface)
        } else {
            self.source.text()
        }
    }

    /// Write surface-only structure changes back into the markdown.
    pub fn sync_structure(&mut self) {
        if self.structure_changed {
            let text = extract(&self.surface);
            self.source.set_text(&text);
            self.structure_changed = false;
        }
    }

    pub const fn is_editing(&self) -> bool {
        self.edit.is_editing()
    }

    /// Arm the auto-save timer, if auto-save is on.
    pub fn schedule_auto_save(&mut self) {
        if self.options.auto_save {
            self.auto_save.queue((), self.clock_ms);
        }
    }
}
