use crate::app::Model;
use crate::app::model::ContextMenu;
use crate::editor::{indent, list_item_at_caret, outdent};
use crate::surface::{NodeId, NodeKind};

/// Keys the editor reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Escape,
    Tab,
    ShiftTab,
    /// Ctrl+S
    Save,
}

/// All possible events and actions in the editor.
///
/// These represent host input, timer ticks and internal actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// The host changed the surface's text (typing, paste, delete).
    Input { at_ms: u64 },
    /// A key press routed to the editor.
    Key(Key),
    /// Right click on a node.
    ContextMenu(NodeId),
    /// The context menu's "Edit" entry was chosen.
    ContextMenuEdit,
    /// Click anywhere outside the context menu.
    Click,
    /// Touch or press started on a node.
    PressStart { node: NodeId, at_ms: u64 },
    /// Touch or press released.
    PressEnd,
    /// New value typed into the raw edit field.
    EditInput(String),
    /// The raw edit field lost focus.
    FocusLost,
    /// Replace the document.
    SetContent(String),
    /// Host clock advanced.
    Tick(u64),
}

/// The compound element a gesture on `node` refers to.
fn gesture_target(model: &Model, node: NodeId) -> Option<NodeId> {
    model.surface.closest(node, NodeKind::is_compound)
}

fn enter_edit(model: &mut Model, target: NodeId) {
    model.context_menu = None;
    model.long_press.cancel();
    if let Err(err) = model.edit.enter(&mut model.surface, target) {
        tracing::warn!(%err, "edit mode not entered");
    }
}

/// Pure state transition. Saving is left to the caller via `save_requested`.
pub fn update(mut model: Model, msg: Message) -> Model {
    model.save_requested = false;

    match msg {
        Message::Input { at_ms } => {
            model.clock_ms = model.clock_ms.max(at_ms);
            if model.is_editing() {
                return model;
            }
            model.rerender_from_surface();
            model.schedule_auto_save();
        }

        Message::Key(Key::Enter) => {
            if model.is_editing() {
                match model.edit.commit(&model.surface) {
                    Ok(text) => {
                        model.source.set_text(&text);
                        model.render();
                        model.schedule_auto_save();
                    }
                    Err(err) => tracing::warn!(%err, "commit failed"),
                }
            }
        }
        Message::Key(Key::Escape) => {
            model.context_menu = None;
            if model.is_editing()
                && let Err(err) = model.edit.cancel(&mut model.surface)
            {
                tracing::warn!(%err, "cancel failed");
            }
        }
        Message::Key(key @ (Key::Tab | Key::ShiftTab)) => {
            if model.is_editing() {
                return model;
            }
            if let Some(item) = list_item_at_caret(&model.surface) {
                let moved = if key == Key::Tab {
                    indent(&mut model.surface, item)
                } else {
                    outdent(&mut model.surface, item)
                };
                if moved {
                    model.structure_changed = true;
                    model.schedule_auto_save();
                }
            }
        }
        Message::Key(Key::Save) => {
            model.save_requested = true;
        }

        Message::ContextMenu(node) => {
            if model.is_editing() {
                return model;
            }
            model.context_menu =
                gesture_target(&model, node).map(|target| ContextMenu { target });
        }
        Message::ContextMenuEdit => {
            if let Some(menu) = model.context_menu.take()
                && !model.is_editing()
            {
                enter_edit(&mut model, menu.target);
            }
        }
        Message::Click => {
            model.context_menu = None;
        }
        Message::PressStart { node, at_ms } => {
            model.clock_ms = model.clock_ms.max(at_ms);
            if model.is_editing() {
                return model;
            }
            if let Some(target) = gesture_target(&model, node) {
                model.long_press.queue(target, at_ms);
            }
        }
        Message::PressEnd => {
            model.long_press.cancel();
        }

        Message::EditInput(value) => {
            if let Err(err) = model.edit.set_input(&mut model.surface, &value) {
                tracing::debug!(%err, "edit input ignored");
            }
        }
        Message::FocusLost => {
            if model.is_editing()
                && let Err(err) = model.edit.cancel(&mut model.surface)
            {
                tracing::warn!(%err, "cancel failed");
            }
        }

        Message::SetContent(text) => {
            model.set_content(&text);
        }

        Message::Tick(now_ms) => {
            model.clock_ms = model.clock_ms.max(now_ms);
            if let Some(target) = model.long_press.take_ready(now_ms)
                && !model.is_editing()
                && model.surface.is_attached(target)
            {
                enter_edit(&mut model, target);
            }
            if model.auto_save.take_ready(now_ms).is_some() {
                tracing::debug!("auto-save due");
                model.save_requested = true;
            }
        }
    }

    model
}
