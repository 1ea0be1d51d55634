//! Raw edit mode for compound elements.
//!
//! A link, image, autolink, blockquote or rule can be swapped for a plain
//! input holding its markdown. Committing patches the markdown at the
//! position the element occupied when editing began; cancelling puts the
//! element back untouched.

use thiserror::Error;

use crate::document::{InlineKind, span_source};
use crate::surface::{NodeId, NodeKind, Surface};

use super::buffer::{Anchor, SourceBuffer};
use super::extract::{extract_with_anchors, inline_source, rule_source};

/// Why an edit-mode transition was refused.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EditError {
    #[error("an element is already being edited")]
    AlreadyEditing,
    #[error("no element is being edited")]
    NotEditing,
    #[error("element cannot be edited as raw markdown")]
    NotCompound,
    #[error("element is not part of the surface")]
    Detached,
}

/// The single in-progress raw edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    /// The element being edited, detached while the input stands in for it.
    pub original: NodeId,
    /// The input element showing the markdown.
    pub input: NodeId,
    /// Markdown of the element at entry.
    pub source: String,
    /// Where `source` sits in `base`, if it could be located.
    pub anchor: Option<Anchor>,
    /// Document markdown at entry.
    pub base: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
enum EditState {
    #[default]
    Idle,
    Editing(EditSession),
}

/// Owns the edit-mode state machine.
#[derive(Debug, Clone, Default)]
pub struct EditController {
    state: EditState,
}

/// Rebuild the markdown of a compound element from its kind and content.
pub fn source_for(surface: &Surface, node: NodeId) -> Option<String> {
    match surface.kind(node)? {
        NodeKind::Inline(kind @ (InlineKind::Link { .. } | InlineKind::Image { .. })) => {
            Some(span_source(kind, &surface.text_content(node)))
        }
        NodeKind::Inline(InlineKind::Autolink { .. }) => Some(surface.text_content(node)),
        NodeKind::Blockquote => Some(format!(
            "{}{}",
            crate::document::QUOTE_PREFIX,
            inline_source(surface, node)
        )),
        NodeKind::Rule { source } => Some(rule_source(source)),
        _ => None,
    }
}

impl EditController {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn is_editing(&self) -> bool {
        matches!(self.state, EditState::Editing(_))
    }

    pub const fn session(&self) -> Option<&EditSession> {
        match &self.state {
            EditState::Editing(session) => Some(session),
            EditState::Idle => None,
        }
    }

    /// Swap `node` for a focused, fully selected input holding its markdown.
    pub fn enter(&mut self, surface: &mut Surface, node: NodeId) -> Result<&EditSession, EditError> {
        if self.is_editing() {
            return Err(EditError::AlreadyEditing);
        }
        if !surface.is_attached(node) {
            return Err(EditError::Detached);
        }
        if !surface.kind(node).is_some_and(NodeKind::is_compound) {
            return Err(EditError::NotCompound);
        }
        let source = source_for(surface, node).ok_or(EditError::NotCompound)?;
        let extraction = extract_with_anchors(surface);
        let anchor = extraction.anchor(node);

        let input = surface.create_element(NodeKind::EditInput {
            value: source.clone(),
            selection: 0..source.chars().count(),
        });
        surface.replace(node, input);
        surface.set_caret(None);
        surface.set_focus(Some(input));
        tracing::debug!(?anchor, source = %source, "entered edit mode");

        self.state = EditState::Editing(EditSession {
            original: node,
            input,
            source,
            anchor,
            base: extraction.text,
        });
        match &self.state {
            EditState::Editing(session) => Ok(session),
            EditState::Idle => Err(EditError::NotEditing),
        }
    }

    /// Current value of the edit input.
    pub fn input_value(&self, surface: &Surface) -> Option<String> {
        let session = self.session()?;
        match surface.kind(session.input)? {
            NodeKind::EditInput { value, .. } => Some(value.clone()),
            _ => None,
        }
    }

    /// Replace the input's value, leaving the selection collapsed at its end.
    pub fn set_input(&self, surface: &mut Surface, text: &str) -> Result<(), EditError> {
        let session = self.session().ok_or(EditError::NotEditing)?;
        if let Some(NodeKind::EditInput { value, selection }) = surface.kind_mut(session.input) {
            text.clone_into(value);
            let end = text.chars().count();
            *selection = end..end;
        }
        Ok(())
    }

    /// Finish editing and return the document markdown with the fragment replaced.
    ///
    /// The caller stores the result and re-renders; the surface still holds
    /// the input until then.
    pub fn commit(&mut self, surface: &Surface) -> Result<String, EditError> {
        let value = self.input_value(surface);
        let EditState::Editing(session) = std::mem::take(&mut self.state) else {
            return Err(EditError::NotEditing);
        };
        let value = value.unwrap_or_else(|| session.source.clone());

        let mut buffer = SourceBuffer::from_text(&session.base);
        let anchored = session
            .anchor
            .filter(|anchor| buffer.slice(anchor).as_deref() == Some(session.source.as_str()));
        let target = anchored.or_else(|| {
            tracing::warn!(
                source = %session.source,
                "edit anchor no longer matches, replacing first occurrence"
            );
            buffer.find(&session.source)
        });
        match target {
            Some(anchor) => {
                buffer.replace(&anchor, &value);
            }
            None => tracing::warn!(source = %session.source, "edited fragment not found"),
        }
        tracing::debug!(value = %value, "committed edit");
        Ok(buffer.text())
    }

    /// Abandon editing and put the original element back where the input is.
    pub fn cancel(&mut self, surface: &mut Surface) -> Result<(), EditError> {
        let EditState::Editing(session) = std::mem::take(&mut self.state) else {
            return Err(EditError::NotEditing);
        };
        surface.replace(session.input, session.original);
        if surface.focus() == Some(session.input) {
            surface.set_focus(None);
        }
        tracing::debug!("cancelled edit");
        Ok(())
    }

    /// Drop the session without touching the surface (it is about to be re-rendered).
    pub fn reset(&mut self) {
        self.state = EditState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::render_document;
    use crate::editor::extract;

    fn surface(text: &str) -> Surface {
        Surface::from_blocks(&render_document(text))
    }

    fn link(surface: &Surface, index: usize) -> NodeId {
        surface.find_all(|k| matches!(k, NodeKind::Inline(InlineKind::Link { .. })))[index]
    }

    #[test]
    fn test_source_per_kind() {
        let s = surface("[t](h) ![a](i.png) https://x.io\n> q *e*\n***");
        let sources: Vec<_> = s
            .find_all(NodeKind::is_compound)
            .into_iter()
            .filter_map(|n| source_for(&s, n))
            .collect();
        assert_eq!(
            sources,
            vec!["[t](h)", "![a](i.png)", "https://x.io", "> q *e*", "***"]
        );
    }

    #[test]
    fn test_enter_swaps_in_selected_input() {
        let mut s = surface("see [docs](https://d.io)");
        let node = link(&s, 0);
        let mut edit = EditController::new();
        let session = edit.enter(&mut s, node).unwrap();
        let input = session.input;
        assert_eq!(session.source, "[docs](https://d.io)");
        assert!(!s.is_attached(node));
        assert_eq!(s.focus(), Some(input));
        assert_eq!(
            s.kind(input),
            Some(&NodeKind::EditInput {
                value: "[docs](https://d.io)".to_string(),
                selection: 0..20,
            })
        );
    }

    #[test]
    fn test_enter_refuses_plain_elements_and_second_session() {
        let mut s = surface("plain [l](u)\n> q");
        let mut edit = EditController::new();
        let paragraph = s.children(s.root())[0];
        assert!(matches!(
            edit.enter(&mut s, paragraph),
            Err(EditError::NotCompound)
        ));

        let node = link(&s, 0);
        assert!(edit.enter(&mut s, node).is_ok());
        let quote = s.find(|k| matches!(k, NodeKind::Blockquote)).unwrap();
        assert!(matches!(
            edit.enter(&mut s, quote),
            Err(EditError::AlreadyEditing)
        ));
    }

    #[test]
    fn test_cancel_restores_element_and_text() {
        let text = "a [l](u) b";
        let mut s = surface(text);
        let node = link(&s, 0);
        let mut edit = EditController::new();
        edit.enter(&mut s, node).unwrap();
        edit.set_input(&mut s, "anything at all").unwrap();
        edit.cancel(&mut s).unwrap();

        assert!(!edit.is_editing());
        assert!(s.is_attached(node));
        assert_eq!(extract(&s), text);
    }

    #[test]
    fn test_commit_replaces_the_edited_occurrence() {
        let mut s = surface("intro\nsee [a](x) and [a](x)");
        let second = link(&s, 1);
        let mut edit = EditController::new();
        edit.enter(&mut s, second).unwrap();
        edit.set_input(&mut s, "[b](y)").unwrap();
        let text = edit.commit(&s).unwrap();
        assert_eq!(text, "intro\nsee [a](x) and [b](y)");
        assert!(!edit.is_editing());
    }

    #[test]
    fn test_commit_rule_and_quote() {
        let mut s = surface("> old\n---");
        let rule = s.find(|k| matches!(k, NodeKind::Rule { .. })).unwrap();
        let mut edit = EditController::new();
        edit.enter(&mut s, rule).unwrap();
        edit.set_input(&mut s, "***").unwrap();
        assert_eq!(edit.commit(&s).unwrap(), "> old\n***");

        let mut s = surface("> old\n---");
        let quote = s.find(|k| matches!(k, NodeKind::Blockquote)).unwrap();
        edit.enter(&mut s, quote).unwrap();
        edit.set_input(&mut s, "> new").unwrap();
        assert_eq!(edit.commit(&s).unwrap(), "> new\n---");
    }

    #[test]
    fn test_commit_falls_back_to_first_occurrence() {
        let mut s = surface("[a](x) [a](x)");
        let second = link(&s, 1);
        let mut edit = EditController::new();
        edit.enter(&mut s, second).unwrap();
        if let EditState::Editing(session) = &mut edit.state {
            session.anchor = None;
        }
        edit.set_input(&mut s, "[b](y)").unwrap();
        assert_eq!(edit.commit(&s).unwrap(), "[b](y) [a](x)");
    }

    #[test]
    fn test_commit_and_cancel_need_a_session() {
        let mut s = surface("text");
        let mut edit = EditController::new();
        assert_eq!(edit.commit(&s), Err(EditError::NotEditing));
        assert_eq!(edit.cancel(&mut s), Err(EditError::NotEditing));
    }
}
