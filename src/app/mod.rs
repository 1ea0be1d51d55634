//! Editor state and message handling.
//!
//! This module implements The Elm Architecture (TEA):
//! - [`Model`]: The complete editor state
//! - [`Message`]: All possible events and actions
//! - [`update`]: Pure function for state transitions
//! - [`App::dispatch`]: Runs `update` and then the side effects (saving)

mod effects;
mod model;
mod timers;
mod update;

pub use effects::save_payload;
pub use model::{ContextMenu, Model};
pub use timers::Debouncer;
pub use update::{Key, Message, update};

use crate::config::EditorOptions;
use crate::gateway::SaveGateway;

/// An editor instance: the model plus where saves go.
pub struct App {
    model: Model,
    gateway: Option<Box<dyn SaveGateway>>,
}

impl App {
    /// Create an editor showing `content`, with default options and no gateway.
    pub fn new(content: &str) -> Self {
        Self {
            model: Model::new(content, EditorOptions::default()),
            gateway: None,
        }
    }

    /// Apply editor options. Resets pending timers.
    pub fn with_options(mut self, options: EditorOptions) -> Self {
        let text = self.model.source.text();
        self.model = Model::new(&text, options);
        self
    }

    /// Send saves to `gateway`.
    pub fn with_gateway(mut self, gateway: impl SaveGateway + 'static) -> Self {
        self.gateway = Some(Box::new(gateway));
        self
    }

    pub const fn model(&self) -> &Model {
        &self.model
    }

    /// Mutable access for host-side surface changes (typing, caret moves).
    pub const fn model_mut(&mut self) -> &mut Model {
        &mut self.model
    }

    /// Handle one message: update the model, then run its side effects.
    pub fn dispatch(&mut self, msg: Message) {
        let side_msg = msg.clone();
        self.model = update(std::mem::take(&mut self.model), msg);
        self.handle_message_side_effects(&side_msg);
    }

    /// Replace the document.
    pub fn set_content(&mut self, content: &str) {
        self.dispatch(Message::SetContent(content.to_string()));
    }

    /// The current markdown.
    pub fn content(&self) -> String {
        self.model.content()
    }

    /// Markup of the rendered surface.
    pub fn html(&self) -> String {
        self.model.surface.to_html()
    }

    /// Whether there are changes not yet saved.
    pub fn is_dirty(&self) -> bool {
        self.model.structure_changed || self.model.source.is_dirty()
    }
}
