use crate::app::{App, Message};
use crate::gateway::SaveReceipt;

/// Trim the document and end it with exactly one newline.
pub fn save_payload(text: &str) -> String {
    format!("{}\n", text.trim())
}

impl App {
    pub(super) fn handle_message_side_effects(&mut self, msg: &Message) {
        if self.model.save_requested {
            self.model.save_requested = false;
            tracing::debug!(?msg, "save triggered");
            self.save();
        }
    }

    /// Send the current document to the save gateway.
    ///
    /// A single attempt. Failures are logged and reported as `None`; the
    /// document stays dirty so a later save can try again.
    pub fn save(&mut self) -> Option<SaveReceipt> {
        let _scope = crate::perf::scope("save");
        self.model.sync_structure();
        let Some(gateway) = self.gateway.as_mut() else {
            tracing::debug!("no save gateway configured");
            return None;
        };
        let payload = save_payload(&self.model.source.text());
        match gateway.save_markdown(&payload) {
            Ok(receipt) => {
                self.model.source.mark_clean();
                tracing::info!(bytes = receipt.bytes, "{}", receipt.message);
                crate::perf::log_event("save.ok", format!("bytes={}", receipt.bytes));
                Some(receipt)
            }
            Err(err) => {
                tracing::error!(status = err.status(), %err, "save failed");
                crate::perf::log_event("save.error", err.to_string());
                None
            }
        }
    }
}
