//! Persisting the document.
//!
//! The editor hands its cleaned markdown to a [`SaveGateway`]. The
//! [`FileStore`] applies the size cap and writes the file; [`protocol`]
//! exposes the same store behind the JSON action endpoint the browser
//! front end talks to.

pub mod protocol;
mod store;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use protocol::{Reply, SAVE_ACTION, SaveRequest, handle_request};
pub use store::FileStore;

/// Largest document, in bytes, a save will accept.
pub const MAX_CONTENT_BYTES: usize = 1_000_000;

/// Body of a successful save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveReceipt {
    pub success: bool,
    pub message: String,
    pub bytes: usize,
}

impl SaveReceipt {
    pub fn saved(bytes: usize) -> Self {
        Self {
            success: true,
            message: "Content saved successfully".to_string(),
            bytes,
        }
    }
}

/// Why a save did not happen.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Invalid request")]
    InvalidRequest,
    #[error("Action missing")]
    UnknownAction,
    #[error("Content is required")]
    MissingContent,
    #[error("Content too large")]
    TooLarge { bytes: usize, limit: usize },
    #[error("Failed to save file")]
    Write(#[source] std::io::Error),
    /// A non-success reply relayed from the endpoint.
    #[error("save rejected with status {status}: {error}")]
    Rejected { status: u16, error: String },
    #[error("malformed endpoint reply")]
    Decode(#[from] serde_json::Error),
}

impl GatewayError {
    /// HTTP status the endpoint answers with.
    pub const fn status(&self) -> u16 {
        match self {
            Self::InvalidRequest | Self::MissingContent => 400,
            Self::UnknownAction => 404,
            Self::TooLarge { .. } => 413,
            Self::Write(_) | Self::Decode(_) => 500,
            Self::Rejected { status, .. } => *status,
        }
    }
}

/// Destination for saved markdown.
pub trait SaveGateway {
    /// Persist `content`. One attempt; callers do not retry.
    fn save_markdown(&mut self, content: &str) -> Result<SaveReceipt, GatewayError>;
}

impl SaveGateway for FileStore {
    fn save_markdown(&mut self, content: &str) -> Result<SaveReceipt, GatewayError> {
        self.save(content)
    }
}

/// A gateway that speaks the JSON protocol to an in-process endpoint.
///
/// Every save is encoded as a request body, served by [`handle_request`]
/// and decoded from the reply, exactly as a remote front end would see it.
#[derive(Debug, Clone)]
pub struct LocalEndpoint {
    store: FileStore,
}

impl LocalEndpoint {
    pub const fn new(store: FileStore) -> Self {
        Self { store }
    }
}

impl SaveGateway for LocalEndpoint {
    fn save_markdown(&mut self, content: &str) -> Result<SaveReceipt, GatewayError> {
        let body = serde_json::to_vec(&SaveRequest::new(content))?;
        let reply = handle_request(&self.store, &body);
        if reply.status == 200 {
            return Ok(serde_json::from_value(reply.body)?);
        }
        let error = reply
            .body
            .get("error")
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default()
            .to_string();
        Err(GatewayError::Rejected {
            status: reply.status,
            error,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_status_codes() {
        assert_eq!(GatewayError::InvalidRequest.status(), 400);
        assert_eq!(GatewayError::MissingContent.status(), 400);
        assert_eq!(GatewayError::UnknownAction.status(), 404);
        assert_eq!(
            GatewayError::TooLarge {
                bytes: 2,
                limit: 1
            }
            .status(),
            413
        );
        assert_eq!(
            GatewayError::Write(std::io::Error::other("disk full")).status(),
            500
        );
    }

    #[test]
    fn test_local_endpoint_round_trips_receipt() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("doc.md");
        let mut endpoint = LocalEndpoint::new(FileStore::new(&path));

        let receipt = endpoint.save_markdown("# Hi\n").unwrap();
        assert_eq!(receipt, SaveReceipt::saved(5));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# Hi\n");
    }

    #[test]
    fn test_local_endpoint_relays_rejection() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("doc.md");
        let mut endpoint = LocalEndpoint::new(FileStore::new(&path).with_max_bytes(3));

        let err = endpoint.save_markdown("too long").unwrap_err();
        assert_eq!(err.status(), 413);
        assert!(matches!(err, GatewayError::Rejected { ref error, .. } if error == "Content too large"));
        assert!(!path.exists());
    }
}
