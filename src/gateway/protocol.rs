//! JSON action endpoint.
//!
//! Requests are objects carrying an `action` and its arguments; the only
//! action is [`SAVE_ACTION`]. Replies pair an HTTP status with a JSON body,
//! either a [`SaveReceipt`] or `{ "success": false, "error": ... }`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{FileStore, GatewayError, SaveReceipt};

/// Action name for saving the document.
pub const SAVE_ACTION: &str = "save_markdown";

/// Request body sent by the editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveRequest {
    pub action: String,
    pub content: String,
}

impl SaveRequest {
    pub fn new(content: &str) -> Self {
        Self {
            action: SAVE_ACTION.to_string(),
            content: content.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
}

/// Status and JSON body answered by the endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status: u16,
    pub body: Value,
}

impl Reply {
    fn ok(receipt: &SaveReceipt) -> Self {
        Self {
            status: 200,
            body: serde_json::to_value(receipt).unwrap_or(Value::Null),
        }
    }

    fn error(err: &GatewayError) -> Self {
        let body = ErrorBody {
            success: false,
            error: err.to_string(),
        };
        Self {
            status: err.status(),
            body: serde_json::to_value(body).unwrap_or(Value::Null),
        }
    }

    pub const fn is_success(&self) -> bool {
        self.status == 200
    }
}

/// Serve one request body against `store`.
pub fn handle_request(store: &FileStore, body: &[u8]) -> Reply {
    match dispatch(store, body) {
        Ok(receipt) => {
            tracing::info!(bytes = receipt.bytes, "saved document");
            Reply::ok(&receipt)
        }
        Err(err) => {
            tracing::warn!(status = err.status(), %err, "request failed");
            Reply::error(&err)
        }
    }
}

fn dispatch(store: &FileStore, body: &[u8]) -> Result<SaveReceipt, GatewayError> {
    let input: Value = serde_json::from_slice(body).map_err(|_| GatewayError::InvalidRequest)?;
    let Some(fields) = input.as_object().filter(|fields| !fields.is_empty()) else {
        return Err(GatewayError::InvalidRequest);
    };
    let action = match fields.get("action") {
        None | Some(Value::Null) => return Err(GatewayError::InvalidRequest),
        Some(action) => action,
    };
    if action.as_str() != Some(SAVE_ACTION) {
        return Err(GatewayError::UnknownAction);
    }
    let content = match fields.get("content") {
        None | Some(Value::Null) => return Err(GatewayError::MissingContent),
        Some(Value::String(content)) => content,
        Some(_) => return Err(GatewayError::InvalidRequest),
    };
    store.save(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    fn serve(body: &[u8]) -> (Reply, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().join("doc.md"));
        (handle_request(&store, body), dir)
    }

    #[test]
    fn test_save_action_succeeds() {
        let body = serde_json::to_vec(&SaveRequest::new("# Doc\n")).unwrap();
        let (reply, dir) = serve(&body);
        assert!(reply.is_success());
        assert_eq!(
            reply.body,
            json!({ "success": true, "message": "Content saved successfully", "bytes": 6 })
        );
        assert_eq!(
            std::fs::read_to_string(dir.path().join("doc.md")).unwrap(),
            "# Doc\n"
        );
    }

    #[test]
    fn test_undecodable_body_is_invalid() {
        let bodies: [&[u8]; 5] = [
            b"not json",
            b"{}",
            b"[]",
            br#"{"content":"x"}"#,
            br#"{"action":null,"content":"x"}"#,
        ];
        for body in bodies {
            let (reply, _dir) = serve(body);
            assert_eq!(reply.status, 400);
            assert_eq!(reply.body, json!({ "success": false, "error": "Invalid request" }));
        }
    }

    #[test]
    fn test_unknown_action() {
        let (reply, _dir) = serve(br#"{"action":"delete","content":"x"}"#);
        assert_eq!(reply.status, 404);
        assert_eq!(reply.body["error"], "Action missing");
    }

    #[test]
    fn test_missing_content() {
        let (reply, dir) = serve(br#"{"action":"save_markdown"}"#);
        assert_eq!(reply.status, 400);
        assert_eq!(reply.body["error"], "Content is required");
        assert!(!dir.path().join("doc.md").exists());
    }
}
