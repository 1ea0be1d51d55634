use std::fs;
use std::path::{Path, PathBuf};

use super::{GatewayError, MAX_CONTENT_BYTES, SaveReceipt};

/// Writes the document to a single markdown file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    max_bytes: usize,
}

impl FileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            max_bytes: MAX_CONTENT_BYTES,
        }
    }

    /// Override the size cap.
    pub const fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Validate and write `content`, replacing the file.
    ///
    /// # Errors
    ///
    /// [`GatewayError::TooLarge`] before any write when the content exceeds
    /// the cap, [`GatewayError::Write`] when the file cannot be written.
    pub fn save(&self, content: &str) -> Result<SaveReceipt, GatewayError> {
        let bytes = content.len();
        if bytes > self.max_bytes {
            tracing::warn!(bytes, limit = self.max_bytes, "refusing oversized save");
            return Err(GatewayError::TooLarge {
                bytes,
                limit: self.max_bytes,
            });
        }
        fs::write(&self.path, content).map_err(|err| {
            tracing::error!(path = %self.path.display(), %err, "write failed");
            GatewayError::Write(err)
        })?;
        tracing::debug!(path = %self.path.display(), bytes, "wrote document");
        Ok(SaveReceipt::saved(bytes))
    }
}
