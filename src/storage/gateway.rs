//! Whole-document persistence to a single JSON file

use super::document::Document;
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Asks the user to approve a destructive action
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

/// Always answers with the wrapped value (`--yes`, tests)
pub struct AutoConfirm(pub bool);

impl Confirm for AutoConfirm {
    fn confirm(&self, _prompt: &str) -> bool {
        self.0
    }
}

/// Reads and writes the persisted document.
///
/// Reads never fail: a missing or corrupt file yields the default document.
/// Writes replace the whole file; the last write wins.
#[derive(Debug, Clone)]
pub struct StorageGateway {
    path: PathBuf,
}

impl StorageGateway {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted document, falling back to the default shape
    pub fn load(&self) -> Document {
        match self.try_load() {
            Ok(doc) => doc,
            Err(Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No document at {}, starting empty", self.path.display());
                Document::default()
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to load document {}: {}; starting empty",
                    self.path.display(),
                    e
                );
                Document::default()
            }
        }
    }

    /// Strict load that reports missing or corrupt files
    pub fn try_load(&self) -> Result<Document> {
        let data = std::fs::read_to_string(&self.path)?;
        let doc = serde_json::from_str(&data)?;
        Ok(doc)
    }

    /// Persist the whole document. Failures are logged, never returned.
    pub fn save(&self, document: &Document) {
        match self.write(document) {
            Ok(()) => tracing::debug!("Saved document to {}", self.path.display()),
            Err(e) => tracing::error!("Failed to save document {}: {}", self.path.display(), e),
        }
    }

    /// [`save`](Self::save) for callers already running on the tokio runtime
    pub async fn save_async(&self, document: &Document) {
        match self.write_async(document).await {
            Ok(()) => tracing::debug!("Saved document to {}", self.path.display()),
            Err(e) => tracing::error!("Failed to save document {}: {}", self.path.display(), e),
        }
    }

    fn parent_dir(&self) -> Option<&Path> {
        self.path.parent().filter(|p| !p.as_os_str().is_empty())
    }

    fn tmp_path(&self) -> PathBuf {
        self.path.with_extension("json.tmp")
    }

    fn write(&self, document: &Document) -> Result<()> {
        if let Some(parent) = self.parent_dir() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(document)?;
        let tmp = self.tmp_path();
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)
            .map_err(|e| Error::Storage(format!("rename {}: {}", tmp.display(), e)))
    }

    async fn write_async(&self, document: &Document) -> Result<()> {
        if let Some(parent) = self.parent_dir() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(document)?;
        let tmp = self.tmp_path();
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| Error::Storage(format!("rename {}: {}", tmp.display(), e)))
    }

    /// Wipe persisted data after confirmation.
    ///
    /// Returns the fresh document to rebuild state from, or `None` if the
    /// user declined.
    pub fn reset(&self, confirm: &dyn Confirm) -> Option<Document> {
        if !confirm.confirm("Delete all study data? This cannot be undone.") {
            return None;
        }
        match std::fs::remove_file(&self.path) {
            Ok(()) => tracing::info!("Removed {}", self.path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::error!("Failed to remove {}: {}", self.path.display(), e),
        }
        Some(Document::default())
    }
}
