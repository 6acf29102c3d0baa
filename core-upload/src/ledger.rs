//! Upload Ledger
//!
//! The ordered list of file names already uploaded, persisted as a JSON
//! array:
//!
//! ```json
//! [
//!   "shot-001.png",
//!   "shot-002.png"
//! ]
//! ```
//!
//! Saves rewrite the whole file through a sibling `.tmp` file that is then
//! renamed into place, so an interrupted save keeps the previous ledger.

use crate::error::{Result, UploadError};
use bridge_traits::storage::FileSystemAccess;
use bytes::Bytes;
use std::collections::HashSet;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// In-memory ledger: insertion-ordered, unique file names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadLedger {
    entries: Vec<String>,
    index: HashSet<String>,
}

impl UploadLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a ledger from names in order. Repeated names keep their first
    /// position.
    pub fn from_entries<I>(names: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut ledger = Self::new();
        for name in names {
            ledger.record(name);
        }
        ledger
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains(name)
    }

    /// Append `name` if it is not already present.
    ///
    /// Returns `true` if the ledger changed.
    pub fn record(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if self.index.contains(&name) {
            return false;
        }
        self.index.insert(name.clone());
        self.entries.push(name);
        true
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// File-backed persistence for an [`UploadLedger`].
#[derive(Clone)]
pub struct LedgerStore {
    fs: Arc<dyn FileSystemAccess>,
    path: PathBuf,
}

impl LedgerStore {
    pub fn new(fs: Arc<dyn FileSystemAccess>, path: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the ledger, or an empty one if the file does not exist.
    ///
    /// # Errors
    ///
    /// - [`UploadError::LedgerCorrupted`] if the file is not a JSON array of strings
    /// - [`UploadError::Io`] if the file cannot be read
    pub async fn load(&self) -> Result<UploadLedger> {
        let exists = self
            .fs
            .exists(&self.path)
            .await
            .map_err(|e| UploadError::io(&self.path, e))?;

        if !exists {
            debug!(path = %self.path.display(), "No ledger file, starting empty");
            return Ok(UploadLedger::new());
        }

        let data = self
            .fs
            .read_file(&self.path)
            .await
            .map_err(|e| UploadError::io(&self.path, e))?;

        let names: Vec<String> = serde_json::from_slice(&data).map_err(|e| {
            warn!(path = %self.path.display(), error = %e, "Ledger could not be parsed");
            UploadError::LedgerCorrupted {
                path: self.path.display().to_string(),
                reason: e.to_string(),
            }
        })?;

        let read = names.len();
        let ledger = UploadLedger::from_entries(names);
        if ledger.len() != read {
            warn!(
                duplicates = read - ledger.len(),
                "Ledger contained repeated names, keeping first occurrences"
            );
        }

        debug!(path = %self.path.display(), entries = ledger.len(), "Loaded ledger");
        Ok(ledger)
    }

    /// Rewrite the ledger file with the full list.
    ///
    /// # Errors
    ///
    /// Returns [`UploadError::Io`] if the temporary file cannot be written or
    /// renamed over the ledger.
    pub async fn save(&self, ledger: &UploadLedger) -> Result<()> {
        let json = serde_json::to_vec_pretty(ledger.entries())
            .map_err(|e| UploadError::Serialization(e.to_string()))?;

        let tmp_path = self.tmp_path();
        self.fs
            .write_file(&tmp_path, Bytes::from(json))
            .await
            .map_err(|e| UploadError::io(&tmp_path, e))?;
        self.fs
            .rename(&tmp_path, &self.path)
            .await
            .map_err(|e| UploadError::io(&self.path, e))?;

        debug!(path = %self.path.display(), entries = ledger.len(), "Saved ledger");
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from("uploaded_files.json"));
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
