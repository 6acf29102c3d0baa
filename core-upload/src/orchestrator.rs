//! Upload Orchestrator
//!
//! Drives one upload pass over the watch directory:
//!
//! 1. Scan the directory for image files
//! 2. Load the ledger once
//! 3. For each image not in the ledger: read it, upload it, then record and
//!    persist its name
//!
//! Files are handled one at a time in listing order. A failed read or upload
//! is logged and reported; the ledger is left untouched for that file and
//! the next run tries it again. A ledger save that fails after an upload is
//! reported the same way and does not stop the remaining files.

use crate::error::Result;
use crate::ledger::LedgerStore;
use crate::scanner::{FolderScanner, ScanOutcome};
use bridge_traits::storage::{FileSystemAccess, StorageProvider, UploadContent, UploadMetadata};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Content type declared for every upload regardless of extension.
pub const UPLOAD_MIME_TYPE: &str = "image/png";

/// A file whose upload did not complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedUpload {
    pub name: String,
    pub message: String,
}

/// Summary of one upload pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadReport {
    /// Whether the watch directory existed
    pub directory_found: bool,
    /// Names uploaded and recorded in this pass
    pub uploaded: Vec<String>,
    /// Names skipped because the ledger already had them
    pub skipped_existing: Vec<String>,
    /// Names whose read, upload or ledger save failed
    pub failed: Vec<FailedUpload>,
}

impl UploadReport {
    fn not_found() -> Self {
        Self::default()
    }

    fn found() -> Self {
        Self {
            directory_found: true,
            ..Self::default()
        }
    }

    /// Whether any candidate was not uploaded in this pass.
    pub fn skipped_any(&self) -> bool {
        !self.skipped_existing.is_empty() || !self.failed.is_empty()
    }
}

pub struct UploadOrchestrator {
    fs: Arc<dyn FileSystemAccess>,
    storage: Arc<dyn StorageProvider>,
    scanner: FolderScanner,
    ledger: LedgerStore,
    folder_id: String,
}

impl UploadOrchestrator {
    /// # Arguments
    ///
    /// * `fs` - File system used for the watch directory and the ledger
    /// * `storage` - Remote storage receiving uploads
    /// * `ledger_path` - Location of the ledger file
    /// * `folder_id` - Remote folder every upload is placed in
    pub fn new(
        fs: Arc<dyn FileSystemAccess>,
        storage: Arc<dyn StorageProvider>,
        ledger_path: impl Into<PathBuf>,
        folder_id: impl Into<String>,
    ) -> Self {
        Self {
            scanner: FolderScanner::new(fs.clone()),
            ledger: LedgerStore::new(fs.clone(), ledger_path),
            fs,
            storage,
            folder_id: folder_id.into(),
        }
    }

    /// Upload every image in `dir` that the ledger does not list yet.
    ///
    /// # Errors
    ///
    /// Fails on a ledger that cannot be loaded, or a directory that exists
    /// but cannot be listed. Per-file read, upload and ledger save failures
    /// are recorded in the report instead.
    #[instrument(skip(self), fields(dir = %dir.display()))]
    pub async fn run(&self, dir: &Path) -> Result<UploadReport> {
        let names = match self.scanner.scan(dir).await? {
            ScanOutcome::NotFound => return Ok(UploadReport::not_found()),
            ScanOutcome::Found(names) => names,
        };

        let mut report = UploadReport::found();

        if names.is_empty() {
            info!("No new images to upload");
            return Ok(report);
        }

        let mut ledger = self.ledger.load().await?;

        for name in names {
            if ledger.contains(&name) {
                debug!(file = %name, "Already uploaded, skipping");
                report.skipped_existing.push(name);
                continue;
            }

            match self.upload_one(dir, &name).await {
                Ok(file_id) => {
                    // Kept in memory even if this save fails; a later save persists it
                    ledger.record(name.clone());
                    match self.ledger.save(&ledger).await {
                        Ok(()) => {
                            info!(file = %name, file_id = %file_id, "File uploaded successfully");
                            report.uploaded.push(name);
                        }
                        Err(e) => {
                            warn!(
                                file = %name,
                                file_id = %file_id,
                                error = %e,
                                "Error recording uploaded file"
                            );
                            report.failed.push(FailedUpload {
                                name,
                                message: e.to_string(),
                            });
                        }
                    }
                }
                Err(message) => {
                    warn!(file = %name, error = %message, "Error uploading file");
                    report.failed.push(FailedUpload { name, message });
                }
            }
        }

        if report.skipped_any() {
            info!(
                already_uploaded = report.skipped_existing.len(),
                failed = report.failed.len(),
                "Skipped already uploaded images"
            );
        }

        Ok(report)
    }

    async fn upload_one(&self, dir: &Path, name: &str) -> std::result::Result<String, String> {
        let path = dir.join(name);
        let data = self
            .fs
            .read_file(&path)
            .await
            .map_err(|e| format!("failed to read {}: {}", path.display(), e))?;

        let metadata = UploadMetadata {
            name: name.to_string(),
            parent_ids: vec![self.folder_id.clone()],
        };
        let content = UploadContent {
            mime_type: UPLOAD_MIME_TYPE.to_string(),
            data,
        };

        self.storage
            .create_file(metadata, content)
            .await
            .map_err(|e| e.to_string())
    }
}
