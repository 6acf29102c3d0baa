//! Folder Scanner
//!
//! Lists the watch directory and keeps entries with an image extension.

use crate::error::{Result, UploadError};
use bridge_traits::storage::FileSystemAccess;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Extensions treated as images, compared case-insensitively.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif"];

/// Result of scanning the watch directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// The directory does not exist
    NotFound,
    /// Image file names, in directory listing order
    Found(Vec<String>),
}

pub struct FolderScanner {
    fs: Arc<dyn FileSystemAccess>,
}

impl FolderScanner {
    pub fn new(fs: Arc<dyn FileSystemAccess>) -> Self {
        Self { fs }
    }

    /// Scan `dir` for image files.
    ///
    /// A missing directory is reported as [`ScanOutcome::NotFound`], not as
    /// an error.
    ///
    /// # Errors
    ///
    /// Returns [`UploadError::Io`] if the directory exists but cannot be listed.
    pub async fn scan(&self, dir: &Path) -> Result<ScanOutcome> {
        let exists = self
            .fs
            .exists(dir)
            .await
            .map_err(|e| UploadError::io(dir, e))?;

        if !exists {
            info!(dir = %dir.display(), "Watch folder does not exist");
            return Ok(ScanOutcome::NotFound);
        }

        let entries = match self.fs.list_directory(dir).await {
            Ok(entries) => entries,
            Err(e) if e.is_not_found() => {
                info!(dir = %dir.display(), "Watch folder does not exist");
                return Ok(ScanOutcome::NotFound);
            }
            Err(e) => return Err(UploadError::io(dir, e)),
        };

        let total = entries.len();
        let images: Vec<String> = entries
            .iter()
            .filter_map(|path| {
                let name = path.file_name()?.to_str();
                if name.is_none() {
                    debug!(path = ?path, "Skipping entry with a non UTF-8 name");
                }
                name
            })
            .filter(|name| is_image_name(name))
            .map(str::to_string)
            .collect();

        debug!(
            dir = %dir.display(),
            entries = total,
            images = images.len(),
            "Scanned watch folder"
        );

        Ok(ScanOutcome::Found(images))
    }
}

/// Whether `name` ends in one of [`IMAGE_EXTENSIONS`].
pub fn is_image_name(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|image_ext| ext.eq_ignore_ascii_case(image_ext))
        })
        .unwrap_or(false)
}
