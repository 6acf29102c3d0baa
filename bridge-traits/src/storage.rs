//! Storage and File System Abstractions
//!
//! Provides platform-agnostic traits for local file I/O and for the remote
//! storage API that receives uploads.

use async_trait::async_trait;
use bytes::Bytes;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// File system access trait
///
/// Abstracts the handful of file operations the uploader needs: reading and
/// rewriting its JSON state files, listing the watch directory and reading
/// the images it uploads.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::storage::FileSystemAccess;
///
/// async fn save_state(fs: &dyn FileSystemAccess, path: &Path, data: &[u8]) -> Result<()> {
///     fs.write_file(path, Bytes::copy_from_slice(data)).await
/// }
/// ```
#[async_trait]
pub trait FileSystemAccess: Send + Sync {
    /// Check if a file or directory exists
    async fn exists(&self, path: &Path) -> Result<bool>;

    /// Create a directory and all parent directories if they don't exist
    async fn create_dir_all(&self, path: &Path) -> Result<()>;

    /// Read entire file contents into memory
    async fn read_file(&self, path: &Path) -> Result<Bytes>;

    /// Write data to a file, creating it if it doesn't exist and truncating
    /// it otherwise
    async fn write_file(&self, path: &Path, data: Bytes) -> Result<()>;

    /// Rename a file, replacing the destination if it exists
    async fn rename(&self, from: &Path, to: &Path) -> Result<()>;

    /// List all entries in a directory, in the order the OS yields them
    async fn list_directory(&self, path: &Path) -> Result<Vec<PathBuf>>;
}

/// Metadata sent alongside an uploaded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadMetadata {
    /// Name the file gets in remote storage
    pub name: String,
    /// Remote folder IDs the file is placed in
    pub parent_ids: Vec<String>,
}

/// Media part of an upload.
#[derive(Debug, Clone)]
pub struct UploadContent {
    /// Declared content type
    pub mime_type: String,
    /// File bytes
    pub data: Bytes,
}

/// Remote storage API that accepts new files.
///
/// Implementations return the remote ID of the created file. Callers that
/// only care about success may ignore it.
#[async_trait]
pub trait StorageProvider: Send + Sync {
    /// Create a new file in remote storage
    async fn create_file(&self, metadata: UploadMetadata, content: UploadContent)
        -> Result<String>;
}
