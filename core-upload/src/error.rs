use bridge_traits::error::BridgeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("Upload ledger {path} is corrupted: {reason}")]
    LedgerCorrupted { path: String, reason: String },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: BridgeError,
    },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl UploadError {
    pub(crate) fn io(path: &std::path::Path, source: BridgeError) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, UploadError>;
