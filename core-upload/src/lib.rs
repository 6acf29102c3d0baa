//! # Upload Module
//!
//! Idempotent folder-to-Drive upload workflow.
//!
//! ## Overview
//!
//! - [`FolderScanner`] lists the watch directory and keeps image files
//! - [`LedgerStore`] persists the names of files already uploaded
//! - [`UploadOrchestrator`] uploads every image not yet in the ledger
//!
//! A name recorded in the ledger is never uploaded again. The ledger is
//! updated only after the storage API confirms an upload.

pub mod error;
pub mod ledger;
pub mod orchestrator;
pub mod scanner;

pub use error::{Result, UploadError};
pub use ledger::{LedgerStore, UploadLedger};
pub use orchestrator::{FailedUpload, UploadOrchestrator, UploadReport, UPLOAD_MIME_TYPE};
pub use scanner::{FolderScanner, ScanOutcome, IMAGE_EXTENSIONS};
