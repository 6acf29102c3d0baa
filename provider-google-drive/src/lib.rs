//! # Google Drive Provider
//!
//! Implements the `StorageProvider` trait for Google Drive API v3.
//!
//! ## Overview
//!
//! This module provides:
//! - Multipart file creation (`files.create` with `uploadType=multipart`)
//! - Bearer-token authentication on every request
//! - Conversion of Drive API failures into `BridgeError`

pub mod connector;
pub mod error;
pub mod types;

pub use connector::GoogleDriveConnector;
pub use error::{GoogleDriveError, Result};
