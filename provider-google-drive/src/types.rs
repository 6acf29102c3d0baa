//! Google Drive API request and response types
//!
//! Data structures for the metadata part of a `files.create` upload and the
//! resource Drive returns.

use serde::{Deserialize, Serialize};

/// Metadata part of a multipart `files.create` request.
///
/// See: https://developers.google.com/drive/api/v3/reference/files/create
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFileRequest {
    /// File name
    pub name: String,

    /// Parent folder IDs
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parents: Vec<String>,
}

/// File resource returned by `files.create` with `fields=id`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedFile {
    /// File ID
    pub id: String,

    /// Present only when requested through `fields`
    #[serde(default)]
    pub name: Option<String>,
}

/// Error envelope returned by the Drive API on failure.
#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub code: u16,
    #[serde(default)]
    pub message: String,
}
