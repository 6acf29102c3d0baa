//! Credential Storage
//!
//! Persists the OAuth token bundle as a JSON file on local disk.
//!
//! The file layout matches what Google's own client libraries write, so a
//! `token.json` produced by either side can be reused:
//!
//! ```json
//! {"access_token":"ya29...","refresh_token":"1//0g...","scope":"https://www.googleapis.com/auth/drive.file","token_type":"Bearer","expiry_date":1718000000000}
//! ```
//!
//! ## Security
//!
//! - Token values are never logged or included in error messages
//! - The store performs no signature or expiry validation
//!
//! ## Example
//!
//! ```no_run
//! use core_auth::{CredentialStore, OAuthTokens};
//! use std::sync::Arc;
//! # use bridge_traits::storage::FileSystemAccess;
//! # async fn example(fs: Arc<dyn FileSystemAccess>) -> core_auth::Result<()> {
//! let store = CredentialStore::new(fs, "token.json");
//!
//! if store.load().await?.is_none() {
//!     let tokens = OAuthTokens::new("access".to_string(), None, 3600);
//!     store.save(&tokens).await?;
//! }
//! # Ok(())
//! # }
//! ```

use crate::error::{AuthError, Result};
use crate::types::OAuthTokens;
use bridge_traits::storage::FileSystemAccess;
use bytes::Bytes;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// File-backed store for a single OAuth token bundle.
#[derive(Clone)]
pub struct CredentialStore {
    fs: Arc<dyn FileSystemAccess>,
    path: PathBuf,
}

/// On-disk token representation.
///
/// `expiry_date` is milliseconds since the Unix epoch.
#[derive(Debug, Serialize, Deserialize)]
struct StoredTokens {
    access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    scope: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    expiry_date: Option<i64>,
}

impl From<&OAuthTokens> for StoredTokens {
    fn from(tokens: &OAuthTokens) -> Self {
        Self {
            access_token: tokens.access_token.clone(),
            refresh_token: tokens.refresh_token.clone(),
            scope: tokens.scope.clone(),
            token_type: tokens.token_type.clone(),
            expiry_date: tokens.expires_at.map(|at| at.timestamp_millis()),
        }
    }
}

impl From<StoredTokens> for OAuthTokens {
    fn from(stored: StoredTokens) -> Self {
        let expires_at: Option<DateTime<Utc>> = stored
            .expiry_date
            .and_then(|millis| Utc.timestamp_millis_opt(millis).single());

        OAuthTokens {
            access_token: stored.access_token,
            refresh_token: stored.refresh_token,
            scope: stored.scope,
            token_type: stored.token_type,
            expires_at,
        }
    }
}

impl CredentialStore {
    /// Create a store backed by the file at `path`.
    pub fn new(fs: Arc<dyn FileSystemAccess>, path: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            path: path.into(),
        }
    }

    /// Location of the token file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the cached token bundle.
    ///
    /// Returns `Ok(None)` when no token file exists.
    ///
    /// # Errors
    ///
    /// - [`AuthError::TokenCorrupted`] if the file is not a valid token
    ///   document. The file is left in place for the operator to inspect.
    /// - [`AuthError::StorageFailed`] if the file cannot be read.
    pub async fn load(&self) -> Result<Option<OAuthTokens>> {
        let exists = self.fs.exists(&self.path).await.map_err(|e| {
            warn!(path = %self.path.display(), error = %e, "Failed to check token file");
            AuthError::StorageFailed(e.to_string())
        })?;

        if !exists {
            debug!(path = %self.path.display(), "No cached token file");
            return Ok(None);
        }

        let data = self.fs.read_file(&self.path).await.map_err(|e| {
            warn!(path = %self.path.display(), error = %e, "Failed to read token file");
            AuthError::StorageFailed(e.to_string())
        })?;

        let stored: StoredTokens = serde_json::from_slice(&data).map_err(|e| {
            warn!(
                path = %self.path.display(),
                error = %e,
                "Token file could not be parsed"
            );
            AuthError::TokenCorrupted {
                path: self.path.display().to_string(),
                reason: e.to_string(),
            }
        })?;

        let tokens = OAuthTokens::from(stored);

        debug!(
            has_refresh_token = tokens.refresh_token.is_some(),
            expires_at = ?tokens.expires_at,
            "Token file parsed"
        );

        Ok(Some(tokens))
    }

    /// Write the token bundle, replacing any previous file.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::StorageFailed`] if serialization or the write fails.
    pub async fn save(&self, tokens: &OAuthTokens) -> Result<()> {
        let json = serde_json::to_vec(&StoredTokens::from(tokens))
            .map_err(|e| AuthError::StorageFailed(format!("token serialization: {}", e)))?;

        self.fs
            .write_file(&self.path, Bytes::from(json))
            .await
            .map_err(|e| {
                warn!(path = %self.path.display(), error = %e, "Failed to write token file");
                AuthError::StorageFailed(e.to_string())
            })?;

        info!(
            path = %self.path.display(),
            has_refresh_token = tokens.refresh_token.is_some(),
            "Token stored"
        );

        Ok(())
    }
}
