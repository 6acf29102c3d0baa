//! # Drive Uploader
//!
//! Uploads new screenshots from a local folder to a Google Drive folder,
//! remembering what was already sent.
//!
//! The two entry points mirror the two phases of a run:
//!
//! - [`load_credentials`] reuses the cached OAuth token or walks the
//!   operator through a one-time authorization
//! - [`run_upload`] uploads every image in the watch directory that the
//!   ledger does not list yet
//!
//! Host capabilities (HTTP, file system, operator prompt) are passed in, so
//! the desktop binary and tests wire different implementations.

use bridge_traits::{http::HttpClient, AuthorizationPrompt, FileSystemAccess};
use core_auth::AuthManager;
use core_runtime::config::UploaderConfig;
use core_upload::UploadOrchestrator;
use provider_google_drive::GoogleDriveConnector;
use std::sync::Arc;

pub use core_auth::{AuthError, OAuthTokens};
pub use core_runtime::logging::{init_logging, LogFormat, LoggingConfig};
pub use core_upload::{FailedUpload, UploadError, UploadReport};

/// Load the cached token bundle, authorizing interactively if none exists.
///
/// # Errors
///
/// See [`AuthManager::load_credentials`].
pub async fn load_credentials(
    config: &UploaderConfig,
    http_client: Arc<dyn HttpClient>,
    fs: Arc<dyn FileSystemAccess>,
    prompt: Arc<dyn AuthorizationPrompt>,
) -> core_auth::Result<OAuthTokens> {
    AuthManager::from_config(config, http_client, fs, prompt)
        .load_credentials()
        .await
}

/// Upload new images from the configured watch directory to the configured
/// Drive folder.
///
/// # Errors
///
/// See [`UploadOrchestrator::run`].
pub async fn run_upload(
    config: &UploaderConfig,
    tokens: &OAuthTokens,
    http_client: Arc<dyn HttpClient>,
    fs: Arc<dyn FileSystemAccess>,
) -> core_upload::Result<UploadReport> {
    let drive = GoogleDriveConnector::new(http_client, tokens.access_token.clone());
    let orchestrator = UploadOrchestrator::new(
        fs,
        Arc::new(drive),
        config.ledger_path.clone(),
        config.folder_id.clone(),
    );

    orchestrator.run(&config.watch_dir).await
}
