//! # Uploader Configuration
//!
//! Settings for the uploader: OAuth client credentials, the Drive folder
//! that receives uploads, and where local state lives.
//!
//! ## Overview
//!
//! Configuration is usually read from the process environment (after the
//! binary has loaded `.env`) with [`UploaderConfig::from_env`]. Hosts and
//! tests can build one directly with [`UploaderConfig::builder`].
//!
//! Missing OAuth credentials or folder ID are *not* rejected here. They are
//! stored as empty strings, [`UploaderConfig::warn_missing_settings`] logs a
//! warning once logging is up, and the failure surfaces when Google rejects
//! the request.
//!
//! ## Environment
//!
//! | Variable | Default |
//! |----------|---------|
//! | `GOOGLE_CLIENT_ID` | empty |
//! | `GOOGLE_CLIENT_SECRET` | empty |
//! | `GOOGLE_REDIRECT_URI` | empty |
//! | `GOOGLE_DRIVE_FOLDER_ID` | empty |
//! | `DRIVE_UPLOADER_BASE_DIR` | `.` |
//! | `DRIVE_UPLOADER_TOKEN_PATH` | `<base>/token.json` |
//! | `DRIVE_UPLOADER_LEDGER_PATH` | `<base>/uploaded_files.json` |
//! | `DRIVE_UPLOADER_WATCH_DIR` | `<base>/takescreenshots` |
//! | `DRIVE_UPLOADER_LOG_FORMAT` | `pretty` (debug) / `json` (release) |
//! | `RUST_LOG` | workspace default filter |
//!
//! ## Usage
//!
//! ```
//! use core_runtime::config::UploaderConfig;
//!
//! let config = UploaderConfig::builder()
//!     .client_id("client-id")
//!     .client_secret("secret")
//!     .redirect_uri("urn:ietf:wg:oauth:2.0:oob")
//!     .folder_id("folder-123")
//!     .base_dir("/srv/captures")
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.ledger_path.to_str(), Some("/srv/captures/uploaded_files.json"));
//! ```

use crate::error::{Error, Result};
use crate::logging::{LogFormat, LoggingConfig};
use std::path::PathBuf;
use tracing::warn;

pub const ENV_CLIENT_ID: &str = "GOOGLE_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "GOOGLE_CLIENT_SECRET";
pub const ENV_REDIRECT_URI: &str = "GOOGLE_REDIRECT_URI";
pub const ENV_FOLDER_ID: &str = "GOOGLE_DRIVE_FOLDER_ID";
pub const ENV_BASE_DIR: &str = "DRIVE_UPLOADER_BASE_DIR";
pub const ENV_TOKEN_PATH: &str = "DRIVE_UPLOADER_TOKEN_PATH";
pub const ENV_LEDGER_PATH: &str = "DRIVE_UPLOADER_LEDGER_PATH";
pub const ENV_WATCH_DIR: &str = "DRIVE_UPLOADER_WATCH_DIR";
pub const ENV_LOG_FORMAT: &str = "DRIVE_UPLOADER_LOG_FORMAT";
pub const ENV_LOG_FILTER: &str = "RUST_LOG";

const DEFAULT_TOKEN_FILE: &str = "token.json";
const DEFAULT_LEDGER_FILE: &str = "uploaded_files.json";
const DEFAULT_WATCH_DIR: &str = "takescreenshots";

/// Uploader configuration.
///
/// Use [`UploaderConfigBuilder`] or [`UploaderConfig::from_env`] to
/// construct instances.
#[derive(Clone)]
pub struct UploaderConfig {
    /// OAuth client ID
    pub client_id: String,

    /// OAuth client secret
    pub client_secret: String,

    /// OAuth redirect URI registered for the client
    pub redirect_uri: String,

    /// Drive folder that receives uploads
    pub folder_id: String,

    /// Where the OAuth token bundle is cached
    pub token_path: PathBuf,

    /// Where the list of uploaded filenames is kept
    pub ledger_path: PathBuf,

    /// Directory scanned for images
    pub watch_dir: PathBuf,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl std::fmt::Debug for UploaderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploaderConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("redirect_uri", &self.redirect_uri)
            .field("folder_id", &self.folder_id)
            .field("token_path", &self.token_path)
            .field("ledger_path", &self.ledger_path)
            .field("watch_dir", &self.watch_dir)
            .field("logging", &self.logging)
            .finish()
    }
}

impl UploaderConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> UploaderConfigBuilder {
        UploaderConfigBuilder::default()
    }

    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `DRIVE_UPLOADER_LOG_FORMAT` names an
    /// unknown format.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, which maps a variable
    /// name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let mut builder = Self::builder();

        builder.client_id = read(ENV_CLIENT_ID);
        builder.client_secret = read(ENV_CLIENT_SECRET);
        builder.redirect_uri = read(ENV_REDIRECT_URI);
        builder.folder_id = read(ENV_FOLDER_ID);

        builder.base_dir = read(ENV_BASE_DIR).map(PathBuf::from);
        builder.token_path = read(ENV_TOKEN_PATH).map(PathBuf::from);
        builder.ledger_path = read(ENV_LEDGER_PATH).map(PathBuf::from);
        builder.watch_dir = read(ENV_WATCH_DIR).map(PathBuf::from);

        if let Some(format) = read(ENV_LOG_FORMAT) {
            let format = format.parse::<LogFormat>().map_err(|_| {
                Error::Config(format!(
                    "{} must be one of pretty, json, compact (got '{}')",
                    ENV_LOG_FORMAT, format
                ))
            })?;
            builder.log_format = Some(format);
        }
        builder.log_filter = read(ENV_LOG_FILTER);

        builder.build()
    }

    /// Names of the Google settings that are empty.
    pub fn missing_settings(&self) -> Vec<&'static str> {
        [
            (ENV_CLIENT_ID, &self.client_id),
            (ENV_CLIENT_SECRET, &self.client_secret),
            (ENV_REDIRECT_URI, &self.redirect_uri),
            (ENV_FOLDER_ID, &self.folder_id),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(key, _)| key)
        .collect()
    }

    /// Log a warning for each empty Google setting.
    pub fn warn_missing_settings(&self) {
        for variable in self.missing_settings() {
            warn!(variable, "Environment variable not set");
        }
    }
}

/// Builder for [`UploaderConfig`].
#[derive(Default)]
pub struct UploaderConfigBuilder {
    client_id: Option<String>,
    client_secret: Option<String>,
    redirect_uri: Option<String>,
    folder_id: Option<String>,
    base_dir: Option<PathBuf>,
    token_path: Option<PathBuf>,
    ledger_path: Option<PathBuf>,
    watch_dir: Option<PathBuf>,
    log_format: Option<LogFormat>,
    log_filter: Option<String>,
}

impl UploaderConfigBuilder {
    /// Sets the OAuth client ID.
    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// Sets the OAuth client secret.
    pub fn client_secret(mut self, client_secret: impl Into<String>) -> Self {
        self.client_secret = Some(client_secret.into());
        self
    }

    /// Sets the OAuth redirect URI.
    pub fn redirect_uri(mut self, redirect_uri: impl Into<String>) -> Self {
        self.redirect_uri = Some(redirect_uri.into());
        self
    }

    /// Sets the Drive folder that receives uploads.
    pub fn folder_id(mut self, folder_id: impl Into<String>) -> Self {
        self.folder_id = Some(folder_id.into());
        self
    }

    /// Sets the directory the default state paths are resolved against.
    ///
    /// Default: the current working directory.
    pub fn base_dir<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.base_dir = Some(path.into());
        self
    }

    /// Overrides the token file location.
    pub fn token_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.token_path = Some(path.into());
        self
    }

    /// Overrides the ledger file location.
    pub fn ledger_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.ledger_path = Some(path.into());
        self
    }

    /// Overrides the directory scanned for images.
    pub fn watch_dir<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.watch_dir = Some(path.into());
        self
    }

    /// Sets the log output format.
    pub fn log_format(mut self, format: LogFormat) -> Self {
        self.log_format = Some(format);
        self
    }

    /// Sets a custom `EnvFilter` directive string.
    pub fn log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = Some(filter.into());
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the base directory is set to an empty
    /// path.
    pub fn build(self) -> Result<UploaderConfig> {
        let base_dir = self.base_dir.unwrap_or_else(|| PathBuf::from("."));
        if base_dir.as_os_str().is_empty() {
            return Err(Error::Config("Base directory cannot be empty".to_string()));
        }

        let mut logging = LoggingConfig::default();
        if let Some(format) = self.log_format {
            logging = logging.with_format(format);
        }
        if let Some(filter) = self.log_filter {
            logging = logging.with_filter(filter);
        }

        Ok(UploaderConfig {
            client_id: self.client_id.unwrap_or_default(),
            client_secret: self.client_secret.unwrap_or_default(),
            redirect_uri: self.redirect_uri.unwrap_or_default(),
            folder_id: self.folder_id.unwrap_or_default(),
            token_path: self
                .token_path
                .unwrap_or_else(|| base_dir.join(DEFAULT_TOKEN_FILE)),
            ledger_path: self
                .ledger_path
                .unwrap_or_else(|| base_dir.join(DEFAULT_LEDGER_FILE)),
            watch_dir: self
                .watch_dir
                .unwrap_or_else(|| base_dir.join(DEFAULT_WATCH_DIR)),
            logging,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::path::Path;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_builder_defaults() {
        let config = UploaderConfig::builder().build().unwrap();

        assert_eq!(config.client_id, "");
        assert_eq!(config.folder_id, "");
        assert_eq!(config.token_path, Path::new(".").join("token.json"));
        assert_eq!(
            config.ledger_path,
            Path::new(".").join("uploaded_files.json")
        );
        assert_eq!(config.watch_dir, Path::new(".").join("takescreenshots"));
    }

    #[test]
    fn test_builder_overrides_paths() {
        let config = UploaderConfig::builder()
            .base_dir("/base")
            .token_path("/secrets/token.json")
            .watch_dir("/captures")
            .build()
            .unwrap();

        assert_eq!(config.token_path, PathBuf::from("/secrets/token.json"));
        assert_eq!(config.ledger_path, PathBuf::from("/base/uploaded_files.json"));
        assert_eq!(config.watch_dir, PathBuf::from("/captures"));
    }

    #[test]
    fn test_builder_rejects_empty_base_dir() {
        let result = UploaderConfig::builder().base_dir("").build();

        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Base directory cannot be empty"));
    }

    #[test]
    fn test_from_lookup_reads_google_variables() {
        let config = UploaderConfig::from_lookup(lookup_from(&[
            (ENV_CLIENT_ID, "id"),
            (ENV_CLIENT_SECRET, "secret"),
            (ENV_REDIRECT_URI, "http://localhost"),
            (ENV_FOLDER_ID, "folder"),
            (ENV_BASE_DIR, "/data"),
        ]))
        .unwrap();

        assert_eq!(config.client_id, "id");
        assert_eq!(config.client_secret, "secret");
        assert_eq!(config.redirect_uri, "http://localhost");
        assert_eq!(config.folder_id, "folder");
        assert_eq!(config.watch_dir, PathBuf::from("/data/takescreenshots"));
    }

    #[test]
    fn test_from_lookup_tolerates_missing_credentials() {
        let config = UploaderConfig::from_lookup(lookup_from(&[(ENV_CLIENT_ID, "  ")])).unwrap();

        assert_eq!(config.client_id, "");
        assert_eq!(config.client_secret, "");
        assert_eq!(config.folder_id, "");
        assert_eq!(config.missing_settings().len(), 4);
    }

    #[test]
    fn test_missing_settings_lists_only_empty_values() {
        let config = UploaderConfig::builder()
            .client_id("id")
            .redirect_uri("http://localhost")
            .build()
            .unwrap();

        assert_eq!(
            config.missing_settings(),
            vec![ENV_CLIENT_SECRET, ENV_FOLDER_ID]
        );
    }

    #[test]
    fn test_from_lookup_log_settings() {
        let config = UploaderConfig::from_lookup(lookup_from(&[
            (ENV_LOG_FORMAT, "compact"),
            (ENV_LOG_FILTER, "core_upload=trace"),
        ]))
        .unwrap();

        assert_eq!(config.logging.format, LogFormat::Compact);
        assert_eq!(config.logging.filter, Some("core_upload=trace".to_string()));
    }

    #[test]
    fn test_from_lookup_rejects_unknown_log_format() {
        let result = UploaderConfig::from_lookup(lookup_from(&[(ENV_LOG_FORMAT, "xml")]));

        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = UploaderConfig::builder()
            .client_secret("super-secret")
            .build()
            .unwrap();

        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
