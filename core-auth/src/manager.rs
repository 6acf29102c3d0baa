//! # Authentication Manager
//!
//! Produces the token bundle the uploader runs with.
//!
//! ## Overview
//!
//! `AuthManager` ties together the [`CredentialStore`], the
//! [`InteractiveAuthorizer`] and the OAuth flow manager:
//!
//! 1. A cached token is loaded from disk when present.
//! 2. Otherwise the operator is walked through the authorization code flow.
//! 3. A cached token that has expired is refreshed once, if it carries a
//!    refresh token, and written back.
//!
//! ## Usage
//!
//! ```no_run
//! use core_auth::AuthManager;
//! use core_runtime::config::UploaderConfig;
//! use std::sync::Arc;
//! # use bridge_traits::{FileSystemAccess, AuthorizationPrompt, http::HttpClient};
//! # async fn example(
//! #     http: Arc<dyn HttpClient>,
//! #     fs: Arc<dyn FileSystemAccess>,
//! #     prompt: Arc<dyn AuthorizationPrompt>,
//! # ) -> core_auth::Result<()> {
//! let config = UploaderConfig::from_env().unwrap();
//! let manager = AuthManager::from_config(&config, http, fs, prompt);
//! let tokens = manager.load_credentials().await?;
//! # Ok(())
//! # }
//! ```

use crate::authorizer::InteractiveAuthorizer;
use crate::error::Result;
use crate::oauth::{OAuthConfig, OAuthFlowManager};
use crate::token_store::CredentialStore;
use crate::types::OAuthTokens;
use bridge_traits::{http::HttpClient, AuthorizationPrompt, FileSystemAccess};
use core_runtime::config::UploaderConfig;
use std::sync::Arc;
use tracing::{info, instrument, warn};

pub struct AuthManager {
    flow: Arc<OAuthFlowManager>,
    store: CredentialStore,
    authorizer: InteractiveAuthorizer,
}

impl AuthManager {
    pub fn new(
        oauth_config: OAuthConfig,
        store: CredentialStore,
        http_client: Arc<dyn HttpClient>,
        prompt: Arc<dyn AuthorizationPrompt>,
    ) -> Self {
        let flow = Arc::new(OAuthFlowManager::new(oauth_config, http_client));
        let authorizer = InteractiveAuthorizer::new(flow.clone(), store.clone(), prompt);

        Self {
            flow,
            store,
            authorizer,
        }
    }

    /// Build a manager for Google Drive from the uploader configuration.
    pub fn from_config(
        config: &UploaderConfig,
        http_client: Arc<dyn HttpClient>,
        fs: Arc<dyn FileSystemAccess>,
        prompt: Arc<dyn AuthorizationPrompt>,
    ) -> Self {
        let oauth_config = OAuthConfig::google_drive(
            config.client_id.clone(),
            config.client_secret.clone(),
            config.redirect_uri.clone(),
        );
        let store = CredentialStore::new(fs, config.token_path.clone());

        Self::new(oauth_config, store, http_client, prompt)
    }

    pub fn store(&self) -> &CredentialStore {
        &self.store
    }

    /// Return a usable token bundle, authorizing interactively if none is cached.
    ///
    /// # Errors
    ///
    /// Propagates [`CredentialStore::load`] and
    /// [`InteractiveAuthorizer::obtain_token`] errors. A failed refresh of
    /// an expired token is not an error: the stale bundle is returned and
    /// the storage API will reject it.
    #[instrument(skip(self))]
    pub async fn load_credentials(&self) -> Result<OAuthTokens> {
        let Some(tokens) = self.store.load().await? else {
            info!("No cached token, starting authorization");
            return self.authorizer.obtain_token().await;
        };

        info!(path = %self.store.path().display(), "Token loaded from file");

        if !tokens.is_expired() {
            return Ok(tokens);
        }

        if !tokens.can_refresh() {
            warn!("Cached access token has expired and no refresh token is available");
            return Ok(tokens);
        }
        let refresh_token = tokens.refresh_token.as_deref().unwrap_or_default();

        match self.flow.refresh_access_token(refresh_token).await {
            Ok(refreshed) => {
                // Scope is not always echoed on refresh
                let refreshed = OAuthTokens {
                    scope: refreshed.scope.or_else(|| tokens.scope.clone()),
                    ..refreshed
                };
                self.store.save(&refreshed).await?;
                info!("Refreshed expired access token");
                Ok(refreshed)
            }
            Err(e) => {
                warn!(error = %e, "Failed to refresh access token, continuing with cached token");
                Ok(tokens)
            }
        }
    }
}
