//! OAuth 2.0 Authorization Flow with PKCE Support
//!
//! Implements the pieces of RFC 6749 (OAuth 2.0) and RFC 7636 (PKCE) the
//! uploader needs against Google's identity service.
//!
//! # Overview
//!
//! The flow manager handles:
//! - Building authorization URLs with a PKCE challenge and `state`
//! - Exchanging authorization codes for tokens
//! - Refreshing access tokens
//!
//! Parsing what the operator pastes back lives in [`AuthorizationResponse`].
//!
//! # Security
//!
//! - Generates cryptographically secure random state and code verifier
//! - Never logs sensitive values (tokens, codes, verifiers)
//!
//! # Example
//!
//! ```no_run
//! use core_auth::oauth::{OAuthConfig, OAuthFlowManager};
//! use std::sync::Arc;
//!
//! # fn example() -> core_auth::Result<()> {
//! # use bridge_traits::http::HttpClient;
//! # let http_client: Arc<dyn HttpClient> = todo!();
//! let config = OAuthConfig::google_drive(
//!     "your-client-id",
//!     "your-client-secret",
//!     "http://localhost:8080/callback",
//! );
//!
//! let flow_manager = OAuthFlowManager::new(config, http_client);
//! let (auth_url, pkce_verifier) = flow_manager.build_auth_url()?;
//! // Show auth_url to the operator...
//! # Ok(())
//! # }
//! ```

use crate::error::{AuthError, Result};
use crate::types::OAuthTokens;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest};
use bytes::Bytes;
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{instrument, warn};
use url::Url;

/// Google's OAuth 2.0 authorization endpoint.
pub const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";

/// Google's OAuth 2.0 token endpoint.
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Per-file Drive access: only files this app creates or opens.
pub const DRIVE_FILE_SCOPE: &str = "https://www.googleapis.com/auth/drive.file";

/// OAuth 2.0 provider configuration.
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    /// OAuth client ID
    pub client_id: String,
    /// OAuth client secret (optional for public clients)
    pub client_secret: Option<String>,
    /// Redirect URI for OAuth callback
    pub redirect_uri: String,
    /// List of OAuth scopes to request
    pub scopes: Vec<String>,
    /// Authorization endpoint URL
    pub auth_url: String,
    /// Token endpoint URL
    pub token_url: String,
}

impl OAuthConfig {
    /// Google configuration requesting the `drive.file` scope.
    ///
    /// An empty client secret is treated as a public client.
    pub fn google_drive(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        let client_secret = client_secret.into();
        Self {
            client_id: client_id.into(),
            client_secret: (!client_secret.is_empty()).then_some(client_secret),
            redirect_uri: redirect_uri.into(),
            scopes: vec![DRIVE_FILE_SCOPE.to_string()],
            auth_url: GOOGLE_AUTH_URL.to_string(),
            token_url: GOOGLE_TOKEN_URL.to_string(),
        }
    }
}

/// PKCE (Proof Key for Code Exchange) verifier.
///
/// Held in memory for the duration of one authorization flow and sent with
/// the code exchange.
///
/// # Security
///
/// The verifier must be kept secret and never transmitted to the authorization server.
/// Only the challenge (derived from the verifier) is sent during authorization.
#[derive(Debug, Clone)]
pub struct PkceVerifier {
    /// The code verifier (base64-url-encoded random string)
    verifier: String,
    /// The state parameter for CSRF protection
    state: String,
}

impl PkceVerifier {
    /// Create a new PKCE verifier with cryptographically secure random values.
    ///
    /// Generates a 32-byte code verifier and a 16-byte state, both
    /// URL-safe base64 without padding.
    pub fn new() -> Self {
        let mut rng = rand::thread_rng();

        // 43 characters, within the 43-128 range of RFC 7636
        let mut verifier_bytes = [0u8; 32];
        rng.fill(&mut verifier_bytes);
        let verifier = URL_SAFE_NO_PAD.encode(verifier_bytes);

        let mut state_bytes = [0u8; 16];
        rng.fill(&mut state_bytes);
        let state = URL_SAFE_NO_PAD.encode(state_bytes);

        Self { verifier, state }
    }

    /// Get the code verifier string.
    pub fn verifier(&self) -> &str {
        &self.verifier
    }

    /// Get the state parameter.
    pub fn state(&self) -> &str {
        &self.state
    }

    /// Compute the code challenge from the verifier.
    ///
    /// Uses S256 method: BASE64URL(SHA256(code_verifier))
    pub fn challenge(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.verifier.as_bytes());
        let hash = hasher.finalize();
        URL_SAFE_NO_PAD.encode(hash)
    }
}

impl Default for PkceVerifier {
    fn default() -> Self {
        Self::new()
    }
}

/// What the operator pasted back after authorizing.
///
/// Either a bare authorization code, or the full redirect URL copied from
/// the browser's address bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationResponse {
    pub code: String,
    pub state: Option<String>,
}

impl AuthorizationResponse {
    /// Parse operator input.
    ///
    /// # Errors
    ///
    /// - [`AuthError::InvalidAuthCode`] for empty input or a URL without a `code`
    /// - [`AuthError::AuthorizationDenied`] for a redirect URL carrying `error=`
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        if input.is_empty() {
            return Err(AuthError::InvalidAuthCode(
                "no authorization code entered".to_string(),
            ));
        }

        let Ok(url) = Url::parse(input) else {
            return Ok(Self {
                code: input.to_string(),
                state: None,
            });
        };

        let params: HashMap<String, String> = url.query_pairs().into_owned().collect();

        if let Some(error) = params.get("error") {
            return Err(AuthError::AuthorizationDenied(error.clone()));
        }

        match params.get("code").filter(|code| !code.is_empty()) {
            Some(code) => Ok(Self {
                code: code.clone(),
                state: params.get("state").cloned(),
            }),
            None => Err(AuthError::InvalidAuthCode(
                "redirect URL does not contain a code parameter".to_string(),
            )),
        }
    }

    /// Check the returned state against the one sent in the authorization URL.
    ///
    /// A bare code carries no state and passes.
    pub fn verify_state(&self, verifier: &PkceVerifier) -> Result<()> {
        match self.state.as_deref() {
            Some(state) if state != verifier.state() => {
                warn!("OAuth state mismatch on pasted redirect URL");
                Err(AuthError::StateMismatch {
                    expected: verifier.state().to_string(),
                    actual: state.to_string(),
                })
            }
            _ => Ok(()),
        }
    }
}

/// OAuth 2.0 flow manager.
///
/// Handles the authorization code flow with PKCE and the refresh grant.
pub struct OAuthFlowManager {
    config: OAuthConfig,
    http_client: Arc<dyn HttpClient>,
}

impl OAuthFlowManager {
    /// Create a new OAuth flow manager with the given configuration.
    pub fn new(config: OAuthConfig, http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            config,
            http_client,
        }
    }

    /// Build the authorization URL with PKCE challenge.
    ///
    /// Returns both the URL and the PKCE verifier, which must be kept for
    /// the code exchange.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured authorization endpoint is not a
    /// valid URL.
    #[instrument(skip(self))]
    pub fn build_auth_url(&self) -> Result<(String, PkceVerifier)> {
        let verifier = PkceVerifier::new();
        let challenge = verifier.challenge();

        let mut url = Url::parse(&self.config.auth_url)
            .map_err(|e| AuthError::Other(format!("Invalid auth URL: {}", e)))?;

        {
            let mut query = url.query_pairs_mut();
            query.append_pair("client_id", &self.config.client_id);
            query.append_pair("redirect_uri", &self.config.redirect_uri);
            query.append_pair("response_type", "code");
            query.append_pair("scope", &self.config.scopes.join(" "));
            query.append_pair("state", verifier.state());
            query.append_pair("code_challenge", &challenge);
            query.append_pair("code_challenge_method", "S256");
            query.append_pair("access_type", "offline"); // Request refresh token
        }

        tracing::debug!("Built authorization URL");

        Ok((url.to_string(), verifier))
    }

    /// Exchange an authorization code for OAuth tokens.
    ///
    /// Single round-trip; a rejected code is not retried.
    ///
    /// # Errors
    ///
    /// - [`AuthError::NetworkError`] if the token endpoint cannot be reached
    /// - [`AuthError::InvalidAuthCode`] if the endpoint rejects the code
    #[instrument(skip(self, code, verifier))]
    pub async fn exchange_code(&self, code: &str, verifier: &PkceVerifier) -> Result<OAuthTokens> {
        let mut params = HashMap::new();
        params.insert("grant_type", "authorization_code");
        params.insert("code", code);
        params.insert("redirect_uri", &self.config.redirect_uri);
        params.insert("client_id", &self.config.client_id);
        params.insert("code_verifier", verifier.verifier());

        if let Some(ref client_secret) = self.config.client_secret {
            params.insert("client_secret", client_secret);
        }

        tracing::debug!("Exchanging authorization code for tokens");

        let response = self.post_token_request(&params).await?;

        if !response.is_success() {
            let status = response.status;
            let error_body = response
                .text()
                .unwrap_or_else(|_| "Unable to read error response".to_string());

            warn!(
                status = status,
                error = %error_body,
                "Token exchange failed while exchanging authorization code"
            );

            return Err(AuthError::InvalidAuthCode(format!(
                "Token endpoint returned {}: {}",
                status, error_body
            )));
        }

        let token_response: TokenResponse = response
            .json()
            .map_err(|e| AuthError::Other(format!("Failed to parse token response: {}", e)))?;

        tracing::info!(
            has_refresh_token = token_response.refresh_token.is_some(),
            "Exchanged code for tokens (expires in {}s)",
            token_response.expires_in
        );

        Ok(token_response.into_tokens(None))
    }

    /// Refresh an access token using a refresh token.
    ///
    /// Google usually omits the refresh token from a refresh response; the
    /// one passed in is carried over in that case.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::TokenRefreshFailed`] if the request cannot be
    /// sent or the endpoint rejects the refresh token.
    #[instrument(skip(self, refresh_token))]
    pub async fn refresh_access_token(&self, refresh_token: &str) -> Result<OAuthTokens> {
        let mut params = HashMap::new();
        params.insert("grant_type", "refresh_token");
        params.insert("refresh_token", refresh_token);
        params.insert("client_id", &self.config.client_id);

        if let Some(ref client_secret) = self.config.client_secret {
            params.insert("client_secret", client_secret);
        }

        tracing::debug!("Refreshing access token");

        let response = self
            .post_token_request(&params)
            .await
            .map_err(|e| AuthError::TokenRefreshFailed(e.to_string()))?;

        if !response.is_success() {
            let status = response.status;
            let error_body = response
                .text()
                .unwrap_or_else(|_| "Unable to read error response".to_string());

            warn!(status = status, error = %error_body, "Token refresh failed");

            return Err(AuthError::TokenRefreshFailed(format!(
                "Token endpoint returned {}: {}",
                status, error_body
            )));
        }

        let token_response: TokenResponse = response
            .json()
            .map_err(|e| AuthError::TokenRefreshFailed(format!("Failed to parse token response: {}", e)))?;

        tracing::info!(
            "Refreshed access token (expires in {}s)",
            token_response.expires_in
        );

        Ok(token_response.into_tokens(Some(refresh_token)))
    }

    async fn post_token_request(
        &self,
        params: &HashMap<&str, &str>,
    ) -> Result<bridge_traits::http::HttpResponse> {
        let encoded_body = serde_urlencoded::to_string(params)
            .map_err(|e| AuthError::Other(format!("Failed to encode token request: {}", e)))?;

        let request = HttpRequest::new(HttpMethod::Post, self.config.token_url.clone())
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(Bytes::from(encoded_body));

        self.http_client
            .execute(request)
            .await
            .map_err(|e| AuthError::NetworkError(e.to_string()))
    }
}

/// Token response from the OAuth provider.
#[derive(Debug, Deserialize, Serialize)]
struct TokenResponse {
    access_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    refresh_token: Option<String>,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    token_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    scope: Option<String>,
}

impl TokenResponse {
    fn into_tokens(self, previous_refresh_token: Option<&str>) -> OAuthTokens {
        let refresh_token = self
            .refresh_token
            .or_else(|| previous_refresh_token.map(str::to_string));

        OAuthTokens::new(self.access_token, refresh_token, self.expires_in)
            .with_scope(self.scope)
            .with_token_type(self.token_type)
    }
}

fn default_expires_in() -> i64 {
    3600 // Default to 1 hour if not specified
}
