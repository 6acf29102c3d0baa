//! One-time interactive authorization.
//!
//! Runs when no cached token exists: shows the operator an authorization URL,
//! waits for the code they paste back, exchanges it and caches the result.

use crate::error::{AuthError, Result};
use crate::oauth::{AuthorizationResponse, OAuthFlowManager};
use crate::token_store::CredentialStore;
use crate::types::OAuthTokens;
use bridge_traits::prompt::AuthorizationPrompt;
use std::sync::Arc;
use tracing::{info, instrument};

/// Human-in-the-loop authorization code flow.
pub struct InteractiveAuthorizer {
    flow: Arc<OAuthFlowManager>,
    store: CredentialStore,
    prompt: Arc<dyn AuthorizationPrompt>,
}

impl InteractiveAuthorizer {
    pub fn new(
        flow: Arc<OAuthFlowManager>,
        store: CredentialStore,
        prompt: Arc<dyn AuthorizationPrompt>,
    ) -> Self {
        Self {
            flow,
            store,
            prompt,
        }
    }

    /// Obtain a fresh token bundle from the operator and persist it.
    ///
    /// # Errors
    ///
    /// - [`AuthError::PromptFailed`] if no code could be read
    /// - [`AuthError::AuthorizationDenied`] / [`AuthError::StateMismatch`]
    ///   for a pasted redirect URL that reports an error or a foreign state
    /// - [`AuthError::InvalidAuthCode`] if Google rejects the code
    /// - [`AuthError::StorageFailed`] if the token cannot be written
    #[instrument(skip(self))]
    pub async fn obtain_token(&self) -> Result<OAuthTokens> {
        let (auth_url, verifier) = self.flow.build_auth_url()?;

        let input = self
            .prompt
            .request_code(&auth_url)
            .await
            .map_err(|e| AuthError::PromptFailed(e.to_string()))?;

        let response = AuthorizationResponse::parse(&input)?;
        response.verify_state(&verifier)?;

        let tokens = self.flow.exchange_code(&response.code, &verifier).await?;

        self.store.save(&tokens).await?;
        info!(path = %self.store.path().display(), "Token stored to file");

        Ok(tokens)
    }
}
