//! Operator Prompt Abstraction
//!
//! The OAuth authorization code flow needs a human to visit a URL and paste
//! back the code Google shows them. Hosts supply this capability; tests
//! supply a canned answer.

use async_trait::async_trait;

use crate::error::Result;

/// Source of OAuth authorization codes.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::prompt::AuthorizationPrompt;
///
/// async fn ask(prompt: &dyn AuthorizationPrompt, url: &str) -> Result<String> {
///     prompt.request_code(url).await
/// }
/// ```
#[async_trait]
pub trait AuthorizationPrompt: Send + Sync {
    /// Show `auth_url` to the operator and wait for the code they enter.
    ///
    /// The returned string is either the bare code or the full redirect URL,
    /// trimmed of surrounding whitespace.
    async fn request_code(&self, auth_url: &str) -> Result<String>;
}
