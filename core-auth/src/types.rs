use chrono::{DateTime, Duration, Utc};
use std::fmt;

/// Clock skew tolerated before an access token is treated as expired.
pub const DEFAULT_EXPIRY_SKEW_SECS: i64 = 60;

/// OAuth 2.0 token set.
///
/// Contains the access token, refresh token, and expiration time for an
/// authenticated session. Google omits the refresh token on some grants and
/// never returns an expiry for long-lived tokens, so both are optional.
///
/// # Security
///
/// Tokens should be stored securely and never logged. The `Debug`
/// implementation redacts them.
///
/// # Examples
///
/// ```
/// use core_auth::OAuthTokens;
///
/// let tokens = OAuthTokens::new(
///     "ya29.a0...".to_string(),
///     Some("1//0g...".to_string()),
///     3600,
/// );
///
/// assert!(!tokens.is_expired());
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct OAuthTokens {
    /// The access token used for API requests
    pub access_token: String,
    /// The refresh token used to obtain new access tokens
    pub refresh_token: Option<String>,
    /// Space-separated scopes granted
    pub scope: Option<String>,
    /// Token type, normally `Bearer`
    pub token_type: Option<String>,
    /// When the access token expires (UTC)
    pub expires_at: Option<DateTime<Utc>>,
}

impl OAuthTokens {
    /// Create a new token set expiring `expires_in` seconds from now
    pub fn new(access_token: String, refresh_token: Option<String>, expires_in: i64) -> Self {
        Self {
            access_token,
            refresh_token,
            scope: None,
            token_type: Some("Bearer".to_string()),
            expires_at: Some(Utc::now() + Duration::seconds(expires_in)),
        }
    }

    pub fn with_scope(mut self, scope: Option<String>) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_token_type(mut self, token_type: Option<String>) -> Self {
        self.token_type = token_type;
        self
    }

    /// Check if the access token is expired or about to expire.
    ///
    /// Tokens without a known expiry are never considered expired; the
    /// storage API will reject them if they are stale.
    pub fn is_expired(&self) -> bool {
        self.is_expired_with_buffer(DEFAULT_EXPIRY_SKEW_SECS)
    }

    /// Check if the access token is expired with a custom buffer
    pub fn is_expired_with_buffer(&self, buffer_seconds: i64) -> bool {
        match self.expires_at {
            Some(expires_at) => Utc::now() >= expires_at - Duration::seconds(buffer_seconds),
            None => false,
        }
    }

    pub fn can_refresh(&self) -> bool {
        self.refresh_token
            .as_deref()
            .is_some_and(|token| !token.is_empty())
    }
}

// Custom Debug implementation to avoid logging tokens
impl fmt::Debug for OAuthTokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthTokens")
            .field("access_token", &"[REDACTED]")
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("scope", &self.scope)
            .field("token_type", &self.token_type)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}
