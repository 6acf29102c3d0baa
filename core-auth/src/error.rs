use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Authorization code rejected: {0}")]
    InvalidAuthCode(String),

    #[error("Authorization denied by the provider: {0}")]
    AuthorizationDenied(String),

    #[error("OAuth state mismatch (expected {expected}, got {actual})")]
    StateMismatch { expected: String, actual: String },

    #[error("Token refresh failed: {0}")]
    TokenRefreshFailed(String),

    #[error("Token file {path} is corrupted: {reason}")]
    TokenCorrupted { path: String, reason: String },

    #[error("Credential storage failed: {0}")]
    StorageFailed(String),

    #[error("Authorization prompt failed: {0}")]
    PromptFailed(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, AuthError>;
