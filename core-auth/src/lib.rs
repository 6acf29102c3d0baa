//! # Authentication Module
//!
//! OAuth 2.0 credentials for the Drive uploader.
//!
//! ## Overview
//!
//! This module obtains and caches the token bundle used to call Google
//! Drive. A cached `token.json` is reused across runs; when none exists the
//! operator completes a one-time authorization code exchange.
//!
//! ## Features
//!
//! - OAuth 2.0 authorization code flow with PKCE and `state`
//! - File-backed credential cache compatible with Google's client libraries
//! - Refresh of an expired cached token on load
//! - Pluggable operator prompt for the authorization code

pub mod authorizer;
pub mod error;
pub mod manager;
pub mod oauth;
pub mod token_store;
pub mod types;

pub use authorizer::InteractiveAuthorizer;
pub use error::{AuthError, Result};
pub use manager::AuthManager;
pub use oauth::{AuthorizationResponse, OAuthConfig, OAuthFlowManager, PkceVerifier};
pub use token_store::CredentialStore;
pub use types::OAuthTokens;
