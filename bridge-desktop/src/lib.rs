//! # Desktop Bridge Implementations
//!
//! Default implementations of bridge traits for desktop platforms
//! (macOS, Windows, Linux).
//!
//! ## Overview
//!
//! - `HttpClient` using `reqwest`
//! - `FileSystemAccess` using `tokio::fs`
//! - `AuthorizationPrompt` reading the code from stdin
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::{ReqwestHttpClient, StdinAuthorizationPrompt, TokioFileSystem};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let http_client = ReqwestHttpClient::new()?;
//!     let fs = TokioFileSystem::new();
//!     let prompt = StdinAuthorizationPrompt::new();
//!     // Hand these to core-auth / core-upload
//!     Ok(())
//! }
//! ```

mod filesystem;
mod http;
mod prompt;

pub use filesystem::TokioFileSystem;
pub use http::ReqwestHttpClient;
pub use prompt::StdinAuthorizationPrompt;
