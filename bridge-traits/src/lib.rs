//! # Host Bridge Traits
//!
//! Capability traits the uploader core depends on but does not implement.
//!
//! ## Traits
//!
//! - [`HttpClient`](http::HttpClient) - Async HTTP for the OAuth and Drive calls
//! - [`FileSystemAccess`](storage::FileSystemAccess) - Local file I/O for state files and images
//! - [`StorageProvider`](storage::StorageProvider) - Remote storage that accepts uploads
//! - [`AuthorizationPrompt`](prompt::AuthorizationPrompt) - Human-in-the-loop OAuth code entry
//!
//! Desktop implementations live in `bridge-desktop`; tests substitute mocks.
//!
//! ## Error Handling
//!
//! All bridge traits use the [`BridgeError`](error::BridgeError) type. Implementations
//! should convert platform-specific errors to `BridgeError` and include context such as
//! file paths or HTTP status in the message.
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` so they can be shared behind `Arc`.

pub mod error;
pub mod http;
pub mod prompt;
pub mod storage;

pub use error::BridgeError;

pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
pub use prompt::AuthorizationPrompt;
pub use storage::{FileSystemAccess, StorageProvider, UploadContent, UploadMetadata};
