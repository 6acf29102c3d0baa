//! # Core Runtime Module
//!
//! Foundational runtime infrastructure for the uploader:
//! - Configuration loaded from the environment
//! - Logging and tracing setup
//!
//! Other workspace crates depend on this for their settings and log
//! conventions.

pub mod config;
pub mod error;
pub mod logging;

pub use config::{UploaderConfig, UploaderConfigBuilder};
pub use error::{Error, Result};
