//! # oai-core
//!
//! Core types shared by the oai client crates: the error type,
//! client configuration, default constants, and structured logging
//! field names.

pub mod config;
pub mod defaults;
pub mod error;
pub mod logging;

// Re-export commonly used types at crate root
pub use config::{ClientConfig, ConfigError, ConfigResult};
pub use error::{Error, Result};
