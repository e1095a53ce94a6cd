//! # CLI Errors
//!
//! Everything that can stop an `origo` invocation.

use origo_core::{IdError, RegistryError};
use thiserror::Error;

/// Errors surfaced by the CLI layer.
#[derive(Debug, Error)]
pub enum CliError {
    /// Reading the config file or writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The config file could not be parsed.
    #[error("invalid config {path}: {message}")]
    Config { path: String, message: String },

    /// The config file is larger than `MAX_CONFIG_FILE_SIZE`.
    #[error("config file {path} is {size} bytes, maximum allowed is {max} bytes")]
    ConfigTooLarge { path: String, size: u64, max: u64 },

    /// A source id given on the command line is malformed.
    #[error("invalid source id: {0}")]
    InvalidId(#[from] IdError),

    /// A registry operation failed.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// JSON output could not be encoded.
    #[error("JSON encoding error: {0}")]
    Json(#[from] serde_json::Error),
}
