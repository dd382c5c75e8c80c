//! Core error types for adventrunner-core.
//!
//! All fallible paths in the library surface one of these thiserror
//! hierarchies. Precondition violations (bad door index, unpublishing a
//! calendar without a link) are panics, not error variants.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for adventrunner-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Token acquisition failed or the server rejected the bearer header.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Transport-level failure talking to the API.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A response body did not decode into the expected wire type.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The server answered with a status outside the allowed set for
    /// that endpoint.
    #[error("Unexpected status {status} from {path}")]
    UnexpectedStatus { status: u16, path: String },

    /// User-supplied input failed normalization.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file
    #[error("Failed to read config at {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file contents are not valid TOML
    #[error("Failed to parse config: {0}")]
    ParseFailed(#[from] toml::de::Error),

    /// No home/config directory could be resolved
    #[error("Could not determine config directory")]
    NoConfigDir,
}
