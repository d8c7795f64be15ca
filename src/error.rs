//! Error types for the namespaced KV client

use std::io;
use thiserror::Error;

/// Errors that can occur when talking to the remote KV storage API
#[derive(Error, Debug)]
pub enum Error {
    /// Required configuration was missing or invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// Endpoint or composed request URL failed to parse
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Request could not be built
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Expiration duration string was rejected by the parser
    #[error("Invalid TTL: {0}")]
    InvalidTtl(String),

    /// Network or connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// I/O error while reading a response body
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TLS setup error
    #[error("TLS error: {0}")]
    Tls(String),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Error>;
