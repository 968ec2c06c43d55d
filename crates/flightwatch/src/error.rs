//! Error types for flightwatch.
//!
//! This module defines all error types used throughout the flightwatch crate.
//! A detail record that the feed cannot resolve is not an error; it is
//! reported as `Ok(None)` by the provider.

use thiserror::Error;

/// The main error type for flightwatch operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Transport Errors ===
    /// The request could not be completed (DNS, connect, timeout, body read).
    #[error("request to {url} failed: {message}")]
    Transport {
        /// The URL that was requested.
        url: String,
        /// Description of what went wrong.
        message: String,
    },

    /// The feed answered a live or position-history request with a non-success status.
    #[error("HTTP {status} from {url}")]
    HttpStatus {
        /// HTTP status code returned.
        status: u16,
        /// The URL that was requested.
        url: String,
    },

    // === Decode Errors ===
    /// The payload did not have the shape the decoder expects.
    #[error("malformed {context}: {message}")]
    Decode {
        /// Which record or field was being decoded.
        context: String,
        /// Description of the mismatch.
        message: String,
    },

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for flightwatch operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new transport error.
    #[must_use]
    pub fn transport(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transport {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create a new decode error.
    #[must_use]
    pub fn decode(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            context: context.into(),
            message: message.into(),
        }
    }

    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this error came from the network layer or an HTTP status.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::HttpStatus { .. })
    }

    /// Check if this error is a payload shape mismatch.
    #[must_use]
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode { .. } | Self::Json(_))
    }
}
