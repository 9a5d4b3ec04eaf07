// src/error.rs

//! Unified error handling for the webhook service.

use std::fmt;

use thiserror::Error;

/// Result type alias for crawlbot operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// A secret needed for an outbound call is not set
    #[error("{0} not configured")]
    MissingCredential(&'static str),

    /// Upstream service answered with a non-success status
    #[error("{service} returned status {status}")]
    Status { service: &'static str, status: u16 },

    /// Upstream service answered with an error
    #[error("{service} error: {message}")]
    Api {
        service: &'static str,
        message: String,
    },
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create an upstream API error.
    pub fn api(service: &'static str, message: impl fmt::Display) -> Self {
        Self::Api {
            service,
            message: message.to_string(),
        }
    }
}
