// src/error.rs

//! Unified error handling for the notifier.

use std::fmt;

use thiserror::Error;

/// Result type alias for notifier operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Network request could not complete
    #[error("Request to the homework API failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// API answered with something other than 200 OK
    #[error("Endpoint unavailable. Code {0}")]
    UnexpectedStatus(u16),

    /// Response body was not valid JSON
    #[error("Response body is not valid JSON: {0}")]
    Decode(String),

    /// Response shape is not recognized
    #[error("Malformed API response: {0}")]
    MalformedResponse(String),

    /// API reported an application-level error
    #[error("API response check failed: {0}")]
    Api(String),

    /// Homework record is not a non-empty mapping
    #[error("Malformed homework record: {0}")]
    MalformedRecord(String),

    /// Homework record lacks a required field
    #[error("Homework record is missing field '{0}'")]
    MissingField(&'static str),

    /// Status is absent or outside the catalog
    #[error("Unknown homework status: {0}")]
    UnknownStatus(String),

    /// Chat delivery failed
    #[error("Message delivery failed: {0}")]
    Delivery(String),

    /// Required credential is absent from the environment
    #[error("Missing required environment variable {0}")]
    MissingCredential(&'static str),

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration validation error
    #[error("Validation error: {0}")]
    Validation(String),
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

    /// Create a malformed response error.
    pub fn malformed_response(message: impl fmt::Display) -> Self {
        Self::MalformedResponse(message.to_string())
    }

    /// Create a malformed record error.
    pub fn malformed_record(message: impl fmt::Display) -> Self {
        Self::MalformedRecord(message.to_string())
    }

    /// Create a delivery error.
    pub fn delivery(message: impl fmt::Display) -> Self {
        Self::Delivery(message.to_string())
    }

    /// Soft failures are logged but never reported to the chat.
    pub fn is_soft(&self) -> bool {
        matches!(self, Self::Decode(_))
    }

    /// Network failure that never reached the API.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}
