//! Custom error types for msgcrypt
//!
//! This module defines the error hierarchy for the crate using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for msgcrypt operations
#[derive(Error, Debug)]
pub enum CryptError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Validation errors for user input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Any failure turning an envelope back into plaintext: malformed
    /// envelope, corrupt base64, wrong key, bad padding, invalid UTF-8
    #[error("Decryption error: {0}")]
    Decryption(String),

    /// An operation needed stored account credentials and there are none
    #[error("Not logged in: run 'msgcrypt login' first")]
    NotLoggedIn,

    /// A retried operation failed on every attempt
    #[error("Gave up after {attempts} attempts: {last_error}")]
    RetryExhausted { attempts: u32, last_error: String },
}

impl CryptError {
    /// Create a decryption error from any displayable reason
    pub fn decryption(reason: impl std::fmt::Display) -> Self {
        Self::Decryption(reason.to_string())
    }

    /// Check if this is a decryption error
    pub fn is_decryption(&self) -> bool {
        matches!(self, Self::Decryption(_))
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<std::io::Error> for CryptError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for CryptError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for msgcrypt operations
pub type CryptResult<T> = Result<T, CryptError>;
