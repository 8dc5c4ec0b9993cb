//! Error types for zerod client operations.
//!
//! Only two kinds of failure ever reach a caller of
//! [`ApiClient::send`](crate::ApiClient::send): a response that arrived with a
//! success status but could not be decrypted or parsed, and configuration
//! mistakes caught while building the client. Everything else is folded into
//! the generic error payload by the client itself.

use std::fmt;

use crate::cipher::CipherError;
use crate::storage::StorageError;

/// Error codes for logging integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ZerodErrorCode {
    /// Transport/network layer error
    Transport = 2000,
    /// Server answered with a non-success status
    HttpStatus = 2001,
    /// Invalid client configuration
    InvalidConfig = 4000,
    /// Serialization error
    Serialization = 5002,
    /// Encryption or decryption failure
    Cipher = 6000,
    /// Storage error
    Storage = 7000,
}

/// Error type for zerod client operations.
#[derive(Debug)]
pub enum ZerodError {
    /// Transport/network layer error.
    Transport(String),

    /// The server answered with a non-success HTTP status.
    HttpStatus {
        /// HTTP status code
        status: u16,
        /// Raw response body, kept for diagnostics
        body: String,
    },

    /// Client configuration is unusable.
    InvalidConfig {
        /// Offending configuration field
        field: String,
        /// Reason for rejection
        reason: String,
    },

    /// Serialization/deserialization error.
    Serialization(String),

    /// Payload encryption or decryption failed.
    Cipher(CipherError),

    /// Persistent storage operation failed.
    Storage(StorageError),
}

impl ZerodError {
    /// Get the error code for logging integration.
    pub fn code(&self) -> ZerodErrorCode {
        match self {
            Self::Transport(_) => ZerodErrorCode::Transport,
            Self::HttpStatus { .. } => ZerodErrorCode::HttpStatus,
            Self::InvalidConfig { .. } => ZerodErrorCode::InvalidConfig,
            Self::Serialization(_) => ZerodErrorCode::Serialization,
            Self::Cipher(_) => ZerodErrorCode::Cipher,
            Self::Storage(_) => ZerodErrorCode::Storage,
        }
    }

    /// Returns true for failures the client recovers from locally by
    /// resolving with the generic error payload.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::HttpStatus { .. } | Self::Storage(_)
        )
    }

    /// Create a transport error from any error type.
    pub fn transport<E: std::error::Error>(err: E) -> Self {
        Self::Transport(err.to_string())
    }

    /// Create an invalid configuration error.
    pub fn invalid_config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ZerodError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(msg) => write!(f, "transport error: {}", msg),
            Self::HttpStatus { status, .. } => write!(f, "request failed with status {}", status),
            Self::InvalidConfig { field, reason } => {
                write!(f, "invalid configuration {}: {}", field, reason)
            }
            Self::Serialization(msg) => write!(f, "serialization error: {}", msg),
            Self::Cipher(err) => write!(f, "cipher error: {}", err),
            Self::Storage(err) => write!(f, "storage error: {}", err),
        }
    }
}

impl std::error::Error for ZerodError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Cipher(err) => Some(err),
            Self::Storage(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ZerodError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<CipherError> for ZerodError {
    fn from(err: CipherError) -> Self {
        Self::Cipher(err)
    }
}

impl From<StorageError> for ZerodError {
    fn from(err: StorageError) -> Self {
        Self::Storage(err)
    }
}
