//! Core traits for client-side persistent storage.

use std::fmt;

/// Error codes for storage operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum StorageErrorCode {
    /// Backing store could not be read
    ReadFailed = 1000,
    /// Backing store could not be written
    WriteFailed = 2000,
    /// Stored data is corrupt or unparseable
    Corrupt = 3000,
    /// Internal error (e.g. poisoned lock)
    Internal = 9999,
}

/// Error type for storage operations.
#[derive(Debug)]
pub struct StorageError {
    /// Error code for logging integration
    pub code: StorageErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Storage key related to the error (if applicable)
    pub key: Option<String>,
}

impl StorageError {
    /// Create a new error.
    pub fn new(code: StorageErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            key: None,
        }
    }

    /// Create a new error with the associated storage key.
    pub fn with_key(
        code: StorageErrorCode,
        message: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            key: Some(key.into()),
        }
    }

    /// Create a "read failed" error.
    pub fn read_failed(reason: impl Into<String>) -> Self {
        Self::new(StorageErrorCode::ReadFailed, reason)
    }

    /// Create a "write failed" error.
    pub fn write_failed(reason: impl Into<String>) -> Self {
        Self::new(StorageErrorCode::WriteFailed, reason)
    }

    /// Create a "corrupt" error.
    pub fn corrupt(reason: impl Into<String>) -> Self {
        Self::new(StorageErrorCode::Corrupt, reason)
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(key) = &self.key {
            write!(f, "{} (key: {})", self.message, key)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

impl std::error::Error for StorageError {}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Synchronous string key/value store, the shape of browser `localStorage`.
///
/// Single calls are atomic. [`KeyValueStorage::get_or_insert_with`] is the
/// only compound operation, and implementations that can be shared across
/// threads override it so the read and the write happen under one lock.
pub trait KeyValueStorage: Send + Sync {
    /// Read the value stored under `key`.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> StorageResult<()>;

    /// Remove every stored key.
    fn clear(&self) -> StorageResult<()>;

    /// Return the non-empty value under `key`, or store and return `init()`
    /// when the key is missing or empty.
    ///
    /// The default implementation reads and writes separately. Backends
    /// shared between threads override it to run both under one lock.
    fn get_or_insert_with(
        &self,
        key: &str,
        init: &mut dyn FnMut() -> String,
    ) -> StorageResult<String> {
        if let Some(existing) = self.get(key)?.filter(|v| !v.is_empty()) {
            return Ok(existing);
        }
        let value = init();
        self.set(key, &value)?;
        Ok(value)
    }
}

/// Extension trait for convenience methods.
pub trait KeyValueStorageExt: KeyValueStorage {
    /// Read `key`, treating an empty string the same as a missing key.
    fn get_non_empty(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.get(key)?.filter(|v| !v.is_empty()))
    }
}

// Blanket implementation
impl<T: KeyValueStorage + ?Sized> KeyValueStorageExt for T {}
