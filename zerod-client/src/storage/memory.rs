//! In-memory key/value storage.
//!
//! Used in tests and for one-shot processes that should not persist a
//! device identifier. Lock poisoning is reported as a storage error rather
//! than a panic.

use std::collections::HashMap;
use std::sync::RwLock;

use super::traits::{KeyValueStorage, StorageError, StorageErrorCode, StorageResult};

/// In-memory implementation of [`KeyValueStorage`].
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

fn lock_error(context: &str) -> StorageError {
    StorageError::new(
        StorageErrorCode::Internal,
        format!("InMemoryStorage: lock poisoned during {}", context),
    )
}

impl InMemoryStorage {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `entries`.
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: RwLock::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    /// Number of stored keys. Returns 0 if the lock is poisoned.
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    /// Check if the store is empty. Returns true if the lock is poisoned.
    pub fn is_empty(&self) -> bool {
        self.entries.read().map(|e| e.is_empty()).unwrap_or(true)
    }
}

impl KeyValueStorage for InMemoryStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let entries = self.entries.read().map_err(|_| lock_error("get"))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut entries = self.entries.write().map_err(|_| lock_error("set"))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let mut entries = self.entries.write().map_err(|_| lock_error("remove"))?;
        entries.remove(key);
        Ok(())
    }

    fn clear(&self) -> StorageResult<()> {
        let mut entries = self.entries.write().map_err(|_| lock_error("clear"))?;
        entries.clear();
        Ok(())
    }

    fn get_or_insert_with(
        &self,
        key: &str,
        init: &mut dyn FnMut() -> String,
    ) -> StorageResult<String> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| lock_error("get_or_insert_with"))?;
        match entries.get(key) {
            Some(existing) if !existing.is_empty() => Ok(existing.clone()),
            _ => {
                let value = init();
                entries.insert(key.to_string(), value.clone());
                Ok(value)
            }
        }
    }
}
