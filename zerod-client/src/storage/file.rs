//! File-backed key/value storage.
//!
//! All keys live in a single JSON object on disk. The file is re-read on
//! every access so that separate processes sharing a profile directory see
//! each other's writes.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::traits::{KeyValueStorage, StorageError, StorageErrorCode, StorageResult};

/// Default file name used inside a profile directory.
pub const DEFAULT_FILE_NAME: &str = "storage.json";

type Entries = BTreeMap<String, String>;

/// JSON-file implementation of [`KeyValueStorage`].
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process
    guard: Mutex<()>,
}

impl FileStorage {
    /// Create a store backed by the file at `path`.
    ///
    /// The file and its parent directories are created on first write.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            guard: Mutex::new(()),
        }
    }

    /// Create a store backed by [`DEFAULT_FILE_NAME`] inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(DEFAULT_FILE_NAME))
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> StorageResult<Entries> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(Entries::new()),
            Ok(contents) => serde_json::from_str(&contents).map_err(|e| {
                StorageError::corrupt(format!(
                    "failed to parse {}: {}",
                    self.path.display(),
                    e
                ))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Entries::new()),
            Err(e) => Err(StorageError::read_failed(format!(
                "failed to read {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    fn save(&self, entries: &Entries) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                StorageError::write_failed(format!(
                    "failed to create {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
        let json = serde_json::to_string_pretty(entries)
            .map_err(|e| StorageError::new(StorageErrorCode::Internal, e.to_string()))?;
        std::fs::write(&self.path, json).map_err(|e| {
            StorageError::write_failed(format!("failed to write {}: {}", self.path.display(), e))
        })
    }

    fn locked<T>(&self, op: impl FnOnce() -> StorageResult<T>) -> StorageResult<T> {
        let _lock = self.guard.lock().map_err(|_| {
            StorageError::new(StorageErrorCode::Internal, "FileStorage: lock poisoned")
        })?;
        op()
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        self.locked(|| Ok(self.load()?.get(key).cloned()))
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.locked(|| {
            let mut entries = self.load()?;
            entries.insert(key.to_string(), value.to_string());
            self.save(&entries)
        })
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.locked(|| {
            let mut entries = self.load()?;
            if entries.remove(key).is_some() {
                self.save(&entries)?;
            }
            Ok(())
        })
    }

    fn clear(&self) -> StorageResult<()> {
        self.locked(|| self.save(&Entries::new()))
    }

    fn get_or_insert_with(
        &self,
        key: &str,
        init: &mut dyn FnMut() -> String,
    ) -> StorageResult<String> {
        self.locked(|| {
            let mut entries = self.load()?;
            if let Some(existing) = entries.get(key).filter(|v| !v.is_empty()) {
                return Ok(existing.clone());
            }
            let value = init();
            entries.insert(key.to_string(), value.clone());
            self.save(&entries)?;
            Ok(value)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_reads_as_empty() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::in_dir(dir.path());
        assert_eq!(storage.get("deviceId").unwrap(), None);
        assert!(!storage.path().exists());
    }

    #[test]
    fn test_values_persist_across_instances() {
        let dir = TempDir::new().unwrap();

        let first = FileStorage::in_dir(dir.path().join("profile"));
        first.set("deviceId", "persisted").unwrap();

        let second = FileStorage::in_dir(dir.path().join("profile"));
        assert_eq!(second.get("deviceId").unwrap(), Some("persisted".into()));
    }

    #[test]
    fn test_remove_and_clear() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::in_dir(dir.path());

        storage.set("accessToken", "tok").unwrap();
        storage.set("id", "42").unwrap();
        storage.remove("accessToken").unwrap();
        assert_eq!(storage.get("accessToken").unwrap(), None);
        assert_eq!(storage.get("id").unwrap(), Some("42".into()));

        storage.clear().unwrap();
        assert_eq!(storage.get("id").unwrap(), None);
    }

    #[test]
    fn test_concurrent_get_or_insert_with_writes_once() {
        use std::sync::{Arc, Barrier};

        let dir = TempDir::new().unwrap();
        let storage = Arc::new(FileStorage::in_dir(dir.path()));
        let barrier = Arc::new(Barrier::new(4));

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let storage = storage.clone();
                let barrier = barrier.clone();
                std::thread::spawn(move || {
                    barrier.wait();
                    storage
                        .get_or_insert_with("deviceId", &mut || format!("device-{}", i))
                        .unwrap()
                })
            })
            .collect();

        let values: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(values.iter().all(|v| v == &values[0]));
        assert_eq!(storage.get("deviceId").unwrap(), Some(values[0].clone()));
    }

    #[test]
    fn test_corrupt_file_is_reported() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::in_dir(dir.path());
        std::fs::write(storage.path(), "not json").unwrap();

        let err = storage.get("deviceId").unwrap_err();
        assert_eq!(err.code, StorageErrorCode::Corrupt);
    }
}
