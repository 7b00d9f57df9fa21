use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
///
/// Persistence failure is never fatal: callers keep operating on their
/// in-memory snapshot and flag a degraded state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Fixed key namespace shared by every store.
pub mod keys {
    /// Opaque session token string.
    pub const AUTH_TOKEN: &str = "auth_token";
    /// Serialized authenticated identity.
    pub const USER_DATA: &str = "user_data";
    /// Serialized question catalog.
    pub const QUESTIONS: &str = "interview_questions";
    /// Serialized per-day progress series.
    pub const PROGRESS: &str = "user_progress";
}

/// Synchronous key→string durable store.
///
/// The adapter performs no transformation of content; callers own
/// encode/decode of the values they put through it.
pub trait KeyValueStore: Send + Sync {
    /// Fetch the value stored under `key`, `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Unavailable` if the backing store cannot be read.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Unavailable` if the value cannot be written.
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove the value stored under `key`; removing an absent key is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Unavailable` if the backing store cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// In-memory adapter for tests and prototyping.
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        Ok(guard.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        guard.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        guard.remove(key);
        Ok(())
    }
}

/// Durable adapter keeping one file per key under a root directory.
#[derive(Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open (and create if needed) a store rooted at `root`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Unavailable` if the directory cannot be created.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| StorageError::Unavailable(e.to_string()))?;
        Ok(Self { root })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        // Keys come from the fixed `keys` namespace, but sanitize anyway so an
        // arbitrary key can never escape the root directory.
        let file: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            })
            .collect();
        self.root.join(file)
    }
}

impl KeyValueStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Unavailable(e.to_string())),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::write(self.path_for(key), value).map_err(|e| {
            tracing::warn!(key, error = %e, "file store write failed");
            StorageError::Unavailable(e.to_string())
        })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Unavailable(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trips_values() {
        let store = MemoryStore::new();
        assert_eq!(store.read("user_progress").unwrap(), None);

        store.write("user_progress", "[]").unwrap();
        assert_eq!(store.read("user_progress").unwrap().as_deref(), Some("[]"));

        store.write("user_progress", "[1]").unwrap();
        assert_eq!(store.read("user_progress").unwrap().as_deref(), Some("[1]"));
    }

    #[test]
    fn memory_store_remove_is_idempotent() {
        let store = MemoryStore::new();
        store.write("auth_token", "t").unwrap();
        store.remove("auth_token").unwrap();
        store.remove("auth_token").unwrap();
        assert_eq!(store.read("auth_token").unwrap(), None);
    }

    #[test]
    fn file_store_sanitizes_hostile_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        store.write("../escape", "x").unwrap();
        assert_eq!(store.read("../escape").unwrap().as_deref(), Some("x"));
        // Nothing was written outside the root.
        assert!(!dir.path().parent().unwrap().join("escape").exists());
    }
}
