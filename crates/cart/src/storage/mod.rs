//! String-keyed key-value persistence for cart snapshots.
//!
//! [`KeyValueStore`] mirrors browser local storage: string keys, string
//! values, whole-value reads and writes.
//!
//! - [`FileStore`] keeps one file per key inside a directory
//! - [`MemoryStore`] keeps values in a map, for tests and ephemeral sessions

mod file;

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::RwLock;

pub use file::FileStore;

/// Errors that can occur when reading or writing the store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The key cannot be stored.
    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),
}

/// A string-keyed key-value store.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>, StorageError>> + Send;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> impl Future<Output = Result<(), StorageError>> + Send;
}

impl<T: KeyValueStore> KeyValueStore for Arc<T> {
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>, StorageError>> + Send {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> impl Future<Output = Result<(), StorageError>> + Send {
        (**self).set(key, value)
    }
}

/// In-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-populated with one value.
    #[must_use]
    pub fn with_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut values = HashMap::new();
        values.insert(key.into(), value.into());
        Self {
            values: RwLock::new(values),
        }
    }
}

impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
