//! Client-side key-value storage.
//!
//! Stores mirror their whole collection into a [`Storage`] under a fixed key,
//! the way a browser app mirrors state into local storage. Two backends ship:
//!
//! - [`MemoryStorage`] - shared in-process map, used by tests and embedders
//! - [`FileStorage`] - one `<key>.json` file per key in a data directory
//!
//! Reading a snapshot goes through [`load_or_default`], which never fails:
//! a missing or unparsable value comes back as [`Loaded::Missing`] or
//! [`Loaded::Corrupt`] and collapses to the default collection.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Storage key for the cart snapshot.
pub const CART_KEY: &str = "cart";

/// Storage key for the favorites snapshot.
pub const FAVORITES_KEY: &str = "favorites";

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("storage I/O error for key {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// Serializing a snapshot failed.
    #[error("failed to serialize snapshot for key {key}: {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// A synchronous string key-value store.
pub trait Storage {
    /// Read the raw value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing a missing key succeeds.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<T: Storage + ?Sized> Storage for &T {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

// =============================================================================
// Memory Backend
// =============================================================================

/// In-memory storage.
///
/// Clones share the same map, so two stores built from clones of one
/// `MemoryStorage` behave like two tabs on the same origin: last writer wins.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    inner: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStorage {
    /// Create an empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether no keys are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let map = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        Ok(map.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut map = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        map.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut map = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        map.remove(key);
        Ok(())
    }
}

// =============================================================================
// File Backend
// =============================================================================

/// File-backed storage: each key lives in `<dir>/<key>.json`.
///
/// The directory is created on first write.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Create a storage rooted at `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The data directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io {
                key: key.to_owned(),
                source,
            }),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let io_err = |source| StorageError::Io {
            key: key.to_owned(),
            source,
        };
        std::fs::create_dir_all(&self.dir).map_err(io_err)?;
        std::fs::write(self.path_for(key), value).map_err(io_err)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io {
                key: key.to_owned(),
                source,
            }),
        }
    }
}

// =============================================================================
// Snapshots
// =============================================================================

/// Outcome of reading a persisted snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Loaded<T> {
    /// The snapshot was present and parsed.
    Present(T),
    /// Nothing stored under the key.
    Missing,
    /// Something was stored but could not be read or parsed.
    Corrupt(String),
}

impl<T: Default> Loaded<T> {
    /// The parsed value, or `T::default()` when missing or corrupt.
    pub fn into_value(self) -> T {
        match self {
            Self::Present(value) => value,
            Self::Missing | Self::Corrupt(_) => T::default(),
        }
    }
}

/// Read and parse the JSON snapshot under `key`.
///
/// Never fails; see [`Loaded`]. Corrupt snapshots are logged.
pub fn load_or_default<T, S>(storage: &S, key: &str) -> Loaded<T>
where
    T: DeserializeOwned,
    S: Storage + ?Sized,
{
    let raw = match storage.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Loaded::Missing,
        Err(e) => {
            tracing::warn!(key, error = %e, "Failed to read snapshot, starting empty");
            return Loaded::Corrupt(e.to_string());
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Loaded::Present(value),
        Err(e) => {
            tracing::warn!(key, error = %e, "Discarding unparsable snapshot");
            Loaded::Corrupt(e.to_string())
        }
    }
}

/// Serialize `value` as JSON and write it under `key`.
///
/// # Errors
///
/// Returns `StorageError` if serialization or the write fails.
pub fn persist<T, S>(storage: &S, key: &str, value: &T) -> Result<(), StorageError>
where
    T: Serialize + ?Sized,
    S: Storage + ?Sized,
{
    let json = serde_json::to_string(value).map_err(|source| StorageError::Serialize {
        key: key.to_owned(),
        source,
    })?;
    storage.set(key, &json)
}
