//! Client-side key-value persistence for favorites.
//!
//! [`KeyValueStore`] abstracts a local string store (one value per key).
//! [`FavoritesStore`] layers the favorites policy on top of it: loading never
//! fails and saving never surfaces an error. The in-memory collection is
//! authoritative for the session even when the backing store misbehaves.

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::favorites::FavoritesCollection;

/// Key under which the favorites array is stored.
pub const FAVORITES_KEY: &str = "movie_explorer_favorites_v1";

/// Errors from a [`KeyValueStore`] backend.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Storage I/O failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("Data serialization failure: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage quota exceeded: {needed} bytes needed, {limit} allowed")]
    QuotaExceeded { needed: usize, limit: usize },

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),
}

/// A local string store keyed by name.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

// ---------------------------------------------------------------------------
// Backends
// ---------------------------------------------------------------------------

/// Process-local store with an optional byte quota across all values.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
    quota_bytes: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that rejects writes once the total stored size would exceed
    /// `quota_bytes`.
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            values: Mutex::default(),
            quota_bytes: Some(quota_bytes),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // A poisoned map is still a valid map.
        self.values.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut values = self.lock();
        if let Some(limit) = self.quota_bytes {
            let others: usize = values
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let needed = others + key.len() + value.len();
            if needed > limit {
                return Err(StorageError::QuotaExceeded { needed, limit });
            }
        }
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Directory-backed store: each key is a `<key>.json` file.
///
/// Writes go to a temporary sibling first and are renamed into place, so a
/// crash mid-write leaves the previous value intact.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Open (and create if needed) the store directory.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let tmp = path.with_extension("json.tmp");
        {
            let mut file = std::fs::File::create(&tmp)?;
            file.write_all(value.as_bytes())?;
            file.sync_all()?;
        }
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }
}

/// Store used by the interactive client: a [`JsonFileStore`] when its
/// directory is usable, otherwise a session-only [`MemoryStore`].
#[derive(Debug)]
pub enum LocalStore {
    File(JsonFileStore),
    Memory(MemoryStore),
}

impl LocalStore {
    /// Open a file store at `dir`, falling back to memory if the directory
    /// cannot be created. Never fails.
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        match JsonFileStore::open(&dir) {
            Ok(store) => LocalStore::File(store),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    dir = %dir.display(),
                    "Favorites directory unusable; favorites will not outlive this session"
                );
                LocalStore::Memory(MemoryStore::new())
            }
        }
    }

    pub fn is_persistent(&self) -> bool {
        matches!(self, LocalStore::File(_))
    }
}

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match self {
            LocalStore::File(store) => store.get(key),
            LocalStore::Memory(store) => store.get(key),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        match self {
            LocalStore::File(store) => store.set(key, value),
            LocalStore::Memory(store) => store.set(key, value),
        }
    }
}

// ---------------------------------------------------------------------------
// Favorites policy
// ---------------------------------------------------------------------------

/// Loads and saves the favorites collection under [`FAVORITES_KEY`].
#[derive(Debug)]
pub struct FavoritesStore<S> {
    backend: S,
}

impl<S: KeyValueStore> FavoritesStore<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// Read the stored favorites.
    ///
    /// A missing value, a read failure, or anything that is not a JSON array
    /// of well-formed entries yields an empty collection.
    pub fn load(&self) -> FavoritesCollection {
        let raw = match self.backend.get(FAVORITES_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return FavoritesCollection::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read stored favorites");
                return FavoritesCollection::new();
            }
        };

        match serde_json::from_str::<FavoritesCollection>(&raw) {
            Ok(favorites) => {
                tracing::debug!(count = favorites.len(), "Loaded stored favorites");
                favorites
            }
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring malformed stored favorites");
                FavoritesCollection::new()
            }
        }
    }

    /// Write the full collection. Failures are logged and swallowed.
    pub fn save(&self, favorites: &FavoritesCollection) {
        if let Err(e) = self.try_save(favorites) {
            tracing::warn!(error = %e, count = favorites.len(), "Failed to persist favorites");
        }
    }

    /// Write the full collection, returning any backend failure.
    pub fn try_save(&self, favorites: &FavoritesCollection) -> Result<(), StorageError> {
        let raw = serde_json::to_string(favorites)?;
        self.backend.set(FAVORITES_KEY, &raw)
    }
}
