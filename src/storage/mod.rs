//! Key-value storage for client preferences
//!
//! Preferences survive restarts through a small JSON file; tests and
//! throwaway sessions use the in-memory store.

use directories::ProjectDirs;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Storage errors
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize storage data: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("storage lock poisoned")]
    Poisoned,
}

/// Minimal persistent string store
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Store backed by a JSON object on disk
///
/// The whole file is cached in memory and rewritten on every change.
pub struct FileStore {
    path: PathBuf,
    cache: RwLock<HashMap<String, String>>,
}

impl FileStore {
    /// Open the store at `path`, starting empty if the file is missing or unreadable
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let cache = load_map(&path);
        log::debug!("preference storage at {}", path.display());
        Self {
            path,
            cache: RwLock::new(cache),
        }
    }

    /// Default location in the platform config directory
    pub fn default_path() -> PathBuf {
        match ProjectDirs::from("com", "gamo", "gamo") {
            Some(dirs) => dirs.config_dir().join("preferences.json"),
            None => PathBuf::from("gamo_preferences.json"),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, map: &HashMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StorageError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let data = serde_json::to_string_pretty(map)?;
        fs::write(&self.path, data).map_err(|source| StorageError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

fn load_map(path: &Path) -> HashMap<String, String> {
    if !path.exists() {
        return HashMap::new();
    }
    match fs::read_to_string(path) {
        Ok(data) => serde_json::from_str(&data).unwrap_or_else(|e| {
            log::warn!("ignoring unparseable storage file {}: {}", path.display(), e);
            HashMap::new()
        }),
        Err(e) => {
            log::warn!("failed to read storage file {}: {}", path.display(), e);
            HashMap::new()
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.cache.read().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut cache = self.cache.write().map_err(|_| StorageError::Poisoned)?;
        cache.insert(key.to_string(), value.to_string());
        self.persist(&cache)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut cache = self.cache.write().map_err(|_| StorageError::Poisoned)?;
        if cache.remove(key).is_some() {
            self.persist(&cache)?;
        }
        Ok(())
    }
}

/// Non-persistent store
#[derive(Default)]
pub struct MemoryStore {
    map: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.map.read().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.map
            .write()
            .map_err(|_| StorageError::Poisoned)?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.map
            .write()
            .map_err(|_| StorageError::Poisoned)?
            .remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("prefs.json");

        let store = FileStore::open(&path);
        store.set("lang", "en").unwrap();
        drop(store);

        let reopened = FileStore::open(&path);
        assert_eq!(reopened.get("lang"), Some("en".to_string()));
    }

    #[test]
    fn file_store_starts_empty_on_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        fs::write(&path, b"invalid json data").unwrap();

        let store = FileStore::open(&path);
        assert_eq!(store.get("lang"), None);

        store.set("lang", "zh").unwrap();
        assert_eq!(FileStore::open(&path).get("lang"), Some("zh".to_string()));
    }

    #[test]
    fn file_store_remove() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        let store = FileStore::open(&path);
        store.set("lang", "en").unwrap();
        store.remove("lang").unwrap();
        assert_eq!(FileStore::open(&path).get("lang"), None);
    }

    #[test]
    fn memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert_eq!(store.get("k"), None);
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k"), Some("v".to_string()));
        store.remove("k").unwrap();
        assert_eq!(store.get("k"), None);
    }
}
