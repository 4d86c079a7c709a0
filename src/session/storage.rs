//! Durable key/value storage for the session
//!
//! The store only needs string get/set/remove under fixed keys, so storage is
//! a small trait. [`FileStorage`] keeps the map in a private YAML file next to
//! the CLI configuration.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::config::write_private;
use crate::error::{Result, SessionError};

/// Key under which the bearer credential is stored
pub const TOKEN_KEY: &str = "authToken";

/// Key under which the serialized identity is stored
pub const IDENTITY_KEY: &str = "authUser";

/// String key/value storage that survives process restarts.
pub trait SessionStorage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a key. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

/// YAML-file backed storage
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let contents = std::fs::read_to_string(&self.path)?;
        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_yaml::from_str(&contents).map_err(|e| {
            SessionError::Storage(format!("{}: {}", self.path.display(), e)).into()
        })
    }

    fn write_map(&self, map: &BTreeMap<String, String>) -> Result<()> {
        if map.is_empty() {
            if self.path.exists() {
                std::fs::remove_file(&self.path)?;
            }
            return Ok(());
        }

        let contents =
            serde_yaml::to_string(map).map_err(|e| SessionError::Storage(e.to_string()))?;
        write_private(&self.path, &contents)
    }
}

impl SessionStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_map()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        // An unreadable file is replaced rather than blocking a fresh login
        let mut map = self.read_map().unwrap_or_default();
        map.insert(key.to_string(), value.to_string());
        self.write_map(&map)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut map = match self.read_map() {
            Ok(map) => map,
            Err(_) => {
                // Corrupt file: dropping it is the only way to remove the key
                if self.path.exists() {
                    std::fs::remove_file(&self.path)?;
                }
                return Ok(());
            }
        };
        if map.remove(key).is_some() {
            self.write_map(&map)?;
        }
        Ok(())
    }
}

/// In-memory storage for tests
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: std::sync::Mutex<BTreeMap<String, String>>,
}

#[cfg(test)]
impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(self, key: &str, value: &str) -> Self {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().unwrap().is_empty()
    }
}

#[cfg(test)]
impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_file_storage_roundtrip() {
        let temp = tempdir().unwrap();
        let storage = FileStorage::new(temp.path().join("session.yaml"));

        assert_eq!(storage.get(TOKEN_KEY).unwrap(), None);

        storage.set(TOKEN_KEY, "abc.def.ghi").unwrap();
        storage.set(IDENTITY_KEY, r#"{"id":1}"#).unwrap();

        assert_eq!(storage.get(TOKEN_KEY).unwrap().as_deref(), Some("abc.def.ghi"));
        assert_eq!(storage.get(IDENTITY_KEY).unwrap().as_deref(), Some(r#"{"id":1}"#));
    }

    #[test]
    fn test_file_storage_persists_across_instances() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("session.yaml");

        FileStorage::new(&path).set(TOKEN_KEY, "persisted").unwrap();

        let reopened = FileStorage::new(&path);
        assert_eq!(reopened.get(TOKEN_KEY).unwrap().as_deref(), Some("persisted"));
    }

    #[test]
    fn test_file_storage_deletes_file_when_empty() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("session.yaml");
        let storage = FileStorage::new(&path);

        storage.set(TOKEN_KEY, "t").unwrap();
        assert!(path.exists());

        storage.remove(TOKEN_KEY).unwrap();
        assert!(!path.exists());

        // Removing again is fine
        storage.remove(TOKEN_KEY).unwrap();
    }

    #[test]
    fn test_file_storage_corrupt_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("session.yaml");
        std::fs::write(&path, "[not: a map").unwrap();
        let storage = FileStorage::new(&path);

        assert!(storage.get(TOKEN_KEY).is_err());

        storage.remove(TOKEN_KEY).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_memory_storage() {
        let storage = MemoryStorage::new().with_entry(TOKEN_KEY, "t");
        assert_eq!(storage.get(TOKEN_KEY).unwrap().as_deref(), Some("t"));
        storage.remove(TOKEN_KEY).unwrap();
        assert!(storage.is_empty());
    }
}
