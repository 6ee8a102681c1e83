//! Durable store adapter
//!
//! File-per-key JSON snapshots in a data directory. Writes go through a
//! temp file plus rename so a reader in another context never observes a
//! half-written snapshot. The adapter also keeps the last bytes it wrote
//! per key, which is how the sync watcher excludes this context's own
//! writes from re-application.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

use crate::error::{StorageError, StorageResult};
use crate::keys::StoreKey;

/// Snapshot-per-key durable store
#[derive(Debug, Clone)]
pub struct DurableStore {
    data_dir: PathBuf,
    last_written: Arc<Mutex<HashMap<StoreKey, Vec<u8>>>>,
}

impl DurableStore {
    /// Open a store rooted at `data_dir`, creating the directory if needed
    pub fn open(data_dir: impl Into<PathBuf>) -> StorageResult<Self> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir)?;
        Ok(Self {
            data_dir,
            last_written: Arc::new(Mutex::new(HashMap::new())),
        })
    }

    /// Directory holding the snapshot files
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn path_for(&self, key: StoreKey) -> PathBuf {
        self.data_dir.join(key.file_name())
    }

    /// Load the value stored under `key`.
    ///
    /// `Ok(None)` when no snapshot exists; `Err(Corrupt)` when one exists
    /// but cannot be parsed. Callers decide whether to fall back.
    pub fn try_load<T: DeserializeOwned>(&self, key: StoreKey) -> StorageResult<Option<T>> {
        let path = self.path_for(key);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        if bytes.is_empty() {
            return Ok(None);
        }
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| StorageError::corrupt(key.to_string(), e.to_string()))
    }

    /// Hydration path: absent or corrupt snapshots fall back to `default`.
    /// Corruption is recovered silently but logged.
    pub fn load_or_default<T: DeserializeOwned>(&self, key: StoreKey, default: T) -> T {
        match self.try_load(key) {
            Ok(Some(value)) => value,
            Ok(None) => default,
            Err(e) => {
                warn!("Recovering from corrupt snapshot for '{}': {}", key, e);
                default
            }
        }
    }

    /// Serialize and persist `value` under `key`
    pub fn save<T: Serialize>(&self, key: StoreKey, value: &T) -> StorageResult<()> {
        let bytes = serde_json::to_vec(value)?;
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");

        fs::write(&tmp, &bytes)?;
        fs::rename(&tmp, &path)?;
        debug!("Persisted snapshot '{}' ({} bytes)", key, bytes.len());

        self.last_written
            .lock()
            .expect("last_written lock poisoned")
            .insert(key, bytes);
        Ok(())
    }

    /// Delete the snapshot under `key`, if any
    pub fn remove(&self, key: StoreKey) -> StorageResult<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        self.last_written
            .lock()
            .expect("last_written lock poisoned")
            .remove(&key);
        debug!("Removed snapshot '{}'", key);
        Ok(())
    }

    /// Whether `bytes` is exactly the last content this context wrote for
    /// `key`. The sync watcher uses this to drop change notifications
    /// caused by our own writes.
    pub fn was_own_write(&self, key: StoreKey, bytes: &[u8]) -> bool {
        self.last_written
            .lock()
            .expect("last_written lock poisoned")
            .get(&key)
            .map(|last| last.as_slice() == bytes)
            .unwrap_or(false)
    }

    /// Raw snapshot bytes for `key`, if the file exists
    pub fn read_raw(&self, key: StoreKey) -> StorageResult<Option<Vec<u8>>> {
        match fs::read(self.path_for(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insightflow_core::Institution;

    fn store() -> (tempfile::TempDir, DurableStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = DurableStore::open(dir.path()).unwrap();
        (dir, store)
    }

    fn institution(id: &str) -> Institution {
        Institution {
            id: id.to_string(),
            name: "Grand Azure Hotels".to_string(),
            logo_url: "https://example.com/logo.png".to_string(),
            primary_color: "#0f766e".to_string(),
            secondary_color: "#f0fdfa".to_string(),
            created_at: insightflow_core::now_iso(),
        }
    }

    #[test]
    fn test_save_and_try_load_round_trip() {
        let (_dir, store) = store();
        let insts = vec![institution("inst-1"), institution("inst-2")];
        store.save(StoreKey::Institutions, &insts).unwrap();

        let loaded: Vec<Institution> = store.try_load(StoreKey::Institutions).unwrap().unwrap();
        assert_eq!(loaded, insts);
    }

    #[test]
    fn test_try_load_absent_is_none() {
        let (_dir, store) = store();
        let loaded: Option<Vec<Institution>> = store.try_load(StoreKey::Forms).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_try_load_corrupt_is_err() {
        let (dir, store) = store();
        fs::write(dir.path().join("forms.json"), b"{not json").unwrap();
        let result: StorageResult<Option<Vec<Institution>>> = store.try_load(StoreKey::Forms);
        assert!(matches!(result, Err(StorageError::Corrupt { .. })));
    }

    #[test]
    fn test_load_or_default_recovers_from_corruption() {
        let (dir, store) = store();
        fs::write(dir.path().join("institutions.json"), b"][").unwrap();
        let loaded: Vec<Institution> =
            store.load_or_default(StoreKey::Institutions, vec![institution("inst-1")]);
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, "inst-1");
    }

    #[test]
    fn test_remove_is_idempotent() {
        let (_dir, store) = store();
        store.save(StoreKey::Session, &institution("inst-1")).unwrap();
        store.remove(StoreKey::Session).unwrap();
        store.remove(StoreKey::Session).unwrap();
        let loaded: Option<Institution> = store.try_load(StoreKey::Session).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_own_write_detection() {
        let (_dir, store) = store();
        let insts = vec![institution("inst-1")];
        store.save(StoreKey::Institutions, &insts).unwrap();

        let bytes = store.read_raw(StoreKey::Institutions).unwrap().unwrap();
        assert!(store.was_own_write(StoreKey::Institutions, &bytes));
        assert!(!store.was_own_write(StoreKey::Institutions, b"[]"));
        // a different key never matches
        assert!(!store.was_own_write(StoreKey::Forms, &bytes));
    }

    #[test]
    fn test_no_tmp_file_left_behind() {
        let (dir, store) = store();
        store
            .save(StoreKey::Responses, &Vec::<Institution>::new())
            .unwrap();
        assert!(!dir.path().join("responses.json.tmp").exists());
        assert!(dir.path().join("responses.json").exists());
    }
}
