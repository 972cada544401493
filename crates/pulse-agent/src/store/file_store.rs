use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use pulse_core::errors::PersistenceError;
use pulse_core::IStateStore;

/// File-backed state store: one JSON object mapping keys to string values.
///
/// Writes go through a temp file and rename so a crash mid-write cannot
/// corrupt the previous state. Lives next to the host's other state; one
/// file per pipeline instance.
pub struct FileStateStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl FileStateStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<BTreeMap<String, String>, PersistenceError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => {
                return Err(PersistenceError::ReadFailed {
                    key: self.path.display().to_string(),
                    reason: e.to_string(),
                })
            }
        };
        serde_json::from_str(&raw).map_err(|e| PersistenceError::Corrupt {
            key: self.path.display().to_string(),
            reason: e.to_string(),
        })
    }

    fn write_map(&self, map: &BTreeMap<String, String>) -> Result<(), PersistenceError> {
        let write_failed = |reason: String| PersistenceError::WriteFailed {
            key: self.path.display().to_string(),
            reason,
        };
        let raw = serde_json::to_string(map).map_err(|e| write_failed(e.to_string()))?;
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, raw).map_err(|e| write_failed(e.to_string()))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| write_failed(e.to_string()))
    }
}

impl IStateStore for FileStateStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        Ok(self.read_map()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut map = self.read_map()?;
        map.insert(key.to_string(), value.to_string());
        self.write_map(&map)
    }

    fn remove(&self, key: &str) -> Result<(), PersistenceError> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut map = self.read_map()?;
        if map.remove(key).is_some() {
            self.write_map(&map)?;
        }
        Ok(())
    }
}
