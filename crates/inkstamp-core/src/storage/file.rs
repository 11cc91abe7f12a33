//! File-based signature store for native platforms.

use super::{SignatureStore, StorageError, StorageResult, StoredSignature};
use crate::BoxFuture;
use crate::config::{DEFAULT_MAX_STORED_SIGNATURES, SignatureConfig};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Stores each signature as a JSON file named after its uuid.
pub struct FileStore {
    base_path: PathBuf,
    capacity: usize,
}

impl FileStore {
    /// Create a store rooted at `base_path`, creating the directory if needed.
    pub fn new(base_path: PathBuf) -> StorageResult<Self> {
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(|e| {
                StorageError::Io(format!("Failed to create signature directory: {}", e))
            })?;
        }
        Ok(Self {
            base_path,
            capacity: DEFAULT_MAX_STORED_SIGNATURES,
        })
    }

    /// Create a store at `base_path` sized by `config.max_stored_signatures`.
    pub fn from_config(base_path: PathBuf, config: &SignatureConfig) -> StorageResult<Self> {
        Ok(Self::new(base_path)?.with_capacity(config.max_stored_signatures))
    }

    /// Store in the platform data directory.
    ///
    /// On Unix: `~/.local/share/inkstamp/signatures/`
    /// On Windows: `%LOCALAPPDATA%\inkstamp\signatures\`
    pub fn default_location() -> StorageResult<Self> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| StorageError::Io("Could not determine home directory".to_string()))?;

        Self::new(base.join("inkstamp").join("signatures"))
    }

    /// Limit the number of stored signatures.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn signature_path(&self, uuid: &str) -> PathBuf {
        let safe_id: String = uuid
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' { c } else { '_' })
            .collect();
        self.base_path.join(format!("{}.json", safe_id))
    }

    fn entries(&self) -> StorageResult<Vec<PathBuf>> {
        let entries = fs::read_dir(&self.base_path)
            .map_err(|e| StorageError::Io(format!("Failed to read directory: {}", e)))?;
        Ok(entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .collect())
    }
}

impl SignatureStore for FileStore {
    fn create(&self, record: StoredSignature) -> BoxFuture<'_, StorageResult<String>> {
        Box::pin(async move {
            if self.entries()?.len() >= self.capacity {
                return Err(StorageError::Full(self.capacity));
            }
            let uuid = Uuid::new_v4().to_string();
            let path = self.signature_path(&uuid);
            let json = serde_json::to_string(&record)
                .map_err(|e| StorageError::Serialization(e.to_string()))?;
            fs::write(&path, json).map_err(|e| {
                StorageError::Io(format!("Failed to write {}: {}", path.display(), e))
            })?;
            Ok(uuid)
        })
    }

    fn delete(&self, uuid: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let path = self.signature_path(uuid);
        Box::pin(async move {
            if !path.exists() {
                return Ok(false);
            }
            fs::remove_file(&path).map_err(|e| {
                StorageError::Io(format!("Failed to delete {}: {}", path.display(), e))
            })?;
            Ok(true)
        })
    }

    fn get_all(&self) -> BoxFuture<'_, StorageResult<BTreeMap<String, StoredSignature>>> {
        Box::pin(async move {
            let mut signatures = BTreeMap::new();
            for path in self.entries()? {
                let Some(uuid) = path.file_stem().and_then(|s| s.to_str()) else {
                    continue;
                };
                let json = fs::read_to_string(&path).map_err(|e| {
                    StorageError::Io(format!("Failed to read {}: {}", path.display(), e))
                })?;
                match serde_json::from_str::<StoredSignature>(&json) {
                    Ok(record) => {
                        signatures.insert(uuid.to_string(), record);
                    }
                    Err(e) => log::warn!("Skipping unreadable signature {}: {}", path.display(), e),
                }
            }
            Ok(signatures)
        })
    }

    fn is_full(&self) -> BoxFuture<'_, StorageResult<bool>> {
        Box::pin(async move { Ok(self.entries()?.len() >= self.capacity) })
    }
}
