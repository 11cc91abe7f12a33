//! In-memory signature store.

use super::{SignatureStore, StorageError, StorageResult, StoredSignature};
use crate::BoxFuture;
use crate::config::{DEFAULT_MAX_STORED_SIGNATURES, SignatureConfig};
use std::collections::BTreeMap;
use std::sync::RwLock;
use uuid::Uuid;

/// In-memory store for testing and ephemeral sessions.
pub struct MemoryStore {
    signatures: RwLock<BTreeMap<String, StoredSignature>>,
    capacity: usize,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_MAX_STORED_SIGNATURES)
    }
}

impl MemoryStore {
    /// Create an empty store with the default capacity.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store holding at most `capacity` signatures.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            signatures: RwLock::new(BTreeMap::new()),
            capacity,
        }
    }

    /// Create an empty store sized by `config.max_stored_signatures`.
    pub fn from_config(config: &SignatureConfig) -> Self {
        Self::with_capacity(config.max_stored_signatures)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of stored signatures.
    pub fn len(&self) -> usize {
        self.signatures.read().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn lock_error(e: impl std::fmt::Display) -> StorageError {
    StorageError::Other(format!("Lock error: {}", e))
}

impl SignatureStore for MemoryStore {
    fn create(&self, record: StoredSignature) -> BoxFuture<'_, StorageResult<String>> {
        Box::pin(async move {
            let mut signatures = self.signatures.write().map_err(lock_error)?;
            if signatures.len() >= self.capacity {
                return Err(StorageError::Full(self.capacity));
            }
            let uuid = Uuid::new_v4().to_string();
            signatures.insert(uuid.clone(), record);
            Ok(uuid)
        })
    }

    fn delete(&self, uuid: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let uuid = uuid.to_string();
        Box::pin(async move {
            let mut signatures = self.signatures.write().map_err(lock_error)?;
            Ok(signatures.remove(&uuid).is_some())
        })
    }

    fn get_all(&self) -> BoxFuture<'_, StorageResult<BTreeMap<String, StoredSignature>>> {
        Box::pin(async move {
            let signatures = self.signatures.read().map_err(lock_error)?;
            Ok(signatures.clone())
        })
    }

    fn is_full(&self) -> BoxFuture<'_, StorageResult<bool>> {
        Box::pin(async move {
            let signatures = self.signatures.read().map_err(lock_error)?;
            Ok(signatures.len() >= self.capacity)
        })
    }
}
