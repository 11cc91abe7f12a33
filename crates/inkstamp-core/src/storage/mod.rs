//! Persistent signature store.

mod memory;

#[cfg(not(target_arch = "wasm32"))]
mod file;

pub use memory::MemoryStore;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStore;

use crate::BoxFuture;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Signature not found: {0}")]
    NotFound(String),
    #[error("Signature store is full ({0} entries)")]
    Full(usize),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// A persisted signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSignature {
    pub description: String,
    /// Outline geometry as produced by a `SignatureCodec`.
    pub signature_data: String,
}

/// Trait for signature storage backends.
///
/// Records are addressed by a uuid the store assigns on creation.
/// The dialogs are single-threaded, so no `Send` bound is required.
pub trait SignatureStore {
    /// Persist a record and return its new uuid.
    fn create(&self, record: StoredSignature) -> BoxFuture<'_, StorageResult<String>>;

    /// Remove a record. Returns whether something was deleted.
    fn delete(&self, uuid: &str) -> BoxFuture<'_, StorageResult<bool>>;

    /// All records keyed by uuid.
    fn get_all(&self) -> BoxFuture<'_, StorageResult<BTreeMap<String, StoredSignature>>>;

    /// Whether the store has reached its capacity.
    fn is_full(&self) -> BoxFuture<'_, StorageResult<bool>>;
}
