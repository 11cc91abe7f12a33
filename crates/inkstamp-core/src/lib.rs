//! Inkstamp Core Library
//!
//! Capture controller for document signatures: typed text, freehand drawing,
//! or a traced image, reconciled into one outline that is optionally stored
//! and then handed to the host editor.

pub mod capture;
pub mod codec;
pub mod config;
pub mod description_editor;
pub mod dialog;
pub mod host;
pub mod launcher;
pub mod outline;
pub mod overlay;
pub mod scope;
pub mod storage;

#[cfg(test)]
pub(crate) mod testing;

use std::future::Future;
use std::pin::Pin;

/// Boxed future for collaborator calls (single-threaded, WASM compatible).
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

pub use capture::{CaptureError, DrawCapture, DropEffect, ImageCapture, PointerSample, Tab};
pub use codec::{CodecError, DeflateCodec, SignatureCodec};
pub use config::SignatureConfig;
pub use description_editor::DescriptionEditor;
pub use dialog::{CommitOutcome, DialogState, SignatureDialog};
pub use host::{Collaborators, ImageDecoder, ImageFile, Localizer, SignatureHost};
pub use launcher::{LauncherEntry, SignatureLauncher};
pub use outline::{OutlineExtractor, OutlineRecord, SignatureData, SignatureOutline};
pub use overlay::{DialogHandle, OverlayManager, OverlayStack};
pub use storage::{MemoryStore, SignatureStore, StorageError, StoredSignature};

#[cfg(not(target_arch = "wasm32"))]
pub use storage::FileStore;
