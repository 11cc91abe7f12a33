//! Modal dialog overlay.

use std::cell::Cell;
use thiserror::Error;

/// Dialogs that can be shown in the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DialogHandle {
    /// The add-signature dialog.
    Signature,
    /// The edit-description dialog.
    EditDescription,
}

/// Overlay errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OverlayError {
    #[error("Another dialog is already open: {0:?}")]
    AlreadyOpen(DialogHandle),
    #[error("Dialog is not the active one: {0:?}")]
    NotActive(DialogHandle),
}

/// Shows and hides modal dialogs.
pub trait OverlayManager {
    fn open(&self, dialog: DialogHandle) -> Result<(), OverlayError>;

    fn close(&self, dialog: DialogHandle) -> Result<(), OverlayError>;

    fn active(&self) -> Option<DialogHandle>;
}

/// Overlay manager allowing a single active dialog.
#[derive(Debug, Default)]
pub struct OverlayStack {
    active: Cell<Option<DialogHandle>>,
}

impl OverlayStack {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OverlayManager for OverlayStack {
    fn open(&self, dialog: DialogHandle) -> Result<(), OverlayError> {
        if let Some(current) = self.active.get() {
            return Err(OverlayError::AlreadyOpen(current));
        }
        self.active.set(Some(dialog));
        Ok(())
    }

    fn close(&self, dialog: DialogHandle) -> Result<(), OverlayError> {
        if self.active.get() != Some(dialog) {
            return Err(OverlayError::NotActive(dialog));
        }
        self.active.set(None);
        Ok(())
    }

    fn active(&self) -> Option<DialogHandle> {
        self.active.get()
    }
}
