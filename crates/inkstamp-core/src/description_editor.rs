//! Dialog for editing the description of a committed signature.

use crate::host::SignatureHost;
use crate::launcher::{SignatureLauncher, delete_signature};
use crate::outline::SignatureOutline;
use crate::overlay::{DialogHandle, OverlayError, OverlayManager};
use crate::storage::{SignatureStore, StorageResult};
use std::cell::RefCell;
use std::rc::Rc;

struct EditSession {
    target: Rc<dyn SignatureHost>,
    original: String,
    text: String,
    preview: Option<SignatureOutline>,
}

/// Edits the description of an existing signature.
pub struct DescriptionEditor {
    overlay: Rc<dyn OverlayManager>,
    session: Option<EditSession>,
}

impl DescriptionEditor {
    pub fn new(overlay: Rc<dyn OverlayManager>) -> Self {
        Self {
            overlay,
            session: None,
        }
    }

    /// Open for `target`, snapshotting its description and preview.
    pub fn open(&mut self, target: Rc<dyn SignatureHost>) -> Result<(), OverlayError> {
        self.overlay.open(DialogHandle::EditDescription)?;
        let original = target.description();
        let preview = target.signature_preview();
        self.session = Some(EditSession {
            text: original.clone(),
            original,
            preview,
            target,
        });
        Ok(())
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    pub fn text(&self) -> &str {
        self.session.as_ref().map_or("", |s| s.text.as_str())
    }

    /// Read-only outline of the edited signature.
    pub fn preview(&self) -> Option<&SignatureOutline> {
        self.session.as_ref().and_then(|s| s.preview.as_ref())
    }

    pub fn set_text(&mut self, text: &str) {
        if let Some(session) = self.session.as_mut() {
            session.text = text.to_string();
        }
    }

    pub fn clear_text(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.text.clear();
        }
    }

    pub fn can_clear(&self) -> bool {
        !self.text().is_empty()
    }

    /// Update is offered only once the text differs from the original.
    pub fn can_update(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.text != s.original)
    }

    /// Write a changed description to the target and close.
    pub fn update(&mut self) {
        if let Some(session) = self.session.as_ref() {
            if session.text != session.original {
                log::info!("Updating signature description");
                session.target.set_description(&session.text);
            }
        }
        self.close();
    }

    pub fn cancel(&mut self) {
        self.close();
    }

    /// Delete the stored record behind the edited signature, if it has one.
    pub async fn delete_stored(
        &self,
        store: &dyn SignatureStore,
        launcher: &RefCell<SignatureLauncher>,
    ) -> StorageResult<bool> {
        let Some(uuid) = self.session.as_ref().and_then(|s| s.target.uuid()) else {
            return Ok(false);
        };
        delete_signature(launcher, store, &uuid).await
    }

    fn close(&mut self) {
        if self.session.take().is_some() {
            if let Err(e) = self.overlay.close(DialogHandle::EditDescription) {
                log::warn!("{}", e);
            }
        }
    }
}
