//! Collaborators supplied by the embedding application.

use crate::BoxFuture;
use crate::codec::SignatureCodec;
use crate::launcher::SignatureLauncher;
use crate::outline::{OutlineExtractor, SignatureData, SignatureOutline};
use crate::overlay::OverlayManager;
use crate::storage::SignatureStore;
use std::cell::RefCell;
use std::rc::Rc;
use thiserror::Error;

/// The document-side signature editor a dialog works for.
///
/// Methods take `&self`; hosts use interior mutability as they see fit.
pub trait SignatureHost {
    /// Outline extraction for this editor.
    fn outlines(&self) -> &dyn OutlineExtractor;

    /// Materialize a signature on the document.
    fn add_signature(&self, data: SignatureData, height: f64, description: &str, uuid: Option<&str>);

    /// Drop the editor when the dialog ends without a signature.
    fn discard(&self);

    fn description(&self) -> String;

    fn set_description(&self, description: &str);

    /// Outline of an already committed signature.
    fn signature_preview(&self) -> Option<SignatureOutline>;

    /// Store id of a committed signature, if it was saved.
    fn uuid(&self) -> Option<String>;
}

/// Localized string lookup.
pub trait Localizer {
    fn get<'a>(&'a self, key: &'a str) -> BoxFuture<'a, String>;
}

/// A file picked or dropped on the image tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub name: String,
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            bytes,
        }
    }
}

/// Decoded RGBA8 image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// Image decoding failure.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Failed to decode {name}: {reason}")]
pub struct DecodeError {
    pub name: String,
    pub reason: String,
}

/// Bitmap loader for image files.
pub trait ImageDecoder {
    fn decode<'a>(&'a self, file: &'a ImageFile) -> BoxFuture<'a, Result<Bitmap, DecodeError>>;
}

/// Everything a signature dialog talks to besides its host editor.
#[derive(Clone)]
pub struct Collaborators {
    pub store: Rc<dyn SignatureStore>,
    pub codec: Rc<dyn SignatureCodec>,
    pub localizer: Rc<dyn Localizer>,
    pub decoder: Rc<dyn ImageDecoder>,
    pub overlay: Rc<dyn OverlayManager>,
    /// Toolbar entries for stored signatures.
    pub launcher: Rc<RefCell<SignatureLauncher>>,
}
