//! Image-traced signature capture.

use super::CaptureError;
use crate::config::SignatureConfig;
use crate::host::{DecodeError, ImageDecoder, ImageFile, SignatureHost};
use crate::outline::SignatureData;
use crate::scope::AbortToken;
use std::rc::Rc;

/// A successfully traced image.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageCapture {
    pub data: SignatureData,
    pub file_name: String,
}

/// Drop effect reported while dragging over the image tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropEffect {
    Copy,
    Move,
    None,
}

/// One item of a drag payload, as far as its type is known during drag-over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragItem {
    pub media_type: String,
}

impl DragItem {
    pub fn new(media_type: impl Into<String>) -> Self {
        Self {
            media_type: media_type.into(),
        }
    }
}

/// Effect for a drag-over: the first supported item decides.
pub fn drop_effect(config: &SignatureConfig, items: &[DragItem], copy_allowed: bool) -> DropEffect {
    if !items
        .iter()
        .any(|item| config.is_supported_image_type(&item.media_type))
    {
        return DropEffect::None;
    }
    if copy_allowed {
        DropEffect::Copy
    } else {
        DropEffect::Move
    }
}

/// Pick the file to trace from a picker selection or a drop payload.
///
/// The first file of a supported type wins. When none qualifies the error
/// names the first file's type.
pub fn accept_file(config: &SignatureConfig, files: Vec<ImageFile>) -> Result<ImageFile, CaptureError> {
    let first_type = files
        .first()
        .map(|f| f.media_type.clone())
        .ok_or(CaptureError::EmptyDrop)?;
    files
        .into_iter()
        .find(|f| config.is_supported_image_type(&f.media_type))
        .ok_or(CaptureError::UnsupportedType(first_type))
}

/// Decode-and-trace work for one accepted file.
///
/// Runs without borrowing the dialog; its outcome is handed back with
/// `SignatureDialog::apply_image`.
pub struct ImageJob {
    pub(crate) token: AbortToken,
    pub(crate) file: ImageFile,
    pub(crate) host: Rc<dyn SignatureHost>,
    pub(crate) decoder: Rc<dyn ImageDecoder>,
}

/// Result of an [`ImageJob`].
#[derive(Debug)]
pub struct ImageOutcome {
    pub(crate) token: AbortToken,
    pub file_name: String,
    pub result: Result<Option<SignatureData>, DecodeError>,
}

impl ImageJob {
    pub fn file(&self) -> &ImageFile {
        &self.file
    }

    /// Decode the bitmap and trace it.
    pub async fn run(self) -> ImageOutcome {
        let result = match self.decoder.decode(&self.file).await {
            Ok(bitmap) => Ok(self.host.outlines().from_image_bitmap(&bitmap).await),
            Err(e) => Err(e),
        };
        ImageOutcome {
            token: self.token,
            file_name: self.file.name,
            result,
        }
    }
}
