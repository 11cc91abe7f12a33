//! Per-dialog capture state.
//!
//! A [`CaptureSession`] lives from dialog open to dialog close. Each tab owns
//! its own [`TabCapture`] variant, so typed text, strokes and traced images
//! never share fields.

pub mod draw;
pub mod image;

pub use draw::{DrawCapture, PointerSample};
pub use image::{DragItem, DropEffect, ImageCapture, ImageJob, ImageOutcome};

use crate::host::{DecodeError, SignatureHost};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use thiserror::Error;

/// Capture modes of the add-signature dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tab {
    Type,
    Draw,
    Image,
}

impl Tab {
    pub fn all() -> &'static [Tab] {
        &[Tab::Type, Tab::Draw, Tab::Image]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Tab::Type => "type",
            Tab::Draw => "draw",
            Tab::Image => "image",
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Control holding keyboard focus after a tab switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    TypeInput,
    DrawSurface,
    ImagePicker,
}

impl From<Tab> for Focus {
    fn from(tab: Tab) -> Self {
        match tab {
            Tab::Type => Focus::TypeInput,
            Tab::Draw => Focus::DrawSurface,
            Tab::Image => Focus::ImagePicker,
        }
    }
}

/// Errors shown in the dialog's inline banner.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CaptureError {
    #[error("Unsupported image type: {0}")]
    UnsupportedType(String),
    #[error("Dropped data contains no file")]
    EmptyDrop,
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Transient state of one tab.
#[derive(Debug, Clone)]
pub enum TabCapture {
    Type(String),
    /// `None` until the first stroke starts.
    Draw(Option<DrawCapture>),
    /// `None` until an image was traced.
    Image(Option<ImageCapture>),
}

impl TabCapture {
    fn empty(tab: Tab) -> Self {
        match tab {
            Tab::Type => TabCapture::Type(String::new()),
            Tab::Draw => TabCapture::Draw(None),
            Tab::Image => TabCapture::Image(None),
        }
    }

    /// Whether this tab holds something that can be committed.
    pub fn is_capturable(&self) -> bool {
        match self {
            TabCapture::Type(text) => !text.trim().is_empty(),
            TabCapture::Draw(draw) => draw.as_ref().is_some_and(DrawCapture::has_strokes),
            TabCapture::Image(image) => image.is_some(),
        }
    }
}

/// Live state of an open add-signature dialog.
pub struct CaptureSession {
    pub(crate) host: Rc<dyn SignatureHost>,
    pub(crate) active: Option<Tab>,
    pub(crate) focus: Option<Focus>,
    captures: HashMap<Tab, TabCapture>,
    /// Description snapshots taken when leaving a tab.
    pub(crate) descriptions: HashMap<Tab, String>,
    /// The shared description field.
    pub(crate) description: String,
    /// Set once the description no longer mirrors the typed text.
    pub(crate) description_dirty: bool,
    pub(crate) save_preferred: bool,
    /// The store reported itself full when the dialog opened.
    pub(crate) storage_full: bool,
    /// Stroke thickness slider value.
    pub(crate) thickness: f64,
    pub(crate) error: Option<CaptureError>,
    /// An image is being decoded and traced.
    pub(crate) waiting: bool,
}

impl CaptureSession {
    pub(crate) fn new(host: Rc<dyn SignatureHost>, storage_full: bool, thickness: f64) -> Self {
        Self {
            host,
            active: None,
            focus: None,
            captures: Tab::all()
                .iter()
                .map(|&tab| (tab, TabCapture::empty(tab)))
                .collect(),
            descriptions: HashMap::new(),
            description: String::new(),
            description_dirty: false,
            save_preferred: !storage_full,
            storage_full,
            thickness,
            error: None,
            waiting: false,
        }
    }

    pub fn capture(&self, tab: Tab) -> &TabCapture {
        &self.captures[&tab]
    }

    pub(crate) fn reset_capture(&mut self, tab: Tab) {
        self.captures.insert(tab, TabCapture::empty(tab));
    }

    pub(crate) fn typed_text(&self) -> &str {
        match self.captures.get(&Tab::Type) {
            Some(TabCapture::Type(text)) => text,
            _ => "",
        }
    }

    pub(crate) fn typed_text_mut(&mut self) -> Option<&mut String> {
        match self.captures.get_mut(&Tab::Type) {
            Some(TabCapture::Type(text)) => Some(text),
            _ => None,
        }
    }

    pub(crate) fn draw(&self) -> Option<&DrawCapture> {
        match self.captures.get(&Tab::Draw) {
            Some(TabCapture::Draw(draw)) => draw.as_ref(),
            _ => None,
        }
    }

    pub(crate) fn draw_slot(&mut self) -> Option<&mut Option<DrawCapture>> {
        match self.captures.get_mut(&Tab::Draw) {
            Some(TabCapture::Draw(draw)) => Some(draw),
            _ => None,
        }
    }

    pub(crate) fn image(&self) -> Option<&ImageCapture> {
        match self.captures.get(&Tab::Image) {
            Some(TabCapture::Image(image)) => image.as_ref(),
            _ => None,
        }
    }

    pub(crate) fn set_image(&mut self, image: ImageCapture) {
        self.captures.insert(Tab::Image, TabCapture::Image(Some(image)));
    }

    /// Whether the active tab holds committable data.
    pub(crate) fn active_is_capturable(&self) -> bool {
        self.active
            .is_some_and(|tab| self.capture(tab).is_capturable())
    }
}
