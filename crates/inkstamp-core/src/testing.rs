//! Fake collaborators for unit tests.

use crate::BoxFuture;
use crate::codec::DeflateCodec;
use crate::host::{Bitmap, Collaborators, DecodeError, ImageDecoder, ImageFile, Localizer, SignatureHost};
use crate::launcher::SignatureLauncher;
use crate::outline::{
    Curve, DrawnCurves, DrawnLinesFlags, OutlineExtractor, OutlineRecord, SignatureData,
    SignatureOutline, TextStyle, curves_bounds,
};
use crate::overlay::OverlayStack;
use crate::storage::{MemoryStore, SignatureStore, StorageError, StorageResult, StoredSignature};
use kurbo::{BezPath, Point, Size};
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

/// True when every pixel has zero alpha.
fn is_transparent(bitmap: &Bitmap) -> bool {
    bitmap.rgba.chunks_exact(4).all(|px| px[3] == 0)
}

pub fn outline_for(curves: &[Curve], are_contours: bool) -> SignatureOutline {
    let mut path = BezPath::new();
    for curve in curves {
        if let Some((first, rest)) = curve.points.split_first() {
            path.move_to(*first);
            rest.iter().for_each(|p| path.line_to(*p));
        }
    }
    SignatureOutline {
        view_box: curves_bounds(curves),
        path,
        are_contours,
    }
}

fn data_for(record: OutlineRecord) -> SignatureData {
    SignatureData {
        outline: outline_for(&record.curves, record.are_contours),
        record,
    }
}

/// Extractor producing one polyline per glyph, stroke, or opaque pixel run.
#[derive(Default)]
pub struct FakeExtractor {
    processed: Cell<usize>,
    text_calls: RefCell<Vec<(String, TextStyle)>>,
    drawn_calls: RefCell<Vec<(DrawnCurves, Size)>>,
}

impl FakeExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn processed(&self) -> usize {
        self.processed.get()
    }

    pub fn text_calls(&self) -> Vec<(String, TextStyle)> {
        self.text_calls.borrow().clone()
    }

    pub fn drawn_calls(&self) -> Vec<(DrawnCurves, Size)> {
        self.drawn_calls.borrow().clone()
    }
}

impl OutlineExtractor for FakeExtractor {
    fn from_text<'a>(&'a self, text: &'a str, style: &'a TextStyle) -> BoxFuture<'a, SignatureData> {
        Box::pin(async move {
            self.text_calls.borrow_mut().push((text.to_string(), style.clone()));
            let curves = text
                .chars()
                .enumerate()
                .map(|(i, _)| {
                    let x = i as f64 * style.font_size;
                    Curve::new(vec![Point::new(x, 0.0), Point::new(x, style.font_size)])
                })
                .collect();
            data_for(OutlineRecord {
                curves,
                are_contours: true,
                thickness: 0.0,
                width: text.chars().count() as f64 * style.font_size,
                height: style.font_size,
            })
        })
    }

    fn from_drawn_curves<'a>(
        &'a self,
        curves: &'a DrawnCurves,
        surface: Size,
    ) -> BoxFuture<'a, SignatureData> {
        Box::pin(async move {
            self.drawn_calls.borrow_mut().push((curves.clone(), surface));
            data_for(OutlineRecord {
                curves: curves.curves.clone(),
                are_contours: false,
                thickness: curves.thickness,
                width: surface.width,
                height: surface.height,
            })
        })
    }

    fn from_image_bitmap<'a>(&'a self, bitmap: &'a Bitmap) -> BoxFuture<'a, Option<SignatureData>> {
        Box::pin(async move {
            if is_transparent(bitmap) {
                return None;
            }
            let (w, h) = (bitmap.width as f64, bitmap.height as f64);
            Some(data_for(OutlineRecord {
                curves: vec![Curve::new(vec![
                    Point::ZERO,
                    Point::new(w, 0.0),
                    Point::new(w, h),
                    Point::ZERO,
                ])],
                are_contours: true,
                thickness: 0.0,
                width: w,
                height: h,
            }))
        })
    }

    fn process_drawn_lines<'a>(
        &'a self,
        curves: &'a [Curve],
        dims: Size,
        flags: DrawnLinesFlags,
    ) -> BoxFuture<'a, SignatureData> {
        Box::pin(async move {
            self.processed.set(self.processed.get() + 1);
            data_for(OutlineRecord {
                curves: curves.to_vec(),
                are_contours: flags.are_contours,
                thickness: flags.thickness,
                width: dims.width,
                height: dims.height,
            })
        })
    }
}

/// A signature handed to [`RecordingHost::add_signature`].
#[derive(Debug, Clone)]
pub struct AddedSignature {
    pub data: SignatureData,
    pub height: f64,
    pub description: String,
    pub uuid: Option<String>,
}

/// Host editor that records what the dialogs do to it.
#[derive(Default)]
pub struct RecordingHost {
    pub extractor: FakeExtractor,
    added: RefCell<Vec<AddedSignature>>,
    discarded: Cell<bool>,
    description: RefCell<String>,
    preview: RefCell<Option<SignatureOutline>>,
    uuid: RefCell<Option<String>>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// A host standing for an already committed signature.
    pub fn committed(description: &str, uuid: Option<&str>) -> Self {
        let host = Self::new();
        *host.description.borrow_mut() = description.to_string();
        *host.uuid.borrow_mut() = uuid.map(str::to_string);
        *host.preview.borrow_mut() = Some(outline_for(
            &[Curve::new(vec![Point::new(0.0, 0.0), Point::new(10.0, 5.0)])],
            false,
        ));
        host
    }

    pub fn added(&self) -> Vec<AddedSignature> {
        self.added.borrow().clone()
    }

    pub fn is_discarded(&self) -> bool {
        self.discarded.get()
    }

    /// Whether the document still shows a signature from this editor.
    pub fn has_signature(&self) -> bool {
        !self.discarded.get() && !self.added.borrow().is_empty()
    }
}

impl SignatureHost for RecordingHost {
    fn outlines(&self) -> &dyn OutlineExtractor {
        &self.extractor
    }

    fn add_signature(&self, data: SignatureData, height: f64, description: &str, uuid: Option<&str>) {
        *self.description.borrow_mut() = description.to_string();
        *self.uuid.borrow_mut() = uuid.map(str::to_string);
        *self.preview.borrow_mut() = Some(data.outline.clone());
        self.added.borrow_mut().push(AddedSignature {
            data,
            height,
            description: description.to_string(),
            uuid: uuid.map(str::to_string),
        });
    }

    fn discard(&self) {
        self.discarded.set(true);
    }

    fn description(&self) -> String {
        self.description.borrow().clone()
    }

    fn set_description(&self, description: &str) {
        *self.description.borrow_mut() = description.to_string();
    }

    fn signature_preview(&self) -> Option<SignatureOutline> {
        self.preview.borrow().clone()
    }

    fn uuid(&self) -> Option<String> {
        self.uuid.borrow().clone()
    }
}

/// Localizer backed by a map; unknown keys echo the key.
#[derive(Default)]
pub struct FakeLocalizer {
    strings: HashMap<String, String>,
}

impl FakeLocalizer {
    pub fn new(strings: &[(&str, &str)]) -> Self {
        Self {
            strings: strings
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

impl Localizer for FakeLocalizer {
    fn get<'a>(&'a self, key: &'a str) -> BoxFuture<'a, String> {
        Box::pin(async move { self.strings.get(key).cloned().unwrap_or_else(|| key.to_string()) })
    }
}

/// Decoder treating file bytes as one row of RGBA pixels; empty files fail.
#[derive(Default)]
pub struct FakeDecoder;

impl ImageDecoder for FakeDecoder {
    fn decode<'a>(&'a self, file: &'a ImageFile) -> BoxFuture<'a, Result<Bitmap, DecodeError>> {
        Box::pin(async move {
            if file.bytes.is_empty() {
                return Err(DecodeError {
                    name: file.name.clone(),
                    reason: "empty file".to_string(),
                });
            }
            Ok(Bitmap {
                width: (file.bytes.len() / 4) as u32,
                height: 1,
                rgba: file.bytes.clone(),
            })
        })
    }
}

pub const OPAQUE_PIXEL: [u8; 4] = [0, 0, 0, 255];
pub const TRANSPARENT_PIXEL: [u8; 4] = [0, 0, 0, 0];

/// Memory store that counts calls and can pretend to be full or broken.
#[derive(Default)]
pub struct RecordingStore {
    pub inner: MemoryStore,
    creates: Cell<usize>,
    report_full: bool,
    fail_create: bool,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reporting_full() -> Self {
        Self {
            report_full: true,
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_create: true,
            ..Self::default()
        }
    }

    pub fn creates(&self) -> usize {
        self.creates.get()
    }
}

impl SignatureStore for RecordingStore {
    fn create(&self, record: StoredSignature) -> BoxFuture<'_, StorageResult<String>> {
        self.creates.set(self.creates.get() + 1);
        if self.fail_create {
            return Box::pin(async { Err(StorageError::Other("quota exceeded".to_string())) });
        }
        self.inner.create(record)
    }

    fn delete(&self, uuid: &str) -> BoxFuture<'_, StorageResult<bool>> {
        self.inner.delete(uuid)
    }

    fn get_all(&self) -> BoxFuture<'_, StorageResult<BTreeMap<String, StoredSignature>>> {
        self.inner.get_all()
    }

    fn is_full(&self) -> BoxFuture<'_, StorageResult<bool>> {
        if self.report_full {
            return Box::pin(async { Ok(true) });
        }
        self.inner.is_full()
    }
}

/// Collaborators wired to fakes, with the given store.
pub fn collaborators(store: Rc<dyn SignatureStore>) -> Collaborators {
    Collaborators {
        store,
        codec: Rc::new(DeflateCodec::new()),
        localizer: Rc::new(FakeLocalizer::new(&[(
            crate::config::DRAW_DESCRIPTION_KEY,
            "Drawn signature",
        )])),
        decoder: Rc::new(FakeDecoder),
        overlay: Rc::new(OverlayStack::new()),
        launcher: Rc::new(RefCell::new(SignatureLauncher::new())),
    }
}
