//! Signature outlines and the extraction collaborator.
//!
//! Outlines are produced by an [`OutlineExtractor`]; this crate only moves
//! them between the capture tabs, the codec, the store and the host.

use crate::BoxFuture;
use crate::host::Bitmap;
use kurbo::{BezPath, Point, Rect, Size};
use serde::{Deserialize, Serialize};

/// Vector outline of a signature, ready to be stamped on a document.
#[derive(Debug, Clone, PartialEq)]
pub struct SignatureOutline {
    pub view_box: Rect,
    pub path: BezPath,
    /// True when the path traces filled regions instead of stroke centers.
    pub are_contours: bool,
}

/// One recorded stroke or traced contour.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Curve {
    pub points: Vec<Point>,
}

impl Curve {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Raw geometry of a signature, the unit the codec compresses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutlineRecord {
    pub curves: Vec<Curve>,
    pub are_contours: bool,
    pub thickness: f64,
    pub width: f64,
    pub height: f64,
}

/// An extracted outline together with the geometry it was built from.
#[derive(Debug, Clone, PartialEq)]
pub struct SignatureData {
    pub outline: SignatureOutline,
    pub record: OutlineRecord,
}

/// Freehand curves plus the stroke thickness they were drawn with.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawnCurves {
    pub curves: Vec<Curve>,
    pub thickness: f64,
}

/// Flags for [`OutlineExtractor::process_drawn_lines`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawnLinesFlags {
    pub are_contours: bool,
    pub thickness: f64,
}

/// Computed style of the type tab's input, used for glyph extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub font_family: String,
    pub font_size: f64,
    pub font_style: String,
    pub font_weight: String,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: "serif".to_string(),
            font_size: 32.0,
            font_style: "italic".to_string(),
            font_weight: "400".to_string(),
        }
    }
}

/// Outline extraction collaborator.
///
/// Implementations live with the host editor; the dialog reaches them
/// through `SignatureHost::outlines`.
pub trait OutlineExtractor {
    /// Build an outline from rendered glyphs.
    fn from_text<'a>(&'a self, text: &'a str, style: &'a TextStyle) -> BoxFuture<'a, SignatureData>;

    /// Build an outline from freehand curves drawn on a surface of the given size.
    fn from_drawn_curves<'a>(
        &'a self,
        curves: &'a DrawnCurves,
        surface: Size,
    ) -> BoxFuture<'a, SignatureData>;

    /// Trace a bitmap. `None` when nothing traceable was found.
    fn from_image_bitmap<'a>(&'a self, bitmap: &'a Bitmap) -> BoxFuture<'a, Option<SignatureData>>;

    /// Re-derive an outline from stored curves; the returned record carries
    /// the normalized curves and dimensions.
    fn process_drawn_lines<'a>(
        &'a self,
        curves: &'a [Curve],
        dims: Size,
        flags: DrawnLinesFlags,
    ) -> BoxFuture<'a, SignatureData>;
}

/// Bounding box of a set of curves, `Rect::ZERO` when there are no points.
pub fn curves_bounds(curves: &[Curve]) -> Rect {
    let mut points = curves.iter().flat_map(|c| c.points.iter());
    let Some(first) = points.next() else {
        return Rect::ZERO;
    };
    points.fold(Rect::from_points(*first, *first), |rect, p| rect.union_pt(*p))
}
