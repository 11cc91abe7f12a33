//! Freehand signature capture.
//!
//! Pointer samples are turned into a running path as they arrive. The first
//! two segments of a stroke are straight lines; after that each sample adds a
//! cubic whose control points blend the two previous samples with the new one,
//! which smooths the stroke at constant cost per sample.

use crate::outline::{Curve, DrawnCurves};
use kurbo::{BezPath, Point, Size};

/// A pointer sample in drawing-surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    pub pointer_id: i64,
    pub position: Point,
}

impl PointerSample {
    pub fn new(pointer_id: i64, x: f64, y: f64) -> Self {
        Self {
            pointer_id,
            position: Point::new(x, y),
        }
    }
}

/// Stroke currently being drawn.
#[derive(Debug, Clone)]
struct ActiveStroke {
    pointer_id: i64,
    points: Vec<Point>,
}

/// Accumulated freehand state of the draw tab.
#[derive(Debug, Clone)]
pub struct DrawCapture {
    pub thickness: f64,
    /// Completed strokes, in drawing order.
    pub strokes: Vec<Curve>,
    active: Option<ActiveStroke>,
    path: BezPath,
}

impl DrawCapture {
    pub fn new(thickness: f64) -> Self {
        Self {
            thickness,
            strokes: Vec::new(),
            active: None,
            path: BezPath::new(),
        }
    }

    /// Running path across every stroke, including the one in progress.
    pub fn path(&self) -> &BezPath {
        &self.path
    }

    /// Whether at least one stroke was completed.
    pub fn has_strokes(&self) -> bool {
        !self.strokes.is_empty()
    }

    pub fn is_drawing(&self) -> bool {
        self.active.is_some()
    }

    /// Pointer currently holding the stroke.
    pub fn captured_pointer(&self) -> Option<i64> {
        self.active.as_ref().map(|s| s.pointer_id)
    }

    /// Curves for extraction, completed strokes only.
    pub fn drawn_curves(&self) -> DrawnCurves {
        DrawnCurves {
            curves: self.strokes.clone(),
            thickness: self.thickness,
        }
    }

    /// Start a stroke. Ignored while another pointer holds the capture.
    ///
    /// Returns true if a stroke started.
    pub fn begin_stroke(&mut self, sample: PointerSample) -> bool {
        if self.active.is_some() {
            return false;
        }
        let point = round_point(sample.position);
        self.path.move_to(point);
        self.active = Some(ActiveStroke {
            pointer_id: sample.pointer_id,
            points: vec![point],
        });
        true
    }

    /// Extend the stroke. Samples from other pointers, outside `surface`, or
    /// repeating the previous point are dropped.
    ///
    /// Returns true if the sample was recorded.
    pub fn extend_stroke(&mut self, sample: PointerSample, surface: Size) -> bool {
        let Some(stroke) = self.active.as_mut() else {
            return false;
        };
        if stroke.pointer_id != sample.pointer_id {
            return false;
        }
        let point = round_point(sample.position);
        if !contains(surface, point) || stroke.points.last() == Some(&point) {
            return false;
        }

        stroke.points.push(point);
        match stroke.points.as_slice() {
            [.., p1, p2, _] if stroke.points.len() >= 4 => {
                let (p1, p2) = (*p1, *p2);
                self.path.curve_to(
                    Point::new((p1.x + 5.0 * p2.x) / 6.0, (p1.y + 5.0 * p2.y) / 6.0),
                    Point::new((5.0 * p2.x + point.x) / 6.0, (5.0 * p2.y + point.y) / 6.0),
                    p2.midpoint(point),
                );
            }
            _ => self.path.line_to(point),
        }
        true
    }

    /// Finish the stroke held by `pointer_id`.
    ///
    /// A stroke that never moved becomes a dot. Returns the completed stroke.
    pub fn end_stroke(&mut self, pointer_id: i64) -> Option<&Curve> {
        if self.captured_pointer() != Some(pointer_id) {
            return None;
        }
        let stroke = self.active.take()?;
        if let [only] = stroke.points.as_slice() {
            self.path.line_to(*only);
        }
        log::debug!("Stroke finished with {} points", stroke.points.len());
        self.strokes.push(Curve::new(stroke.points));
        self.strokes.last()
    }
}

fn round_point(point: Point) -> Point {
    Point::new(point.x.round(), point.y.round())
}

fn contains(surface: Size, point: Point) -> bool {
    point.x >= 0.0 && point.y >= 0.0 && point.x <= surface.width && point.y <= surface.height
}
