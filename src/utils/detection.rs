//! Detection data structures and box geometry

use serde::{Deserialize, Serialize};
use std::fmt;

/// Axis-aligned rectangle in image pixel coordinates
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Left X coordinate
    pub x1: f32,
    /// Top Y coordinate
    pub y1: f32,
    /// Right X coordinate
    pub x2: f32,
    /// Bottom Y coordinate
    pub y2: f32,
}

impl BoundingBox {
    /// Create a new bounding box from corner coordinates
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Create a bounding box from centre form `(cx, cy, w, h)`
    pub fn from_center(cx: f32, cy: f32, w: f32, h: f32) -> Self {
        Self {
            x1: cx - w * 0.5,
            y1: cy - h * 0.5,
            x2: cx + w * 0.5,
            y2: cy + h * 0.5,
        }
    }

    /// Width, clamped to zero for inverted boxes
    pub fn width(&self) -> f32 {
        (self.x2 - self.x1).max(0.0)
    }

    /// Height, clamped to zero for inverted boxes
    pub fn height(&self) -> f32 {
        (self.y2 - self.y1).max(0.0)
    }

    /// Area of the box; zero when the corners are inverted
    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    /// Calculate Intersection over Union (IoU) with another box
    pub fn iou(&self, other: &BoundingBox) -> f32 {
        iou(self, other)
    }
}

impl From<[f32; 4]> for BoundingBox {
    fn from(coords: [f32; 4]) -> Self {
        Self::new(coords[0], coords[1], coords[2], coords[3])
    }
}

/// Intersection over Union of two boxes.
///
/// Never fails: disjoint or degenerate boxes give `0.0`.
pub fn iou(a: &BoundingBox, b: &BoundingBox) -> f32 {
    let xi1 = a.x1.max(b.x1);
    let yi1 = a.y1.max(b.y1);
    let xi2 = a.x2.min(b.x2);
    let yi2 = a.y2.min(b.y2);

    let intersection = (xi2 - xi1).max(0.0) * (yi2 - yi1).max(0.0);
    let union = a.area() + b.area() - intersection;

    if union > 0.0 {
        intersection / union
    } else {
        0.0
    }
}

/// One raw detector output item
#[derive(Clone, Debug, PartialEq)]
pub struct Candidate {
    /// Bounding box in image pixel coordinates
    pub bbox: BoundingBox,
    /// Confidence score (0.0 to 1.0)
    pub confidence: f32,
    /// Detector class index
    pub class_index: i32,
}

impl Candidate {
    /// Create a new candidate
    pub fn new(bbox: BoundingBox, confidence: f32, class_index: i32) -> Self {
        Self {
            bbox,
            confidence,
            class_index,
        }
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "class={} conf={:.2} box=({:.1}, {:.1}, {:.1}, {:.1})",
            self.class_index,
            self.confidence,
            self.bbox.x1,
            self.bbox.y1,
            self.bbox.x2,
            self.bbox.y2
        )
    }
}
