//! Decoding of undecoded model outputs

use super::RawDetections;
use crate::error::{PipelineError, PipelineResult};
use crate::utils::BoundingBox;

/// Smallest YOLO row: 4 box values, objectness and one class probability
pub const YOLO_ROW_MIN_LEN: usize = 6;

impl RawDetections {
    /// Decode YOLO rows of the form `[cx, cy, w, h, objectness, p0, p1, ...]`.
    ///
    /// The box is converted to corner form, the class is the argmax of the
    /// class probabilities and the confidence is the objectness score.
    pub fn from_yolo_rows<R: AsRef<[f32]>>(rows: &[R]) -> PipelineResult<Self> {
        let mut raw = RawDetections::default();

        for (index, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() < YOLO_ROW_MIN_LEN {
                return Err(PipelineError::MalformedRow {
                    index,
                    expected: YOLO_ROW_MIN_LEN,
                    actual: row.len(),
                });
            }

            let bbox = BoundingBox::from_center(row[0], row[1], row[2], row[3]);
            // Rows with only NaN class scores fall back to class 0
            let (class_index, _) = top1(&row[5..]).unwrap_or((0, 0.0));

            raw.boxes.push([bbox.x1, bbox.y1, bbox.x2, bbox.y2]);
            raw.classes.push(class_index as i32);
            raw.confidences.push(row[4]);
        }

        Ok(raw)
    }
}

/// Index and score of the highest score, ignoring NaN.
///
/// Ties resolve to the lowest index. Returns `None` for empty input.
pub fn top1(scores: &[f32]) -> Option<(usize, f32)> {
    let mut best: Option<(usize, f32)> = None;

    for (i, &score) in scores.iter().enumerate() {
        if score.is_nan() {
            continue;
        }
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((i, score)),
        }
    }

    best
}
