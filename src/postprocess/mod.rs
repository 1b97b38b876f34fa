//! Detector output post-processing
//!
//! Converts raw detector output into candidates, filters them by confidence
//! and catalog membership, and suppresses duplicate boxes.

use crate::error::{PipelineError, PipelineResult};
use crate::utils::{BoundingBox, Candidate};
use serde::{Deserialize, Deserializer, Serialize};

pub mod decode;
pub mod filter;
pub mod suppress;

pub use decode::{top1, YOLO_ROW_MIN_LEN};
pub use filter::filter_candidates;
pub use suppress::{suppress, TieBreak, UniqueDetection};

/// Per-image detector output as three parallel sequences
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawDetections {
    /// Corner-form boxes `[x1, y1, x2, y2]`
    pub boxes: Vec<[f32; 4]>,
    /// Class index per box. Float ids such as `3.0` are truncated.
    #[serde(deserialize_with = "class_indices")]
    pub classes: Vec<i32>,
    /// Confidence per box
    pub confidences: Vec<f32>,
}

impl RawDetections {
    pub fn new(boxes: Vec<[f32; 4]>, classes: Vec<i32>, confidences: Vec<f32>) -> Self {
        Self {
            boxes,
            classes,
            confidences,
        }
    }

    /// Build from already-assembled candidates
    pub fn from_candidates<'a, I>(candidates: I) -> Self
    where
        I: IntoIterator<Item = &'a Candidate>,
    {
        let mut raw = Self::default();
        for c in candidates {
            raw.boxes.push([c.bbox.x1, c.bbox.y1, c.bbox.x2, c.bbox.y2]);
            raw.classes.push(c.class_index);
            raw.confidences.push(c.confidence);
        }
        raw
    }

    /// Verify the three sequences have the same length
    pub fn check_shape(&self) -> PipelineResult<()> {
        let n = self.boxes.len();
        if self.classes.len() != n || self.confidences.len() != n {
            return Err(PipelineError::InputShapeMismatch {
                boxes: self.boxes.len(),
                classes: self.classes.len(),
                confidences: self.confidences.len(),
            });
        }
        Ok(())
    }

    /// Zip the sequences into candidates in emission order
    pub fn to_candidates(&self) -> PipelineResult<Vec<Candidate>> {
        self.check_shape()?;

        Ok(self
            .boxes
            .iter()
            .zip(&self.classes)
            .zip(&self.confidences)
            .map(|((&coords, &class_index), &confidence)| {
                Candidate::new(BoundingBox::from(coords), confidence, class_index)
            })
            .collect())
    }

    /// Number of boxes
    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ClassId {
    Int(i64),
    Float(f64),
}

impl ClassId {
    fn truncate(self) -> i32 {
        // Out-of-range ids saturate and are later dropped as unknown classes
        match self {
            ClassId::Int(v) => v.clamp(i32::MIN as i64, i32::MAX as i64) as i32,
            ClassId::Float(v) => v as i32,
        }
    }
}

fn class_indices<'de, D>(deserializer: D) -> Result<Vec<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let ids = Vec::<ClassId>::deserialize(deserializer)?;
    Ok(ids.into_iter().map(ClassId::truncate).collect())
}

/// Detector output in either of the accepted layouts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DetectorOutput {
    /// Parallel boxes/classes/confidences sequences
    Columns(RawDetections),
    /// Undecoded YOLO rows `[cx, cy, w, h, objectness, class probs...]`
    Rows { rows: Vec<Vec<f32>> },
}

impl DetectorOutput {
    /// Normalise to parallel sequences
    pub fn into_raw(self) -> PipelineResult<RawDetections> {
        match self {
            DetectorOutput::Columns(raw) => Ok(raw),
            DetectorOutput::Rows { rows } => RawDetections::from_yolo_rows(&rows),
        }
    }
}

impl From<RawDetections> for DetectorOutput {
    fn from(raw: RawDetections) -> Self {
        DetectorOutput::Columns(raw)
    }
}
