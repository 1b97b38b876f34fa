//! Folding unique detections into nominal totals

use crate::postprocess::UniqueDetection;
use serde::{Deserialize, Serialize};

pub mod format;
pub mod report;

pub use format::{FormattedValue, FormattingPolicy};
pub use report::{DetectionReport, ReportOptions};

/// Detected nominals in survival order and their total
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateResult {
    /// Nominal value per kept detection, in survival order
    pub nominals: Vec<u64>,
    /// Sum of `nominals`
    pub total_value: u64,
    /// Confidence per kept detection, parallel to `nominals`
    pub confidences: Vec<f32>,
}

impl AggregateResult {
    /// Number of banknotes counted
    pub fn count(&self) -> usize {
        self.nominals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nominals.is_empty()
    }
}

/// Sum kept detections and list their nominals. The total saturates
/// rather than wrapping.
pub fn aggregate(detections: &[UniqueDetection]) -> AggregateResult {
    AggregateResult {
        nominals: detections.iter().map(|d| d.value).collect(),
        total_value: detections
            .iter()
            .fold(0u64, |acc, d| acc.saturating_add(d.value)),
        confidences: detections.iter().map(|d| d.confidence()).collect(),
    }
}
