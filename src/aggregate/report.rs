//! Serializable detection report

use super::{AggregateResult, FormattedValue, FormattingPolicy};
use serde::{Deserialize, Serialize};

/// Options controlling what a report contains
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportOptions {
    pub policy: FormattingPolicy,
    /// Attach the per-candidate debug trace
    pub debug_info: bool,
    /// Attach confidences as percentages
    pub include_confidence: bool,
}

/// Response body handed to the calling boundary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionReport {
    pub detections: Vec<FormattedValue>,
    pub total_value: FormattedValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidences: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug_info: Option<Vec<String>>,
}

impl DetectionReport {
    /// Render an aggregate result. `debug_info` is attached only when
    /// `options.debug_info` is set.
    pub fn build(result: &AggregateResult, debug_info: &[String], options: &ReportOptions) -> Self {
        let detections = result
            .nominals
            .iter()
            .map(|&v| options.policy.format(v))
            .collect();

        let confidences = options
            .include_confidence
            .then(|| result.confidences.iter().map(|&c| percent(c)).collect());

        Self {
            detections,
            total_value: options.policy.format(result.total_value),
            confidences,
            debug_info: options.debug_info.then(|| debug_info.to_vec()),
        }
    }
}

/// Confidence as a percentage rounded to two decimals
fn percent(confidence: f32) -> f64 {
    (confidence as f64 * 10_000.0).round() / 100.0
}
