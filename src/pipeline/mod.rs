//! Detection post-processing pipeline
//!
//! Runs filter, suppression and aggregation in order over one image's
//! detector output. The pipeline holds only read-only state, so a single
//! instance can serve concurrent requests.

use crate::aggregate::{aggregate, AggregateResult, DetectionReport, ReportOptions};
use crate::catalog::NominalCatalog;
use crate::error::{PipelineError, PipelineResult};
use crate::postprocess::{filter_candidates, suppress, top1, RawDetections, TieBreak};
use crate::utils::Candidate;
use std::sync::Arc;
use tracing::debug;

/// Everything produced for one image
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineOutcome {
    pub result: AggregateResult,
    /// One line per filtered candidate, before suppression
    pub debug_info: Vec<String>,
    /// Candidates received from the detector
    pub raw_count: usize,
    /// Candidates left after confidence and class filtering
    pub filtered_count: usize,
}

impl PipelineOutcome {
    /// Detections left after suppression
    pub fn kept_count(&self) -> usize {
        self.result.count()
    }

    pub fn report(&self, options: &ReportOptions) -> DetectionReport {
        DetectionReport::build(&self.result, &self.debug_info, options)
    }
}

/// Filter -> suppress -> aggregate
#[derive(Debug, Clone)]
pub struct DetectionPipeline {
    catalog: Arc<NominalCatalog>,
    confidence_threshold: f32,
    overlap_threshold: f32,
    tie_break: TieBreak,
}

impl DetectionPipeline {
    /// Create a pipeline, rejecting thresholds outside `[0, 1]`
    pub fn new(
        catalog: NominalCatalog,
        confidence_threshold: f32,
        overlap_threshold: f32,
    ) -> PipelineResult<Self> {
        validate_threshold("confidence_threshold", confidence_threshold)?;
        validate_threshold("overlap_threshold", overlap_threshold)?;

        Ok(Self {
            catalog: Arc::new(catalog),
            confidence_threshold,
            overlap_threshold,
            tie_break: TieBreak::default(),
        })
    }

    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    pub fn catalog(&self) -> &NominalCatalog {
        &self.catalog
    }

    pub fn confidence_threshold(&self) -> f32 {
        self.confidence_threshold
    }

    pub fn overlap_threshold(&self) -> f32 {
        self.overlap_threshold
    }

    pub fn tie_break(&self) -> TieBreak {
        self.tie_break
    }

    /// Process one image's detector output.
    ///
    /// Fails only when the three sequences differ in length; nothing is
    /// produced in that case.
    pub fn run(&self, raw: &RawDetections) -> PipelineResult<PipelineOutcome> {
        let candidates = raw.to_candidates()?;
        Ok(self.run_candidates(candidates))
    }

    /// Process candidates that are already assembled
    pub fn run_candidates(&self, candidates: Vec<Candidate>) -> PipelineOutcome {
        let raw_count = candidates.len();

        let filtered = filter_candidates(candidates, &self.catalog, self.confidence_threshold);
        let debug_info: Vec<String> = filtered.iter().map(|c| c.to_string()).collect();

        let kept = suppress(
            &filtered,
            &self.catalog,
            self.overlap_threshold,
            self.tie_break,
        );
        let result = aggregate(&kept);

        debug!(
            raw = raw_count,
            filtered = filtered.len(),
            kept = kept.len(),
            total = result.total_value,
            "processed detections"
        );

        PipelineOutcome {
            result,
            debug_info,
            raw_count,
            filtered_count: filtered.len(),
        }
    }

    /// Whole-image classification: the most probable class is the single
    /// banknote in the picture. Unmapped or empty output yields an empty
    /// result.
    pub fn classify(&self, probabilities: &[f32]) -> AggregateResult {
        let Some((class_index, confidence)) = top1(probabilities) else {
            return AggregateResult::default();
        };

        match i32::try_from(class_index)
            .ok()
            .and_then(|i| self.catalog.value_of(i))
        {
            Some(value) => {
                debug!(class = class_index, confidence, value, "classified image");
                AggregateResult {
                    nominals: vec![value],
                    total_value: value,
                    confidences: vec![confidence],
                }
            }
            None => {
                debug!(class = class_index, "top class is not in the catalog");
                AggregateResult::default()
            }
        }
    }
}

fn validate_threshold(name: &'static str, value: f32) -> PipelineResult<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(PipelineError::InvalidThreshold { name, value });
    }
    Ok(())
}
