//! Nominal Detection Library
//!
//! Post-processing for banknote detectors: filters raw detector candidates,
//! removes duplicate boxes and totals the detected currency nominals.

pub mod aggregate;
pub mod catalog;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod postprocess;
pub mod utils;

// Re-export commonly used types
pub use aggregate::{
    aggregate, AggregateResult, DetectionReport, FormattedValue, FormattingPolicy, ReportOptions,
};
pub use catalog::{CatalogPreset, NominalCatalog};
pub use config::{AppConfig, CatalogConfig, ConfigError, DetectionConfig, OutputConfig, OutputFormat};
pub use error::{PipelineError, PipelineResult};
pub use pipeline::{DetectionPipeline, PipelineOutcome};
pub use postprocess::{
    filter_candidates, suppress, DetectorOutput, RawDetections, TieBreak, UniqueDetection,
};
pub use utils::{iou, BoundingBox, Candidate};
