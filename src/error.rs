//! Error handling for the nominal detection pipeline
//!
//! Only malformed detector output and invalid configuration are errors.
//! Unknown class indices and degenerate boxes are handled silently by the
//! filter and geometry stages.

use crate::config::ConfigError;
use thiserror::Error;

/// Main error type for the detection post-processing pipeline
#[derive(Error, Debug)]
pub enum PipelineError {
    // Detector output errors
    #[error(
        "Detector output shape mismatch: {boxes} boxes, {classes} classes, {confidences} confidences"
    )]
    InputShapeMismatch {
        boxes: usize,
        classes: usize,
        confidences: usize,
    },

    #[error("Malformed detector row {index}: expected at least {expected} values, got {actual}")]
    MalformedRow {
        index: usize,
        expected: usize,
        actual: usize,
    },

    // Configuration errors
    #[error("Invalid {name}: {value} (must be between 0.0 and 1.0)")]
    InvalidThreshold { name: &'static str, value: f32 },

    #[error("Invalid nominal catalog: {0}")]
    InvalidCatalog(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type alias for convenience
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = PipelineError::InputShapeMismatch {
            boxes: 3,
            classes: 2,
            confidences: 3,
        };
        assert_eq!(
            error.to_string(),
            "Detector output shape mismatch: 3 boxes, 2 classes, 3 confidences"
        );

        let error = PipelineError::InvalidThreshold {
            name: "overlap_threshold",
            value: 1.5,
        };
        assert!(error.to_string().contains("overlap_threshold"));
        assert!(error.to_string().contains("1.5"));

        let error = PipelineError::MalformedRow {
            index: 4,
            expected: 6,
            actual: 5,
        };
        assert_eq!(
            error.to_string(),
            "Malformed detector row 4: expected at least 6 values, got 5"
        );
    }

    #[test]
    fn test_config_error_conversion() {
        let config_error = ConfigError::InvalidValue("format".to_string());
        let error: PipelineError = config_error.into();

        assert!(matches!(error, PipelineError::Config(_)));
        assert_eq!(error.to_string(), "Invalid configuration value: format");
    }
}
