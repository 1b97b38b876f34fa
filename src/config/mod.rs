//! Configuration management

use crate::aggregate::format::{DEFAULT_CURRENCY_SYMBOL, DEFAULT_UNIT_LABEL};
use crate::aggregate::{FormattingPolicy, ReportOptions};
use crate::catalog::{CatalogPreset, NominalCatalog};
use crate::error::PipelineResult;
use crate::pipeline::DetectionPipeline;
use crate::postprocess::TieBreak;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;

/// Detection thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Minimum confidence for a candidate to be counted
    pub confidence_threshold: f32,
    /// IoU above which two boxes are the same banknote
    pub overlap_threshold: f32,
    /// Which box survives among duplicates
    pub tie_break: TieBreak,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.5,
            overlap_threshold: 0.5,
            tie_break: TieBreak::FirstWins,
        }
    }
}

/// Nominal catalog selection
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Built-in catalog to use when `entries` is absent
    pub preset: CatalogPreset,
    /// Explicit `"class" = value` table, replaces the preset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entries: Option<BTreeMap<String, u64>>,
}

impl CatalogConfig {
    /// Build the catalog this section describes
    pub fn build(&self) -> Result<NominalCatalog, ConfigError> {
        let Some(entries) = &self.entries else {
            return Ok(NominalCatalog::from_preset(self.preset));
        };

        let mut pairs = Vec::with_capacity(entries.len());
        for (key, &value) in entries {
            let class_index = key.trim().parse::<i32>().map_err(|_| {
                ConfigError::InvalidValue(format!("catalog key is not a class index: {}", key))
            })?;
            pairs.push((class_index, value));
        }

        NominalCatalog::new(pairs).map_err(|e| ConfigError::InvalidValue(e.to_string()))
    }
}

/// Output rendering mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Raw,
    Short,
    Currency,
}

impl std::str::FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "raw" => Ok(OutputFormat::Raw),
            "short" => Ok(OutputFormat::Short),
            "currency" => Ok(OutputFormat::Currency),
            other => Err(ConfigError::InvalidValue(format!(
                "unsupported output format: {}",
                other
            ))),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Suffix for the short format
    pub unit_label: String,
    /// Prefix for the currency format
    pub currency_symbol: String,
    /// Include one line per filtered candidate
    pub debug_info: bool,
    /// Include confidences as percentages
    pub include_confidence: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Raw,
            unit_label: DEFAULT_UNIT_LABEL.to_string(),
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
            debug_info: false,
            include_confidence: false,
        }
    }
}

impl OutputConfig {
    pub fn policy(&self) -> FormattingPolicy {
        match self.format {
            OutputFormat::Raw => FormattingPolicy::RawInteger,
            OutputFormat::Short => FormattingPolicy::ShortLabel {
                unit: self.unit_label.clone(),
            },
            OutputFormat::Currency => FormattingPolicy::Currency {
                symbol: self.currency_symbol.clone(),
            },
        }
    }

    pub fn report_options(&self) -> ReportOptions {
        ReportOptions {
            policy: self.policy(),
            debug_info: self.debug_info,
            include_confidence: self.include_confidence,
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub detection: DetectionConfig,
    pub catalog: CatalogConfig,
    pub output: OutputConfig,
}

impl AppConfig {
    /// Load configuration from TOML file
    pub fn from_toml_file(path: &PathBuf) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileReadError(path.clone(), e))?;

        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(content)
            .map_err(|e| ConfigError::ParseError(format!("TOML parse error: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn to_toml_file(&self, path: &PathBuf) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(format!("TOML serialize error: {}", e)))?;

        std::fs::write(path, content).map_err(|e| ConfigError::FileWriteError(path.clone(), e))?;

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_unit_interval(
            "confidence_threshold",
            self.detection.confidence_threshold,
        )?;
        check_unit_interval("overlap_threshold", self.detection.overlap_threshold)?;

        if self.output.format == OutputFormat::Short && self.output.unit_label.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "unit_label must not be empty for the short format".to_string(),
            ));
        }

        self.catalog.build()?;
        Ok(())
    }

    /// Build a pipeline from the detection and catalog sections
    pub fn build_pipeline(&self) -> PipelineResult<DetectionPipeline> {
        let catalog = self.catalog.build()?;
        Ok(DetectionPipeline::new(
            catalog,
            self.detection.confidence_threshold,
            self.detection.overlap_threshold,
        )?
        .with_tie_break(self.detection.tie_break))
    }
}

fn check_unit_interval(field: &str, value: f32) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::InvalidValue(format!(
            "{} must be between 0.0 and 1.0, got {}",
            field, value
        )));
    }
    Ok(())
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    FileReadError(PathBuf, std::io::Error),

    #[error("Failed to write config file {0}: {1}")]
    FileWriteError(PathBuf, std::io::Error),

    #[error("Config parse error: {0}")]
    ParseError(String),

    #[error("Config serialize error: {0}")]
    SerializeError(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}
