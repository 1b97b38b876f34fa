//! Class index to banknote nominal mapping

use crate::error::{PipelineError, PipelineResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Seven-class YOLO detector, classes ordered by ascending value
const YOLO_NOMINALS: [u64; 7] = [1_000, 2_000, 5_000, 10_000, 20_000, 50_000, 100_000];

/// Eight-class detector trained on "Nribu" labels
const RIBU_NOMINALS: [u64; 8] = [
    100_000, 10_000, 1_000, 2_000, 50_000, 20_000, 5_000, 75_000,
];

/// Eight-class whole-image classifier
const CLASSIFIER_NOMINALS: [u64; 8] = [
    1_000, 10_000, 100_000, 2_000, 20_000, 5_000, 50_000, 75_000,
];

/// Largest accepted nominal; keeps any realistic total far from `u64::MAX`
pub const MAX_NOMINAL_VALUE: u64 = 1_000_000_000;

/// Built-in catalogs matching the trained models
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogPreset {
    #[default]
    Yolo,
    Ribu,
    Classifier,
}

impl CatalogPreset {
    fn nominals(&self) -> &'static [u64] {
        match self {
            CatalogPreset::Yolo => &YOLO_NOMINALS,
            CatalogPreset::Ribu => &RIBU_NOMINALS,
            CatalogPreset::Classifier => &CLASSIFIER_NOMINALS,
        }
    }
}

impl fmt::Display for CatalogPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CatalogPreset::Yolo => "yolo",
            CatalogPreset::Ribu => "ribu",
            CatalogPreset::Classifier => "classifier",
        };
        f.write_str(name)
    }
}

/// Read-only mapping from detector class index to nominal value.
///
/// Keys are exactly `0..N`, values are strictly positive. Lookups of
/// unknown classes return `None`; callers drop those candidates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NominalCatalog {
    entries: BTreeMap<i32, u64>,
}

impl NominalCatalog {
    /// Build a catalog from `(class_index, value)` pairs, checking invariants
    pub fn new<I>(entries: I) -> PipelineResult<Self>
    where
        I: IntoIterator<Item = (i32, u64)>,
    {
        let mut map = BTreeMap::new();
        for (class_index, value) in entries {
            if value == 0 {
                return Err(PipelineError::InvalidCatalog(format!(
                    "class {} has a zero value",
                    class_index
                )));
            }
            if value > MAX_NOMINAL_VALUE {
                return Err(PipelineError::InvalidCatalog(format!(
                    "class {} value {} exceeds the maximum of {}",
                    class_index, value, MAX_NOMINAL_VALUE
                )));
            }
            if map.insert(class_index, value).is_some() {
                return Err(PipelineError::InvalidCatalog(format!(
                    "duplicate class index {}",
                    class_index
                )));
            }
        }

        if map.is_empty() {
            return Err(PipelineError::InvalidCatalog(
                "catalog has no entries".to_string(),
            ));
        }

        // Keys must be exactly 0..N
        for (expected, class_index) in map.keys().enumerate() {
            if *class_index as i64 != expected as i64 {
                return Err(PipelineError::InvalidCatalog(format!(
                    "class indices must be contiguous from 0, found {} at position {}",
                    class_index, expected
                )));
            }
        }

        Ok(Self { entries: map })
    }

    /// Build one of the built-in catalogs
    pub fn from_preset(preset: CatalogPreset) -> Self {
        let entries = preset
            .nominals()
            .iter()
            .enumerate()
            .map(|(i, &value)| (i as i32, value))
            .collect();
        Self { entries }
    }

    /// Nominal value for a class, `None` for unknown classes
    pub fn value_of(&self, class_index: i32) -> Option<u64> {
        self.entries.get(&class_index).copied()
    }

    pub fn contains(&self, class_index: i32) -> bool {
        self.entries.contains_key(&class_index)
    }

    /// Number of known classes
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in class index order
    pub fn iter(&self) -> impl Iterator<Item = (i32, u64)> + '_ {
        self.entries.iter().map(|(&k, &v)| (k, v))
    }
}

impl Default for NominalCatalog {
    fn default() -> Self {
        Self::from_preset(CatalogPreset::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yolo_preset() {
        let catalog = NominalCatalog::from_preset(CatalogPreset::Yolo);
        assert_eq!(catalog.len(), 7);
        assert_eq!(catalog.value_of(0), Some(1_000));
        assert_eq!(catalog.value_of(6), Some(100_000));
        assert_eq!(catalog.value_of(7), None);
    }

    #[test]
    fn test_ribu_and_classifier_presets() {
        let ribu = NominalCatalog::from_preset(CatalogPreset::Ribu);
        assert_eq!(ribu.len(), 8);
        assert_eq!(ribu.value_of(0), Some(100_000));
        assert_eq!(ribu.value_of(7), Some(75_000));

        let classifier = NominalCatalog::from_preset(CatalogPreset::Classifier);
        assert_eq!(classifier.value_of(2), Some(100_000));
        assert_eq!(classifier.value_of(5), Some(5_000));
    }

    #[test]
    fn test_presets_satisfy_invariants() {
        for preset in [
            CatalogPreset::Yolo,
            CatalogPreset::Ribu,
            CatalogPreset::Classifier,
        ] {
            let catalog = NominalCatalog::from_preset(preset);
            assert!(NominalCatalog::new(catalog.iter()).is_ok(), "{}", preset);
        }
    }

    #[test]
    fn test_unknown_class_is_absent_not_zero() {
        let catalog = NominalCatalog::default();
        assert_eq!(catalog.value_of(-1), None);
        assert_eq!(catalog.value_of(80), None);
        assert!(!catalog.contains(80));
    }

    #[test]
    fn test_custom_catalog() {
        let catalog = NominalCatalog::new([(0, 100_000)]).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.value_of(0), Some(100_000));
    }

    #[test]
    fn test_rejects_zero_value() {
        let result = NominalCatalog::new([(0, 1_000), (1, 0)]);
        assert!(matches!(result, Err(PipelineError::InvalidCatalog(_))));
    }

    #[test]
    fn test_rejects_oversized_value() {
        let result = NominalCatalog::new([(0, i64::MAX as u64)]);
        assert!(matches!(result, Err(PipelineError::InvalidCatalog(_))));

        assert!(NominalCatalog::new([(0, MAX_NOMINAL_VALUE)]).is_ok());
        assert!(NominalCatalog::new([(0, MAX_NOMINAL_VALUE + 1)]).is_err());
    }

    #[test]
    fn test_rejects_duplicate_keys() {
        let result = NominalCatalog::new([(0, 1_000), (0, 2_000)]);
        assert!(matches!(result, Err(PipelineError::InvalidCatalog(_))));
    }

    #[test]
    fn test_rejects_gaps_and_empty() {
        assert!(NominalCatalog::new([(0, 1_000), (2, 2_000)]).is_err());
        assert!(NominalCatalog::new([(1, 1_000)]).is_err());
        assert!(NominalCatalog::new(Vec::<(i32, u64)>::new()).is_err());
    }

    #[test]
    fn test_preset_serde_names() {
        let preset: CatalogPreset = serde_json::from_str("\"classifier\"").unwrap();
        assert_eq!(preset, CatalogPreset::Classifier);
        assert_eq!(CatalogPreset::Ribu.to_string(), "ribu");
    }
}
