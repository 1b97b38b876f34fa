//! Confidence and class filtering

use crate::catalog::NominalCatalog;
use crate::utils::Candidate;

/// Keep candidates that pass the confidence threshold and belong to a
/// known class. Emission order is preserved.
pub fn filter_candidates(
    candidates: Vec<Candidate>,
    catalog: &NominalCatalog,
    confidence_threshold: f32,
) -> Vec<Candidate> {
    candidates
        .into_iter()
        .filter(|c| c.confidence >= confidence_threshold && catalog.contains(c.class_index))
        .collect()
}
