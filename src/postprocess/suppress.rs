//! Duplicate suppression
//!
//! A simplified non-maximum suppression: candidates are visited in order and
//! kept unless they overlap an already-kept box by more than the threshold.
//! Overlap is checked across classes, since one physical banknote may be
//! reported under two labels.

use crate::catalog::NominalCatalog;
use crate::utils::Candidate;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::trace;

/// Which candidate survives among overlapping duplicates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Keep the first box in detector emission order
    #[default]
    FirstWins,
    /// Visit candidates by descending confidence, so the most confident box wins
    HighestConfidence,
}

impl fmt::Display for TieBreak {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TieBreak::FirstWins => f.write_str("first_wins"),
            TieBreak::HighestConfidence => f.write_str("highest_confidence"),
        }
    }
}

/// A candidate kept after suppression, with its resolved nominal value
#[derive(Debug, Clone, PartialEq)]
pub struct UniqueDetection {
    pub candidate: Candidate,
    pub value: u64,
}

impl UniqueDetection {
    pub fn confidence(&self) -> f32 {
        self.candidate.confidence
    }
}

/// Remove overlapping duplicates, keeping one detection per physical object.
///
/// Candidates whose class is not in `catalog` are skipped and never block
/// other boxes. Survivors keep their visiting order.
pub fn suppress(
    candidates: &[Candidate],
    catalog: &NominalCatalog,
    overlap_threshold: f32,
    tie_break: TieBreak,
) -> Vec<UniqueDetection> {
    let mut order: Vec<&Candidate> = candidates.iter().collect();
    if tie_break == TieBreak::HighestConfidence {
        // Stable, so equal confidences keep emission order. NaN sorts last.
        order.sort_by(|a, b| sort_key(b.confidence).total_cmp(&sort_key(a.confidence)));
    }

    let mut kept: Vec<UniqueDetection> = Vec::new();

    for candidate in order {
        let Some(value) = catalog.value_of(candidate.class_index) else {
            trace!(class = candidate.class_index, "skipping unmapped class");
            continue;
        };

        let max_overlap = kept
            .iter()
            .map(|k| k.candidate.bbox.iou(&candidate.bbox))
            .fold(0.0f32, f32::max);

        if max_overlap > overlap_threshold {
            trace!(
                class = candidate.class_index,
                confidence = candidate.confidence,
                iou = max_overlap,
                "suppressed duplicate"
            );
            continue;
        }

        kept.push(UniqueDetection {
            candidate: candidate.clone(),
            value,
        });
    }

    kept
}

fn sort_key(confidence: f32) -> f32 {
    if confidence.is_nan() {
        f32::NEG_INFINITY
    } else {
        confidence
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::BoundingBox;

    fn candidate(x1: f32, y1: f32, x2: f32, y2: f32, confidence: f32, class: i32) -> Candidate {
        Candidate::new(BoundingBox::new(x1, y1, x2, y2), confidence, class)
    }

    fn single_class_catalog() -> NominalCatalog {
        NominalCatalog::new([(0, 100_000)]).unwrap()
    }

    #[test]
    fn test_overlapping_pair_collapses() {
        let candidates = vec![
            candidate(0.0, 0.0, 10.0, 10.0, 0.9, 0),
            candidate(1.0, 1.0, 11.0, 11.0, 0.6, 0),
        ];

        let kept = suppress(&candidates, &single_class_catalog(), 0.5, TieBreak::FirstWins);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].value, 100_000);
        assert_eq!(kept[0].confidence(), 0.9);
    }

    #[test]
    fn test_first_wins_keeps_earlier_box() {
        let candidates = vec![
            candidate(1.0, 1.0, 11.0, 11.0, 0.6, 0),
            candidate(0.0, 0.0, 10.0, 10.0, 0.9, 0),
        ];

        let kept = suppress(&candidates, &single_class_catalog(), 0.5, TieBreak::FirstWins);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].confidence(), 0.6);
    }

    #[test]
    fn test_highest_confidence_keeps_best_box() {
        let candidates = vec![
            candidate(1.0, 1.0, 11.0, 11.0, 0.6, 0),
            candidate(0.0, 0.0, 10.0, 10.0, 0.9, 0),
        ];

        let kept = suppress(
            &candidates,
            &single_class_catalog(),
            0.5,
            TieBreak::HighestConfidence,
        );
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].confidence(), 0.9);
    }

    #[test]
    fn test_overlap_at_threshold_is_kept() {
        // IoU of these boxes is exactly 1/3
        let candidates = vec![
            candidate(0.0, 0.0, 10.0, 10.0, 0.9, 0),
            candidate(5.0, 0.0, 15.0, 10.0, 0.8, 0),
        ];
        let threshold = candidates[0].bbox.iou(&candidates[1].bbox);

        let kept = suppress(&candidates, &single_class_catalog(), threshold, TieBreak::FirstWins);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn test_cross_class_overlap_is_suppressed() {
        let catalog = NominalCatalog::default();
        let candidates = vec![
            candidate(0.0, 0.0, 100.0, 50.0, 0.8, 6),
            candidate(2.0, 1.0, 101.0, 50.0, 0.7, 3),
        ];

        let kept = suppress(&candidates, &catalog, 0.5, TieBreak::FirstWins);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].value, 100_000);
    }

    #[test]
    fn test_disjoint_boxes_survive_in_order() {
        let catalog = NominalCatalog::default();
        let candidates = vec![
            candidate(50.0, 50.0, 60.0, 60.0, 0.7, 4),
            candidate(0.0, 0.0, 10.0, 10.0, 0.9, 0),
            candidate(20.0, 0.0, 30.0, 10.0, 0.8, 1),
        ];

        let kept = suppress(&candidates, &catalog, 0.5, TieBreak::FirstWins);
        let values: Vec<_> = kept.iter().map(|d| d.value).collect();
        assert_eq!(values, vec![20_000, 1_000, 2_000]);
    }

    #[test]
    fn test_unmapped_class_never_blocks() {
        let catalog = single_class_catalog();
        let candidates = vec![
            candidate(0.0, 0.0, 10.0, 10.0, 0.99, 7),
            candidate(0.0, 0.0, 10.0, 10.0, 0.6, 0),
        ];

        let kept = suppress(&candidates, &catalog, 0.5, TieBreak::FirstWins);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].candidate.class_index, 0);
    }

    #[test]
    fn test_suppress_is_idempotent() {
        let catalog = NominalCatalog::default();
        let candidates = vec![
            candidate(0.0, 0.0, 10.0, 10.0, 0.9, 0),
            candidate(1.0, 1.0, 11.0, 11.0, 0.95, 0),
            candidate(30.0, 30.0, 45.0, 40.0, 0.6, 2),
            candidate(31.0, 30.0, 45.0, 41.0, 0.8, 5),
            candidate(100.0, 0.0, 120.0, 20.0, 0.5, 6),
        ];

        for tie_break in [TieBreak::FirstWins, TieBreak::HighestConfidence] {
            let once = suppress(&candidates, &catalog, 0.5, tie_break);
            let survivors: Vec<Candidate> = once.iter().map(|d| d.candidate.clone()).collect();
            let twice = suppress(&survivors, &catalog, 0.5, tie_break);
            assert_eq!(once, twice, "{}", tie_break);
        }
    }

    #[test]
    fn test_nan_confidences_rank_last() {
        let catalog = NominalCatalog::default();
        let candidates: Vec<Candidate> = (0..64)
            .map(|i| {
                let x = i as f32 * 20.0;
                let confidence = if i % 3 == 0 {
                    f32::NAN
                } else {
                    (i % 10) as f32 / 10.0
                };
                candidate(x, 0.0, x + 10.0, 10.0, confidence, i % 7)
            })
            .collect();

        let kept = suppress(&candidates, &catalog, 0.5, TieBreak::HighestConfidence);
        assert_eq!(kept.len(), 64);

        let (ranked, nan): (Vec<_>, Vec<_>) = kept.iter().partition(|d| !d.confidence().is_nan());
        assert_eq!(nan.len(), 22);
        assert!(kept[..ranked.len()].iter().all(|d| !d.confidence().is_nan()));
        assert!(ranked
            .windows(2)
            .all(|w| w[0].confidence() >= w[1].confidence()));
    }

    #[test]
    fn test_empty_input() {
        let kept = suppress(&[], &NominalCatalog::default(), 0.5, TieBreak::FirstWins);
        assert!(kept.is_empty());
    }
}
