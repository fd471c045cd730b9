//! Turning the model's score vector into a labeled prediction.
//!
//! The label set is ordered: index `i` of the output vector names the class
//! at position `i`. That positional correspondence is the central invariant
//! of the whole service, so a vector whose length disagrees with the label
//! count fails loudly instead of being truncated or padded.

use crate::core::errors::ClassifyError;
use serde::{Deserialize, Serialize};

/// A single classification outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// The winning class label.
    #[serde(rename = "class")]
    pub label: String,
    /// The maximum value of the output probability vector, not renormalized.
    pub confidence: f32,
}

/// The fixed, ordered set of class labels.
#[derive(Debug, Clone)]
pub struct LabelSet {
    labels: Vec<String>,
}

impl LabelSet {
    /// Creates a label set from an ordered list of names.
    ///
    /// # Errors
    ///
    /// Returns `ClassifyError::Config` if the list is empty.
    pub fn new(labels: Vec<String>) -> Result<Self, ClassifyError> {
        if labels.is_empty() {
            return Err(ClassifyError::config("label set must not be empty"));
        }
        Ok(Self { labels })
    }

    /// Number of classes.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether the set is empty. Always false for a constructed set.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// The ordered labels.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Extracts the top-1 prediction from a score vector.
    ///
    /// The winning index is the argmax with ties broken by first occurrence,
    /// so the lowest index wins. Confidence is the winning score as-is; the
    /// upstream model is responsible for producing a normalized output.
    ///
    /// # Errors
    ///
    /// Returns `ClassifyError::ClassCountMismatch` when the vector length
    /// does not equal the configured label count.
    pub fn top1(&self, scores: &[f32]) -> Result<Prediction, ClassifyError> {
        if scores.len() != self.labels.len() {
            return Err(ClassifyError::ClassCountMismatch {
                expected: self.labels.len(),
                actual: scores.len(),
            });
        }

        let mut best_idx = 0;
        let mut best_score = scores[0];
        for (idx, &score) in scores.iter().enumerate().skip(1) {
            if score > best_score {
                best_idx = idx;
                best_score = score;
            }
        }

        Ok(Prediction {
            label: self.labels[best_idx].clone(),
            confidence: best_score,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::DEFAULT_CLASS_LABELS;

    fn label_set() -> LabelSet {
        LabelSet::new(DEFAULT_CLASS_LABELS.iter().map(|s| s.to_string()).collect()).unwrap()
    }

    #[test]
    fn picks_the_argmax_label_and_raw_confidence() {
        let labels = label_set();
        let scores = [0.1, 0.05, 0.6, 0.05, 0.05, 0.05, 0.05, 0.05];

        let prediction = labels.top1(&scores).unwrap();
        assert_eq!(prediction.label, "Hydra");
        assert_eq!(prediction.confidence, 0.6);
    }

    #[test]
    fn no_other_index_beats_the_winner() {
        let labels = label_set();
        let scores = [0.02, 0.08, 0.3, 0.3, 0.1, 0.1, 0.05, 0.05];
        let prediction = labels.top1(&scores).unwrap();
        let winner = labels
            .labels()
            .iter()
            .position(|l| *l == prediction.label)
            .unwrap();
        assert!(scores.iter().all(|&s| s <= scores[winner]));
        assert_eq!(winner, 2);
    }

    #[test]
    fn exact_ties_go_to_the_lowest_index() {
        let labels = label_set();
        let scores = [0.25, 0.25, 0.25, 0.25, 0.0, 0.0, 0.0, 0.0];
        let prediction = labels.top1(&scores).unwrap();
        assert_eq!(prediction.label, "Amoeba");
    }

    #[test]
    fn confidence_stays_in_unit_interval_for_normalized_vectors() {
        let labels = label_set();
        let scores = [0.125f32; 8];
        let prediction = labels.top1(&scores).unwrap();
        assert!(prediction.confidence >= 0.0 && prediction.confidence <= 1.0);
    }

    #[test]
    fn length_mismatch_fails_loudly() {
        let labels = label_set();
        let short = [0.5, 0.5];
        let long = [0.1f32; 9];

        assert!(matches!(
            labels.top1(&short),
            Err(ClassifyError::ClassCountMismatch {
                expected: 8,
                actual: 2
            })
        ));
        assert!(matches!(
            labels.top1(&long),
            Err(ClassifyError::ClassCountMismatch {
                expected: 8,
                actual: 9
            })
        ));
    }

    #[test]
    fn empty_label_set_is_rejected_at_construction() {
        assert!(LabelSet::new(vec![]).is_err());
    }

    #[test]
    fn prediction_serializes_with_the_wire_field_names() {
        let prediction = Prediction {
            label: "Yeast".to_string(),
            confidence: 0.5,
        };
        let json = serde_json::to_value(&prediction).unwrap();
        assert_eq!(json["class"], "Yeast");
        assert_eq!(json["confidence"], 0.5);
    }
}
