//! Turns the label annotations returned by the vision provider into a
//! hotdog verdict.
//!
//! Each label is matched (case-insensitively, exact string) against three
//! tiers of hotdog vocabulary and weighted accordingly. The image counts as a
//! hotdog when either the strongest weighted label or the sum of all weighted
//! labels clears its threshold.

pub mod labels;

use serde::{Deserialize, Serialize};

use labels::tier_for;

/// Strongest single weighted label must exceed this.
pub const MAX_SCORE_THRESHOLD: f64 = 0.6;
/// Sum of weighted labels must exceed this.
pub const TOTAL_SCORE_THRESHOLD: f64 = 1.2;

const DISPLAY_SCALE: f64 = 100.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelObservation {
    pub description: String,
    pub score: f64,
}

impl LabelObservation {
    pub fn new(description: impl Into<String>, score: f64) -> Self {
        Self {
            description: description.into(),
            score,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationDebug {
    pub total_score: f64,
    pub max_score: f64,
    pub threshold: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    pub is_hotdog: bool,
    /// `max_score * 100`. Not clamped: a strong direct match can reach 200.
    pub confidence: f64,
    /// Input labels in their original order, scores scaled to 0-100.
    pub labels: Vec<LabelObservation>,
    pub debug: ClassificationDebug,
}

pub fn classify(labels: &[LabelObservation]) -> ClassificationResult {
    let mut total_score = 0.0_f64;
    let mut max_score = 0.0_f64;

    for label in labels {
        let normalized = label.description.to_lowercase();
        let Some(tier) = tier_for(&normalized) else {
            continue;
        };

        let weighted = label.score * tier.weight();
        total_score += weighted;
        max_score = max_score.max(weighted);
    }

    let is_hotdog = max_score > MAX_SCORE_THRESHOLD || total_score > TOTAL_SCORE_THRESHOLD;

    ClassificationResult {
        is_hotdog,
        confidence: max_score * DISPLAY_SCALE,
        labels: labels
            .iter()
            .map(|l| LabelObservation::new(l.description.clone(), l.score * DISPLAY_SCALE))
            .collect(),
        debug: ClassificationDebug {
            total_score,
            max_score,
            threshold: MAX_SCORE_THRESHOLD,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn empty_input_is_not_a_hotdog() {
        let result = classify(&[]);
        assert!(!result.is_hotdog);
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.debug.total_score, 0.0);
        assert_eq!(result.debug.max_score, 0.0);
        assert_eq!(result.debug.threshold, MAX_SCORE_THRESHOLD);
        assert!(result.labels.is_empty());
    }

    #[test]
    fn unrecognized_labels_score_zero() {
        let result = classify(&[
            LabelObservation::new("Food", 0.99),
            LabelObservation::new("Tableware", 0.87),
        ]);
        assert!(!result.is_hotdog);
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.debug.total_score, 0.0);
        assert_eq!(result.labels.len(), 2);
    }

    #[test]
    fn direct_match_is_weighted_double_and_unclamped() {
        let result = classify(&[LabelObservation::new("Hot Dog", 0.9)]);
        assert!(result.is_hotdog);
        assert!(approx(result.debug.max_score, 1.8));
        assert!(approx(result.debug.total_score, 1.8));
        assert!(approx(result.confidence, 180.0));
    }

    #[test]
    fn close_match_clears_max_threshold() {
        let result = classify(&[LabelObservation::new("wiener", 0.5)]);
        assert!(approx(result.debug.max_score, 0.75));
        assert!(approx(result.debug.total_score, 0.75));
        assert!(result.is_hotdog);
    }

    #[test]
    fn related_match_alone_can_fall_short() {
        let result = classify(&[LabelObservation::new("sausage", 0.5)]);
        assert!(approx(result.debug.max_score, 0.5));
        assert!(approx(result.debug.total_score, 0.5));
        assert!(!result.is_hotdog);
    }

    #[test]
    fn two_weak_related_labels_stay_below_total_threshold() {
        let result = classify(&[
            LabelObservation::new("sausage", 0.5),
            LabelObservation::new("bratwurst", 0.5),
        ]);
        assert!(approx(result.debug.total_score, 1.0));
        assert!(!result.is_hotdog);
    }

    #[test]
    fn additive_path_triggers_without_max_path() {
        let result = classify(&[
            LabelObservation::new("sausage", 0.45),
            LabelObservation::new("bratwurst", 0.45),
            LabelObservation::new("vienna sausage", 0.45),
        ]);
        assert!(result.debug.max_score < MAX_SCORE_THRESHOLD);
        assert!(result.debug.total_score > TOTAL_SCORE_THRESHOLD);
        assert!(result.is_hotdog);
    }

    #[test]
    fn tiers_are_exclusive_per_label() {
        // "hotdog" sits in both the direct and related sets; only x2 applies.
        let result = classify(&[LabelObservation::new("hotdog", 0.25)]);
        assert!(approx(result.debug.total_score, 0.5));
    }

    #[test]
    fn labels_are_echoed_in_order_and_scaled() {
        let input = vec![
            LabelObservation::new("Food", 0.97),
            LabelObservation::new("Hot dog", 0.91),
            LabelObservation::new("Fast food", 0.88),
        ];
        let result = classify(&input);

        let descriptions: Vec<_> = result.labels.iter().map(|l| l.description.as_str()).collect();
        assert_eq!(descriptions, ["Food", "Hot dog", "Fast food"]);
        assert!(approx(result.labels[0].score, 97.0));
        assert!(approx(result.labels[1].score, 91.0));
        assert!(approx(result.confidence, result.debug.max_score * 100.0));
    }

    #[test]
    fn confidence_stays_within_weighted_range() {
        let inputs = [
            vec![LabelObservation::new("hot dog", 1.0)],
            vec![LabelObservation::new("frankfurter", 1.0)],
            vec![
                LabelObservation::new("sausage", 1.0),
                LabelObservation::new("hotdog", 0.0),
            ],
        ];
        for labels in inputs {
            let result = classify(&labels);
            assert!((0.0..=200.0).contains(&result.confidence));
            assert!(approx(result.confidence, result.debug.max_score * 100.0));
        }
    }

    #[test]
    fn classification_is_repeatable() {
        let input = vec![
            LabelObservation::new("Sausage", 0.61),
            LabelObservation::new("Wiener", 0.33),
        ];
        assert_eq!(classify(&input), classify(&input));
    }

    #[test]
    fn serializes_with_client_field_names() {
        let result = classify(&[LabelObservation::new("hot dog", 0.5)]);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["isHotdog"], true);
        assert_eq!(json["confidence"], 100.0);
        assert_eq!(json["labels"][0]["description"], "hot dog");
        assert_eq!(json["labels"][0]["score"], 50.0);
        assert_eq!(json["debug"]["totalScore"], 1.0);
        assert_eq!(json["debug"]["maxScore"], 1.0);
        assert_eq!(json["debug"]["threshold"], 0.6);
    }
}
