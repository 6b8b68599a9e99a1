//! Top-K disease ranking.
//!
//! 1. Score the symptom vector with the classifier (one score per class).
//! 2. Keep the `k` highest scores; ties keep ascending class-index order.
//! 3. Turn those `k` scores into a distribution with `log_shifted_softmax`.
//! 4. Attach description and precautions, falling back to placeholders.
//!
//! The probabilities are normalised over the selected `k` scores only and are
//! not calibrated posteriors.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::classifier::Classifier;
use crate::knowledge::DiseaseKnowledge;
use crate::normalise::{log_shifted_softmax, to_percent, top_k_indices};
use crate::{RankError, Result};

pub const DEFAULT_TOP_K: usize = 5;

/// One ranked disease.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub disease: String,
    /// Percentage in [0, 100], rounded to 2 decimals.
    pub probability: f64,
    pub description: String,
    pub precautions: String,
}

/// Ranks diseases for a symptom vector. Immutable; share behind `Arc`.
#[derive(Clone)]
pub struct DiseaseRanker {
    classifier: Arc<dyn Classifier>,
    knowledge: Arc<DiseaseKnowledge>,
    top_k: usize,
}

impl DiseaseRanker {
    pub fn new(classifier: Arc<dyn Classifier>, knowledge: Arc<DiseaseKnowledge>) -> Self {
        Self {
            classifier,
            knowledge,
            top_k: DEFAULT_TOP_K,
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k.max(1);
        self
    }

    /// Up to `top_k` results (fewer when the model has fewer classes),
    /// highest probability first.
    pub fn rank(&self, symptoms: &[f64]) -> Result<Vec<PredictionResult>> {
        let scores = self.classifier.decision_scores(symptoms)?;
        rank_scores(&scores, self.classifier.classes(), &self.knowledge, self.top_k)
    }

    pub fn classifier(&self) -> &dyn Classifier {
        self.classifier.as_ref()
    }

    pub fn knowledge(&self) -> &DiseaseKnowledge {
        &self.knowledge
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }
}

/// Rank precomputed decision scores against their class labels.
pub fn rank_scores(
    scores: &[f64],
    classes: &[String],
    knowledge: &DiseaseKnowledge,
    k: usize,
) -> Result<Vec<PredictionResult>> {
    if classes.is_empty() {
        return Err(RankError::EmptyModel);
    }
    if scores.len() != classes.len() {
        return Err(RankError::ScoreMismatch {
            scores: scores.len(),
            classes: classes.len(),
        });
    }

    let top = top_k_indices(scores, k);
    let selected: Vec<f64> = top.iter().map(|&i| scores[i]).collect();
    let probabilities = log_shifted_softmax(&selected);

    let results: Vec<PredictionResult> = top
        .iter()
        .zip(probabilities)
        .map(|(&idx, p)| {
            let disease = &classes[idx];
            PredictionResult {
                disease: disease.clone(),
                probability: to_percent(p),
                description: knowledge.description(disease).to_string(),
                precautions: knowledge.precautions(disease).to_string(),
            }
        })
        .collect();

    debug!(
        "Ranked {} of {} classes, top: {:?}",
        results.len(),
        classes.len(),
        results.first().map(|r| (&r.disease, r.probability))
    );
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::StaticClassifier;
    use crate::knowledge::{DescriptionTable, PrecautionTable, NO_DESCRIPTION, NO_PRECAUTIONS};

    fn knowledge() -> Arc<DiseaseKnowledge> {
        Arc::new(DiseaseKnowledge::new(
            DescriptionTable::from_pairs([
                ("Malaria", "Mosquito-borne parasitic infection."),
                ("Dengue", "Viral infection spread by Aedes mosquitoes."),
                ("Typhoid", "Bacterial infection from Salmonella Typhi."),
            ]),
            PrecautionTable::from_pairs([
                ("Malaria", "Consult nearest hospital, avoid oily food"),
                ("Dengue", "drink papaya leaf juice, keep hydrated"),
            ]),
        ))
    }

    fn seven_class_ranker() -> DiseaseRanker {
        let clf = StaticClassifier::new(4)
            .with("Common Cold", 0.2)
            .with("Malaria", 3.1)
            .with("Dengue", 2.4)
            .with("Typhoid", 1.7)
            .with("Jaundice", -0.4)
            .with("Pneumonia", 0.9)
            .with("Migraine", -2.5);
        DiseaseRanker::new(Arc::new(clf), knowledge())
    }

    #[test]
    fn test_returns_five_sorted_results() {
        let results = seven_class_ranker().rank(&[1.0, 0.0, 1.0, 0.0]).unwrap();
        assert_eq!(results.len(), 5);
        let names: Vec<&str> = results.iter().map(|r| r.disease.as_str()).collect();
        assert_eq!(names, ["Malaria", "Dengue", "Typhoid", "Pneumonia", "Common Cold"]);
        assert!(results.windows(2).all(|w| w[0].probability >= w[1].probability));
    }

    #[test]
    fn test_probabilities_sum_to_hundred() {
        let results = seven_class_ranker().rank(&[0.0; 4]).unwrap();
        let total: f64 = results.iter().map(|r| r.probability).sum();
        // each entry carries at most 0.005 of rounding error
        assert!((total - 100.0).abs() <= 0.025, "total was {}", total);
    }

    #[test]
    fn test_metadata_lookup_and_placeholders() {
        let results = seven_class_ranker().rank(&[0.0; 4]).unwrap();
        let malaria = &results[0];
        assert_eq!(malaria.description, "Mosquito-borne parasitic infection.");
        assert_eq!(malaria.precautions, "Consult nearest hospital, avoid oily food");

        let typhoid = &results[2];
        assert_eq!(typhoid.description, "Bacterial infection from Salmonella Typhi.");
        assert_eq!(typhoid.precautions, NO_PRECAUTIONS);

        let pneumonia = &results[3];
        assert_eq!(pneumonia.description, NO_DESCRIPTION);
        assert_eq!(pneumonia.precautions, NO_PRECAUTIONS);
    }

    #[test]
    fn test_three_class_fixture() {
        let clf = StaticClassifier::new(3)
            .with("Allergy", 2.0)
            .with("GERD", 5.0)
            .with("Acne", -1.0);
        let ranker = DiseaseRanker::new(Arc::new(clf), Arc::new(DiseaseKnowledge::default()));

        let results = ranker.rank(&[0.0, 0.0, 0.0]).unwrap();
        let got: Vec<(&str, f64)> = results
            .iter()
            .map(|r| (r.disease.as_str(), r.probability))
            .collect();
        assert_eq!(got, [("GERD", 66.67), ("Allergy", 33.33), ("Acne", 0.0)]);
    }

    #[test]
    fn test_overflowed_score_keeps_probabilities_non_increasing() {
        let clf = StaticClassifier::new(1)
            .with("Hepatitis B", 5e307)
            .with("Hepatitis C", f64::INFINITY)
            .with("Hepatitis D", 1e308);
        let ranker = DiseaseRanker::new(Arc::new(clf), Arc::new(DiseaseKnowledge::default()));

        let results = ranker.rank(&[1.0]).unwrap();
        let got: Vec<(&str, f64)> = results
            .iter()
            .map(|r| (r.disease.as_str(), r.probability))
            .collect();
        assert_eq!(got, [("Hepatitis C", 100.0), ("Hepatitis D", 0.0), ("Hepatitis B", 0.0)]);
    }

    #[test]
    fn test_identical_scores_give_identical_output() {
        let ranker = seven_class_ranker();
        let a = ranker.rank(&[1.0, 1.0, 0.0, 0.0]).unwrap();
        let b = ranker.rank(&[0.0, 0.0, 1.0, 1.0]).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_ties_rank_lower_class_index_first() {
        let clf = StaticClassifier::new(1)
            .with("Hypertension", 1.0)
            .with("Diabetes", 1.0)
            .with("Arthritis", 0.5);
        let ranker = DiseaseRanker::new(Arc::new(clf), Arc::new(DiseaseKnowledge::default()));
        let results = ranker.rank(&[1.0]).unwrap();
        assert_eq!(results[0].disease, "Hypertension");
        assert_eq!(results[1].disease, "Diabetes");
        assert_eq!(results[0].probability, results[1].probability);
    }

    #[test]
    fn test_empty_model_is_error() {
        let ranker = DiseaseRanker::new(
            Arc::new(StaticClassifier::new(2)),
            Arc::new(DiseaseKnowledge::default()),
        );
        assert!(matches!(ranker.rank(&[0.0, 0.0]), Err(RankError::EmptyModel)));
    }

    #[test]
    fn test_wrong_length_propagates() {
        let err = seven_class_ranker().rank(&[1.0]).unwrap_err();
        assert!(err.is_client_error());
    }

    #[test]
    fn test_score_count_mismatch() {
        let classes = vec!["Malaria".to_string(), "Dengue".to_string()];
        let err = rank_scores(&[1.0], &classes, &DiseaseKnowledge::default(), 5).unwrap_err();
        assert!(matches!(err, RankError::ScoreMismatch { scores: 1, classes: 2 }));
    }

    #[test]
    fn test_custom_top_k() {
        let results = seven_class_ranker().with_top_k(2).rank(&[0.0; 4]).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].disease, "Malaria");
    }
}
