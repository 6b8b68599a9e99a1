//! Trait for per-class decision scores.
//!
//! Isolates the ranker from any particular ML runtime: anything that can score
//! a symptom vector and list its class labels in matching order will do.

use medirank_model::{LinearSvcModel, SvcModel};

use crate::{RankError, Result};

/// A trained multi-class classifier.
///
/// Implementations are shared across request handlers, so they must be
/// immutable after construction.
pub trait Classifier: Send + Sync {
    /// One real-valued score per class, index-aligned with `classes()`.
    fn decision_scores(&self, symptoms: &[f64]) -> Result<Vec<f64>>;

    /// Class labels in score order.
    fn classes(&self) -> &[String];

    /// Expected symptom vector length.
    fn feature_count(&self) -> usize;
}

// ── Fixed-score Implementation for Testing ─────────────────────────────────

/// Classifier that returns the same scores for every valid input.
pub struct StaticClassifier {
    classes: Vec<String>,
    scores: Vec<f64>,
    feature_count: usize,
}

impl StaticClassifier {
    pub fn new(feature_count: usize) -> Self {
        Self {
            classes: Vec::new(),
            scores: Vec::new(),
            feature_count,
        }
    }

    /// Append a class with its fixed score.
    pub fn with(mut self, disease: &str, score: f64) -> Self {
        self.classes.push(disease.to_string());
        self.scores.push(score);
        self
    }
}

impl Classifier for StaticClassifier {
    fn decision_scores(&self, symptoms: &[f64]) -> Result<Vec<f64>> {
        if symptoms.len() != self.feature_count {
            return Err(RankError::InvalidInput(format!(
                "expected {} symptom features, got {}",
                self.feature_count,
                symptoms.len()
            )));
        }
        Ok(self.scores.clone())
    }

    fn classes(&self) -> &[String] {
        &self.classes
    }

    fn feature_count(&self) -> usize {
        self.feature_count
    }
}

// ── Adapter for LinearSvcModel ──────────────────────────────────────────────

/// Adapter that wraps medirank_model::LinearSvcModel to implement Classifier.
pub struct LinearSvcAdapter {
    model: LinearSvcModel,
}

impl LinearSvcAdapter {
    pub fn new(model: LinearSvcModel) -> Self {
        Self { model }
    }

    /// Get the underlying model.
    pub fn model(&self) -> &LinearSvcModel {
        &self.model
    }
}

impl Classifier for LinearSvcAdapter {
    fn decision_scores(&self, symptoms: &[f64]) -> Result<Vec<f64>> {
        Ok(self.model.decision_function(symptoms)?)
    }

    fn classes(&self) -> &[String] {
        self.model.classes()
    }

    fn feature_count(&self) -> usize {
        self.model.feature_count()
    }
}

// ── Adapter for SvcModel ────────────────────────────────────────────────────

/// Adapter that wraps medirank_model::SvcModel to implement Classifier.
pub struct SvcAdapter {
    model: SvcModel,
}

impl SvcAdapter {
    pub fn new(model: SvcModel) -> Self {
        Self { model }
    }

    /// Get the underlying model.
    pub fn model(&self) -> &SvcModel {
        &self.model
    }
}

impl Classifier for SvcAdapter {
    fn decision_scores(&self, symptoms: &[f64]) -> Result<Vec<f64>> {
        Ok(self.model.decision_function(symptoms)?)
    }

    fn classes(&self) -> &[String] {
        self.model.classes()
    }

    fn feature_count(&self) -> usize {
        self.model.feature_count()
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_classifier() {
        let clf = StaticClassifier::new(3)
            .with("Malaria", 1.5)
            .with("Dengue", -0.5);

        assert_eq!(clf.classes(), ["Malaria".to_string(), "Dengue".to_string()]);
        assert_eq!(clf.decision_scores(&[0.0, 1.0, 0.0]).unwrap(), vec![1.5, -0.5]);
        assert!(matches!(
            clf.decision_scores(&[0.0]),
            Err(RankError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_adapter_maps_shape_error_to_invalid_input() {
        let model = LinearSvcModel::from_rows(
            vec![vec![1.0, 0.0], vec![0.0, 1.0]],
            vec![0.0, 0.0],
            vec!["Acne".to_string(), "Psoriasis".to_string()],
        )
        .unwrap();
        let adapter = LinearSvcAdapter::new(model);

        assert_eq!(adapter.feature_count(), 2);
        assert_eq!(adapter.decision_scores(&[3.0, 1.0]).unwrap(), vec![3.0, 1.0]);
        let err = adapter.decision_scores(&[1.0, 2.0, 3.0]).unwrap_err();
        assert!(err.is_client_error());
    }

    #[test]
    fn test_svc_adapter_scores_every_class() {
        use medirank_model::{Kernel, SvcHeader};

        let model = SvcModel::from_parts(
            vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![1.0, 1.0]],
            vec![vec![1.0, -1.0, 0.5], vec![0.5, 1.0, -1.0]],
            vec![0.0, 0.1, -0.1],
            SvcHeader { kernel: Kernel::Rbf { gamma: 0.2 }, n_support: vec![1, 1, 1] },
            vec!["Jaundice".to_string(), "Hepatitis A".to_string(), "Typhoid".to_string()],
        )
        .unwrap();
        let adapter = SvcAdapter::new(model);

        assert_eq!(adapter.classes().len(), 3);
        assert_eq!(adapter.feature_count(), 2);
        let scores = adapter.decision_scores(&[1.0, 0.0]).unwrap();
        assert_eq!(scores.len(), 3);
        // three pairs hand out three votes
        assert_eq!(scores.iter().map(|s| s.round()).sum::<f64>(), 3.0);

        let err = adapter.decision_scores(&[1.0]).unwrap_err();
        assert!(err.is_client_error());
    }
}
