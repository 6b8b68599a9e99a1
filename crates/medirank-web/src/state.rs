//! Shared application state for the web server.

use std::sync::Arc;

use anyhow::Context;
use chrono::{DateTime, Utc};
use medirank_config::Config;
use medirank_model::{LinearSvcModel, ModelConfig, ModelKind, SvcModel};
use medirank_ranker::{Classifier, DiseaseKnowledge, DiseaseRanker, LinearSvcAdapter, SvcAdapter};
use tracing::info;

/// Shared state injected into every Axum handler.
///
/// Built once at startup and never mutated, so handlers read it without locks.
pub struct AppState {
    pub ranker: DiseaseRanker,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(ranker: DiseaseRanker) -> Self {
        Self {
            ranker,
            started_at: Utc::now(),
        }
    }

    /// Load the classifier and both knowledge tables from the configured paths.
    pub fn load(config: &Config) -> anyhow::Result<Self> {
        let classifier = load_classifier(&ModelConfig::from(&config.model))
            .with_context(|| format!("Failed to load classifier from {}", config.model.weights_path))?;

        let knowledge = DiseaseKnowledge::load(
            &config.knowledge.descriptions_path,
            &config.knowledge.precautions_path,
        )
        .context("Failed to load disease knowledge tables")?;

        let unknown = classifier
            .classes()
            .iter()
            .filter(|c| knowledge.descriptions.get(c).is_none())
            .count();
        if unknown > 0 {
            tracing::warn!("{} model classes have no description row", unknown);
        }

        info!(
            "Ranker ready: {} classes, {} features, {} descriptions, {} precautions",
            classifier.classes().len(),
            classifier.feature_count(),
            knowledge.descriptions.len(),
            knowledge.precautions.len()
        );

        let ranker = DiseaseRanker::new(classifier, Arc::new(knowledge)).with_top_k(config.ranking.top_k);
        Ok(Self::new(ranker))
    }
}

fn load_classifier(config: &ModelConfig) -> medirank_model::Result<Arc<dyn Classifier>> {
    let classifier: Arc<dyn Classifier> = match config.kind {
        ModelKind::Linear => Arc::new(LinearSvcAdapter::new(LinearSvcModel::load(config)?)),
        ModelKind::Svc => Arc::new(SvcAdapter::new(SvcModel::load(config)?)),
    };
    Ok(classifier)
}

pub type SharedState = Arc<AppState>;
