//! Service health.

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::SharedState;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub classes: usize,
    pub features: usize,
    pub descriptions: usize,
    pub precautions: usize,
    pub started_at: DateTime<Utc>,
}

/// GET /health
pub async fn health(State(state): State<SharedState>) -> Json<HealthResponse> {
    let classifier = state.ranker.classifier();
    let knowledge = state.ranker.knowledge();

    Json(HealthResponse {
        status: "ok".to_string(),
        classes: classifier.classes().len(),
        features: classifier.feature_count(),
        descriptions: knowledge.descriptions.len(),
        precautions: knowledge.precautions.len(),
        started_at: state.started_at,
    })
}
