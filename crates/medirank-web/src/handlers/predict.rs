//! Disease prediction API.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use medirank_common::error::ApiError;
use medirank_ranker::{PredictionResult, RankError};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::state::SharedState;

/// `symptoms` is required. A missing field is a client error rather than an
/// empty vector handed to the model.
#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    pub symptoms: Vec<f64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PredictResponse {
    pub predictions: Vec<PredictionResult>,
}

/// POST /predict: rank diseases for a symptom vector
pub async fn predict(
    State(state): State<SharedState>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<PredictResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let expected = state.ranker.classifier().feature_count();
    if request.symptoms.len() != expected {
        return Err(ApiError::InvalidInput(format!(
            "expected {} symptom values, got {}",
            expected,
            request.symptoms.len()
        )));
    }

    let predictions = state.ranker.rank(&request.symptoms).map_err(rank_error)?;
    debug!(
        "Predicted {} diseases for {} active symptoms",
        predictions.len(),
        request.symptoms.iter().filter(|v| **v != 0.0).count()
    );

    Ok(Json(PredictResponse { predictions }))
}

fn rank_error(e: RankError) -> ApiError {
    if e.is_client_error() {
        ApiError::InvalidInput(e.to_string())
    } else {
        ApiError::Inference(e.to_string())
    }
}
