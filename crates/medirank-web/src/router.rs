//! Axum router: maps all URL paths to handlers.

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::CorsLayer,
    trace::TraceLayer,
};
use std::sync::Arc;
use crate::state::{AppState, SharedState};
use crate::handlers::{
    predict::predict,
    system::health,
};

/// Build and return the full Axum router.
pub fn build_router(state: AppState, cors: bool) -> Router {
    let shared: SharedState = Arc::new(state);

    let router = Router::new()
        .route("/predict", post(predict))
        .route("/health",  get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(shared);

    if cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}
