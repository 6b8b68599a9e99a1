//! medirank-web: HTTP front for the disease ranker.
//!   - POST /predict  symptom vector → top-5 diseases
//!   - GET  /health   load status

pub mod router;
pub mod handlers;
pub mod state;
