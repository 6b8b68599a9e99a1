//! medirank-ranker: Top-K disease ranking over classifier decision scores.

pub mod classifier;
pub mod error;
pub mod knowledge;
pub mod normalise;
pub mod ranker;

pub use classifier::{Classifier, LinearSvcAdapter, StaticClassifier, SvcAdapter};
pub use error::{RankError, Result};
pub use knowledge::{DescriptionTable, DiseaseKnowledge, PrecautionTable};
pub use ranker::{DiseaseRanker, PredictionResult, DEFAULT_TOP_K};
