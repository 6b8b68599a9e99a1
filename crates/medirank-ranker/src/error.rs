use medirank_model::ModelError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RankError>;

#[derive(Debug, Error)]
pub enum RankError {
    /// The symptom vector cannot be scored as given.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Model error: {0}")]
    Model(ModelError),

    #[error("Classifier returned {scores} scores for {classes} classes")]
    ScoreMismatch { scores: usize, classes: usize },

    #[error("Classifier has no classes")]
    EmptyModel,

    #[error("Knowledge table error: {0}")]
    Table(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RankError {
    /// True when the caller, not the service, is at fault.
    pub fn is_client_error(&self) -> bool {
        matches!(self, RankError::InvalidInput(_))
    }
}

impl From<ModelError> for RankError {
    fn from(e: ModelError) -> Self {
        match e {
            ModelError::InvalidInput(msg) => RankError::InvalidInput(msg),
            other => RankError::Model(other),
        }
    }
}
