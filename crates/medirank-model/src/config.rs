//! Configuration for loading the classifier.
//!
//! Defaults come from `medirank_config::ModelConfig`; this type only swaps the
//! path strings for `PathBuf`s.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub use medirank_config::ModelKind;

/// Where the classifier artifacts live and how to run them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Export format of the artifacts below
    pub kind: ModelKind,

    /// safetensors file with the model tensors
    pub weights_path: PathBuf,

    /// JSON array of class labels in score order
    pub classes_path: PathBuf,

    /// JSON kernel parameters and support counts, read for `ModelKind::Svc`
    pub header_path: PathBuf,

    /// Use GPU if available (default: false)
    pub use_gpu: bool,
}

impl From<&medirank_config::ModelConfig> for ModelConfig {
    fn from(config: &medirank_config::ModelConfig) -> Self {
        Self {
            kind: config.kind,
            weights_path: PathBuf::from(&config.weights_path),
            classes_path: PathBuf::from(&config.classes_path),
            header_path: PathBuf::from(&config.header_path),
            use_gpu: config.use_gpu,
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self::from(&medirank_config::ModelConfig::default())
    }
}

impl ModelConfig {
    /// Linear one-vs-rest export.
    pub fn new(weights_path: impl Into<PathBuf>, classes_path: impl Into<PathBuf>) -> Self {
        Self {
            kind: ModelKind::Linear,
            weights_path: weights_path.into(),
            classes_path: classes_path.into(),
            ..Default::default()
        }
    }

    /// Kernel SVC export.
    pub fn svc(
        weights_path: impl Into<PathBuf>,
        classes_path: impl Into<PathBuf>,
        header_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            kind: ModelKind::Svc,
            weights_path: weights_path.into(),
            classes_path: classes_path.into(),
            header_path: header_path.into(),
            ..Default::default()
        }
    }

    /// Request GPU inference.
    pub fn with_gpu(mut self, use_gpu: bool) -> Self {
        self.use_gpu = use_gpu;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_follow_service_config() {
        let service = medirank_config::ModelConfig::default();
        let model = ModelConfig::default();
        assert_eq!(model.kind, service.kind);
        assert_eq!(model.weights_path, PathBuf::from(&service.weights_path));
        assert_eq!(model.classes_path, PathBuf::from(&service.classes_path));
        assert_eq!(model.header_path, PathBuf::from(&service.header_path));
        assert!(!model.use_gpu);
    }

    #[test]
    fn test_from_service_config() {
        let service = medirank_config::ModelConfig {
            kind: ModelKind::Svc,
            weights_path: "/srv/m.safetensors".to_string(),
            classes_path: "/srv/labels.json".to_string(),
            header_path: "/srv/header.json".to_string(),
            use_gpu: true,
        };
        assert_eq!(
            ModelConfig::from(&service),
            ModelConfig::svc("/srv/m.safetensors", "/srv/labels.json", "/srv/header.json").with_gpu(true)
        );
    }
}
