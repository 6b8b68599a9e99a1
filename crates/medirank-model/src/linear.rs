//! Linear one-vs-rest classifier evaluated with Candle.
//!
//! Matches the export of a `LinearSVC` (or any one-vs-rest linear model):
//! one weight row and one intercept per class. A kernel `SVC` trains one
//! machine per class pair instead; load that with [`crate::SvcModel`].

use std::collections::HashMap;
use std::path::Path;
use std::time::Instant;

use candle_core::{DType, Device, Tensor};
use candle_nn::{Linear, Module};
use tracing::{debug, info};

use crate::artifacts::{load_classes, load_tensors, matrix, select_device, take_tensor};
use crate::{ModelConfig, ModelError, Result};

pub const COEF_TENSOR: &str = "coef";
pub const INTERCEPT_TENSOR: &str = "intercept";

/// Trained linear classifier: `scores = coef · x + intercept`.
///
/// Immutable after construction. Candle tensors are reference-counted and
/// `Send + Sync`, so one instance can serve every request concurrently.
pub struct LinearSvcModel {
    head: Linear,
    classes: Vec<String>,
    feature_count: usize,
    device: Device,
}

impl std::fmt::Debug for LinearSvcModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinearSvcModel")
            .field("classes", &self.classes.len())
            .field("feature_count", &self.feature_count)
            .field("device", &self.device)
            .finish()
    }
}

impl LinearSvcModel {
    /// Load weights and labels from the paths in `config`.
    pub fn load(config: &ModelConfig) -> Result<Self> {
        let start = Instant::now();
        info!("Loading classifier weights from {:?}", config.weights_path);

        let device = select_device(config.use_gpu);
        debug!("Using device: {:?}", device);

        let classes = load_classes(&config.classes_path)?;

        let mut tensors = load_tensors(&config.weights_path, &device)?;
        let coef = take_tensor(&mut tensors, COEF_TENSOR)?;
        let intercept = take_tensor(&mut tensors, INTERCEPT_TENSOR)?;

        let model = Self::from_tensors(coef, intercept, classes, device)?;
        info!(
            "Classifier loaded in {:?}: {} classes, {} features",
            start.elapsed(),
            model.classes.len(),
            model.feature_count
        );
        Ok(model)
    }

    /// Build a model from in-memory tensors. Both are converted to `f64`.
    pub fn from_tensors(
        coef: Tensor,
        intercept: Tensor,
        classes: Vec<String>,
        device: Device,
    ) -> Result<Self> {
        let (rows, feature_count) = coef
            .dims2()
            .map_err(|_| ModelError::Shape(format!("coef must be 2-D, got {:?}", coef.shape())))?;
        let bias_len = intercept
            .dims1()
            .map_err(|_| ModelError::Shape(format!("intercept must be 1-D, got {:?}", intercept.shape())))?;

        if rows != bias_len {
            return Err(ModelError::Shape(format!(
                "coef has {} rows but intercept has {} entries",
                rows, bias_len
            )));
        }
        if rows != classes.len() {
            return Err(ModelError::Shape(format!(
                "coef has {} rows but {} class labels were given",
                rows,
                classes.len()
            )));
        }

        let coef = coef.to_dtype(DType::F64)?.to_device(&device)?;
        let intercept = intercept.to_dtype(DType::F64)?.to_device(&device)?;

        Ok(Self {
            head: Linear::new(coef, Some(intercept)),
            classes,
            feature_count,
            device,
        })
    }

    /// Convenience constructor from row-major weights, used by fixtures and tools.
    pub fn from_rows(coef: Vec<Vec<f64>>, intercept: Vec<f64>, classes: Vec<String>) -> Result<Self> {
        let coef = matrix(coef, COEF_TENSOR)?;
        let bias_len = intercept.len();
        let intercept = Tensor::from_vec(intercept, bias_len, &Device::Cpu)?;
        Self::from_tensors(coef, intercept, classes, Device::Cpu)
    }

    /// Per-class decision scores for one symptom vector, index-aligned with `classes()`.
    pub fn decision_function(&self, symptoms: &[f64]) -> Result<Vec<f64>> {
        if symptoms.len() != self.feature_count {
            return Err(ModelError::InvalidInput(format!(
                "expected {} symptom features, got {}",
                self.feature_count,
                symptoms.len()
            )));
        }

        let input = Tensor::from_slice(symptoms, (1, self.feature_count), &self.device)?;
        let scores = self.head.forward(&input)?.squeeze(0)?;
        Ok(scores.to_vec1::<f64>()?)
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn feature_count(&self) -> usize {
        self.feature_count
    }

    /// Write weights and labels in the format `load` reads.
    pub fn save(&self, weights_path: impl AsRef<Path>, classes_path: impl AsRef<Path>) -> Result<()> {
        let mut tensors: HashMap<String, Tensor> = HashMap::new();
        tensors.insert(COEF_TENSOR.to_string(), self.head.weight().to_device(&Device::Cpu)?);
        if let Some(bias) = self.head.bias() {
            tensors.insert(INTERCEPT_TENSOR.to_string(), bias.to_device(&Device::Cpu)?);
        }
        candle_core::safetensors::save(&tensors, weights_path.as_ref())?;
        std::fs::write(classes_path.as_ref(), serde_json::to_vec_pretty(&self.classes)?)?;
        Ok(())
    }
}
