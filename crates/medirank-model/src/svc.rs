//! Kernel SVC with one-vs-one voting, evaluated with Candle.
//!
//! A multi-class SVC trains one binary machine per class pair. Each pair's
//! decision is `sum(dual_coef * K(support_vectors, x)) + intercept`, and the
//! pairwise results fold into one score per class as
//! `votes + confidence / (3 * (|confidence| + 1))`. The scaled confidence stays
//! inside (-1/3, 1/3), so it only reorders classes with equal vote counts.

use std::collections::HashMap;
use std::ops::Range;
use std::path::Path;
use std::time::Instant;

use candle_core::{DType, Device, Tensor};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::artifacts::{load_classes, load_tensors, matrix, select_device, take_tensor};
use crate::{ModelConfig, ModelError, Result};

pub const SUPPORT_VECTORS_TENSOR: &str = "support_vectors";
pub const DUAL_COEF_TENSOR: &str = "dual_coef";
pub const INTERCEPT_TENSOR: &str = "intercept";

/// Kernel function and its fitted parameters.
///
/// `gamma` is the numeric value the model was trained with, not `"scale"`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Kernel {
    /// `<x, sv>`
    Linear,
    /// `exp(-gamma * |x - sv|^2)`
    Rbf { gamma: f64 },
    /// `(gamma * <x, sv> + coef0)^degree`
    Poly { gamma: f64, coef0: f64, degree: u32 },
    /// `tanh(gamma * <x, sv> + coef0)`
    Sigmoid { gamma: f64, coef0: f64 },
}

/// Non-tensor half of an SVC export.
///
/// ```json
/// {"kernel": {"type": "rbf", "gamma": 0.0076}, "n_support": [12, 9, 14]}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SvcHeader {
    pub kernel: Kernel,
    /// Support vectors per class, in class order. The rows of
    /// `support_vectors` are grouped by class in the same order.
    pub n_support: Vec<usize>,
}

/// Trained multi-class kernel SVC.
pub struct SvcModel {
    /// [n_sv, n_features]
    support_vectors: Tensor,
    /// Squared norm of each support vector, for the RBF kernel.
    sv_norms: Tensor,
    /// [n_classes - 1, n_sv]
    dual_coef: Tensor,
    /// One per class pair, in (0,1), (0,2), ..., (1,2), ... order.
    intercept: Vec<f64>,
    header: SvcHeader,
    /// Rows of `support_vectors` belonging to each class.
    class_ranges: Vec<Range<usize>>,
    classes: Vec<String>,
    feature_count: usize,
    device: Device,
}

impl std::fmt::Debug for SvcModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SvcModel")
            .field("classes", &self.classes.len())
            .field("feature_count", &self.feature_count)
            .field("support_vectors", &self.support_vector_count())
            .field("kernel", &self.header.kernel)
            .field("device", &self.device)
            .finish()
    }
}

impl SvcModel {
    /// Load tensors, labels and header from the paths in `config`.
    pub fn load(config: &ModelConfig) -> Result<Self> {
        let start = Instant::now();
        info!("Loading SVC weights from {:?}", config.weights_path);

        let device = select_device(config.use_gpu);
        debug!("Using device: {:?}", device);

        let classes = load_classes(&config.classes_path)?;
        let header = Self::load_header(&config.header_path)?;

        let mut tensors = load_tensors(&config.weights_path, &device)?;
        let support_vectors = take_tensor(&mut tensors, SUPPORT_VECTORS_TENSOR)?;
        let dual_coef = take_tensor(&mut tensors, DUAL_COEF_TENSOR)?;
        let intercept = take_tensor(&mut tensors, INTERCEPT_TENSOR)?;

        let model = Self::from_tensors(support_vectors, dual_coef, intercept, header, classes, device)?;
        info!(
            "SVC loaded in {:?}: {} classes, {} features, {} support vectors, {:?} kernel",
            start.elapsed(),
            model.classes.len(),
            model.feature_count,
            model.support_vector_count(),
            model.header.kernel
        );
        Ok(model)
    }

    /// Build a model from in-memory tensors. All are converted to `f64`.
    pub fn from_tensors(
        support_vectors: Tensor,
        dual_coef: Tensor,
        intercept: Tensor,
        header: SvcHeader,
        classes: Vec<String>,
        device: Device,
    ) -> Result<Self> {
        let n_classes = classes.len();
        if n_classes < 2 {
            return Err(ModelError::Shape(format!(
                "an SVC needs at least 2 classes, got {}",
                n_classes
            )));
        }
        if header.n_support.len() != n_classes {
            return Err(ModelError::Shape(format!(
                "n_support has {} entries but {} class labels were given",
                header.n_support.len(),
                n_classes
            )));
        }

        let (n_sv, feature_count) = support_vectors.dims2().map_err(|_| {
            ModelError::Shape(format!(
                "support_vectors must be 2-D, got {:?}",
                support_vectors.shape()
            ))
        })?;
        let declared: usize = header.n_support.iter().sum();
        if declared != n_sv {
            return Err(ModelError::Shape(format!(
                "n_support sums to {} but there are {} support vectors",
                declared, n_sv
            )));
        }

        let coef_dims = dual_coef
            .dims2()
            .map_err(|_| ModelError::Shape(format!("dual_coef must be 2-D, got {:?}", dual_coef.shape())))?;
        if coef_dims != (n_classes - 1, n_sv) {
            return Err(ModelError::Shape(format!(
                "dual_coef must be [{}, {}], got {:?}",
                n_classes - 1,
                n_sv,
                coef_dims
            )));
        }

        let pairs = n_classes * (n_classes - 1) / 2;
        let intercept: Vec<f64> = intercept
            .to_dtype(DType::F64)?
            .to_vec1()
            .map_err(|_| ModelError::Shape(format!("intercept must be 1-D, got {:?}", intercept.shape())))?;
        if intercept.len() != pairs {
            return Err(ModelError::Shape(format!(
                "{} classes need {} pairwise intercepts, got {}",
                n_classes,
                pairs,
                intercept.len()
            )));
        }

        let mut class_ranges = Vec::with_capacity(n_classes);
        let mut offset = 0;
        for &count in &header.n_support {
            class_ranges.push(offset..offset + count);
            offset += count;
        }

        let support_vectors = support_vectors.to_dtype(DType::F64)?.to_device(&device)?;
        let dual_coef = dual_coef.to_dtype(DType::F64)?.to_device(&device)?;
        let sv_norms = support_vectors.sqr()?.sum(1)?;

        Ok(Self {
            support_vectors,
            sv_norms,
            dual_coef,
            intercept,
            header,
            class_ranges,
            classes,
            feature_count,
            device,
        })
    }

    /// Convenience constructor from row-major arrays, used by fixtures and tools.
    pub fn from_parts(
        support_vectors: Vec<Vec<f64>>,
        dual_coef: Vec<Vec<f64>>,
        intercept: Vec<f64>,
        header: SvcHeader,
        classes: Vec<String>,
    ) -> Result<Self> {
        let support_vectors = matrix(support_vectors, SUPPORT_VECTORS_TENSOR)?;
        let dual_coef = matrix(dual_coef, DUAL_COEF_TENSOR)?;
        let pairs = intercept.len();
        let intercept = Tensor::from_vec(intercept, pairs, &Device::Cpu)?;
        Self::from_tensors(support_vectors, dual_coef, intercept, header, classes, Device::Cpu)
    }

    /// One score per class, index-aligned with `classes()`.
    pub fn decision_function(&self, symptoms: &[f64]) -> Result<Vec<f64>> {
        let pairwise = self.pairwise_decisions(symptoms)?;
        Ok(ovo_to_ovr(&pairwise, self.classes.len()))
    }

    /// Raw one-vs-one decisions, one per class pair in (0,1), (0,2), ... order.
    /// Positive favours the lower-indexed class of the pair.
    pub fn pairwise_decisions(&self, symptoms: &[f64]) -> Result<Vec<f64>> {
        if symptoms.len() != self.feature_count {
            return Err(ModelError::InvalidInput(format!(
                "expected {} symptom features, got {}",
                self.feature_count,
                symptoms.len()
            )));
        }

        let kernel = self.kernel_row(symptoms)?;
        // weighted[r][s] = dual_coef[r][s] * K(sv_s, x)
        let weighted: Vec<Vec<f64>> = self
            .dual_coef
            .broadcast_mul(&kernel.unsqueeze(0)?)?
            .to_vec2()?;

        let n = self.classes.len();
        let mut decisions = Vec::with_capacity(self.intercept.len());
        let mut pair = 0;
        for i in 0..n {
            for j in (i + 1)..n {
                let from_i: f64 = weighted[j - 1][self.class_ranges[i].clone()].iter().sum();
                let from_j: f64 = weighted[i][self.class_ranges[j].clone()].iter().sum();
                decisions.push(from_i + from_j + self.intercept[pair]);
                pair += 1;
            }
        }
        Ok(decisions)
    }

    /// K(sv, x) for every support vector, as a [n_sv] tensor.
    fn kernel_row(&self, symptoms: &[f64]) -> Result<Tensor> {
        let x = Tensor::from_slice(symptoms, (self.feature_count, 1), &self.device)?;
        let dots = self.support_vectors.matmul(&x)?.squeeze(1)?;

        let row = match self.header.kernel {
            Kernel::Linear => dots,
            Kernel::Rbf { gamma } => {
                let x_norm: f64 = symptoms.iter().map(|v| v * v).sum();
                // |x - sv|^2 = |sv|^2 - 2<x, sv> + |x|^2
                dots.affine(-2.0, x_norm)?
                    .add(&self.sv_norms)?
                    .affine(-gamma, 0.0)?
                    .exp()?
            }
            Kernel::Poly { gamma, coef0, degree } => dots.affine(gamma, coef0)?.powf(degree as f64)?,
            Kernel::Sigmoid { gamma, coef0 } => dots.affine(gamma, coef0)?.tanh()?,
        };
        Ok(row)
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn feature_count(&self) -> usize {
        self.feature_count
    }

    pub fn kernel(&self) -> Kernel {
        self.header.kernel
    }

    pub fn support_vector_count(&self) -> usize {
        self.class_ranges.last().map(|r| r.end).unwrap_or(0)
    }

    /// Write tensors, labels and header in the format `load` reads.
    pub fn save(
        &self,
        weights_path: impl AsRef<Path>,
        classes_path: impl AsRef<Path>,
        header_path: impl AsRef<Path>,
    ) -> Result<()> {
        let mut tensors: HashMap<String, Tensor> = HashMap::new();
        tensors.insert(
            SUPPORT_VECTORS_TENSOR.to_string(),
            self.support_vectors.to_device(&Device::Cpu)?,
        );
        tensors.insert(DUAL_COEF_TENSOR.to_string(), self.dual_coef.to_device(&Device::Cpu)?);
        let pairs = self.intercept.len();
        tensors.insert(
            INTERCEPT_TENSOR.to_string(),
            Tensor::from_slice(&self.intercept, pairs, &Device::Cpu)?,
        );
        candle_core::safetensors::save(&tensors, weights_path.as_ref())?;
        std::fs::write(classes_path.as_ref(), serde_json::to_vec_pretty(&self.classes)?)?;
        std::fs::write(header_path.as_ref(), serde_json::to_vec_pretty(&self.header)?)?;
        Ok(())
    }

    fn load_header(path: &Path) -> Result<SvcHeader> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ModelError::ModelLoad(format!("{:?}: {}", path, e)))?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// Fold one-vs-one decisions into one score per class.
///
/// For pair (i, j) a decision >= 0 is a vote for `i`, otherwise for `j`; the
/// decision itself adds to `i`'s confidence and subtracts from `j`'s.
pub fn ovo_to_ovr(decisions: &[f64], n_classes: usize) -> Vec<f64> {
    let mut votes = vec![0.0; n_classes];
    let mut confidence = vec![0.0; n_classes];

    let mut pair = 0;
    for i in 0..n_classes {
        for j in (i + 1)..n_classes {
            let Some(&d) = decisions.get(pair) else {
                break;
            };
            if d < 0.0 {
                votes[j] += 1.0;
            } else {
                votes[i] += 1.0;
            }
            confidence[i] += d;
            confidence[j] -= d;
            pair += 1;
        }
    }

    votes
        .iter()
        .zip(&confidence)
        .map(|(v, c)| v + c / (3.0 * (c.abs() + 1.0)))
        .collect()
}
