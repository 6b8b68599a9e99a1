//! Medirank Classifier
//!
//! Disease classifiers evaluated with Candle. No Python dependency: weights
//! are read from safetensors exports.
//!
//! # Formats
//! - [`LinearSvcModel`] (`kind = "linear"`): one-vs-rest linear head, as fitted
//!   by `LinearSVC`. `svc.safetensors` holds `coef` `[n_classes, n_features]`
//!   and `intercept` `[n_classes]`.
//! - [`SvcModel`] (`kind = "svc"`): kernel `SVC` with one machine per class
//!   pair. `svc.safetensors` holds `support_vectors` `[n_sv, n_features]`,
//!   `dual_coef` `[n_classes - 1, n_sv]` and `intercept`
//!   `[n_classes * (n_classes - 1) / 2]`; `svc_header.json` holds the kernel
//!   and `n_support`. Scores match `SVC.decision_function` with
//!   `decision_function_shape="ovr"`.
//!
//! Both read `classes.json`, a JSON array of labels in score order.
//!
//! # Exporting a fitted scikit-learn SVC
//! Take `support_vectors_`, `_dual_coef_`, `_intercept_`, `n_support_`,
//! `classes_` and the numeric `_gamma` (plus `coef0`/`degree` for poly and
//! sigmoid kernels). The underscored attributes keep libsvm's sign convention,
//! which the public ones flip for two-class models.
//!
//! # Example
//! ```rust,no_run
//! use medirank_model::{LinearSvcModel, ModelConfig};
//!
//! fn main() -> medirank_model::Result<()> {
//!     let model = LinearSvcModel::load(&ModelConfig::default())?;
//!     let symptoms = vec![0.0; model.feature_count()];
//!     let scores = model.decision_function(&symptoms)?;
//!     println!("{} classes scored", scores.len());
//!     Ok(())
//! }
//! ```

mod artifacts;
pub mod config;
pub mod error;
pub mod linear;
pub mod svc;

pub use config::{ModelConfig, ModelKind};
pub use error::{ModelError, Result};
pub use linear::LinearSvcModel;
pub use svc::{Kernel, SvcHeader, SvcModel};
