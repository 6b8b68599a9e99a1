//! Helpers shared by the exported model formats.

use std::collections::HashMap;
use std::path::Path;

use candle_core::{Device, Tensor};
use tracing::{debug, info};

use crate::{ModelError, Result};

/// Read a JSON array of class labels.
pub(crate) fn load_classes(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| ModelError::ModelLoad(format!("{:?}: {}", path, e)))?;
    let classes: Vec<String> = serde_json::from_str(&content)?;
    debug!("Loaded {} class labels from {:?}", classes.len(), path);
    Ok(classes)
}

/// Read every tensor in a safetensors file onto `device`.
pub(crate) fn load_tensors(path: &Path, device: &Device) -> Result<HashMap<String, Tensor>> {
    candle_core::safetensors::load(path, device)
        .map_err(|e| ModelError::ModelLoad(format!("{:?}: {}", path, e)))
}

pub(crate) fn take_tensor(tensors: &mut HashMap<String, Tensor>, name: &str) -> Result<Tensor> {
    tensors
        .remove(name)
        .ok_or_else(|| ModelError::ModelLoad(format!("missing tensor '{}'", name)))
}

/// Row-major `Vec<Vec<f64>>` → 2-D CPU tensor. Rows must share a length.
pub(crate) fn matrix(rows: Vec<Vec<f64>>, name: &str) -> Result<Tensor> {
    let n = rows.len();
    let cols = rows.first().map(Vec::len).unwrap_or(0);
    if rows.iter().any(|row| row.len() != cols) {
        return Err(ModelError::Shape(format!("{} rows have differing lengths", name)));
    }
    let flat: Vec<f64> = rows.into_iter().flatten().collect();
    Ok(Tensor::from_vec(flat, (n, cols), &Device::Cpu)?)
}

/// Select the best available device.
pub(crate) fn select_device(use_gpu: bool) -> Device {
    if !use_gpu {
        return Device::Cpu;
    }

    #[cfg(feature = "cuda")]
    {
        match Device::new_cuda(0) {
            Ok(device) => {
                info!("CUDA device available");
                return device;
            }
            Err(e) => {
                tracing::warn!("CUDA not available: {}, falling back to CPU", e);
            }
        }
    }

    #[cfg(feature = "metal")]
    {
        match Device::new_metal(0) {
            Ok(device) => {
                info!("Metal device available");
                return device;
            }
            Err(e) => {
                tracing::warn!("Metal not available: {}, falling back to CPU", e);
            }
        }
    }

    info!("GPU requested but unavailable, using CPU");
    Device::Cpu
}
