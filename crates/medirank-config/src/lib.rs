//! Configuration loading for Medirank.
//! Reads medirank.toml from the current directory or the path in MEDIRANK_CONFIG.

use medirank_common::error::{MedirankError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const CONFIG_ENV: &str = "MEDIRANK_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "medirank.toml";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub knowledge: KnowledgeConfig,
    #[serde(default)]
    pub ranking: RankingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Allow any origin. The bundled frontend is served from a different port.
    #[serde(default = "bool_true")]
    pub cors: bool,
}

fn default_host() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16    { 5000 }
fn bool_true()    -> bool   { true }

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors: bool_true(),
        }
    }
}

/// Which exported classifier format `[model]` points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    /// One-vs-rest linear head: `coef` [n_classes, n_features] and `intercept`.
    #[default]
    Linear,
    /// Kernel SVC with one-vs-one pairs, aggregated to one score per class.
    Svc,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default)]
    pub kind: ModelKind,
    /// safetensors file with the model tensors
    #[serde(default = "default_weights_path")]
    pub weights_path: String,
    /// JSON array of class labels in score order
    #[serde(default = "default_classes_path")]
    pub classes_path: String,
    /// JSON kernel parameters and per-class support counts (`kind = "svc"` only)
    #[serde(default = "default_header_path")]
    pub header_path: String,
    #[serde(default)]
    pub use_gpu: bool,
}

fn default_weights_path() -> String { "model/svc.safetensors".to_string() }
fn default_classes_path() -> String { "model/classes.json".to_string() }
fn default_header_path()  -> String { "model/svc_header.json".to_string() }

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            kind: ModelKind::default(),
            weights_path: default_weights_path(),
            classes_path: default_classes_path(),
            header_path: default_header_path(),
            use_gpu: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeConfig {
    #[serde(default = "default_descriptions_path")]
    pub descriptions_path: String,
    #[serde(default = "default_precautions_path")]
    pub precautions_path: String,
}

fn default_descriptions_path() -> String { "data/symptom_Description.csv".to_string() }
fn default_precautions_path()  -> String { "data/symptom_precaution.csv".to_string() }

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            descriptions_path: default_descriptions_path(),
            precautions_path: default_precautions_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingConfig {
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

fn default_top_k() -> usize { 5 }

impl Default for RankingConfig {
    fn default() -> Self {
        Self { top_k: default_top_k() }
    }
}

mod tests;

impl Config {
    /// Load configuration from medirank.toml.
    /// Checks MEDIRANK_CONFIG env var first, then current directory.
    /// A missing file is not an error: defaults are used.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let path = std::env::var(CONFIG_ENV)
            .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        let mut config = if Path::new(&path).exists() {
            Self::from_file(&path)?
        } else {
            tracing::warn!("Config file not found: {}, using defaults", path);
            Self::default()
        };
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a config file without consulting the environment.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| MedirankError::Config(e.to_string()))
    }

    /// MEDIRANK_HOST / MEDIRANK_PORT take precedence over the file.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(host) = std::env::var("MEDIRANK_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("MEDIRANK_PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| MedirankError::Config(format!("MEDIRANK_PORT is not a valid port: {}", port)))?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.ranking.top_k == 0 {
            return Err(MedirankError::Config("ranking.top_k must be at least 1".to_string()));
        }
        Ok(())
    }

    /// `host:port` string suitable for `TcpListener::bind`.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
