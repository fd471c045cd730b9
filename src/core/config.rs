//! Process-wide configuration.
//!
//! Everything here is read once at startup and immutable afterwards. Values
//! come from environment variables with defaults matching the reference
//! deployment; an invalid value is a hard startup error, unlike a missing
//! model artifact which only degrades `/predict`.

use crate::core::errors::ClassifyError;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Default ordered class labels. The position of each label must match the
/// index layout of the model's output vector.
pub const DEFAULT_CLASS_LABELS: [&str; 8] = [
    "Amoeba",
    "Euglena",
    "Hydra",
    "Paramecium",
    "Rod_bacteria",
    "Spherical_bacteria",
    "Spiral_bacteria",
    "Yeast",
];

/// Default square resolution the classifier was trained on.
pub const DEFAULT_TARGET_SIZE: u32 = 256;

const DEFAULT_MODEL_PATH: &str = "models/classifier.onnx";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_STATIC_DIR: &str = "static";
const DEFAULT_INDEX_FILE: &str = "static/index.html";
const DEFAULT_BODY_LIMIT_BYTES: usize = 10 * 1024 * 1024;
const DEFAULT_SESSION_POOL_SIZE: usize = 1;

/// Application configuration, fixed for the life of the process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the ONNX model artifact.
    pub model_path: PathBuf,
    /// Ordered class labels; index `i` names the class at output position `i`.
    pub labels: Vec<String>,
    /// Square resolution images are stretched to before inference.
    pub target_size: u32,
    /// Bind host.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Directory served verbatim under `/static`.
    pub static_dir: PathBuf,
    /// HTML document served at `/`.
    pub index_file: PathBuf,
    /// Upper bound on the request body size in bytes.
    pub body_limit: usize,
    /// Number of ONNX sessions in the inference pool.
    pub session_pool_size: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            labels: DEFAULT_CLASS_LABELS.iter().map(|s| s.to_string()).collect(),
            target_size: DEFAULT_TARGET_SIZE,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            index_file: PathBuf::from(DEFAULT_INDEX_FILE),
            body_limit: DEFAULT_BODY_LIMIT_BYTES,
            session_pool_size: DEFAULT_SESSION_POOL_SIZE,
        }
    }
}

impl AppConfig {
    /// Builds a configuration from environment variables, falling back to
    /// the defaults above for anything unset.
    ///
    /// Recognized variables: `MODEL_PATH`, `CLASS_LABELS` (comma-separated),
    /// `TARGET_SIZE`, `HOST`, `PORT`, `STATIC_DIR`, `INDEX_FILE`,
    /// `BODY_LIMIT_BYTES`, `SESSION_POOL_SIZE`.
    pub fn from_env() -> Result<Self, ClassifyError> {
        let defaults = Self::default();

        let labels = match env::var("CLASS_LABELS") {
            Ok(raw) => parse_labels(&raw)?,
            Err(_) => defaults.labels,
        };

        Ok(Self {
            model_path: env::var("MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.model_path),
            labels,
            target_size: parse_env_var("TARGET_SIZE", defaults.target_size)?,
            host: env::var("HOST").unwrap_or(defaults.host),
            port: parse_env_var("PORT", defaults.port)?,
            static_dir: env::var("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.static_dir),
            index_file: env::var("INDEX_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.index_file),
            body_limit: parse_env_var("BODY_LIMIT_BYTES", defaults.body_limit)?,
            session_pool_size: parse_env_var("SESSION_POOL_SIZE", defaults.session_pool_size)?,
        })
    }

    /// Validates cross-field constraints.
    pub fn validate(&self) -> Result<(), ClassifyError> {
        if self.labels.is_empty() {
            return Err(ClassifyError::config("label set must not be empty"));
        }
        if self.target_size == 0 {
            return Err(ClassifyError::config("target size must be greater than 0"));
        }
        if self.session_pool_size == 0 {
            return Err(ClassifyError::config(
                "session pool size must be greater than 0",
            ));
        }
        Ok(())
    }
}

/// Splits a comma-separated label list, trimming whitespace around entries.
pub fn parse_labels(raw: &str) -> Result<Vec<String>, ClassifyError> {
    let labels: Vec<String> = raw
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    if labels.is_empty() {
        return Err(ClassifyError::config(
            "CLASS_LABELS must contain at least one label",
        ));
    }
    Ok(labels)
}

fn parse_env_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T, ClassifyError> {
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| ClassifyError::config(format!("invalid value for {name}: '{raw}'"))),
        Err(_) => Ok(default),
    }
}
