//! Error types for the classification service.
//!
//! This module defines the failure modes a request can hit on its way through
//! the pipeline, plus startup-time configuration errors. Every component
//! failure is local to one request: nothing here crashes the process and
//! nothing is retried.

use std::path::Path;
use thiserror::Error;

/// Convenient result alias for classification operations.
pub type ClassifyResult<T> = Result<T, ClassifyError>;

/// Errors that can occur while serving a classification request or while
/// bringing the service up.
#[derive(Error, Debug)]
pub enum ClassifyError {
    /// The model artifact failed to load at startup, or the handle is absent
    /// at request time. `/predict` fails with this; the process stays up.
    #[error("model unavailable: {reason}")]
    ModelUnavailable {
        /// Why the model cannot serve predictions.
        reason: String,
        /// The underlying load failure, when there is one.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The uploaded bytes could not be decoded as a still image.
    #[error("image decode failed")]
    Decode(#[source] image::ImageError),

    /// Resizing or tensor conversion failed before inference.
    #[error("preprocess failed: {context}")]
    Preprocess {
        /// What the preprocessor was doing when it failed.
        context: String,
        /// The underlying error, when there is one.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The classifier call itself failed.
    #[error("inference failed: {context}")]
    Inference {
        /// What the inference engine was doing when it failed.
        context: String,
        /// The underlying error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The model produced a score vector whose length does not match the
    /// configured label set. Configuration/model drift; never silently
    /// truncated or padded.
    #[error("class count mismatch: model produced {actual} scores for {expected} configured labels")]
    ClassCountMismatch {
        /// Number of configured class labels.
        expected: usize,
        /// Number of scores in the model output.
        actual: usize,
    },

    /// A configuration value is missing or invalid.
    #[error("configuration: {message}")]
    Config {
        /// A message describing the configuration problem.
        message: String,
    },

    /// Error from the ONNX Runtime session.
    #[error(transparent)]
    Session(#[from] ort::Error),

    /// Error from tensor shape operations.
    #[error("tensor operation")]
    Tensor(#[from] ndarray::ShapeError),

    /// IO error.
    #[error("io")]
    Io(#[from] std::io::Error),
}

impl ClassifyError {
    /// Creates a `ModelUnavailable` error for an absent handle.
    pub fn model_unavailable(reason: impl Into<String>) -> Self {
        Self::ModelUnavailable {
            reason: reason.into(),
            source: None,
        }
    }

    /// Creates a `ModelUnavailable` error for a failed artifact load.
    pub fn model_load_error(
        path: &Path,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::ModelUnavailable {
            reason: format!("failed to load model from '{}'", path.display()),
            source: Some(Box::new(error)),
        }
    }

    /// Creates a `Preprocess` error with context only.
    pub fn preprocess(context: impl Into<String>) -> Self {
        Self::Preprocess {
            context: context.into(),
            source: None,
        }
    }

    /// Creates a `Preprocess` error wrapping an underlying cause.
    pub fn preprocess_with_source(
        context: impl Into<String>,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Preprocess {
            context: context.into(),
            source: Some(Box::new(error)),
        }
    }

    /// Creates an `Inference` error wrapping an underlying cause.
    pub fn inference(
        context: impl Into<String>,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Inference {
            context: context.into(),
            source: Box::new(error),
        }
    }

    /// Creates a `Config` error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

/// A plain-message error used where a cause chain needs a terminal node.
#[derive(Debug)]
pub struct SimpleError {
    message: String,
}

impl SimpleError {
    /// Creates a new simple error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for SimpleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for SimpleError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_unavailable_carries_reason() {
        let err = ClassifyError::model_unavailable("no artifact on disk");
        assert!(err.to_string().contains("no artifact on disk"));
    }

    #[test]
    fn class_count_mismatch_names_both_sides() {
        let err = ClassifyError::ClassCountMismatch {
            expected: 8,
            actual: 1000,
        };
        let text = err.to_string();
        assert!(text.contains('8'));
        assert!(text.contains("1000"));
    }

    #[test]
    fn load_error_keeps_source_chain() {
        use std::error::Error;
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = ClassifyError::model_load_error(Path::new("models/classifier.onnx"), io);
        assert!(err.source().is_some());
        assert!(err.to_string().contains("models/classifier.onnx"));
    }
}
