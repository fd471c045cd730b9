//! The classifier inference engine.
//!
//! `OrtClassifier` wraps a pool of ONNX Runtime sessions behind a
//! round-robin index. `Session::run` needs exclusive access, so each session
//! sits in a `Mutex`; with a pool of one, concurrent requests serialize on
//! inference, which matches the reference behavior of a single shared model.
//! Input and output tensor names are discovered from session metadata at
//! load time.

use crate::core::errors::{ClassifyError, SimpleError};
use crate::core::tensor::{Tensor2D, Tensor4D};
use ndarray::ArrayView2;
use ort::session::Session;
use ort::value::{TensorRef, ValueType};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

pub struct OrtClassifier {
    sessions: Vec<Mutex<Session>>,
    next_idx: AtomicUsize,
    input_name: String,
    output_name: String,
    model_path: PathBuf,
}

impl std::fmt::Debug for OrtClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrtClassifier")
            .field("sessions", &self.sessions.len())
            .field("input_name", &self.input_name)
            .field("output_name", &self.output_name)
            .field("model_path", &self.model_path)
            .finish()
    }
}

impl OrtClassifier {
    /// Loads the classifier from an ONNX model file, building a pool of
    /// `pool_size` sessions (clamped to at least one).
    ///
    /// The input and output tensor names are taken from the first session's
    /// metadata, so exported models keep working regardless of what the
    /// exporter called its tensors.
    pub fn from_file(
        model_path: impl AsRef<Path>,
        pool_size: usize,
    ) -> Result<Self, ClassifyError> {
        let path = model_path.as_ref();
        let pool_size = pool_size.max(1);

        let mut sessions = Vec::with_capacity(pool_size);
        for _ in 0..pool_size {
            sessions.push(Mutex::new(crate::inference::load_session(path)?));
        }

        let (input_name, output_name) = {
            let session = sessions[0].lock().map_err(|_| {
                ClassifyError::model_load_error(
                    path,
                    SimpleError::new("session lock poisoned during load"),
                )
            })?;
            let input = session.inputs.first().ok_or_else(|| {
                ClassifyError::model_load_error(
                    path,
                    SimpleError::new("model declares no input tensors"),
                )
            })?;
            let output = session.outputs.first().ok_or_else(|| {
                ClassifyError::model_load_error(
                    path,
                    SimpleError::new("model declares no output tensors"),
                )
            })?;
            (input.name.clone(), output.name.clone())
        };

        Ok(Self {
            sessions,
            next_idx: AtomicUsize::new(0),
            input_name,
            output_name,
            model_path: path.to_path_buf(),
        })
    }

    /// Path of the loaded model artifact.
    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    /// Number of classes in the model's output, when the exported shape is
    /// static. Used for the startup drift check against the label set.
    pub fn class_count(&self) -> Option<usize> {
        let session = self.sessions.first()?.lock().ok()?;
        let output = session.outputs.first()?;
        match &output.output_type {
            ValueType::Tensor { shape, .. } => {
                let dims: Vec<i64> = shape.iter().copied().collect();
                let last = *dims.last()?;
                usize::try_from(last).ok()
            }
            _ => None,
        }
    }

    /// Runs one blocking inference call on the batched input tensor and
    /// returns the `(batch, num_classes)` score matrix.
    pub fn predict(&self, x: &Tensor4D) -> Result<Tensor2D, ClassifyError> {
        let input_shape = x.shape().to_vec();

        let input_tensor = TensorRef::from_array_view(x.view()).map_err(|e| {
            ClassifyError::inference(
                format!("failed to convert input tensor with shape {input_shape:?}"),
                e,
            )
        })?;
        let inputs = ort::inputs![self.input_name.as_str() => input_tensor];

        let idx = self.next_idx.fetch_add(1, Ordering::Relaxed) % self.sessions.len();
        let mut session = self.sessions[idx].lock().map_err(|_| {
            ClassifyError::inference(
                format!("failed to acquire session lock {}/{}", idx, self.sessions.len()),
                SimpleError::new("session lock poisoned"),
            )
        })?;

        let outputs = session.run(inputs).map_err(|e| {
            ClassifyError::inference(
                format!(
                    "ONNX Runtime run failed with input '{}' -> output '{}' and shape {:?}",
                    self.input_name, self.output_name, input_shape
                ),
                e,
            )
        })?;

        let (output_shape, output_data) = outputs[self.output_name.as_str()]
            .try_extract_tensor::<f32>()
            .map_err(|e| {
                ClassifyError::inference(
                    format!("failed to extract output tensor '{}' as f32", self.output_name),
                    e,
                )
            })?;

        extract_score_matrix(output_shape, output_data)
    }
}

/// Validates the raw output as a 2D `(batch, num_classes)` matrix and copies
/// it into an owned tensor.
fn extract_score_matrix(shape: &[i64], data: &[f32]) -> Result<Tensor2D, ClassifyError> {
    if shape.len() != 2 {
        return Err(ClassifyError::inference(
            format!(
                "expected 2D output tensor, got {}D with shape {shape:?}",
                shape.len()
            ),
            SimpleError::new("invalid output tensor rank"),
        ));
    }

    let batch = shape[0] as usize;
    let classes = shape[1] as usize;
    if data.len() != batch * classes {
        return Err(ClassifyError::inference(
            format!(
                "output data size mismatch: shape {shape:?} implies {} values, got {}",
                batch * classes,
                data.len()
            ),
            SimpleError::new("invalid output tensor size"),
        ));
    }

    let view = ArrayView2::from_shape((batch, classes), data).map_err(ClassifyError::Tensor)?;
    Ok(view.to_owned())
}
