//! Helpers for working directly with ONNX Runtime sessions.

use crate::core::errors::ClassifyError;
use ort::logging::LogLevel;
use ort::session::Session;
use std::path::Path;

/// Loads an ONNX session from a model file, with runtime logs quieted down
/// to errors.
pub fn load_session(model_path: impl AsRef<Path>) -> Result<Session, ClassifyError> {
    let path = model_path.as_ref();
    let session = Session::builder()
        .and_then(|b| b.with_log_level(LogLevel::Error))
        .and_then(|b| b.commit_from_file(path))
        .map_err(|e| ClassifyError::model_load_error(path, e))?;
    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_model_file_maps_to_model_unavailable() {
        let result = load_session("definitely/not/a/model.onnx");
        assert!(matches!(
            result,
            Err(ClassifyError::ModelUnavailable { .. })
        ));
    }
}
