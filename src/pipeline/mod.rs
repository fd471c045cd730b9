//! Per-request orchestration of the classification pipeline.
//!
//! A request moves linearly through decode, preprocess, infer, and
//! postprocess; the first failure wins and nothing is retried. No step has
//! persistent side effects, so there is no rollback to model.

use crate::core::config::AppConfig;
use crate::core::errors::ClassifyError;
use crate::inference::OrtClassifier;
use crate::processors::decode_image;
use crate::processors::postprocess::{LabelSet, Prediction};
use crate::processors::preprocess::{PreprocessConfig, Preprocessor};
use tracing::{debug, error, warn};

/// The request pipeline: an optional model handle, the preprocessor, and the
/// ordered label set.
///
/// The model handle is injected at construction. When it is absent the
/// pipeline is in the degraded state where every [`classify`] call fails
/// with `ModelUnavailable` before any decode work happens.
///
/// [`classify`]: ClassifierPipeline::classify
#[derive(Debug)]
pub struct ClassifierPipeline {
    classifier: Option<OrtClassifier>,
    preprocessor: Preprocessor,
    labels: LabelSet,
}

impl ClassifierPipeline {
    /// Assembles a pipeline from already-built parts.
    pub fn new(
        classifier: Option<OrtClassifier>,
        preprocessor: Preprocessor,
        labels: LabelSet,
    ) -> Self {
        if let Some(c) = &classifier
            && let Some(count) = c.class_count()
            && count != labels.len()
        {
            warn!(
                model = %c.model_path().display(),
                model_classes = count,
                configured_labels = labels.len(),
                "model output size disagrees with configured labels; predictions will fail"
            );
        }
        Self {
            classifier,
            preprocessor,
            labels,
        }
    }

    /// Builds the pipeline from configuration, loading the model artifact.
    ///
    /// A model that fails to load is not fatal: the error is logged and the
    /// pipeline comes up degraded, with `/ping` and `/` unaffected. Invalid
    /// label or preprocessing configuration is fatal.
    pub fn from_config(config: &AppConfig) -> Result<Self, ClassifyError> {
        config.validate()?;
        let labels = LabelSet::new(config.labels.clone())?;
        let preprocessor = Preprocessor::new(PreprocessConfig {
            target: (config.target_size, config.target_size),
            ..PreprocessConfig::default()
        })?;

        let classifier = match OrtClassifier::from_file(&config.model_path, config.session_pool_size)
        {
            Ok(classifier) => Some(classifier),
            Err(e) => {
                error!(error = %e, model = %config.model_path.display(), "model load failed; serving degraded");
                None
            }
        };

        Ok(Self::new(classifier, preprocessor, labels))
    }

    /// Whether the model handle is present.
    pub fn model_loaded(&self) -> bool {
        self.classifier.is_some()
    }

    /// The configured label set.
    pub fn labels(&self) -> &LabelSet {
        &self.labels
    }

    /// Classifies one uploaded image.
    ///
    /// The model-present check runs first so a degraded service does no
    /// decode or preprocessing work. The rest is the linear state machine:
    /// decode, preprocess, infer, postprocess.
    pub fn classify(&self, data: &[u8]) -> Result<Prediction, ClassifyError> {
        let classifier = self
            .classifier
            .as_ref()
            .ok_or_else(|| ClassifyError::model_unavailable("model not loaded"))?;

        let img = decode_image(data)?;
        debug!(width = img.width(), height = img.height(), "decoded upload");

        let batch = self.preprocessor.apply(&img)?;
        let scores = classifier.predict(&batch)?;

        let row = scores
            .outer_iter()
            .next()
            .map(|r| r.to_vec())
            .ok_or_else(|| {
                ClassifyError::inference(
                    "model returned an empty batch",
                    crate::core::errors::SimpleError::new("no rows in output"),
                )
            })?;

        self.labels.top1(&row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::DEFAULT_CLASS_LABELS;

    fn degraded_pipeline() -> ClassifierPipeline {
        ClassifierPipeline::new(
            None,
            Preprocessor::with_defaults(),
            LabelSet::new(DEFAULT_CLASS_LABELS.iter().map(|s| s.to_string()).collect()).unwrap(),
        )
    }

    #[test]
    fn absent_model_short_circuits_before_decode() {
        // Malformed bytes would be a Decode error if the decoder ran; the
        // absent-model branch must win.
        let pipeline = degraded_pipeline();
        let result = pipeline.classify(b"not an image at all");
        assert!(matches!(
            result,
            Err(ClassifyError::ModelUnavailable { .. })
        ));
    }

    #[test]
    fn absent_model_fails_valid_uploads_too() {
        use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
        use std::io::Cursor;

        let img = RgbImage::from_pixel(32, 32, Rgb([1, 2, 3]));
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img)
            .write_to(&mut buf, ImageFormat::Png)
            .unwrap();

        let pipeline = degraded_pipeline();
        assert!(matches!(
            pipeline.classify(&buf.into_inner()),
            Err(ClassifyError::ModelUnavailable { .. })
        ));
    }

    #[test]
    fn degraded_pipeline_reports_model_state() {
        assert!(!degraded_pipeline().model_loaded());
    }

    #[test]
    fn from_config_degrades_on_missing_artifact() {
        let config = AppConfig {
            model_path: "definitely/missing.onnx".into(),
            ..AppConfig::default()
        };
        let pipeline = ClassifierPipeline::from_config(&config).unwrap();
        assert!(!pipeline.model_loaded());
        assert_eq!(pipeline.labels().len(), 8);
    }

    #[test]
    fn from_config_rejects_invalid_settings() {
        let config = AppConfig {
            target_size: 0,
            ..AppConfig::default()
        };
        assert!(ClassifierPipeline::from_config(&config).is_err());
    }
}
