//! Preprocessing decoded images into model-ready tensors.
//!
//! The classifier was trained on images stretched to a fixed square
//! resolution with no aspect-ratio preservation, so the preprocessor
//! reproduces exactly that: a bilinear stretch-resize to target width and
//! height, u8 to f32 conversion, and a leading batch axis of size 1. One
//! request is always one image; nothing here batches across requests.

use crate::core::errors::ClassifyError;
use crate::core::tensor::Tensor4D;
use image::{RgbImage, imageops::FilterType};
use ndarray::Array4;
use serde::{Deserialize, Serialize};

/// Layout of the batched tensor handed to the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChannelOrder {
    /// `(batch, height, width, channel)` - Keras-exported models.
    Hwc,
    /// `(batch, channel, height, width)` - most PyTorch-exported models.
    Chw,
}

/// Configuration for the preprocessor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreprocessConfig {
    /// Target (height, width) the image is stretched to.
    pub target: (u32, u32),
    /// Scaling factor applied to each u8 channel value after the f32 cast.
    /// The reference model rescales internally, so the default is 1.0 and
    /// the tensor carries raw 0-255 floats.
    pub scale: f32,
    /// Tensor layout expected by the model.
    pub channel_order: ChannelOrder,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            target: (
                crate::core::config::DEFAULT_TARGET_SIZE,
                crate::core::config::DEFAULT_TARGET_SIZE,
            ),
            scale: 1.0,
            channel_order: ChannelOrder::Hwc,
        }
    }
}

/// Stretch-resizes decoded images and packs them into a batch-of-one tensor.
#[derive(Debug, Clone)]
pub struct Preprocessor {
    config: PreprocessConfig,
}

impl Preprocessor {
    /// Creates a preprocessor after validating the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ClassifyError::Config` if the target resolution has a zero
    /// dimension or the scale factor is not finite and positive.
    pub fn new(config: PreprocessConfig) -> Result<Self, ClassifyError> {
        let (height, width) = config.target;
        if height == 0 || width == 0 {
            return Err(ClassifyError::config(format!(
                "target resolution must be non-zero, got {width}x{height}"
            )));
        }
        if !config.scale.is_finite() || config.scale <= 0.0 {
            return Err(ClassifyError::config(format!(
                "scale must be a positive finite value, got {}",
                config.scale
            )));
        }
        Ok(Self { config })
    }

    /// Creates a preprocessor with the reference deployment settings.
    pub fn with_defaults() -> Self {
        Self {
            config: PreprocessConfig::default(),
        }
    }

    /// Target (height, width) of the output tensor.
    pub fn target(&self) -> (u32, u32) {
        self.config.target
    }

    /// Resizes the image to the target resolution and wraps it in a batch
    /// axis of size 1.
    ///
    /// Aspect ratio is deliberately not preserved; the image is stretched to
    /// exactly the target resolution, matching how the classifier was
    /// trained.
    pub fn apply(&self, img: &RgbImage) -> Result<Tensor4D, ClassifyError> {
        let (height, width) = self.config.target;
        let resized = image::imageops::resize(img, width, height, FilterType::Triangle);

        let (h, w) = (height as usize, width as usize);
        let scale = self.config.scale;
        let mut tensor = match self.config.channel_order {
            ChannelOrder::Hwc => Array4::<f32>::zeros((1, h, w, 3)),
            ChannelOrder::Chw => Array4::<f32>::zeros((1, 3, h, w)),
        };

        for (x, y, pixel) in resized.enumerate_pixels() {
            let (x, y) = (x as usize, y as usize);
            for (c, &value) in pixel.0.iter().enumerate() {
                let idx = match self.config.channel_order {
                    ChannelOrder::Hwc => [0, y, x, c],
                    ChannelOrder::Chw => [0, c, y, x],
                };
                tensor[idx] = value as f32 * scale;
            }
        }

        Ok(tensor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn preprocessor() -> Preprocessor {
        Preprocessor::with_defaults()
    }

    #[test]
    fn uniform_image_yields_target_shape() {
        let img = RgbImage::from_pixel(500, 300, Rgb([100, 150, 200]));
        let tensor = preprocessor().apply(&img).unwrap();
        assert_eq!(tensor.shape(), &[1, 256, 256, 3]);
    }

    #[test]
    fn uniform_color_survives_the_stretch() {
        let img = RgbImage::from_pixel(500, 300, Rgb([100, 150, 200]));
        let tensor = preprocessor().apply(&img).unwrap();
        assert_eq!(tensor[[0, 0, 0, 0]], 100.0);
        assert_eq!(tensor[[0, 128, 128, 1]], 150.0);
        assert_eq!(tensor[[0, 255, 255, 2]], 200.0);
    }

    #[test]
    fn extreme_aspect_ratios_still_hit_target_shape() {
        for (w, h) in [(1000, 10), (10, 1000), (256, 256), (1, 1)] {
            let img = RgbImage::from_pixel(w, h, Rgb([0, 0, 0]));
            let tensor = preprocessor().apply(&img).unwrap();
            assert_eq!(tensor.shape(), &[1, 256, 256, 3], "input {w}x{h}");
        }
    }

    #[test]
    fn chw_order_transposes_the_layout() {
        let config = PreprocessConfig {
            channel_order: ChannelOrder::Chw,
            ..PreprocessConfig::default()
        };
        let img = RgbImage::from_pixel(64, 64, Rgb([1, 2, 3]));
        let tensor = Preprocessor::new(config).unwrap().apply(&img).unwrap();
        assert_eq!(tensor.shape(), &[1, 3, 256, 256]);
        assert_eq!(tensor[[0, 0, 10, 10]], 1.0);
        assert_eq!(tensor[[0, 2, 10, 10]], 3.0);
    }

    #[test]
    fn scale_is_applied_per_channel_value() {
        let config = PreprocessConfig {
            scale: 1.0 / 255.0,
            ..PreprocessConfig::default()
        };
        let img = RgbImage::from_pixel(32, 32, Rgb([255, 0, 51]));
        let tensor = Preprocessor::new(config).unwrap().apply(&img).unwrap();
        assert!((tensor[[0, 0, 0, 0]] - 1.0).abs() < 1e-6);
        assert_eq!(tensor[[0, 0, 0, 1]], 0.0);
        assert!((tensor[[0, 0, 0, 2]] - 0.2).abs() < 1e-6);
    }

    #[test]
    fn zero_target_is_rejected() {
        let config = PreprocessConfig {
            target: (0, 256),
            ..PreprocessConfig::default()
        };
        assert!(Preprocessor::new(config).is_err());
    }

    #[test]
    fn non_positive_scale_is_rejected() {
        for scale in [0.0, -1.0, f32::NAN] {
            let config = PreprocessConfig {
                scale,
                ..PreprocessConfig::default()
            };
            assert!(Preprocessor::new(config).is_err(), "scale {scale}");
        }
    }
}
