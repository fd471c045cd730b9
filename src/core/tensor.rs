//! Tensor type aliases used throughout the pipeline.

use ndarray::{Array2, Array4};

/// 2D tensor of f32 values, `(batch, num_classes)` model output.
pub type Tensor2D = Array2<f32>;

/// 4D tensor of f32 values, the model-ready batched image.
pub type Tensor4D = Array4<f32>;
