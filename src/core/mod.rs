//! Core types shared across the classification pipeline.
//!
//! This module contains the fundamental pieces every other module leans on:
//! - Error handling
//! - Tensor type aliases
//! - Process-wide configuration

pub mod config;
pub mod errors;
pub mod tensor;

pub use config::AppConfig;
pub use errors::{ClassifyError, ClassifyResult};
pub use tensor::{Tensor2D, Tensor4D};
