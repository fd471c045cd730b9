//! # microclass
//!
//! A small image-classification service: it accepts an uploaded microscopy
//! image, runs it through a pretrained ONNX classifier, and answers with the
//! predicted class label and a confidence score.
//!
//! ## Components
//!
//! - **Decoder**: raw upload bytes to an RGB pixel buffer
//! - **Preprocessor**: stretch-resize to the model resolution and wrap in a
//!   batch-of-one tensor
//! - **Classifier**: ONNX Runtime session pool invoked once per request
//! - **Postprocessor**: argmax over the probability vector against the
//!   ordered label set
//! - **Server**: axum routes gluing the pipeline to HTTP
//!
//! ## Modules
//!
//! * [`core`] - Error taxonomy, tensor aliases, and configuration
//! * [`processors`] - Decode, preprocess, and postprocess steps
//! * [`inference`] - ONNX Runtime session loading and invocation
//! * [`pipeline`] - Per-request orchestration of the steps above
//! * [`server`] - HTTP routes, application state, and error mapping
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use microclass::core::config::AppConfig;
//! use microclass::pipeline::ClassifierPipeline;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::from_env()?;
//! let pipeline = ClassifierPipeline::from_config(&config)?;
//! let bytes = std::fs::read("paramecium.png")?;
//! let prediction = pipeline.classify(&bytes)?;
//! println!("{} ({:.3})", prediction.label, prediction.confidence);
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod inference;
pub mod pipeline;
pub mod processors;
pub mod server;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::core::config::AppConfig;
    pub use crate::core::errors::{ClassifyError, ClassifyResult};
    pub use crate::pipeline::ClassifierPipeline;
    pub use crate::processors::postprocess::{LabelSet, Prediction};
}

/// Initializes the tracing subscriber for logging.
///
/// Sets up the tracing subscriber with an environment filter and formatting
/// layer. Typically called once at the start of the server binary.
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();
}
