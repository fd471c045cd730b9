//! Image and score processing steps of the request pipeline.
//!
//! Each processor is a pure transformation with a single typed failure mode:
//! decoding turns upload bytes into pixels, preprocessing turns pixels into
//! the model-ready batch tensor, and postprocessing turns the model's score
//! vector into a labeled prediction.

pub mod decode;
pub mod postprocess;
pub mod preprocess;

pub use decode::decode_image;
pub use postprocess::{LabelSet, Prediction};
pub use preprocess::{ChannelOrder, PreprocessConfig, Preprocessor};
