//! ONNX Runtime integration.
//!
//! Session loading lives in [`session`]; the request-facing classifier
//! engine lives in [`engine`]. The engine owns a small pool of sessions and
//! is the only place the crate touches ONNX Runtime at request time.

pub mod engine;
pub mod session;

pub use engine::OrtClassifier;
pub use session::load_session;
