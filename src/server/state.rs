//! Shared application state.

use crate::pipeline::ClassifierPipeline;
use std::path::PathBuf;

/// State shared by all request handlers.
///
/// Built once at startup and never mutated afterwards; handlers hold it
/// behind an `Arc`. The pipeline inside carries the optional model handle,
/// so "model absent" is ordinary state rather than a special case threaded
/// through the routes.
#[derive(Debug)]
pub struct AppState {
    /// The classification pipeline, possibly degraded.
    pub pipeline: ClassifierPipeline,
    /// HTML document served at `/`.
    pub index_file: PathBuf,
}
