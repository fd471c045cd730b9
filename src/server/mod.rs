//! HTTP surface of the service.
//!
//! The routes are thin: they move bytes in and out and map pipeline errors
//! to responses. Everything with real failure-mode complexity lives in
//! [`crate::pipeline`].

pub mod routes;
pub mod state;

pub use routes::router;
pub use state::AppState;
