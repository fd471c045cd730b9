//! Route handlers and the router assembly.

use crate::core::errors::ClassifyError;
use crate::processors::postprocess::Prediction;
use crate::server::state::AppState;
use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use std::path::Path;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::error;

/// An error on its way out to the client.
///
/// The detail string is the error's human-readable message; the full source
/// chain is logged server-side and never echoed to the caller.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    fn bad_request(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            detail: detail.into(),
        }
    }

    fn internal(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: detail.into(),
        }
    }
}

impl From<ClassifyError> for ApiError {
    fn from(err: ClassifyError) -> Self {
        error!(error = %err, source = ?std::error::Error::source(&err), "request failed");
        Self::internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "detail": self.detail }));
        (self.status, body).into_response()
    }
}

/// Liveness probe. Reports process aliveness, not model health, so it must
/// answer even when the model never loaded.
async fn ping() -> &'static str {
    "hello I am alive"
}

/// Classifies the image uploaded in the `file` multipart field.
async fn predict(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<Prediction>, ApiError> {
    let mut data = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("invalid multipart body: {e}")))?
    {
        if field.name() == Some("file") {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::bad_request(format!("failed to read upload: {e}")))?;
            data = Some(bytes);
            break;
        }
    }

    let Some(data) = data else {
        return Err(ApiError::bad_request("missing multipart field 'file'"));
    };

    // The pipeline is CPU-bound and uninterruptible once started; run it on
    // the blocking pool so slow inference cannot stall unrelated requests.
    let state = state.clone();
    let prediction = tokio::task::spawn_blocking(move || state.pipeline.classify(&data))
        .await
        .map_err(|e| {
            error!(error = %e, "classification task aborted");
            ApiError::internal("classification task aborted")
        })??;

    Ok(Json(prediction))
}

/// Serves the frontend document.
async fn index(State(state): State<Arc<AppState>>) -> Result<Html<String>, ApiError> {
    let content = tokio::fs::read_to_string(&state.index_file)
        .await
        .map_err(|e| {
            error!(error = %e, path = %state.index_file.display(), "failed to read index document");
            ApiError::internal(format!("failed to read index document: {e}"))
        })?;
    Ok(Html(content))
}

/// Builds the application router.
///
/// `static_dir` is mounted verbatim under `/static`; `body_limit` bounds
/// upload sizes before the decoder ever sees them.
pub fn router(state: Arc<AppState>, static_dir: &Path, body_limit: usize) -> Router {
    Router::new()
        .route("/ping", get(ping))
        .route("/predict", post(predict))
        .route("/", get(index))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
#[path = "routes_tests.rs"]
mod routes_tests;
