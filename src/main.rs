//! Server binary: configuration, model loading, and the axum serve loop.

use microclass::core::config::AppConfig;
use microclass::pipeline::ClassifierPipeline;
use microclass::server::{AppState, router};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    microclass::init_tracing();

    let config = AppConfig::from_env()?;
    info!(
        model = %config.model_path.display(),
        classes = config.labels.len(),
        target_size = config.target_size,
        "starting classification service"
    );

    // A missing or broken model artifact degrades /predict but keeps the
    // process serving /ping and the frontend.
    let pipeline = ClassifierPipeline::from_config(&config)?;
    if pipeline.model_loaded() {
        info!("model loaded");
    }

    let state = Arc::new(AppState {
        pipeline,
        index_file: config.index_file.clone(),
    });
    let app = router(state, &config.static_dir, config.body_limit);

    let addr = format!("{}:{}", config.host, config.port);
    info!("listening on {addr}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
