use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::predictor::RuleBasedPredictor;
use crate::routes::build_router;
use crate::state::AppState;

/// Runs the rule-based stub of the prediction API until the process exits.
pub async fn run(port: u16) -> Result<()> {
    let predictor = RuleBasedPredictor::new().context("failed to compile predictor patterns")?;
    let state = AppState {
        predictor: Arc::new(predictor),
    };

    // The page and CLI may be served from any origin during development.
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{port}").parse()?;
    info!("Listening on {addr}");
    info!("  GET  http://{addr}/api/health");
    info!("  POST http://{addr}/api/predict");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app).await?;

    Ok(())
}
