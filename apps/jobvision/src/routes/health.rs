use axum::Json;
use serde_json::{json, Value};

/// GET /api/health
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "message": "API is running and ready"
    }))
}

/// GET /
/// Service name, version, and the endpoints it serves.
pub async fn index_handler() -> Json<Value> {
    Json(json!({
        "name": "JobVision API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Fake job detector (rule-based stub)",
        "endpoints": {
            "predict": "POST /api/predict",
            "health": "GET /api/health"
        }
    }))
}
