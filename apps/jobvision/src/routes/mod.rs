pub mod health;
pub mod predict;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::index_handler))
        .route("/api/health", get(health::health_handler))
        .route("/api/predict", post(predict::handle_predict))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::errors::AppError;
    use crate::models::prediction::PredictionResult;
    use crate::predictor::{Predictor, RuleBasedPredictor};

    struct FailingPredictor;

    #[async_trait::async_trait]
    impl Predictor for FailingPredictor {
        async fn predict(&self, _job_description: &str) -> Result<PredictionResult, AppError> {
            Err(AppError::Prediction("model unavailable".to_string()))
        }
    }

    fn app() -> Router {
        build_router(AppState {
            predictor: Arc::new(RuleBasedPredictor::new().unwrap()),
        })
    }

    async fn post_json(body: &str) -> (StatusCode, Value) {
        post_json_to(app(), body).await
    }

    async fn post_json_to(app: Router, body: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::post("/api/predict")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health_reports_healthy() {
        let response = app()
            .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn test_predict_returns_wire_shape() {
        let (status, body) = post_json(
            &json!({
                "job_description": "Easy money, guaranteed income and no interview. Get paid today!"
            })
            .to_string(),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["prediction"], "fake");
        assert!(body["confidence"].as_f64().unwrap() > 0.5);
        assert_eq!(body["indicators"][0]["type"], "fake");
        assert!(body["indicators"][0]["text"].as_str().unwrap().ends_with("detected"));
    }

    #[tokio::test]
    async fn test_predict_empty_description_is_bad_request() {
        let (status, body) = post_json(r#"{"job_description": "   "}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_predict_malformed_body_is_bad_request() {
        let (status, _) = post_json("not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_predictor_failure_is_server_error() {
        let app = build_router(AppState {
            predictor: Arc::new(FailingPredictor),
        });
        let (status, body) = post_json_to(
            app,
            r#"{"job_description": "Senior engineer wanted for a platform team"}"#,
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["code"], "PREDICTION_ERROR");
        assert_eq!(body["error"]["message"], "Failed to generate prediction");
    }

    #[tokio::test]
    async fn test_index_lists_endpoints() {
        let response = app()
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["endpoints"]["predict"], "POST /api/predict");
    }
}
