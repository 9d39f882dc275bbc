//! Best-effort startup probe of `GET /api/health`.
//!
//! Runs in its own task with its own deadline. Its only effect is an advisory
//! warning notification; nothing waits on it.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::api_client::{ApiError, CancellationToken, Deadline, PredictionApi};
use crate::flow::notifications::NotificationCenter;

#[derive(Debug, Clone, PartialEq)]
pub enum HealthOutcome {
    Healthy,
    Degraded(u16),
    NotResponding,
    Unreachable,
}

pub fn spawn_health_probe(
    api: Arc<dyn PredictionApi>,
    notifications: NotificationCenter,
    timeout: Duration,
) -> JoinHandle<HealthOutcome> {
    tokio::spawn(async move { probe(api.as_ref(), &notifications, timeout).await })
}

pub async fn probe(
    api: &dyn PredictionApi,
    notifications: &NotificationCenter,
    timeout: Duration,
) -> HealthOutcome {
    let token = CancellationToken::new();
    let _deadline = Deadline::arm(token.clone(), timeout);

    let result = tokio::select! {
        biased;
        _ = token.cancelled() => Err(ApiError::Cancelled),
        result = api.health(&token) => result,
    };

    match result {
        Ok(status) => {
            info!(status = %status.status, message = ?status.message, "prediction API is healthy");
            HealthOutcome::Healthy
        }
        Err(ApiError::Status { status, .. }) => {
            warn!(status, "prediction API responded with an error status");
            notifications.warning(format!(
                "API is running but may have issues (Status: {status})"
            ));
            HealthOutcome::Degraded(status)
        }
        Err(ApiError::Cancelled) => {
            warn!("prediction API health check timed out");
            notifications
                .warning("Backend not responding. Start the backend with: jobvision serve");
            HealthOutcome::NotResponding
        }
        Err(error) => {
            warn!("cannot connect to prediction API: {error}");
            notifications.warning(format!(
                "Cannot connect to backend API at {}",
                api.base_url()
            ));
            HealthOutcome::Unreachable
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::api_client::{HealthStatus, HttpPredictionClient};
    use crate::flow::notifications::Level;
    use crate::models::prediction::{PredictRequest, PredictResponse};

    enum Health {
        Ok,
        Status(u16),
        Hang,
        Refused,
    }

    struct HealthApi(Health);

    #[async_trait]
    impl PredictionApi for HealthApi {
        async fn predict(
            &self,
            _request: &PredictRequest,
            _cancel: &CancellationToken,
        ) -> Result<PredictResponse, ApiError> {
            Ok(PredictResponse::default())
        }

        async fn health(&self, _cancel: &CancellationToken) -> Result<HealthStatus, ApiError> {
            match self.0 {
                Health::Ok => Ok(HealthStatus {
                    status: "healthy".to_string(),
                    message: Some("API is running and ready".to_string()),
                }),
                Health::Status(status) => Err(ApiError::Status {
                    status,
                    body: String::new(),
                }),
                Health::Hang => std::future::pending().await,
                Health::Refused => Err(ApiError::Network("refused".to_string())),
            }
        }

        fn base_url(&self) -> &str {
            "http://localhost:5000"
        }
    }

    #[tokio::test]
    async fn test_healthy_api_raises_nothing() {
        let notifications = NotificationCenter::new();
        let outcome = probe(&HealthApi(Health::Ok), &notifications, Duration::from_secs(5)).await;
        assert_eq!(outcome, HealthOutcome::Healthy);
        assert!(notifications.current().is_none());
    }

    #[tokio::test]
    async fn test_error_status_warns_with_code() {
        let notifications = NotificationCenter::new();
        let outcome = probe(
            &HealthApi(Health::Status(503)),
            &notifications,
            Duration::from_secs(5),
        )
        .await;
        assert_eq!(outcome, HealthOutcome::Degraded(503));
        let current = notifications.current().unwrap();
        assert_eq!(current.level, Level::Warning);
        assert!(current.message.contains("Status: 503"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_silent_backend_times_out_after_bound() {
        let notifications = NotificationCenter::new();
        let started = tokio::time::Instant::now();
        let outcome = probe(&HealthApi(Health::Hang), &notifications, Duration::from_secs(5)).await;
        assert_eq!(outcome, HealthOutcome::NotResponding);
        assert!(started.elapsed() >= Duration::from_secs(5));
        assert!(started.elapsed() < Duration::from_secs(6));
        assert!(notifications
            .current()
            .unwrap()
            .message
            .starts_with("Backend not responding"));
    }

    #[tokio::test]
    async fn test_unreachable_backend_names_url() {
        let notifications = NotificationCenter::new();
        let outcome = probe(
            &HealthApi(Health::Refused),
            &notifications,
            Duration::from_secs(5),
        )
        .await;
        assert_eq!(outcome, HealthOutcome::Unreachable);
        assert!(notifications
            .current()
            .unwrap()
            .message
            .contains("http://localhost:5000"));
    }

    #[tokio::test]
    async fn test_any_success_body_counts_as_healthy() {
        use axum::{routing::get, Json, Router};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let router = Router::new().route(
            "/api/health",
            get(|| async { Json(serde_json::json!({"ok": true})) }),
        );
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        let api = HttpPredictionClient::new(format!("http://{addr}")).unwrap();
        let notifications = NotificationCenter::new();
        let outcome = probe(&api, &notifications, Duration::from_secs(5)).await;
        assert_eq!(outcome, HealthOutcome::Healthy);
        assert!(notifications.current().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_spawned_probe_does_not_block_caller() {
        let notifications = NotificationCenter::new();
        let handle = spawn_health_probe(
            Arc::new(HealthApi(Health::Hang)),
            notifications.clone(),
            Duration::from_secs(5),
        );
        // The caller continues immediately; the probe settles on its own.
        assert!(!handle.is_finished());
        assert_eq!(handle.await.unwrap(), HealthOutcome::NotResponding);
    }
}
