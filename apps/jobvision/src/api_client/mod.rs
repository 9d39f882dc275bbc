/// Prediction API client — the single point of entry for calls to the
/// fake-job prediction service.
///
/// Callers hold an `Arc<dyn PredictionApi>` so tests can swap in a scripted
/// backend. Every call takes a `CancellationToken`; the HTTP client races the
/// request against it and reports `ApiError::Cancelled` when it fires.
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

pub mod cancel;

pub use cancel::{CancellationToken, Deadline};

use crate::models::prediction::{PredictRequest, PredictResponse};

const PREDICT_PATH: &str = "/api/predict";
const HEALTH_PATH: &str = "/api/health";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("cannot reach prediction API: {0}")]
    Network(String),

    #[error("request cancelled")]
    Cancelled,

    #[error("API returned status {status}")]
    Status { status: u16, body: String },

    #[error("undecodable response body: {0}")]
    Decode(String),
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct HealthStatus {
    /// Any 2xx body counts as healthy; the fields are informational.
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}

#[async_trait]
pub trait PredictionApi: Send + Sync {
    async fn predict(
        &self,
        request: &PredictRequest,
        cancel: &CancellationToken,
    ) -> Result<PredictResponse, ApiError>;

    async fn health(&self, cancel: &CancellationToken) -> Result<HealthStatus, ApiError>;

    /// Base URL shown to the user in connection-related messages.
    fn base_url(&self) -> &str;
}

/// reqwest-backed client for a prediction API rooted at `base_url`.
#[derive(Clone)]
pub struct HttpPredictionClient {
    client: Client,
    base_url: String,
}

impl HttpPredictionClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        cancel: &CancellationToken,
    ) -> Result<String, ApiError> {
        let exchange = async {
            let response = request.send().await.map_err(map_transport)?;
            let status = response.status();
            let body = response.text().await.map_err(map_transport)?;
            Ok::<_, ApiError>((status, body))
        };

        let (status, body) = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(ApiError::Cancelled),
            outcome = exchange => outcome?,
        };

        if !status.is_success() {
            warn!("prediction API returned {}: {}", status, body);
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(body)
    }
}

#[async_trait]
impl PredictionApi for HttpPredictionClient {
    async fn predict(
        &self,
        request: &PredictRequest,
        cancel: &CancellationToken,
    ) -> Result<PredictResponse, ApiError> {
        let url = format!("{}{}", self.base_url, PREDICT_PATH);
        debug!(%url, chars = request.job_description.chars().count(), "sending prediction request");

        let body = self.send(self.client.post(&url).json(request), cancel).await?;
        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn health(&self, cancel: &CancellationToken) -> Result<HealthStatus, ApiError> {
        let url = format!("{}{}", self.base_url, HEALTH_PATH);
        let body = self.send(self.client.get(&url), cancel).await?;
        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }
}

fn map_transport(error: reqwest::Error) -> ApiError {
    if error.is_decode() {
        ApiError::Decode(error.to_string())
    } else {
        ApiError::Network(error.to_string())
    }
}
