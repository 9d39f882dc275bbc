//! Axum route handler for the prediction endpoint.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use tracing::debug;

use crate::errors::AppError;
use crate::models::prediction::{PredictRequest, PredictionResult};
use crate::state::AppState;

/// POST /api/predict
///
/// Classifies a job description. A missing or malformed body and an empty
/// description are both 400s.
pub async fn handle_predict(
    State(state): State<AppState>,
    body: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<PredictionResult>, AppError> {
    let Json(request) = body.map_err(|rejection| {
        debug!("rejected predict body: {rejection}");
        AppError::Validation("Request body cannot be empty".to_string())
    })?;

    let description = request.job_description.trim();
    if description.is_empty() {
        return Err(AppError::Validation(
            "Job description cannot be empty".to_string(),
        ));
    }

    let result = state.predictor.predict(description).await?;
    debug!(
        verdict = ?result.verdict,
        confidence = result.confidence,
        indicators = result.indicators.len(),
        "prediction served"
    );

    Ok(Json(result))
}
