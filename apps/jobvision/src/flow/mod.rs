// Prediction flow: input validation, the single in-flight request, and the
// mapping of outcomes to what the user sees.
// All network calls go through api_client — no direct reqwest calls here.

pub mod controller;
pub mod health;
pub mod notifications;
pub mod render;

use thiserror::Error;

use crate::api_client::ApiError;
use crate::models::prediction::InvalidPrediction;

/// Minimum description length, in characters, after trimming.
pub const MIN_DESCRIPTION_CHARS: usize = 50;

#[derive(Debug, Error, PartialEq)]
pub enum FlowError {
    #[error("a prediction is already in progress")]
    Busy,

    #[error("job description is empty")]
    EmptyInput,

    #[error("job description has {chars} characters; at least {min} required", min = MIN_DESCRIPTION_CHARS)]
    InputTooShort { chars: usize },

    #[error("cannot connect to the prediction API: {0}")]
    Network(String),

    #[error("prediction request timed out")]
    Timeout,

    #[error("prediction API returned status {0}")]
    Status(u16),

    #[error("invalid response from prediction API: {0}")]
    InvalidResponse(String),
}

impl FlowError {
    /// Message shown to the user. `api_url` is the backend the client targets.
    pub fn user_message(&self, api_url: &str) -> String {
        match self {
            FlowError::Busy => "A prediction is already in progress.".to_string(),
            FlowError::EmptyInput => "Please paste a job description to analyze.".to_string(),
            FlowError::InputTooShort { .. } => format!(
                "Please provide a more detailed job description (at least {MIN_DESCRIPTION_CHARS} characters)."
            ),
            FlowError::Network(_) => {
                format!("Cannot connect to API. Make sure the backend is running on {api_url}")
            }
            FlowError::Timeout => format!(
                "Request timeout. Backend might be slow. Make sure the backend API is running on {api_url}"
            ),
            FlowError::Status(400) => "Invalid job description".to_string(),
            FlowError::Status(500) => "Server error. Please try again.".to_string(),
            FlowError::Status(status) => format!("HTTP Error: {status}"),
            FlowError::InvalidResponse(_) => "Invalid response from server".to_string(),
        }
    }

    #[cfg(test)]
    pub fn is_validation(&self) -> bool {
        matches!(self, FlowError::EmptyInput | FlowError::InputTooShort { .. })
    }
}

impl From<ApiError> for FlowError {
    fn from(error: ApiError) -> Self {
        match error {
            ApiError::Network(msg) => FlowError::Network(msg),
            ApiError::Cancelled => FlowError::Timeout,
            ApiError::Status { status, .. } => FlowError::Status(status),
            ApiError::Decode(msg) => FlowError::InvalidResponse(msg),
        }
    }
}

impl From<InvalidPrediction> for FlowError {
    fn from(error: InvalidPrediction) -> Self {
        FlowError::InvalidResponse(error.to_string())
    }
}
