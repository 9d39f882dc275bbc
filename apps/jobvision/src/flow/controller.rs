//! PredictionFlowController — owns the view state of the prediction page and
//! drives one request at a time through the prediction API.
//!
//! State machine:
//!   Idle ──submit──▶ Loading ──ok──▶ ResultShown ──reset──▶ Idle
//!                       └──failure──▶ Idle
//!
//! The `Loading` flag is the only mutual exclusion: a submit that finds it set
//! is rejected, not queued.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::api_client::{CancellationToken, Deadline, PredictionApi};
use crate::flow::notifications::{Level, NotificationCenter};
use crate::flow::render::RenderInstruction;
use crate::flow::{FlowError, MIN_DESCRIPTION_CHARS};
use crate::models::prediction::{PredictRequest, PredictionResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiState {
    Idle,
    Loading,
    ResultShown,
}

/// Everything the page shows, held as one explicit state object.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub ui: UiState,
    pub input: String,
    pub input_focused: bool,
    pub result: Option<RenderInstruction>,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState {
            ui: UiState::Idle,
            input: String::new(),
            input_focused: true,
            result: None,
        }
    }
}

pub struct PredictionFlowController {
    api: Arc<dyn PredictionApi>,
    notifications: NotificationCenter,
    predict_timeout: Duration,
    view: Mutex<ViewState>,
}

impl PredictionFlowController {
    pub fn new(
        api: Arc<dyn PredictionApi>,
        notifications: NotificationCenter,
        predict_timeout: Duration,
    ) -> Self {
        Self {
            api,
            notifications,
            predict_timeout,
            view: Mutex::new(ViewState::default()),
        }
    }

    pub fn view(&self) -> ViewState {
        self.lock_view().clone()
    }

    pub fn ui_state(&self) -> UiState {
        self.lock_view().ui
    }

    /// Replaces the input text. Ignored while a request is in flight.
    pub fn set_input(&self, text: impl Into<String>) {
        let mut view = self.lock_view();
        if view.ui != UiState::Loading {
            view.input = text.into();
        }
    }

    /// Validates `text`, sends it, and waits for the outcome under the
    /// configured deadline.
    ///
    /// Validation failures and `Busy` leave the state untouched. Request
    /// failures return the controller to `Idle` and raise an error
    /// notification.
    pub async fn submit(&self, text: &str) -> Result<RenderInstruction, FlowError> {
        let description = text.trim();

        {
            let mut view = self.lock_view();
            if view.ui == UiState::Loading {
                debug!("submit ignored: prediction already in flight");
                return Err(FlowError::Busy);
            }
            if let Err(error) = validate_description(description) {
                if error == FlowError::EmptyInput {
                    view.input_focused = true;
                }
                drop(view);
                let level = match error {
                    FlowError::InputTooShort { .. } => Level::Warning,
                    _ => Level::Error,
                };
                self.notifications
                    .notify(level, error.user_message(self.api.base_url()));
                return Err(error);
            }
            view.ui = UiState::Loading;
            view.input = text.to_string();
            view.result = None;
        }

        let loading = LoadingGuard { view: &self.view };
        let outcome = self.request(description).await;

        match outcome {
            Ok(render) => {
                info!(
                    verdict = ?render.verdict,
                    confidence = render.percentage,
                    indicators = render.indicators.len(),
                    "prediction complete"
                );
                let mut view = self.lock_view();
                view.ui = UiState::ResultShown;
                view.result = Some(render.clone());
                drop(view);
                drop(loading);
                Ok(render)
            }
            Err(error) => {
                warn!("prediction failed: {error}");
                drop(loading);
                self.notifications
                    .error(error.user_message(self.api.base_url()));
                Err(error)
            }
        }
    }

    /// Leaves the result view: back to `Idle` with an empty, focused input.
    pub fn reset(&self) {
        let mut view = self.lock_view();
        if view.ui != UiState::ResultShown {
            debug!(state = ?view.ui, "reset ignored");
            return;
        }
        *view = ViewState::default();
    }

    async fn request(&self, description: &str) -> Result<RenderInstruction, FlowError> {
        let token = CancellationToken::new();
        let _deadline = Deadline::arm(token.clone(), self.predict_timeout);
        let request = PredictRequest {
            job_description: description.to_string(),
        };

        let raw = tokio::select! {
            biased;
            _ = token.cancelled() => return Err(FlowError::Timeout),
            response = self.api.predict(&request, &token) => response?,
        };
        let result = PredictionResult::try_from(raw)?;
        Ok(RenderInstruction::from_result(&result))
    }

    fn lock_view(&self) -> MutexGuard<'_, ViewState> {
        self.view.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Puts the view back to `Idle` if it is still `Loading` when dropped, so a
/// cancelled or failed submit can never leave the page locked.
struct LoadingGuard<'a> {
    view: &'a Mutex<ViewState>,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        let mut view = self.view.lock().unwrap_or_else(PoisonError::into_inner);
        if view.ui == UiState::Loading {
            view.ui = UiState::Idle;
        }
    }
}

/// Checks the trimmed description: non-empty and at least
/// `MIN_DESCRIPTION_CHARS` characters.
pub fn validate_description(description: &str) -> Result<(), FlowError> {
    if description.is_empty() {
        return Err(FlowError::EmptyInput);
    }
    let chars = description.chars().count();
    if chars < MIN_DESCRIPTION_CHARS {
        return Err(FlowError::InputTooShort { chars });
    }
    Ok(())
}
