use std::sync::Arc;

use crate::predictor::Predictor;

/// Shared state injected into the stub server's route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable predictor. Default: RuleBasedPredictor.
    pub predictor: Arc<dyn Predictor>,
}
