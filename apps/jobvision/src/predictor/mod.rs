//! Predictors backing the local stub of the prediction API.
//!
//! Default: `RuleBasedPredictor` (regex phrase scan, deterministic, no model).
//!
//! `AppState` holds an `Arc<dyn Predictor>` so another backend can be swapped
//! in without touching the routes.

use std::collections::HashSet;

use async_trait::async_trait;
use regex::Regex;

use crate::errors::AppError;
use crate::models::prediction::{Indicator, IndicatorKind, PredictionResult, Verdict};

pub mod patterns;

/// Upper bound on indicators returned with a prediction.
pub const MAX_INDICATORS: usize = 5;
const BASE_CONFIDENCE: f64 = 0.5;
const CONFIDENCE_PER_INDICATOR: f64 = 0.15;
const MAX_CONFIDENCE: f64 = 0.95;

#[async_trait]
pub trait Predictor: Send + Sync {
    async fn predict(&self, job_description: &str) -> Result<PredictionResult, AppError>;
}

/// Scans for known warning phrases and legitimacy signals and votes.
#[derive(Clone)]
pub struct RuleBasedPredictor {
    concerning: Vec<Regex>,
    supporting: Vec<Regex>,
}

impl RuleBasedPredictor {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            concerning: compile(patterns::CONCERNING)?,
            supporting: compile(patterns::SUPPORTING)?,
        })
    }

    /// Concerning matches first, then supporting, deduplicated, capped at
    /// `MAX_INDICATORS`.
    pub fn extract_indicators(&self, text: &str) -> Vec<Indicator> {
        let lowered = text.to_lowercase();
        let scans = [
            (IndicatorKind::Concerning, &self.concerning),
            (IndicatorKind::Supporting, &self.supporting),
        ];

        let mut seen = HashSet::new();
        scans
            .into_iter()
            .flat_map(|(kind, patterns)| {
                let lowered = &lowered;
                patterns.iter().filter_map(move |pattern| {
                    pattern.find(lowered).map(|m| Indicator {
                        kind,
                        text: format!("\"{}\" detected", m.as_str()),
                    })
                })
            })
            .filter(|indicator| seen.insert((indicator.kind, indicator.text.clone())))
            .take(MAX_INDICATORS)
            .collect()
    }

    pub fn classify(&self, text: &str) -> PredictionResult {
        let indicators = self.extract_indicators(text);
        let concerning = count(&indicators, IndicatorKind::Concerning);
        let supporting = count(&indicators, IndicatorKind::Supporting);

        let (verdict, votes) = if concerning > supporting {
            (Verdict::Fake, concerning)
        } else {
            (Verdict::Real, supporting)
        };
        let confidence =
            (BASE_CONFIDENCE + votes as f64 * CONFIDENCE_PER_INDICATOR).min(MAX_CONFIDENCE);

        PredictionResult {
            verdict,
            confidence,
            indicators,
        }
    }
}

#[async_trait]
impl Predictor for RuleBasedPredictor {
    async fn predict(&self, job_description: &str) -> Result<PredictionResult, AppError> {
        // Pasted postings can be long; keep the regex scan off the executor.
        let predictor = self.clone();
        let text = job_description.to_string();
        tokio::task::spawn_blocking(move || predictor.classify(&text))
            .await
            .map_err(|e| AppError::Prediction(format!("classification task failed: {e}")))
    }
}

fn compile(patterns: &[&str]) -> Result<Vec<Regex>, regex::Error> {
    patterns.iter().map(|p| Regex::new(p)).collect()
}

fn count(indicators: &[Indicator], kind: IndicatorKind) -> usize {
    indicators.iter().filter(|i| i.kind == kind).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn predictor() -> RuleBasedPredictor {
        RuleBasedPredictor::new().unwrap()
    }

    const REAL_POSTING: &str = "Senior Full Stack Engineer. We require 5+ years of experience \
        and a degree in Computer Science. Salary range $150,000 - $200,000 with full benefits. \
        Apply at careers.example.com; our hiring team responds within a week.";

    const FAKE_POSTING: &str = "WORK FROM HOME - NO EXPERIENCE REQUIRED!!! Guaranteed income \
        of $5,000 per week. Easy money, no interview. Small upfront fee for the starter kit. \
        Get paid today!";

    #[test]
    fn test_all_patterns_compile() {
        let p = predictor();
        assert_eq!(p.concerning.len(), patterns::CONCERNING.len());
        assert_eq!(p.supporting.len(), patterns::SUPPORTING.len());
    }

    #[test]
    fn test_fake_posting_classified_fake() {
        let result = predictor().classify(FAKE_POSTING);
        assert_eq!(result.verdict, Verdict::Fake);
        assert!(result.confidence > 0.5);
        assert!(result.confidence <= MAX_CONFIDENCE);
        assert_eq!(result.indicators[0].kind, IndicatorKind::Concerning);
    }

    #[test]
    fn test_real_posting_classified_real() {
        let result = predictor().classify(REAL_POSTING);
        assert_eq!(result.verdict, Verdict::Real);
        assert!(result
            .indicators
            .iter()
            .all(|i| i.kind == IndicatorKind::Supporting));
        assert!(result
            .indicators
            .iter()
            .any(|i| i.text == "\"salary range\" detected"));
    }

    #[test]
    fn test_no_signals_is_real_at_base_confidence() {
        let result = predictor().classify("A plain sentence with nothing notable in it at all.");
        assert_eq!(result.verdict, Verdict::Real);
        assert_eq!(result.confidence, BASE_CONFIDENCE);
        assert!(result.indicators.is_empty());
    }

    #[test]
    fn test_tie_goes_to_real() {
        let result = predictor().classify("Easy money. Hiring team on site.");
        assert_eq!(result.verdict, Verdict::Real);
        assert!((result.confidence - 0.65).abs() < 1e-9);
    }

    #[test]
    fn test_indicators_capped_and_unique() {
        let result = predictor().classify(&format!("{FAKE_POSTING} {FAKE_POSTING}"));
        assert!(result.indicators.len() <= MAX_INDICATORS);
        let unique: HashSet<_> = result.indicators.iter().map(|i| &i.text).collect();
        assert_eq!(unique.len(), result.indicators.len());
    }

    #[tokio::test]
    async fn test_predict_runs_classification() {
        let result = predictor().predict(FAKE_POSTING).await.unwrap();
        assert_eq!(result, predictor().classify(FAKE_POSTING));
    }

    #[test]
    fn test_confidence_capped() {
        let result = predictor().classify(FAKE_POSTING);
        assert!(result.confidence <= 0.95 + 1e-12);
    }
}
