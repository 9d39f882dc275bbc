use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// The real/fake classification returned by the prediction API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Real,
    Fake,
}

/// Wire tag of an indicator: `"real"` signals support, `"fake"` concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IndicatorKind {
    #[serde(rename = "real")]
    Supporting,
    #[serde(rename = "fake")]
    Concerning,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Indicator {
    #[serde(rename = "type")]
    pub kind: IndicatorKind,
    pub text: String,
}

/// A validated prediction. `confidence` is always within [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    #[serde(rename = "prediction")]
    pub verdict: Verdict,
    pub confidence: f64,
    pub indicators: Vec<Indicator>,
}

/// Request body for `POST /api/predict`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictRequest {
    pub job_description: String,
}

/// Response body as it comes off the wire. Every field is optional so that a
/// missing field is reported as a protocol error instead of a decode panic.
#[derive(Debug, Default, Deserialize)]
pub struct PredictResponse {
    pub prediction: Option<String>,
    pub confidence: Option<f64>,
    pub indicators: Option<Vec<RawIndicator>>,
}

#[derive(Debug, Deserialize)]
pub struct RawIndicator {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub text: Option<String>,
}

#[derive(Debug, Error, PartialEq)]
pub enum InvalidPrediction {
    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error("unknown verdict `{0}`")]
    UnknownVerdict(String),

    #[error("confidence {0} outside [0, 1]")]
    ConfidenceOutOfRange(f64),
}

impl TryFrom<PredictResponse> for PredictionResult {
    type Error = InvalidPrediction;

    fn try_from(raw: PredictResponse) -> Result<Self, Self::Error> {
        let verdict = match raw.prediction.as_deref() {
            None | Some("") => return Err(InvalidPrediction::MissingField("prediction")),
            Some("real") => Verdict::Real,
            Some("fake") => Verdict::Fake,
            Some(other) => return Err(InvalidPrediction::UnknownVerdict(other.to_string())),
        };

        let confidence = raw
            .confidence
            .ok_or(InvalidPrediction::MissingField("confidence"))?;
        if !(0.0..=1.0).contains(&confidence) {
            return Err(InvalidPrediction::ConfidenceOutOfRange(confidence));
        }

        let indicators = raw
            .indicators
            .unwrap_or_default()
            .into_iter()
            .map(Indicator::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(PredictionResult {
            verdict,
            confidence,
            indicators,
        })
    }
}

impl TryFrom<RawIndicator> for Indicator {
    type Error = InvalidPrediction;

    fn try_from(raw: RawIndicator) -> Result<Self, Self::Error> {
        let kind = match raw.kind.as_deref() {
            None => return Err(InvalidPrediction::MissingField("indicators[].type")),
            Some("fake") => IndicatorKind::Concerning,
            Some("real") => IndicatorKind::Supporting,
            // Anything not flagged as a concern is shown as a supporting signal.
            Some(other) => {
                warn!(kind = other, "unrecognised indicator type; treating as supporting");
                IndicatorKind::Supporting
            }
        };
        let text = raw
            .text
            .ok_or(InvalidPrediction::MissingField("indicators[].text"))?;
        Ok(Indicator { kind, text })
    }
}
