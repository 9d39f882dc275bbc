//! Pure mapping from a validated prediction to what the result view shows.

use std::f64::consts::PI;
use std::fmt;

use crate::models::prediction::{Indicator, IndicatorKind, PredictionResult, Verdict};

/// Radius of the confidence ring, in drawing units.
pub const RING_RADIUS: f64 = 50.0;
/// Width of the text gauge that stands in for the ring in a terminal.
const GAUGE_CELLS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceTier {
    VeryHigh,
    High,
    Moderate,
    Low,
}

impl ConfidenceTier {
    /// Buckets a whole-number percentage: >85, >70, >50, otherwise low.
    pub fn from_percentage(percentage: u32) -> Self {
        match percentage {
            p if p > 85 => ConfidenceTier::VeryHigh,
            p if p > 70 => ConfidenceTier::High,
            p if p > 50 => ConfidenceTier::Moderate,
            _ => ConfidenceTier::Low,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceTier::VeryHigh => "very high",
            ConfidenceTier::High => "high",
            ConfidenceTier::Moderate => "moderate",
            ConfidenceTier::Low => "low",
        }
    }
}

impl fmt::Display for ConfidenceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Geometry of the confidence gauge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ring {
    pub circumference: f64,
    /// Stroke dash offset: the unfilled share of the circumference.
    pub offset: f64,
}

impl Ring {
    pub fn for_percentage(percentage: u32) -> Self {
        let circumference = 2.0 * PI * RING_RADIUS;
        let proportion = f64::from(percentage) / 100.0;
        Ring {
            circumference,
            offset: circumference * (1.0 - proportion),
        }
    }

    /// Filled share of the ring, recovered from the dash offset.
    pub fn filled(&self) -> f64 {
        1.0 - self.offset / self.circumference
    }

    /// The ring unrolled into a fixed-width bar.
    pub fn gauge(&self) -> String {
        let filled = ((self.filled() * GAUGE_CELLS as f64).round() as usize).min(GAUGE_CELLS);
        format!("[{}{}]", "█".repeat(filled), "░".repeat(GAUGE_CELLS - filled))
    }
}

/// Everything the result view needs, derived from a `PredictionResult`.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderInstruction {
    pub verdict: Verdict,
    pub percentage: u32,
    pub tier: ConfidenceTier,
    pub ring: Ring,
    pub indicators: Vec<Indicator>,
}

impl RenderInstruction {
    pub fn from_result(result: &PredictionResult) -> Self {
        let percentage = confidence_percentage(result.confidence);
        RenderInstruction {
            verdict: result.verdict,
            percentage,
            tier: ConfidenceTier::from_percentage(percentage),
            ring: Ring::for_percentage(percentage),
            indicators: result.indicators.clone(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self.verdict {
            Verdict::Real => "✓ REAL JOB",
            Verdict::Fake => "✗ FAKE JOB",
        }
    }

    pub fn message(&self) -> String {
        let summary = match self.verdict {
            Verdict::Real => {
                "This job posting appears to be REAL. It matches characteristics of legitimate job listings."
            }
            Verdict::Fake => {
                "This job posting appears to be FAKE. Please be cautious and verify before applying."
            }
        };
        format!("{summary} ({} confidence)", self.tier)
    }
}

/// round(c × 100), clamped so a stray value can never exceed the gauge.
pub fn confidence_percentage(confidence: f64) -> u32 {
    (confidence.clamp(0.0, 1.0) * 100.0).round() as u32
}

impl fmt::Display for RenderInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.label())?;
        writeln!(f, "Confidence: {} {}%", self.ring.gauge(), self.percentage)?;
        writeln!(f, "{}", self.message())?;
        writeln!(f)?;
        writeln!(f, "Indicators:")?;
        if self.indicators.is_empty() {
            return writeln!(f, "  No specific indicators found.");
        }
        for indicator in &self.indicators {
            let icon = match indicator.kind {
                IndicatorKind::Concerning => "⚠️",
                IndicatorKind::Supporting => "✅",
            };
            writeln!(f, "  {icon} {}", indicator.text)?;
        }
        Ok(())
    }
}
