use serde::Serialize;

use sentiscope_core::SentimentLabel;

/// Sentiment of one text: label, score in [-1, 1], confidence in [0, 1].
///
/// Fields are private so the ranges hold for every value in circulation; the only
/// constructor clamps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SentimentJudgment {
    label: SentimentLabel,
    score: f64,
    confidence: f64,
}

impl SentimentJudgment {
    /// Build a judgment, forcing `score` into [-1, 1] and `confidence` into [0, 1].
    ///
    /// NaN maps to 0 for both.
    pub fn clamped(label: SentimentLabel, score: f64, confidence: f64) -> Self {
        Self {
            label,
            score: clamp_or_zero(score, -1.0, 1.0),
            confidence: clamp_or_zero(confidence, 0.0, 1.0),
        }
    }

    pub fn label(&self) -> SentimentLabel {
        self.label
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }
}

fn clamp_or_zero(x: f64, lo: f64, hi: f64) -> f64 {
    if x.is_nan() { 0.0 } else { x.clamp(lo, hi) }
}
