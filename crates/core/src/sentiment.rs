use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Scores strictly beyond ±`LABEL_THRESHOLD` carry a polar label.
pub const LABEL_THRESHOLD: f64 = 0.1;

/// Polarity of a piece of text.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Negative => "negative",
            SentimentLabel::Neutral => "neutral",
        }
    }

    /// Label implied by a score in [-1, 1].
    ///
    /// Both thresholds are exclusive: a score of exactly 0.1 is neutral.
    pub fn from_score(score: f64) -> Self {
        if score > LABEL_THRESHOLD {
            SentimentLabel::Positive
        } else if score < -LABEL_THRESHOLD {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }
}

impl core::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SentimentLabel {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "positive" => Ok(SentimentLabel::Positive),
            "negative" => Ok(SentimentLabel::Negative),
            "neutral" => Ok(SentimentLabel::Neutral),
            _ => Err(DomainError::UnknownLabel(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_is_exclusive_on_both_sides() {
        assert_eq!(SentimentLabel::from_score(0.1), SentimentLabel::Neutral);
        assert_eq!(SentimentLabel::from_score(-0.1), SentimentLabel::Neutral);
        assert_eq!(SentimentLabel::from_score(0.100001), SentimentLabel::Positive);
        assert_eq!(SentimentLabel::from_score(-0.100001), SentimentLabel::Negative);
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("Positive".parse::<SentimentLabel>().unwrap(), SentimentLabel::Positive);
        assert_eq!(" NEUTRAL ".parse::<SentimentLabel>().unwrap(), SentimentLabel::Neutral);
        assert!(matches!(
            "mixed".parse::<SentimentLabel>(),
            Err(DomainError::UnknownLabel(_))
        ));
    }

    #[test]
    fn serializes_lowercase() {
        let v = serde_json::to_value(SentimentLabel::Negative).unwrap();
        assert_eq!(v, serde_json::json!("negative"));
    }
}
