//! Time-bucketed sentiment counts per platform.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::error::{DomainError, DomainResult};
use crate::id::TrendId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub id: TrendId,
    pub timestamp: DateTime<Utc>,
    pub positive_count: u32,
    pub negative_count: u32,
    pub neutral_count: u32,
    pub average_score: f64,
    pub platform: String,
    pub region: Option<String>,
}

impl Entity for TrendPoint {
    type Id = TrendId;

    fn id(&self) -> TrendId {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTrendPoint {
    pub platform: String,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub positive_count: u32,
    #[serde(default)]
    pub negative_count: u32,
    #[serde(default)]
    pub neutral_count: u32,
    #[serde(default)]
    pub average_score: f64,
    /// Defaults to the time of insertion.
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

impl NewTrendPoint {
    pub fn validate(&self) -> DomainResult<()> {
        if self.platform.trim().is_empty() {
            return Err(DomainError::validation("platform cannot be empty"));
        }
        if !self.average_score.is_finite() || !(-1.0..=1.0).contains(&self.average_score) {
            return Err(DomainError::validation(
                "averageScore must be a number between -1 and 1",
            ));
        }
        Ok(())
    }

    pub fn into_trend_point(self, id: TrendId, now: DateTime<Utc>) -> DomainResult<TrendPoint> {
        self.validate()?;
        Ok(TrendPoint {
            id,
            timestamp: self.timestamp.unwrap_or(now),
            positive_count: self.positive_count,
            negative_count: self.negative_count,
            neutral_count: self.neutral_count,
            average_score: self.average_score,
            platform: self.platform,
            region: self.region,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_defaults_to_now() {
        let now = Utc::now();
        let point = NewTrendPoint {
            platform: "twitter".to_string(),
            region: None,
            positive_count: 12,
            negative_count: 3,
            neutral_count: 8,
            average_score: 0.3,
            timestamp: None,
        }
        .into_trend_point(TrendId::new(), now)
        .unwrap();
        assert_eq!(point.timestamp, now);
    }

    #[test]
    fn average_score_outside_unit_range_is_rejected() {
        let p = NewTrendPoint {
            platform: "twitter".to_string(),
            region: None,
            positive_count: 0,
            negative_count: 0,
            neutral_count: 0,
            average_score: -3.0,
            timestamp: None,
        };
        assert!(p.validate().is_err());
    }
}
