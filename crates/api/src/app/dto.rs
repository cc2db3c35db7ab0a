//! JSON mapping for stored records. Field names follow the dashboard client's
//! camelCase convention.

use serde::Deserialize;

use sentiscope_ai::SentimentJudgment;
use sentiscope_core::{Alert, KeywordCount, Mention, RegionalSentiment, SentimentSummary, TrendPoint};

// -------------------------
// Query DTOs
// -------------------------

pub const DEFAULT_TREND_HOURS: u32 = 24;
pub const DEFAULT_MENTION_LIMIT: usize = 100;

/// Raw `?hours=&platform=`; hours is parsed leniently.
#[derive(Debug, Default, Deserialize)]
pub struct TrendsQuery {
    pub hours: Option<String>,
    pub platform: Option<String>,
}

impl TrendsQuery {
    /// Missing, zero or unparseable values mean the default window.
    pub fn hours(&self) -> u32 {
        self.hours
            .as_deref()
            .and_then(|h| h.trim().parse::<u32>().ok())
            .filter(|h| *h > 0)
            .unwrap_or(DEFAULT_TREND_HOURS)
    }

    pub fn platform(&self) -> Option<&str> {
        non_blank(self.platform.as_deref())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct MentionsQuery {
    pub limit: Option<String>,
    pub platform: Option<String>,
    pub region: Option<String>,
}

impl MentionsQuery {
    pub fn limit(&self) -> usize {
        self.limit
            .as_deref()
            .and_then(|l| l.trim().parse::<usize>().ok())
            .filter(|l| *l > 0)
            .unwrap_or(DEFAULT_MENTION_LIMIT)
    }

    pub fn platform(&self) -> Option<&str> {
        non_blank(self.platform.as_deref())
    }

    pub fn region(&self) -> Option<&str> {
        non_blank(self.region.as_deref())
    }
}

fn non_blank(v: Option<&str>) -> Option<&str> {
    v.map(str::trim).filter(|v| !v.is_empty())
}

// -------------------------
// Response mapping
// -------------------------

pub fn judgment_to_json(j: &SentimentJudgment) -> serde_json::Value {
    serde_json::json!({
        "label": j.label(),
        "score": j.score(),
        "confidence": j.confidence(),
    })
}

pub fn mention_to_json(m: &Mention) -> serde_json::Value {
    serde_json::json!({
        "id": m.id.to_string(),
        "platform": m.platform,
        "postId": m.post_id,
        "author": m.author,
        "content": m.content,
        "createdAt": m.created_at,
        "language": m.language,
        "sentimentLabel": m.sentiment_label,
        "sentimentScore": m.sentiment_score,
        "topic": m.topic,
        "region": m.region,
        "metadata": m.metadata,
    })
}

pub fn alert_to_json(a: &Alert) -> serde_json::Value {
    serde_json::json!({
        "id": a.id.to_string(),
        "name": a.name,
        "query": a.query,
        "threshold": a.threshold,
        "isActive": a.is_active,
        "lastTriggered": a.last_triggered,
        "createdAt": a.created_at,
    })
}

pub fn trend_to_json(t: &TrendPoint) -> serde_json::Value {
    serde_json::json!({
        "id": t.id.to_string(),
        "timestamp": t.timestamp,
        "positiveCount": t.positive_count,
        "negativeCount": t.negative_count,
        "neutralCount": t.neutral_count,
        "averageScore": t.average_score,
        "platform": t.platform,
        "region": t.region,
    })
}

pub fn summary_to_json(s: &SentimentSummary) -> serde_json::Value {
    serde_json::json!({
        "positive": s.positive,
        "negative": s.negative,
        "neutral": s.neutral,
        "total": s.total,
    })
}

pub fn keyword_to_json(k: &KeywordCount) -> serde_json::Value {
    serde_json::json!({
        "keyword": k.keyword,
        "count": k.count,
        "sentiment": k.sentiment,
    })
}

pub fn regional_to_json(r: &RegionalSentiment) -> serde_json::Value {
    serde_json::json!({
        "region": r.region,
        "sentiment": r.sentiment,
        "count": r.count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sentiscope_core::AlertId;

    #[test]
    fn trend_hours_fall_back_to_default() {
        let q = |h: Option<&str>| TrendsQuery {
            hours: h.map(str::to_string),
            platform: None,
        };
        assert_eq!(q(None).hours(), 24);
        assert_eq!(q(Some("0")).hours(), 24);
        assert_eq!(q(Some("soon")).hours(), 24);
        assert_eq!(q(Some("-3")).hours(), 24);
        assert_eq!(q(Some("48")).hours(), 48);
    }

    #[test]
    fn mention_limit_and_blank_filters() {
        let q = MentionsQuery {
            limit: Some("5".to_string()),
            platform: Some("  ".to_string()),
            region: Some("Europe".to_string()),
        };
        assert_eq!(q.limit(), 5);
        assert_eq!(q.platform(), None);
        assert_eq!(q.region(), Some("Europe"));
        assert_eq!(MentionsQuery::default().limit(), DEFAULT_MENTION_LIMIT);
    }

    #[test]
    fn alert_json_uses_camel_case() {
        let alert = Alert {
            id: AlertId::new(),
            name: "spike".to_string(),
            query: "sentiment:negative".to_string(),
            threshold: 0.7,
            is_active: true,
            last_triggered: None,
            created_at: Utc::now(),
        };
        let v = alert_to_json(&alert);
        assert_eq!(v["isActive"], true);
        assert!(v["lastTriggered"].is_null());
        assert_eq!(v["id"], alert.id.to_string());
    }
}
