//! Demo dataset for the in-memory backend. Timestamps are relative to `now`.

use chrono::{DateTime, Duration, Utc};
use serde_json::json;

use sentiscope_core::{
    Alert, AlertId, Mention, MentionId, SentimentLabel, TrendId, TrendPoint,
    mention::DEFAULT_LANGUAGE,
};

struct SampleMention {
    platform: &'static str,
    post_id: &'static str,
    author: &'static str,
    content: &'static str,
    label: SentimentLabel,
    score: f64,
    topic: &'static str,
    region: &'static str,
    engagement: u32,
    hours_ago: i64,
}

const MENTIONS: [SampleMention; 3] = [
    SampleMention {
        platform: "twitter",
        post_id: "tweet-1",
        author: "@user1",
        content: "Great product! Really enjoying the new features.",
        label: SentimentLabel::Positive,
        score: 0.8,
        topic: "product feedback",
        region: "North America",
        engagement: 120,
        hours_ago: 2,
    },
    SampleMention {
        platform: "instagram",
        post_id: "post-2",
        author: "@user2",
        content: "Could be better, having some issues with the app.",
        label: SentimentLabel::Negative,
        score: -0.6,
        topic: "app issues",
        region: "Europe",
        engagement: 45,
        hours_ago: 4,
    },
    SampleMention {
        platform: "facebook",
        post_id: "post-3",
        author: "user3",
        content: "Just tried the new update. It's okay, nothing special.",
        label: SentimentLabel::Neutral,
        score: 0.1,
        topic: "update",
        region: "Asia",
        engagement: 78,
        hours_ago: 6,
    },
];

pub fn sample_mentions(now: DateTime<Utc>) -> Vec<Mention> {
    MENTIONS
        .iter()
        .map(|s| Mention {
            id: MentionId::new(),
            platform: s.platform.to_string(),
            post_id: s.post_id.to_string(),
            author: s.author.to_string(),
            content: s.content.to_string(),
            created_at: now - Duration::hours(s.hours_ago),
            language: DEFAULT_LANGUAGE.to_string(),
            sentiment_label: s.label,
            sentiment_score: s.score,
            topic: Some(s.topic.to_string()),
            region: Some(s.region.to_string()),
            metadata: Some(json!({ "engagement": s.engagement })),
        })
        .collect()
}

pub fn sample_alerts(now: DateTime<Utc>) -> Vec<Alert> {
    vec![Alert {
        id: AlertId::new(),
        name: "Negative Sentiment Spike".to_string(),
        query: "sentiment:negative".to_string(),
        threshold: 0.7,
        is_active: true,
        last_triggered: Some(now - Duration::hours(1)),
        created_at: now - Duration::hours(24),
    }]
}

pub fn sample_trends(now: DateTime<Utc>) -> Vec<TrendPoint> {
    vec![TrendPoint {
        id: TrendId::new(),
        timestamp: now,
        positive_count: 12,
        negative_count: 3,
        neutral_count: 8,
        average_score: 0.3,
        platform: "twitter".to_string(),
        region: Some("North America".to_string()),
    }]
}

#[cfg(test)]
mod tests {
    use super::*;
    use sentiscope_core::SentimentSummary;

    #[test]
    fn sample_mentions_cover_every_label() {
        let now = Utc::now();
        let mentions = sample_mentions(now);
        let summary = SentimentSummary::from_mentions(&mentions);
        assert_eq!((summary.positive, summary.negative, summary.neutral), (1, 1, 1));
        assert!(mentions.iter().all(|m| m.created_at < now));
        assert!(
            mentions
                .iter()
                .all(|m| m.sentiment_label == SentimentLabel::from_score(m.sentiment_score))
        );
    }
}
