//! Social media mentions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::entity::Entity;
use crate::error::{DomainError, DomainResult};
use crate::id::MentionId;
use crate::sentiment::SentimentLabel;

pub const DEFAULT_LANGUAGE: &str = "en";

/// A stored mention. Always carries exactly one label and one score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mention {
    pub id: MentionId,
    pub platform: String,
    pub post_id: String,
    pub author: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub language: String,
    pub sentiment_label: SentimentLabel,
    pub sentiment_score: f64,
    pub topic: Option<String>,
    pub region: Option<String>,
    pub metadata: Option<JsonValue>,
}

impl Entity for Mention {
    type Id = MentionId;

    fn id(&self) -> MentionId {
        self.id
    }
}

/// Input for creating a mention.
///
/// The sentiment pair is optional here; callers backfill it before the record is
/// stored (see [`NewMention::needs_sentiment`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMention {
    pub platform: String,
    pub post_id: String,
    pub author: String,
    pub content: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub sentiment_label: Option<SentimentLabel>,
    #[serde(default)]
    pub sentiment_score: Option<f64>,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub metadata: Option<JsonValue>,
}

impl NewMention {
    pub fn validate(&self) -> DomainResult<()> {
        if self.platform.trim().is_empty() {
            return Err(DomainError::validation("platform cannot be empty"));
        }
        if self.post_id.trim().is_empty() {
            return Err(DomainError::validation("postId cannot be empty"));
        }
        if self.author.trim().is_empty() {
            return Err(DomainError::validation("author cannot be empty"));
        }
        if let Some(score) = self.sentiment_score {
            if !score.is_finite() || !(-1.0..=1.0).contains(&score) {
                return Err(DomainError::validation(
                    "sentimentScore must be a number between -1 and 1",
                ));
            }
        }
        Ok(())
    }

    /// True when either half of the sentiment pair is missing.
    ///
    /// A partially supplied pair is recomputed as a whole so label and score never
    /// disagree on a stored record.
    pub fn needs_sentiment(&self) -> bool {
        self.sentiment_label.is_none() || self.sentiment_score.is_none()
    }

    pub fn with_sentiment(mut self, label: SentimentLabel, score: f64) -> Self {
        self.sentiment_label = Some(label);
        self.sentiment_score = Some(score);
        self
    }

    /// Materialize the stored record.
    pub fn into_mention(self, id: MentionId, created_at: DateTime<Utc>) -> DomainResult<Mention> {
        self.validate()?;
        let (Some(sentiment_label), Some(sentiment_score)) = (self.sentiment_label, self.sentiment_score)
        else {
            return Err(DomainError::validation("mention has no sentiment"));
        };

        Ok(Mention {
            id,
            platform: self.platform,
            post_id: self.post_id,
            author: self.author,
            content: self.content,
            created_at,
            language: self
                .language
                .filter(|l| !l.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
            sentiment_label,
            sentiment_score,
            topic: self.topic,
            region: self.region,
            metadata: self.metadata,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_mention() -> NewMention {
        NewMention {
            platform: "twitter".to_string(),
            post_id: "tweet-1".to_string(),
            author: "@someone".to_string(),
            content: "loving the update".to_string(),
            language: None,
            sentiment_label: None,
            sentiment_score: None,
            topic: Some("update".to_string()),
            region: None,
            metadata: None,
        }
    }

    #[test]
    fn deserializes_camel_case_with_optional_fields_absent() {
        let m: NewMention = serde_json::from_value(serde_json::json!({
            "platform": "twitter",
            "postId": "t-9",
            "author": "@a",
            "content": "hello",
        }))
        .unwrap();
        assert_eq!(m.post_id, "t-9");
        assert!(m.needs_sentiment());
    }

    #[test]
    fn half_a_sentiment_pair_still_needs_scoring() {
        let mut m = new_mention();
        m.sentiment_label = Some(SentimentLabel::Positive);
        assert!(m.needs_sentiment());

        let m = new_mention().with_sentiment(SentimentLabel::Neutral, 0.0);
        assert!(!m.needs_sentiment());
    }

    #[test]
    fn out_of_range_score_is_rejected() {
        let mut m = new_mention();
        m.sentiment_score = Some(1.5);
        assert!(matches!(m.validate(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn into_mention_defaults_language_and_requires_sentiment() {
        let err = new_mention().into_mention(MentionId::new(), Utc::now()).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let mention = new_mention()
            .with_sentiment(SentimentLabel::Positive, 0.7)
            .into_mention(MentionId::new(), Utc::now())
            .unwrap();
        assert_eq!(mention.language, DEFAULT_LANGUAGE);
        assert_eq!(mention.sentiment_label, SentimentLabel::Positive);
    }
}
