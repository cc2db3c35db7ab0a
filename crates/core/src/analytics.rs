//! Dashboard folds over stored mentions.
//!
//! Every fold is deterministic: grouping uses ordered maps and ties are broken by
//! name, so two stores holding the same mentions report the same figures.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::mention::Mention;
use crate::sentiment::SentimentLabel;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentSummary {
    pub positive: u64,
    pub negative: u64,
    pub neutral: u64,
    pub total: u64,
}

impl SentimentSummary {
    pub fn from_labels(labels: impl IntoIterator<Item = SentimentLabel>) -> Self {
        let mut summary = Self::default();
        for label in labels {
            match label {
                SentimentLabel::Positive => summary.positive += 1,
                SentimentLabel::Negative => summary.negative += 1,
                SentimentLabel::Neutral => summary.neutral += 1,
            }
            summary.total += 1;
        }
        summary
    }

    pub fn from_mentions<'a>(mentions: impl IntoIterator<Item = &'a Mention>) -> Self {
        Self::from_labels(mentions.into_iter().map(|m| m.sentiment_label))
    }
}

/// How often a topic was mentioned, and the label it was first seen with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordCount {
    pub keyword: String,
    pub count: u64,
    pub sentiment: SentimentLabel,
}

/// Mean score of the mentions attributed to one region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionalSentiment {
    pub region: String,
    pub sentiment: f64,
    pub count: u64,
}

/// Group `(topic, label, created_at)` samples by topic.
///
/// The reported sentiment is the label of the earliest sample for the topic.
/// Output is sorted by count (desc), then keyword (asc), and truncated to `limit`.
pub fn top_keywords<'a>(
    samples: impl IntoIterator<Item = (&'a str, SentimentLabel, DateTime<Utc>)>,
    limit: usize,
) -> Vec<KeywordCount> {
    let mut groups: BTreeMap<&'a str, (u64, SentimentLabel, DateTime<Utc>)> = BTreeMap::new();

    for (topic, label, created_at) in samples {
        groups
            .entry(topic)
            .and_modify(|(count, first_label, first_at)| {
                *count += 1;
                if created_at < *first_at {
                    *first_label = label;
                    *first_at = created_at;
                }
            })
            .or_insert((1, label, created_at));
    }

    let mut out: Vec<KeywordCount> = groups
        .into_iter()
        .map(|(keyword, (count, sentiment, _))| KeywordCount {
            keyword: keyword.to_string(),
            count,
            sentiment,
        })
        .collect();

    out.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.keyword.cmp(&b.keyword)));
    out.truncate(limit);
    out
}

pub fn top_keywords_from_mentions<'a>(
    mentions: impl IntoIterator<Item = &'a Mention>,
    limit: usize,
) -> Vec<KeywordCount> {
    top_keywords(
        mentions.into_iter().filter_map(|m| {
            m.topic
                .as_deref()
                .map(|topic| (topic, m.sentiment_label, m.created_at))
        }),
        limit,
    )
}

/// Group `(region, score)` samples by region and average the scores.
pub fn regional_sentiment<'a>(
    samples: impl IntoIterator<Item = (&'a str, f64)>,
) -> Vec<RegionalSentiment> {
    let mut groups: BTreeMap<&'a str, Vec<f64>> = BTreeMap::new();
    for (region, score) in samples {
        groups.entry(region).or_default().push(score);
    }

    groups
        .into_iter()
        .map(|(region, scores)| RegionalSentiment {
            region: region.to_string(),
            sentiment: mean(&scores),
            count: scores.len() as u64,
        })
        .collect()
}

pub fn regional_sentiment_from_mentions<'a>(
    mentions: impl IntoIterator<Item = &'a Mention>,
) -> Vec<RegionalSentiment> {
    regional_sentiment(
        mentions
            .into_iter()
            .filter_map(|m| m.region.as_deref().map(|region| (region, m.sentiment_score))),
    )
}

fn mean(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    xs.iter().sum::<f64>() / (xs.len() as f64)
}
