use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use chrono::{Duration, Utc};

use sentiscope_core::{
    Alert, AlertId, AlertPatch, Entity, KeywordCount, Mention, MentionId, NewAlert, NewMention,
    NewTrendPoint, RegionalSentiment, SentimentSummary, TrendId, TrendPoint,
    analytics::{regional_sentiment_from_mentions, top_keywords_from_mentions},
};

use super::{SentimentStore, StoreError, seed};

/// One keyed collection of records.
#[derive(Debug)]
struct Table<E: Entity> {
    rows: RwLock<HashMap<E::Id, E>>,
}

impl<E: Entity + Clone> Table<E> {
    fn new() -> Self {
        Self {
            rows: RwLock::new(HashMap::new()),
        }
    }

    fn insert(&self, record: E) -> E {
        let mut rows = self.rows.write().unwrap_or_else(PoisonError::into_inner);
        rows.insert(record.id(), record.clone());
        record
    }

    fn select(&self, keep: impl Fn(&E) -> bool) -> Vec<E> {
        let rows = self.rows.read().unwrap_or_else(PoisonError::into_inner);
        rows.values().filter(|r| keep(r)).cloned().collect()
    }

    /// Run `f` against the record with `id` under the write lock.
    fn modify<T>(&self, id: E::Id, f: impl FnOnce(&mut E) -> T) -> Option<T> {
        let mut rows = self.rows.write().unwrap_or_else(PoisonError::into_inner);
        rows.get_mut(&id).map(f)
    }
}

/// In-memory store for tests/dev.
#[derive(Debug)]
pub struct InMemoryStore {
    mentions: Table<Mention>,
    alerts: Table<Alert>,
    trends: Table<TrendPoint>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            mentions: Table::new(),
            alerts: Table::new(),
            trends: Table::new(),
        }
    }

    /// Store pre-filled with the demo dataset from [`seed`].
    pub fn with_sample_data() -> Self {
        let store = Self::new();
        let now = Utc::now();
        for mention in seed::sample_mentions(now) {
            store.mentions.insert(mention);
        }
        for alert in seed::sample_alerts(now) {
            store.alerts.insert(alert);
        }
        for trend in seed::sample_trends(now) {
            store.trends.insert(trend);
        }
        store
    }

    fn newest_mentions(&self, keep: impl Fn(&Mention) -> bool, limit: usize) -> Vec<Mention> {
        let mut out = self.mentions.select(keep);
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
        out.truncate(limit);
        out
    }

    fn newest_alerts(&self, keep: impl Fn(&Alert) -> bool) -> Vec<Alert> {
        let mut out = self.alerts.select(keep);
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
        out
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SentimentStore for InMemoryStore {
    fn backend(&self) -> &'static str {
        "in_memory"
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn list_mentions(&self, limit: usize) -> Result<Vec<Mention>, StoreError> {
        Ok(self.newest_mentions(|_| true, limit))
    }

    async fn mentions_by_platform(&self, platform: &str, limit: usize) -> Result<Vec<Mention>, StoreError> {
        Ok(self.newest_mentions(|m| m.platform == platform, limit))
    }

    async fn mentions_by_region(&self, region: &str, limit: usize) -> Result<Vec<Mention>, StoreError> {
        Ok(self.newest_mentions(|m| m.region.as_deref() == Some(region), limit))
    }

    async fn create_mention(&self, new: NewMention) -> Result<Mention, StoreError> {
        let mention = new.into_mention(MentionId::new(), Utc::now())?;
        Ok(self.mentions.insert(mention))
    }

    async fn list_alerts(&self) -> Result<Vec<Alert>, StoreError> {
        Ok(self.newest_alerts(|_| true))
    }

    async fn active_alerts(&self) -> Result<Vec<Alert>, StoreError> {
        Ok(self.newest_alerts(|a| a.is_active))
    }

    async fn create_alert(&self, new: NewAlert) -> Result<Alert, StoreError> {
        let alert = new.into_alert(AlertId::new(), Utc::now())?;
        Ok(self.alerts.insert(alert))
    }

    async fn update_alert(&self, id: AlertId, patch: AlertPatch) -> Result<Option<Alert>, StoreError> {
        let updated = self.alerts.modify(id, |alert| {
            alert.apply(patch)?;
            Ok::<_, StoreError>(alert.clone())
        });
        updated.transpose()
    }

    async fn trends_since(&self, hours: u32, platform: Option<&str>) -> Result<Vec<TrendPoint>, StoreError> {
        let since = Utc::now() - Duration::hours(i64::from(hours));
        let mut out = self.trends.select(|t| {
            t.timestamp >= since && platform.is_none_or(|p| t.platform == p)
        });
        out.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then_with(|| b.id.cmp(&a.id)));
        Ok(out)
    }

    async fn create_trend(&self, new: NewTrendPoint) -> Result<TrendPoint, StoreError> {
        let point = new.into_trend_point(TrendId::new(), Utc::now())?;
        Ok(self.trends.insert(point))
    }

    async fn sentiment_summary(&self) -> Result<SentimentSummary, StoreError> {
        let all = self.mentions.select(|_| true);
        Ok(SentimentSummary::from_mentions(&all))
    }

    async fn top_keywords(&self, limit: usize) -> Result<Vec<KeywordCount>, StoreError> {
        let mut all = self.mentions.select(|m| m.topic.is_some());
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(top_keywords_from_mentions(&all, limit))
    }

    async fn regional_sentiment(&self) -> Result<Vec<RegionalSentiment>, StoreError> {
        let all = self.mentions.select(|m| m.region.is_some());
        Ok(regional_sentiment_from_mentions(&all))
    }
}
