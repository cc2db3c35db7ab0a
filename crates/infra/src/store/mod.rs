//! Storage for mentions, alerts and trend points.
//!
//! Two interchangeable backends implement [`SentimentStore`]: an in-memory map
//! (dev/test, optionally seeded) and Postgres.

use async_trait::async_trait;
use thiserror::Error;

use sentiscope_core::{
    Alert, AlertId, AlertPatch, DomainError, KeywordCount, Mention, NewAlert, NewMention,
    NewTrendPoint, RegionalSentiment, SentimentSummary, TrendPoint,
};

pub mod memory;
pub mod postgres;
pub mod seed;

pub use memory::InMemoryStore;
pub use postgres::PostgresStore;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The record failed domain validation before it reached storage.
    #[error(transparent)]
    Invalid(#[from] DomainError),

    #[error("database error: {0}")]
    Database(String),

    /// A stored row could not be mapped back into a domain record.
    #[error("corrupt row: {0}")]
    Corrupt(String),
}

/// Persistence boundary for the monitoring backend.
///
/// All list operations return newest records first.
#[async_trait]
pub trait SentimentStore: Send + Sync + 'static {
    /// Backend name reported by health checks.
    fn backend(&self) -> &'static str;

    async fn ping(&self) -> Result<(), StoreError>;

    async fn list_mentions(&self, limit: usize) -> Result<Vec<Mention>, StoreError>;
    /// Filtered lists are capped at `limit` like the unfiltered one.
    async fn mentions_by_platform(&self, platform: &str, limit: usize) -> Result<Vec<Mention>, StoreError>;
    async fn mentions_by_region(&self, region: &str, limit: usize) -> Result<Vec<Mention>, StoreError>;
    /// Store a mention. The sentiment pair must already be resolved.
    async fn create_mention(&self, new: NewMention) -> Result<Mention, StoreError>;

    async fn list_alerts(&self) -> Result<Vec<Alert>, StoreError>;
    async fn active_alerts(&self) -> Result<Vec<Alert>, StoreError>;
    async fn create_alert(&self, new: NewAlert) -> Result<Alert, StoreError>;
    /// `Ok(None)` when no alert has this id.
    async fn update_alert(&self, id: AlertId, patch: AlertPatch) -> Result<Option<Alert>, StoreError>;

    /// Trend points recorded within the last `hours`, optionally for one platform.
    async fn trends_since(&self, hours: u32, platform: Option<&str>) -> Result<Vec<TrendPoint>, StoreError>;
    async fn create_trend(&self, new: NewTrendPoint) -> Result<TrendPoint, StoreError>;

    async fn sentiment_summary(&self) -> Result<SentimentSummary, StoreError>;
    async fn top_keywords(&self, limit: usize) -> Result<Vec<KeywordCount>, StoreError>;
    async fn regional_sentiment(&self) -> Result<Vec<RegionalSentiment>, StoreError>;
}
