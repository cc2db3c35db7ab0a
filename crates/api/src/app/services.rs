use std::sync::Arc;

use anyhow::Context;

use sentiscope_ai::{OpenAiOracle, SentimentScorer};
use sentiscope_core::{Mention, NewMention};
use sentiscope_infra::{
    AppConfig, InMemoryStore, OracleSettings, PostgresStore, SentimentStore, StorageConfig,
    StoreError,
};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppServices {
    pub store: Arc<dyn SentimentStore>,
    pub scorer: SentimentScorer,
}

impl AppServices {
    pub fn new(store: Arc<dyn SentimentStore>, scorer: SentimentScorer) -> Self {
        Self { store, scorer }
    }

    /// Store a mention, resolving its sentiment first when the caller left the
    /// label or the score out.
    pub async fn ingest_mention(&self, new: NewMention) -> Result<Mention, StoreError> {
        new.validate()?;

        let new = if new.needs_sentiment() {
            let judgment = self.scorer.score_one(&new.content).await;
            tracing::debug!(
                platform = %new.platform,
                label = %judgment.label(),
                score = judgment.score(),
                "backfilled mention sentiment"
            );
            new.with_sentiment(judgment.label(), judgment.score())
        } else {
            new
        };

        self.store.create_mention(new).await
    }
}

pub async fn build_services(config: &AppConfig) -> anyhow::Result<AppServices> {
    let store = build_store(&config.storage).await?;
    let scorer = build_scorer(&config.oracle)?;
    tracing::info!(
        backend = store.backend(),
        oracle = scorer.has_oracle(),
        "services ready"
    );
    Ok(AppServices::new(store, scorer))
}

async fn build_store(storage: &StorageConfig) -> anyhow::Result<Arc<dyn SentimentStore>> {
    let store: Arc<dyn SentimentStore> = match storage {
        StorageConfig::InMemory { seed_sample_data: true } => {
            tracing::info!("using in-memory store with sample data");
            Arc::new(InMemoryStore::with_sample_data())
        }
        StorageConfig::InMemory { seed_sample_data: false } => {
            tracing::info!("using empty in-memory store");
            Arc::new(InMemoryStore::new())
        }
        StorageConfig::Postgres { database_url } => {
            tracing::info!("using postgres store");
            let store = PostgresStore::connect(database_url)
                .await
                .context("failed to connect to postgres")?;
            Arc::new(store)
        }
    };
    Ok(store)
}

fn build_scorer(settings: &OracleSettings) -> anyhow::Result<SentimentScorer> {
    let Some(oa) = settings.openai_config() else {
        tracing::warn!("no OpenAI key configured; sentiment uses the keyword fallback only");
        return Ok(SentimentScorer::heuristic_only().with_timeout(settings.timeout));
    };

    let oracle = OpenAiOracle::new(oa).context("failed to build OpenAI client")?;
    tracing::info!(model = oracle.model(), "sentiment oracle configured");
    Ok(SentimentScorer::new(Arc::new(oracle)).with_timeout(settings.timeout))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sentiscope_core::SentimentLabel;

    fn services() -> AppServices {
        AppServices::new(Arc::new(InMemoryStore::new()), SentimentScorer::heuristic_only())
    }

    fn new_mention(content: &str) -> NewMention {
        NewMention {
            platform: "twitter".to_string(),
            post_id: "p-1".to_string(),
            author: "@a".to_string(),
            content: content.to_string(),
            language: None,
            sentiment_label: None,
            sentiment_score: None,
            topic: None,
            region: None,
            metadata: None,
        }
    }

    #[tokio::test]
    async fn missing_sentiment_is_backfilled() {
        let svc = services();
        let stored = svc.ingest_mention(new_mention("this is great")).await.unwrap();
        assert_eq!(stored.sentiment_label, SentimentLabel::Positive);
        assert_eq!(stored.sentiment_score, 1.0);
    }

    #[tokio::test]
    async fn half_a_pair_is_recomputed() {
        let svc = services();
        let mut m = new_mention("awful and terrible");
        m.sentiment_label = Some(SentimentLabel::Positive);
        let stored = svc.ingest_mention(m).await.unwrap();
        assert_eq!(stored.sentiment_label, SentimentLabel::Negative);
        assert_eq!(stored.sentiment_score, -1.0);
    }

    #[tokio::test]
    async fn supplied_sentiment_is_kept_even_at_zero() {
        let svc = services();
        let mut m = new_mention("this is great");
        m.sentiment_label = Some(SentimentLabel::Neutral);
        m.sentiment_score = Some(0.0);
        let stored = svc.ingest_mention(m).await.unwrap();
        assert_eq!(stored.sentiment_label, SentimentLabel::Neutral);
        assert_eq!(stored.sentiment_score, 0.0);
    }

    #[tokio::test]
    async fn invalid_mention_is_rejected_before_scoring() {
        let svc = services();
        let mut m = new_mention("great");
        m.platform = String::new();
        assert!(matches!(svc.ingest_mention(m).await, Err(StoreError::Invalid(_))));
        assert!(svc.store.list_mentions(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn in_memory_config_builds_without_network() {
        let config = AppConfig::from_lookup(|key| match key {
            "SEED_SAMPLE_DATA" => Some("false".to_string()),
            _ => None,
        });
        let svc = build_services(&config).await.unwrap();
        assert_eq!(svc.store.backend(), "in_memory");
        assert!(!svc.scorer.has_oracle());
        assert!(svc.store.list_mentions(10).await.unwrap().is_empty());
    }
}
