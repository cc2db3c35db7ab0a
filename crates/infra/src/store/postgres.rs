//! Postgres-backed [`SentimentStore`].
//!
//! Expects the following tables (creating them is left to deployment tooling):
//!
//! ```sql
//! CREATE TABLE mentions (
//!     id              uuid PRIMARY KEY,
//!     platform        text NOT NULL,
//!     post_id         text NOT NULL,
//!     author          text NOT NULL,
//!     content         text NOT NULL,
//!     created_at      timestamptz NOT NULL,
//!     language        text NOT NULL DEFAULT 'en',
//!     sentiment_label text NOT NULL,
//!     sentiment_score double precision NOT NULL,
//!     topic           text,
//!     region          text,
//!     metadata        jsonb
//! );
//!
//! CREATE TABLE alerts (
//!     id             uuid PRIMARY KEY,
//!     name           text NOT NULL,
//!     query          text NOT NULL,
//!     threshold      double precision NOT NULL,
//!     is_active      boolean NOT NULL DEFAULT true,
//!     last_triggered timestamptz,
//!     created_at     timestamptz NOT NULL
//! );
//!
//! CREATE TABLE trend_data (
//!     id             uuid PRIMARY KEY,
//!     timestamp      timestamptz NOT NULL,
//!     positive_count integer NOT NULL,
//!     negative_count integer NOT NULL,
//!     neutral_count  integer NOT NULL,
//!     average_score  double precision NOT NULL,
//!     platform       text NOT NULL,
//!     region         text
//! );
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde_json::Value as JsonValue;
use sqlx::postgres::{PgPool, PgRow};
use sqlx::Row;
use uuid::Uuid;

use sentiscope_core::{
    Alert, AlertId, AlertPatch, KeywordCount, Mention, MentionId, NewAlert, NewMention,
    NewTrendPoint, RegionalSentiment, SentimentLabel, SentimentSummary, TrendId, TrendPoint,
    analytics,
};

use super::{SentimentStore, StoreError};

const MENTION_COLUMNS: &str = "id, platform, post_id, author, content, created_at, language, \
     sentiment_label, sentiment_score, topic, region, metadata";
const ALERT_COLUMNS: &str = "id, name, query, threshold, is_active, last_triggered, created_at";
const TREND_COLUMNS: &str = "id, timestamp, positive_count, negative_count, neutral_count, \
     average_score, platform, region";

pub struct PostgresStore {
    pool: Arc<PgPool>,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Open a connection pool against `database_url`.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPool::connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        Ok(Self::new(pool))
    }

    async fn select_mentions(
        &self,
        operation: &str,
        filter: Option<(&str, &str)>,
        limit: usize,
    ) -> Result<Vec<Mention>, StoreError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = match filter {
            None => {
                let sql = format!(
                    "SELECT {MENTION_COLUMNS} FROM mentions ORDER BY created_at DESC, id DESC LIMIT $1"
                );
                sqlx::query(&sql).bind(limit).fetch_all(&*self.pool).await
            }
            Some((column, value)) => {
                let sql = format!(
                    "SELECT {MENTION_COLUMNS} FROM mentions WHERE {column} = $1 \
                     ORDER BY created_at DESC, id DESC LIMIT $2"
                );
                sqlx::query(&sql)
                    .bind(value)
                    .bind(limit)
                    .fetch_all(&*self.pool)
                    .await
            }
        }
        .map_err(|e| map_sqlx_error(operation, e))?;

        rows.iter().map(mention_from_row).collect()
    }

    async fn select_alerts(&self, operation: &str, active_only: bool) -> Result<Vec<Alert>, StoreError> {
        let filter = if active_only { "WHERE is_active" } else { "" };
        let sql = format!("SELECT {ALERT_COLUMNS} FROM alerts {filter} ORDER BY created_at DESC, id DESC");
        let rows = sqlx::query(&sql)
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error(operation, e))?;

        rows.iter().map(alert_from_row).collect()
    }
}

#[async_trait]
impl SentimentStore for PostgresStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("ping", e))?;
        Ok(())
    }

    async fn list_mentions(&self, limit: usize) -> Result<Vec<Mention>, StoreError> {
        self.select_mentions("list_mentions", None, limit).await
    }

    async fn mentions_by_platform(&self, platform: &str, limit: usize) -> Result<Vec<Mention>, StoreError> {
        self.select_mentions("mentions_by_platform", Some(("platform", platform)), limit)
            .await
    }

    async fn mentions_by_region(&self, region: &str, limit: usize) -> Result<Vec<Mention>, StoreError> {
        self.select_mentions("mentions_by_region", Some(("region", region)), limit)
            .await
    }

    async fn create_mention(&self, new: NewMention) -> Result<Mention, StoreError> {
        let mention = new.into_mention(MentionId::new(), Utc::now())?;

        sqlx::query(
            r#"
            INSERT INTO mentions (
                id, platform, post_id, author, content, created_at, language,
                sentiment_label, sentiment_score, topic, region, metadata
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(Uuid::from(mention.id))
        .bind(&mention.platform)
        .bind(&mention.post_id)
        .bind(&mention.author)
        .bind(&mention.content)
        .bind(mention.created_at)
        .bind(&mention.language)
        .bind(mention.sentiment_label.as_str())
        .bind(mention.sentiment_score)
        .bind(&mention.topic)
        .bind(&mention.region)
        .bind(&mention.metadata)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("create_mention", e))?;

        Ok(mention)
    }

    async fn list_alerts(&self) -> Result<Vec<Alert>, StoreError> {
        self.select_alerts("list_alerts", false).await
    }

    async fn active_alerts(&self) -> Result<Vec<Alert>, StoreError> {
        self.select_alerts("active_alerts", true).await
    }

    async fn create_alert(&self, new: NewAlert) -> Result<Alert, StoreError> {
        let alert = new.into_alert(AlertId::new(), Utc::now())?;

        sqlx::query(
            r#"
            INSERT INTO alerts (id, name, query, threshold, is_active, last_triggered, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(Uuid::from(alert.id))
        .bind(&alert.name)
        .bind(&alert.query)
        .bind(alert.threshold)
        .bind(alert.is_active)
        .bind(alert.last_triggered)
        .bind(alert.created_at)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("create_alert", e))?;

        Ok(alert)
    }

    async fn update_alert(&self, id: AlertId, patch: AlertPatch) -> Result<Option<Alert>, StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin_transaction", e))?;

        let sql = format!("SELECT {ALERT_COLUMNS} FROM alerts WHERE id = $1 FOR UPDATE");
        let row = sqlx::query(&sql)
            .bind(Uuid::from(id))
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("update_alert", e))?;

        // Dropping `tx` on an early return rolls it back.
        let Some(row) = row else {
            return Ok(None);
        };
        let mut alert = alert_from_row(&row)?;
        alert.apply(patch)?;

        sqlx::query(
            r#"
            UPDATE alerts
            SET name = $2, query = $3, threshold = $4, is_active = $5, last_triggered = $6
            WHERE id = $1
            "#,
        )
        .bind(Uuid::from(alert.id))
        .bind(&alert.name)
        .bind(&alert.query)
        .bind(alert.threshold)
        .bind(alert.is_active)
        .bind(alert.last_triggered)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("update_alert", e))?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit", e))?;

        Ok(Some(alert))
    }

    async fn trends_since(&self, hours: u32, platform: Option<&str>) -> Result<Vec<TrendPoint>, StoreError> {
        let since = Utc::now() - Duration::hours(i64::from(hours));
        let sql = format!(
            "SELECT {TREND_COLUMNS} FROM trend_data \
             WHERE timestamp >= $1 AND ($2::text IS NULL OR platform = $2) \
             ORDER BY timestamp DESC, id DESC"
        );
        let rows = sqlx::query(&sql)
            .bind(since)
            .bind(platform)
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("trends_since", e))?;

        rows.iter().map(trend_from_row).collect()
    }

    async fn create_trend(&self, new: NewTrendPoint) -> Result<TrendPoint, StoreError> {
        let point = new.into_trend_point(TrendId::new(), Utc::now())?;

        sqlx::query(
            r#"
            INSERT INTO trend_data (
                id, timestamp, positive_count, negative_count, neutral_count,
                average_score, platform, region
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(Uuid::from(point.id))
        .bind(point.timestamp)
        .bind(count_to_sql(point.positive_count)?)
        .bind(count_to_sql(point.negative_count)?)
        .bind(count_to_sql(point.neutral_count)?)
        .bind(point.average_score)
        .bind(&point.platform)
        .bind(&point.region)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("create_trend", e))?;

        Ok(point)
    }

    async fn sentiment_summary(&self) -> Result<SentimentSummary, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT
                COUNT(*) FILTER (WHERE sentiment_label = 'positive') AS positive,
                COUNT(*) FILTER (WHERE sentiment_label = 'negative') AS negative,
                COUNT(*) FILTER (WHERE sentiment_label = 'neutral') AS neutral,
                COUNT(*) AS total
            FROM mentions
            "#,
        )
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("sentiment_summary", e))?;

        Ok(SentimentSummary {
            positive: get_count(&row, "positive")?,
            negative: get_count(&row, "negative")?,
            neutral: get_count(&row, "neutral")?,
            total: get_count(&row, "total")?,
        })
    }

    async fn top_keywords(&self, limit: usize) -> Result<Vec<KeywordCount>, StoreError> {
        // Grouping happens in Rust so the earliest-label rule is shared with the
        // in-memory backend.
        let rows = sqlx::query(
            r#"
            SELECT topic, sentiment_label, created_at
            FROM mentions
            WHERE topic IS NOT NULL
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("top_keywords", e))?;

        let samples = rows
            .iter()
            .map(|row| {
                Ok((
                    get::<String>(row, "topic")?,
                    parse_label(&get::<String>(row, "sentiment_label")?)?,
                    get::<DateTime<Utc>>(row, "created_at")?,
                ))
            })
            .collect::<Result<Vec<_>, StoreError>>()?;

        Ok(analytics::top_keywords(
            samples.iter().map(|(topic, label, at)| (topic.as_str(), *label, *at)),
            limit,
        ))
    }

    async fn regional_sentiment(&self) -> Result<Vec<RegionalSentiment>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT region, AVG(sentiment_score) AS sentiment, COUNT(*) AS count
            FROM mentions
            WHERE region IS NOT NULL
            GROUP BY region
            ORDER BY region COLLATE "C"
            "#,
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("regional_sentiment", e))?;

        rows.iter()
            .map(|row| {
                Ok(RegionalSentiment {
                    region: get(row, "region")?,
                    sentiment: get(row, "sentiment")?,
                    count: get_count(row, "count")?,
                })
            })
            .collect()
    }
}

fn mention_from_row(row: &PgRow) -> Result<Mention, StoreError> {
    Ok(Mention {
        id: MentionId::from_uuid(get(row, "id")?),
        platform: get(row, "platform")?,
        post_id: get(row, "post_id")?,
        author: get(row, "author")?,
        content: get(row, "content")?,
        created_at: get(row, "created_at")?,
        language: get(row, "language")?,
        sentiment_label: parse_label(&get::<String>(row, "sentiment_label")?)?,
        sentiment_score: get(row, "sentiment_score")?,
        topic: get(row, "topic")?,
        region: get(row, "region")?,
        metadata: get::<Option<JsonValue>>(row, "metadata")?,
    })
}

fn alert_from_row(row: &PgRow) -> Result<Alert, StoreError> {
    Ok(Alert {
        id: AlertId::from_uuid(get(row, "id")?),
        name: get(row, "name")?,
        query: get(row, "query")?,
        threshold: get(row, "threshold")?,
        is_active: get(row, "is_active")?,
        last_triggered: get(row, "last_triggered")?,
        created_at: get(row, "created_at")?,
    })
}

fn trend_from_row(row: &PgRow) -> Result<TrendPoint, StoreError> {
    Ok(TrendPoint {
        id: TrendId::from_uuid(get(row, "id")?),
        timestamp: get(row, "timestamp")?,
        positive_count: count_from_sql(get(row, "positive_count")?, "positive_count")?,
        negative_count: count_from_sql(get(row, "negative_count")?, "negative_count")?,
        neutral_count: count_from_sql(get(row, "neutral_count")?, "neutral_count")?,
        average_score: get(row, "average_score")?,
        platform: get(row, "platform")?,
        region: get(row, "region")?,
    })
}

fn get<'r, T>(row: &'r PgRow, column: &str) -> Result<T, StoreError>
where
    T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
{
    row.try_get(column)
        .map_err(|e| StoreError::Corrupt(format!("column {column}: {e}")))
}

fn get_count(row: &PgRow, column: &str) -> Result<u64, StoreError> {
    let n: i64 = get(row, column)?;
    u64::try_from(n).map_err(|_| StoreError::Corrupt(format!("column {column}: negative count {n}")))
}

fn parse_label(raw: &str) -> Result<SentimentLabel, StoreError> {
    raw.parse()
        .map_err(|e| StoreError::Corrupt(format!("sentiment_label: {e}")))
}

fn count_from_sql(n: i32, column: &str) -> Result<u32, StoreError> {
    u32::try_from(n).map_err(|_| StoreError::Corrupt(format!("column {column}: negative count {n}")))
}

fn count_to_sql(n: u32) -> Result<i32, StoreError> {
    i32::try_from(n).map_err(|_| StoreError::Database(format!("count {n} exceeds integer column range")))
}

/// Map sqlx errors to store errors, tagging the failed operation.
fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let code = db_err.code().map(|c| c.into_owned()).unwrap_or_default();
            StoreError::Database(format!(
                "database error in {operation} [{code}]: {}",
                db_err.message()
            ))
        }
        sqlx::Error::PoolClosed => {
            StoreError::Database(format!("connection pool closed in {operation}"))
        }
        sqlx::Error::ColumnDecode { index, source } => {
            StoreError::Corrupt(format!("column {index} in {operation}: {source}"))
        }
        _ => StoreError::Database(format!("sqlx error in {operation}: {err}")),
    }
}
