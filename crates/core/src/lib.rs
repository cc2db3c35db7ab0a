//! `sentiscope-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** types for the monitoring backend: records
//! (mentions, alerts, trend points), their validation rules and the analytics folds
//! computed over mentions. No I/O lives here.

pub mod alert;
pub mod analytics;
pub mod entity;
pub mod error;
pub mod id;
pub mod mention;
pub mod sentiment;
pub mod trend;

pub use alert::{Alert, AlertPatch, NewAlert};
pub use analytics::{KeywordCount, RegionalSentiment, SentimentSummary};
pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{AlertId, MentionId, TrendId};
pub use mention::{Mention, NewMention};
pub use sentiment::SentimentLabel;
pub use trend::{NewTrendPoint, TrendPoint};
