//! Infrastructure layer: configuration and storage backends.

pub mod config;
pub mod store;

pub use config::{AppConfig, OracleSettings, StorageConfig};
pub use store::{InMemoryStore, PostgresStore, SentimentStore, StoreError};
