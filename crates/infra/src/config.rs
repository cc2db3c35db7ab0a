//! Process configuration, read once from the environment at startup.
//!
//! Unset or blank variables take their defaults. Values that fail to parse are
//! logged and also replaced by the default; configuration never aborts startup.

use std::str::FromStr;
use std::time::Duration;

use sentiscope_ai::OpenAiConfig;
use sentiscope_ai::openai::{DEFAULT_BASE_URL, DEFAULT_MODEL};

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_ORACLE_TIMEOUT_SECS: u64 = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    InMemory { seed_sample_data: bool },
    Postgres { database_url: String },
}

#[derive(Clone, PartialEq, Eq)]
pub struct OracleSettings {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

// Keeps the key out of logs.
impl core::fmt::Debug for OracleSettings {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("OracleSettings")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl OracleSettings {
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Client configuration, or `None` when no credential is present.
    pub fn openai_config(&self) -> Option<OpenAiConfig> {
        let key = self.api_key.as_ref()?;
        Some(
            OpenAiConfig::new(key.clone())
                .with_model(self.model.clone())
                .with_base_url(self.base_url.clone())
                .with_timeout(self.timeout),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: String,
    pub storage: StorageConfig,
    pub oracle: OracleSettings,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (the environment in production).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let use_persistent = parse_or(get("USE_PERSISTENT_STORES"), "USE_PERSISTENT_STORES", false);
        let seed_sample_data = parse_or(get("SEED_SAMPLE_DATA"), "SEED_SAMPLE_DATA", true);

        let storage = match (use_persistent, get("DATABASE_URL")) {
            (true, Some(database_url)) => StorageConfig::Postgres { database_url },
            (true, None) => {
                tracing::warn!("USE_PERSISTENT_STORES=true but DATABASE_URL is not set; falling back to in-memory");
                StorageConfig::InMemory { seed_sample_data }
            }
            (false, _) => StorageConfig::InMemory { seed_sample_data },
        };

        let api_key = get("OPENAI_API_KEY").or_else(|| get("OPENAI_KEY"));
        let timeout_secs = parse_or(
            get("OPENAI_TIMEOUT_SECS"),
            "OPENAI_TIMEOUT_SECS",
            DEFAULT_ORACLE_TIMEOUT_SECS,
        );

        Self {
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            storage,
            oracle: OracleSettings {
                api_key,
                model: get("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                base_url: get("OPENAI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
                timeout: Duration::from_secs(timeout_secs.max(1)),
            },
        }
    }
}

fn parse_or<T: FromStr + Copy>(raw: Option<String>, key: &str, default: T) -> T {
    match raw {
        None => default,
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "unparseable configuration value; using default");
            default
        }),
    }
}
