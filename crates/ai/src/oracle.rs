use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use sentiscope_core::SentimentLabel;

/// Raw classification as reported by an oracle.
///
/// Numeric ranges are whatever the oracle sent; [`crate::SentimentScorer`] clamps
/// them before anything else sees them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OracleVerdict {
    pub label: SentimentLabel,
    pub score: f64,
    pub confidence: f64,
}

/// External sentiment classifier (typically a hosted LLM).
///
/// Implementations perform at most one outbound request per call and hold no
/// per-call state, so one instance is shared by every request.
#[async_trait]
pub trait SentimentOracle: Send + Sync + 'static {
    /// Short name used in logs.
    fn name(&self) -> &str;

    async fn classify(&self, text: &str) -> Result<OracleVerdict, OracleError>;
}

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("no oracle configured")]
    NotConfigured,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("oracle returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed oracle response: {0}")]
    Malformed(String),

    #[error("oracle call timed out after {0:?}")]
    Timeout(Duration),
}
