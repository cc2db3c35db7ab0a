//! `sentiscope-ai`
//!
//! **Responsibility:** the sentiment-resolution pipeline.
//!
//! - [`SentimentOracle`] is the capability boundary to an external classifier.
//! - [`heuristic`] is the local, deterministic keyword fallback.
//! - [`SentimentScorer`] tries the oracle and degrades to the fallback; it never fails.
//! - [`batch`] applies the scorer to an ordered list of texts.
//!
//! Nothing here touches storage. Callers decide what to do with a judgment.

pub mod batch;
pub mod heuristic;
pub mod judgment;
pub mod openai;
pub mod oracle;
pub mod scorer;

pub use judgment::SentimentJudgment;
pub use openai::{OpenAiConfig, OpenAiOracle};
pub use oracle::{OracleError, OracleVerdict, SentimentOracle};
pub use scorer::{DEFAULT_ORACLE_TIMEOUT, SentimentScorer};
