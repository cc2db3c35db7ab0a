use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::heuristic;
use crate::judgment::SentimentJudgment;
use crate::oracle::{OracleError, SentimentOracle};

pub const DEFAULT_ORACLE_TIMEOUT: Duration = Duration::from_secs(20);

/// Resolves the sentiment of one text.
///
/// The oracle is consulted first (bounded by `timeout`). Any failure, including
/// having no oracle at all, falls back to [`heuristic::score_text`]. Scoring
/// therefore never fails; the worst case is a neutral judgment.
#[derive(Clone)]
pub struct SentimentScorer {
    oracle: Option<Arc<dyn SentimentOracle>>,
    timeout: Duration,
}

impl core::fmt::Debug for SentimentScorer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SentimentScorer")
            .field("oracle", &self.oracle.as_ref().map(|o| o.name()))
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl SentimentScorer {
    pub fn new(oracle: Arc<dyn SentimentOracle>) -> Self {
        Self {
            oracle: Some(oracle),
            timeout: DEFAULT_ORACLE_TIMEOUT,
        }
    }

    /// Scorer that never leaves the process.
    pub fn heuristic_only() -> Self {
        Self {
            oracle: None,
            timeout: DEFAULT_ORACLE_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn has_oracle(&self) -> bool {
        self.oracle.is_some()
    }

    pub async fn score_one(&self, text: &str) -> SentimentJudgment {
        match self.consult_oracle(text).await {
            Ok(judgment) => judgment,
            Err(OracleError::NotConfigured) => {
                debug!("no oracle configured; scoring with keyword fallback");
                heuristic::score_text(text)
            }
            Err(e) => {
                warn!(error = %e, "oracle classification failed; scoring with keyword fallback");
                heuristic::score_text(text)
            }
        }
    }

    /// Score `texts` in order. See [`crate::batch::score_batch`].
    pub async fn score_batch<S: AsRef<str>>(&self, texts: &[S]) -> Vec<SentimentJudgment> {
        crate::batch::score_batch(self, texts).await
    }

    /// Primary strategy only, with the oracle's numbers clamped.
    pub async fn consult_oracle(&self, text: &str) -> Result<SentimentJudgment, OracleError> {
        let oracle = self.oracle.as_ref().ok_or(OracleError::NotConfigured)?;

        let verdict = tokio::time::timeout(self.timeout, oracle.classify(text))
            .await
            .map_err(|_| OracleError::Timeout(self.timeout))??;

        Ok(SentimentJudgment::clamped(
            verdict.label,
            verdict.score,
            verdict.confidence,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::OracleVerdict;
    use async_trait::async_trait;
    use proptest::prelude::*;
    use sentiscope_core::SentimentLabel;

    /// Returns the same verdict for every text.
    struct FixedOracle(OracleVerdict);

    #[async_trait]
    impl SentimentOracle for FixedOracle {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn classify(&self, _text: &str) -> Result<OracleVerdict, OracleError> {
            Ok(self.0)
        }
    }

    struct FailingOracle;

    #[async_trait]
    impl SentimentOracle for FailingOracle {
        fn name(&self) -> &str {
            "failing"
        }

        async fn classify(&self, _text: &str) -> Result<OracleVerdict, OracleError> {
            Err(OracleError::Transport("connection refused".to_string()))
        }
    }

    struct SlowOracle(Duration);

    #[async_trait]
    impl SentimentOracle for SlowOracle {
        fn name(&self) -> &str {
            "slow"
        }

        async fn classify(&self, _text: &str) -> Result<OracleVerdict, OracleError> {
            tokio::time::sleep(self.0).await;
            Ok(OracleVerdict {
                label: SentimentLabel::Positive,
                score: 0.9,
                confidence: 0.9,
            })
        }
    }

    fn fixed(label: SentimentLabel, score: f64, confidence: f64) -> SentimentScorer {
        SentimentScorer::new(Arc::new(FixedOracle(OracleVerdict {
            label,
            score,
            confidence,
        })))
    }

    #[tokio::test]
    async fn oracle_result_is_used_when_it_succeeds() {
        let scorer = fixed(SentimentLabel::Negative, -0.4, 0.8);
        let j = scorer.score_one("the sky is blue today").await;
        assert_eq!(j, SentimentJudgment::clamped(SentimentLabel::Negative, -0.4, 0.8));
    }

    #[tokio::test]
    async fn oracle_values_are_clamped() {
        let scorer = fixed(SentimentLabel::Positive, 5.0, 1.7);
        let j = scorer.score_one("anything").await;
        assert_eq!(j.score(), 1.0);
        assert_eq!(j.confidence(), 1.0);

        let scorer = fixed(SentimentLabel::Negative, -12.0, -0.3);
        let j = scorer.score_one("anything").await;
        assert_eq!(j.score(), -1.0);
        assert_eq!(j.confidence(), 0.0);
    }

    #[tokio::test]
    async fn failing_oracle_falls_back_to_heuristic() {
        let scorer = SentimentScorer::new(Arc::new(FailingOracle));
        let j = scorer.score_one("good good bad").await;
        assert_eq!(j, heuristic::score_text("good good bad"));
        assert_eq!(j.label(), SentimentLabel::Positive);
    }

    #[tokio::test]
    async fn missing_oracle_falls_back_to_heuristic() {
        let scorer = SentimentScorer::heuristic_only();
        assert!(!scorer.has_oracle());
        assert!(matches!(
            scorer.consult_oracle("x").await,
            Err(OracleError::NotConfigured)
        ));
        let j = scorer.score_one("the sky is blue today").await;
        assert_eq!(j, SentimentJudgment::clamped(SentimentLabel::Neutral, 0.0, 0.5));
    }

    #[tokio::test]
    async fn slow_oracle_times_out_into_fallback() {
        let scorer = SentimentScorer::new(Arc::new(SlowOracle(Duration::from_secs(5))))
            .with_timeout(Duration::from_millis(20));

        assert!(matches!(
            scorer.consult_oracle("awful").await,
            Err(OracleError::Timeout(_))
        ));
        let j = scorer.score_one("awful").await;
        assert_eq!(j.label(), SentimentLabel::Negative);
        assert_eq!(j.score(), -1.0);
    }

    #[tokio::test]
    async fn fallback_is_deterministic() {
        let scorer = SentimentScorer::new(Arc::new(FailingOracle));
        let text = "love the new look but checkout is broken";
        assert_eq!(scorer.score_one(text).await, scorer.score_one(text).await);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 64,
            ..ProptestConfig::default()
        })]

        /// Property: whatever numbers the oracle reports, the judgment stays in range.
        #[test]
        fn oracle_numbers_never_escape_range(
            score in prop::num::f64::ANY,
            confidence in prop::num::f64::ANY,
        ) {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .build()
                .unwrap();
            let scorer = fixed(SentimentLabel::Neutral, score, confidence);
            let j = rt.block_on(scorer.score_one("text"));
            prop_assert!((-1.0..=1.0).contains(&j.score()));
            prop_assert!((0.0..=1.0).contains(&j.confidence()));
        }
    }
}
