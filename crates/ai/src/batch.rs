//! Ordered batch scoring.
//!
//! Texts are scored one at a time, so at most one oracle request is in flight per
//! batch and `results[i]` always belongs to `texts[i]`. Each item goes through its
//! own try/fallback inside [`SentimentScorer::score_one`]; a failure on one item has
//! no effect on its neighbours.

use tracing::debug;

use crate::judgment::SentimentJudgment;
use crate::scorer::SentimentScorer;

pub async fn score_batch<S: AsRef<str>>(
    scorer: &SentimentScorer,
    texts: &[S],
) -> Vec<SentimentJudgment> {
    let mut results = Vec::with_capacity(texts.len());
    for text in texts {
        results.push(scorer.score_one(text.as_ref()).await);
    }
    debug!(count = results.len(), "scored batch");
    results
}
