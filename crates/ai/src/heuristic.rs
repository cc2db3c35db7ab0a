//! Keyword-containment fallback scorer.
//!
//! Deterministic and I/O free. A word counts as positive if it *contains* any
//! positive indicator, and independently as negative if it contains any negative
//! indicator, so "badly" counts as negative and a word can count on both sides.

use sentiscope_core::SentimentLabel;

use crate::judgment::SentimentJudgment;

pub static POSITIVE_INDICATORS: &[&str] = &[
    "good", "great", "excellent", "amazing", "wonderful", "fantastic", "love", "awesome",
    "perfect", "best",
];

pub static NEGATIVE_INDICATORS: &[&str] = &[
    "bad", "terrible", "awful", "hate", "worst", "horrible", "disgusting", "disappointing",
    "fail", "broken",
];

/// Confidence reported when no indicator was found at all.
pub const NO_SIGNAL_CONFIDENCE: f64 = 0.5;

/// Indicator hits for one text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SignalCounts {
    pub positive: usize,
    pub negative: usize,
    pub words: usize,
}

impl SignalCounts {
    pub fn total(&self) -> usize {
        self.positive + self.negative
    }

    pub fn judgment(&self) -> SentimentJudgment {
        let total = self.total();
        if total == 0 {
            return SentimentJudgment::clamped(SentimentLabel::Neutral, 0.0, NO_SIGNAL_CONFIDENCE);
        }

        let score = (self.positive as f64 - self.negative as f64) / total as f64;
        // total > 0 implies words > 0.
        let confidence = (total as f64 / self.words as f64).min(1.0);

        SentimentJudgment::clamped(SentimentLabel::from_score(score), score, confidence)
    }
}

/// Count indicator hits over the lowercased words of `text`.
///
/// Words are the pieces between whitespace runs. Leading or trailing whitespace
/// yields an empty piece that counts toward `words` but never matches an indicator.
pub fn count_signals(text: &str) -> SignalCounts {
    let lowered = text.to_lowercase();
    let mut counts = SignalCounts {
        words: whitespace_pieces(&lowered),
        ..SignalCounts::default()
    };

    for word in lowered.split_whitespace() {
        if POSITIVE_INDICATORS.iter().any(|p| word.contains(p)) {
            counts.positive += 1;
        }
        if NEGATIVE_INDICATORS.iter().any(|n| word.contains(n)) {
            counts.negative += 1;
        }
    }

    counts
}

/// Number of pieces when splitting on runs of whitespace: one more than the
/// number of runs.
fn whitespace_pieces(text: &str) -> usize {
    let mut pieces = 1;
    let mut in_run = false;
    for c in text.chars() {
        let ws = c.is_whitespace();
        if ws && !in_run {
            pieces += 1;
        }
        in_run = ws;
    }
    pieces
}

pub fn score_text(text: &str) -> SentimentJudgment {
    count_signals(text).judgment()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn no_indicator_words_is_neutral_half_confidence() {
        let j = score_text("the sky is blue today");
        assert_eq!(j, SentimentJudgment::clamped(SentimentLabel::Neutral, 0.0, 0.5));
    }

    #[test]
    fn empty_and_blank_text_are_neutral() {
        assert_eq!(score_text(""), score_text("the sky is blue today"));
        assert_eq!(score_text("   \n\t "), score_text(""));
    }

    #[test]
    fn mixed_signal_example() {
        let counts = count_signals("good good bad");
        assert_eq!(counts, SignalCounts { positive: 2, negative: 1, words: 3 });

        let j = counts.judgment();
        assert!((j.score() - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(j.confidence(), 1.0);
        assert_eq!(j.label(), SentimentLabel::Positive);
    }

    #[test]
    fn surrounding_whitespace_counts_as_an_empty_word() {
        for text in [" good", "good\n"] {
            let counts = count_signals(text);
            assert_eq!(counts, SignalCounts { positive: 1, negative: 0, words: 2 }, "{text:?}");
            let j = counts.judgment();
            assert_eq!(j.label(), SentimentLabel::Positive);
            assert_eq!(j.score(), 1.0);
            assert_eq!(j.confidence(), 0.5);
        }

        // Inner runs collapse to one separator.
        assert_eq!(count_signals("good \t\n bad").words, 2);
        assert_eq!(count_signals(" good bad ").words, 4);
    }

    #[test]
    fn containment_not_whole_word() {
        let counts = count_signals("Badly BROKEN-ish excellently");
        assert_eq!(counts.negative, 2);
        assert_eq!(counts.positive, 1);
    }

    #[test]
    fn a_word_can_count_on_both_sides() {
        // "goodbad" contains both "good" and "bad".
        let counts = count_signals("goodbad");
        assert_eq!(counts, SignalCounts { positive: 1, negative: 1, words: 1 });
        let j = counts.judgment();
        assert_eq!(j.score(), 0.0);
        assert_eq!(j.label(), SentimentLabel::Neutral);
        // Two hits over one word caps at 1.
        assert_eq!(j.confidence(), 1.0);
    }

    #[test]
    fn confidence_is_share_of_signal_words() {
        let j = score_text("this release is terrible honestly");
        assert_eq!(j.label(), SentimentLabel::Negative);
        assert_eq!(j.score(), -1.0);
        assert!((j.confidence() - 0.2).abs() < 1e-12);
    }

    #[test]
    fn score_of_exactly_one_tenth_is_neutral() {
        // (11 - 9) / 20 == 0.1
        let text = format!("{} {}", "good ".repeat(11), "bad ".repeat(9));
        let j = score_text(&text);
        assert_eq!(j.score(), 0.1);
        assert_eq!(j.label(), SentimentLabel::Neutral);

        let text = format!("{} {}", "good ".repeat(9), "bad ".repeat(11));
        let j = score_text(&text);
        assert_eq!(j.score(), -0.1);
        assert_eq!(j.label(), SentimentLabel::Neutral);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: any text yields a judgment inside the documented ranges.
        #[test]
        fn judgment_is_always_in_range(text in ".{0,200}") {
            let j = score_text(&text);
            prop_assert!((-1.0..=1.0).contains(&j.score()));
            prop_assert!((0.0..=1.0).contains(&j.confidence()));
        }

        /// Property: scoring is a pure function of the text.
        #[test]
        fn scoring_is_deterministic(words in prop::collection::vec(
            prop::sample::select(vec!["good", "bad", "sky", "awful", "love", "meh", "BEST!"]),
            0..40,
        )) {
            let text = words.join(" ");
            prop_assert_eq!(score_text(&text), score_text(&text));
        }
    }
}
