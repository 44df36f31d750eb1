//! Keyword-based sentiment used when the generation service is unavailable.
//!
//! Counts how many lexicon words occur (as substrings) in the lowercased text
//! and maps the difference onto a score in `[-1, 1]`.

use pitwall_core::SentimentLabel;

pub const POSITIVE_WORDS: &[&str] = &[
    "great",
    "good",
    "amazing",
    "fast",
    "love",
    "perfect",
    "excellent",
    "happy",
    "excited",
    "awesome",
    "brilliant",
];

pub const NEGATIVE_WORDS: &[&str] = &[
    "bad",
    "slow",
    "terrible",
    "hate",
    "worst",
    "angry",
    "disappointed",
    "sad",
    "awful",
    "horrible",
    "frustrating",
];

/// Hits needed on one side for a full-strength score.
const SATURATION_HITS: f64 = 5.0;

/// Result of the offline sentiment estimate.
#[derive(Debug, Clone, PartialEq)]
pub struct OfflineSentiment {
    pub label: SentimentLabel,
    pub score: f64,
    pub positive_hits: usize,
    pub negative_hits: usize,
}

impl OfflineSentiment {
    pub fn explanation(&self) -> String {
        format!(
            "Offline sentiment estimate based on simple keyword matching. \
             Positive hits: {}, negative hits: {}.",
            self.positive_hits, self.negative_hits
        )
    }
}

/// Classify `text` against the fixed lexicons.
pub fn classify_offline(text: &str) -> OfflineSentiment {
    let lowered = text.to_lowercase();
    let positive_hits = count_hits(&lowered, POSITIVE_WORDS);
    let negative_hits = count_hits(&lowered, NEGATIVE_WORDS);

    let diff = positive_hits as f64 - negative_hits as f64;
    let (label, score) = if diff > 0.0 {
        (SentimentLabel::Positive, (diff / SATURATION_HITS).min(1.0))
    } else if diff < 0.0 {
        (SentimentLabel::Negative, -(-diff / SATURATION_HITS).min(1.0))
    } else {
        (SentimentLabel::Neutral, 0.0)
    };

    OfflineSentiment {
        label,
        score,
        positive_hits,
        negative_hits,
    }
}

fn count_hits(text: &str, lexicon: &[&str]) -> usize {
    lexicon.iter().filter(|w| text.contains(*w)).count()
}
