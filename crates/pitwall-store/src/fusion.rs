//! Evidence fusion: merges text and telemetry evidence into one bundle with
//! an aggregate confidence.
//!
//! Verification here means scoring, not pruning. Items pass through unchanged
//! and in order. Confidence is the mean item score, boosted when at least two
//! independent sources agree to contribute. This is a corroboration heuristic,
//! not a statistical confidence.

use std::collections::HashSet;

use pitwall_core::{EvidenceBundle, EvidenceItem};
use tracing::debug;

/// Score assumed for items that carry none.
pub const MISSING_SCORE: f64 = 0.5;

/// Added to the mean score when evidence comes from two or more sources.
pub const DIVERSITY_BOOST: f64 = 0.2;

/// Number of distinct sources needed for the boost.
pub const MIN_DISTINCT_SOURCES: usize = 2;

/// Fuse retrieved evidence into a vetted bundle.
pub fn fuse(items: Vec<EvidenceItem>) -> EvidenceBundle {
    let confidence = confidence(&items);
    EvidenceBundle::new(items, confidence)
}

/// Aggregate confidence for `items`; `0.0` for no evidence.
pub fn confidence(items: &[EvidenceItem]) -> f64 {
    let total: f64 = items
        .iter()
        .map(|e| e.score().unwrap_or(MISSING_SCORE))
        .sum();
    let avg_score = total / items.len().max(1) as f64;

    let sources = distinct_sources(items);
    let confidence = if sources >= MIN_DISTINCT_SOURCES {
        (avg_score + DIVERSITY_BOOST).min(1.0)
    } else {
        avg_score
    };
    debug!(
        items = items.len(),
        sources,
        avg_score,
        confidence,
        "fused evidence"
    );
    confidence
}

/// Count of unique, non-empty source tags.
pub fn distinct_sources(items: &[EvidenceItem]) -> usize {
    items
        .iter()
        .filter_map(EvidenceItem::source)
        .filter(|s| !s.is_empty())
        .collect::<HashSet<_>>()
        .len()
}
