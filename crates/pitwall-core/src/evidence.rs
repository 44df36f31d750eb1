//! Evidence items retrieved for a question, and the fused bundle handed to
//! the answering agents.
//!
//! Two retrievers produce evidence: the passage corpus (always has text) and
//! the telemetry index (keyed by lap, text optional). Both share the
//! capability set {score, source, text} and are treated uniformly downstream.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A passage retrieved from the static knowledge corpus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextEvidence {
    pub text: String,
    pub source: Option<String>,
    /// Cosine similarity to the query. Not clamped: dissimilar passages score
    /// below zero.
    pub score: f64,
}

/// A precomputed telemetry summary for one driver, usually one lap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryEvidence {
    pub lap: Option<i64>,
    pub score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

/// A single retrieved fact with a relevance score and provenance tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EvidenceItem {
    Text(TextEvidence),
    Telemetry(TelemetryEvidence),
}

impl EvidenceItem {
    pub fn score(&self) -> Option<f64> {
        match self {
            Self::Text(t) => Some(t.score),
            Self::Telemetry(t) => t.score,
        }
    }

    pub fn source(&self) -> Option<&str> {
        match self {
            Self::Text(t) => t.source.as_deref(),
            Self::Telemetry(t) => t.source.as_deref(),
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text(t) => Some(t.text.as_str()),
            Self::Telemetry(t) => t.text.as_deref(),
        }
    }

    /// Lap number for telemetry evidence.
    pub fn lap(&self) -> Option<i64> {
        match self {
            Self::Text(_) => None,
            Self::Telemetry(t) => t.lap,
        }
    }

    /// Render as a prompt context line: `- {text} (source: {source})`.
    ///
    /// Returns `None` for items without text; they still count towards
    /// confidence but contribute nothing to the prompt.
    pub fn context_line(&self) -> Option<String> {
        let text = self.text().filter(|t| !t.is_empty())?;
        let source = self.source().unwrap_or("unknown");
        Some(format!("- {text} (source: {source})"))
    }
}

/// Vetted evidence: the retrieved items, unmodified, annotated with an
/// aggregate confidence in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceBundle {
    items: Vec<EvidenceItem>,
    confidence: f64,
}

impl EvidenceBundle {
    /// Wrap items with a confidence. Out-of-range or non-finite confidence is
    /// pulled back into `[0, 1]`.
    pub fn new(items: Vec<EvidenceItem>, confidence: f64) -> Self {
        let confidence = if confidence.is_finite() {
            confidence.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self { items, confidence }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new(), 0.0)
    }

    pub fn items(&self) -> &[EvidenceItem] {
        &self.items
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Newline-joined context lines for every item that has text.
    pub fn render_context(&self) -> String {
        self.items
            .iter()
            .filter_map(EvidenceItem::context_line)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn passage(text: &str, source: &str, score: f64) -> EvidenceItem {
        EvidenceItem::Text(TextEvidence {
            text: text.into(),
            source: Some(source.into()),
            score,
        })
    }

    fn lap(lap: i64, score: Option<f64>) -> EvidenceItem {
        EvidenceItem::Telemetry(TelemetryEvidence {
            lap: Some(lap),
            score,
            text: None,
            source: None,
            metadata: Map::new(),
        })
    }

    #[test]
    fn shared_capabilities() {
        let t = passage("DRS opens the rear wing flap.", "fia", -0.25);
        assert_eq!(t.score(), Some(-0.25));
        assert_eq!(t.source(), Some("fia"));
        assert_eq!(t.lap(), None);

        let l = lap(30, None);
        assert_eq!(l.score(), None);
        assert_eq!(l.source(), None);
        assert_eq!(l.text(), None);
        assert_eq!(l.lap(), Some(30));
    }

    #[test]
    fn context_skips_items_without_text() {
        let bundle = EvidenceBundle::new(
            vec![
                passage("Undercut: pit earlier than a rival.", "strategy", 0.4),
                lap(30, Some(0.9)),
                passage("Soft tyres degrade fastest.", "pirelli", 0.2),
            ],
            0.5,
        );
        assert_eq!(
            bundle.render_context(),
            "- Undercut: pit earlier than a rival. (source: strategy)\n\
             - Soft tyres degrade fastest. (source: pirelli)"
        );
        assert_eq!(bundle.len(), 3);
    }

    #[test]
    fn bundle_confidence_stays_in_unit_range() {
        assert_eq!(EvidenceBundle::new(vec![], 1.4).confidence(), 1.0);
        assert_eq!(EvidenceBundle::new(vec![], -0.3).confidence(), 0.0);
        assert_eq!(EvidenceBundle::new(vec![], f64::NAN).confidence(), 0.0);
        assert!(EvidenceBundle::empty().is_empty());
    }

    #[test]
    fn evidence_json_is_tagged() {
        let json = serde_json::to_value(lap(10, Some(0.7))).unwrap();
        assert_eq!(json["kind"], "telemetry");
        assert_eq!(json["lap"], 10);

        let parsed: EvidenceItem = serde_json::from_value(serde_json::json!({
            "kind": "text",
            "text": "Blue flags signal a faster car approaching.",
            "source": null,
            "score": 0.12
        }))
        .unwrap();
        assert_eq!(parsed.source(), None);
        assert_eq!(parsed.score(), Some(0.12));
    }
}
