//! The externally visible unit produced for every query.

use serde::{Deserialize, Serialize};

use crate::evidence::EvidenceBundle;

/// Which agent produced an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerKind {
    Qa,
    Sentiment,
    Summary,
    MultilingualQa,
    General,
}

impl AnswerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Qa => "qa",
            Self::Sentiment => "sentiment",
            Self::Summary => "summary",
            Self::MultilingualQa => "multilingual_qa",
            Self::General => "general",
        }
    }
}

/// Polarity label of a sentiment classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
    /// Empty input or unparseable model output.
    Unknown,
}

impl SentimentLabel {
    /// Parse a model-provided label. Anything unrecognised is `Unknown`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "positive" => Self::Positive,
            "negative" => Self::Negative,
            "neutral" => Self::Neutral,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Neutral => "neutral",
            Self::Unknown => "unknown",
        }
    }

    /// Score substituted when the model omits or garbles the numeric field.
    pub fn default_score(&self) -> f64 {
        match self {
            Self::Positive => 0.7,
            Self::Negative => -0.7,
            Self::Neutral | Self::Unknown => 0.0,
        }
    }
}

/// Kind-specific fields carried alongside the answer text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerDetail {
    Sentiment {
        label: SentimentLabel,
        /// In `[-1, 1]` for well-behaved models; not clamped.
        score: f64,
        raw_text: String,
    },
    Summary {
        original_length: usize,
        max_words: usize,
    },
    Multilingual {
        target_language: String,
    },
}

/// Result of one query. `confidence` is `None` only for answers that bypass
/// retrieval entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerResult {
    pub kind: AnswerKind,
    pub answer: String,
    pub confidence: Option<f64>,
    pub evidence: Option<EvidenceBundle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<AnswerDetail>,
}

impl AnswerResult {
    /// Evidence-backed race question answer.
    pub fn qa(answer: String, evidence: EvidenceBundle) -> Self {
        Self {
            kind: AnswerKind::Qa,
            answer,
            confidence: Some(evidence.confidence()),
            evidence: Some(evidence),
            detail: None,
        }
    }

    /// Answer produced without retrieval.
    pub fn general(answer: String) -> Self {
        Self {
            kind: AnswerKind::General,
            answer,
            confidence: None,
            evidence: None,
            detail: None,
        }
    }

    pub fn sentiment(
        label: SentimentLabel,
        score: f64,
        explanation: String,
        raw_text: String,
    ) -> Self {
        Self {
            kind: AnswerKind::Sentiment,
            answer: explanation,
            confidence: None,
            evidence: None,
            detail: Some(AnswerDetail::Sentiment {
                label,
                score,
                raw_text,
            }),
        }
    }

    pub fn summary(summary: String, original_length: usize, max_words: usize) -> Self {
        Self {
            kind: AnswerKind::Summary,
            answer: summary,
            confidence: None,
            evidence: None,
            detail: Some(AnswerDetail::Summary {
                original_length,
                max_words,
            }),
        }
    }

    pub fn multilingual(answer: String, target_language: String) -> Self {
        Self {
            kind: AnswerKind::MultilingualQa,
            answer,
            confidence: None,
            evidence: None,
            detail: Some(AnswerDetail::Multilingual { target_language }),
        }
    }

    /// Sentiment label, if this is a sentiment result.
    pub fn sentiment_label(&self) -> Option<SentimentLabel> {
        match &self.detail {
            Some(AnswerDetail::Sentiment { label, .. }) => Some(*label),
            _ => None,
        }
    }
}
