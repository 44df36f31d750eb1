//! Response contract for structured generation output.
//!
//! Models asked for "strict JSON" still wrap it in Markdown fences or prefix
//! it with `json`. [`sanitize`] strips those wrappers; [`parse_sentiment`]
//! coerces the result into a [`SentimentContract`], substituting a
//! label-conditioned score when the numeric field is missing or garbled.

use pitwall_core::SentimentLabel;
use serde_json::{Map, Value};
use thiserror::Error;

const FENCE: &str = "```";
const JSON_FENCE: &str = "```json";
const JSON_TOKEN: &str = "json";

/// Structured output that could not be parsed. Carries the raw text so it can
/// be surfaced for diagnosis.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("unparseable generation output ({reason})")]
pub struct ParseFailure {
    pub raw: String,
    pub reason: String,
}

/// Sentiment fields after coercion.
#[derive(Debug, Clone, PartialEq)]
pub struct SentimentContract {
    pub label: SentimentLabel,
    pub score: f64,
    pub explanation: String,
}

/// Strip Markdown code fences and a leading `json` token.
pub fn sanitize(raw: &str) -> String {
    let without_json_fences = remove_ascii_case_insensitive(raw.trim(), JSON_FENCE);
    let unfenced = without_json_fences.replace(FENCE, "");
    let trimmed = unfenced.trim();

    let rest = match trimmed.get(..JSON_TOKEN.len()) {
        Some(head) if head.eq_ignore_ascii_case(JSON_TOKEN) => &trimmed[JSON_TOKEN.len()..],
        _ => trimmed,
    };
    rest.trim().to_string()
}

/// Sanitise and parse a sentiment response.
pub fn parse_sentiment(raw: &str) -> Result<SentimentContract, ParseFailure> {
    let clean = sanitize(raw);
    let value: Value = serde_json::from_str(&clean).map_err(|e| ParseFailure {
        raw: raw.to_string(),
        reason: e.to_string(),
    })?;
    let Value::Object(fields) = value else {
        return Err(ParseFailure {
            raw: raw.to_string(),
            reason: "expected a JSON object".to_string(),
        });
    };

    let label = fields
        .get("label")
        .and_then(Value::as_str)
        .map(SentimentLabel::from_label)
        .unwrap_or(SentimentLabel::Unknown);
    let score = numeric_field(&fields, "score").unwrap_or_else(|| label.default_score());
    let explanation = fields
        .get("explanation")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    Ok(SentimentContract {
        label,
        score,
        explanation,
    })
}

/// A finite number, or a string that parses as one.
fn numeric_field(fields: &Map<String, Value>, key: &str) -> Option<f64> {
    let n = match fields.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}

/// Remove every occurrence of an ASCII `needle`, ignoring case.
fn remove_ascii_case_insensitive(haystack: &str, needle: &str) -> String {
    let lowered = haystack.to_ascii_lowercase();
    let mut out = String::with_capacity(haystack.len());
    let mut cursor = 0;
    while let Some(offset) = lowered[cursor..].find(needle) {
        let start = cursor + offset;
        out.push_str(&haystack[cursor..start]);
        cursor = start + needle.len();
    }
    out.push_str(&haystack[cursor..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_json_fence() {
        let raw = "```json\n{\"label\":\"positive\",\"score\":0.9}\n```";
        assert_eq!(sanitize(raw), r#"{"label":"positive","score":0.9}"#);
    }

    #[test]
    fn strips_uppercase_fence_and_json_prefix() {
        assert_eq!(sanitize("```JSON\n{}\n```"), "{}");
        assert_eq!(sanitize("  JSON {\"a\": 1}"), "{\"a\": 1}");
        assert_eq!(sanitize("```\n[1, 2]\n```"), "[1, 2]");
    }

    #[test]
    fn leaves_plain_json_alone() {
        assert_eq!(sanitize(r#"{"label":"neutral"}"#), r#"{"label":"neutral"}"#);
    }

    #[test]
    fn non_numeric_score_uses_label_default() {
        let raw = "```json\n{\"label\":\"positive\",\"score\":\"oops\"}\n```";
        let parsed = parse_sentiment(raw).unwrap();
        assert_eq!(parsed.label, SentimentLabel::Positive);
        assert_eq!(parsed.score, 0.7);
        assert_eq!(parsed.explanation, "");
    }

    #[test]
    fn missing_score_defaults_by_polarity() {
        let neg = parse_sentiment(r#"{"label":"negative","explanation":"angry radio"}"#).unwrap();
        assert_eq!(neg.score, -0.7);
        assert_eq!(neg.explanation, "angry radio");

        let neutral = parse_sentiment(r#"{"label":"neutral","score":null}"#).unwrap();
        assert_eq!(neutral.score, 0.0);
    }

    #[test]
    fn numeric_string_score_is_coerced() {
        let parsed = parse_sentiment(r#"{"label":"negative","score":" -0.35 "}"#).unwrap();
        assert_eq!(parsed.score, -0.35);
    }

    #[test]
    fn unrecognised_label_is_unknown() {
        let parsed = parse_sentiment(r#"{"label":"mixed","score":0.1}"#).unwrap();
        assert_eq!(parsed.label, SentimentLabel::Unknown);
        assert_eq!(parsed.score, 0.1);
    }

    #[test]
    fn prose_is_a_parse_failure_with_raw_text() {
        let raw = "The fans seem pretty happy overall.";
        let err = parse_sentiment(raw).unwrap_err();
        assert_eq!(err.raw, raw);
    }

    #[test]
    fn non_object_is_a_parse_failure() {
        let err = parse_sentiment("[\"positive\"]").unwrap_err();
        assert_eq!(err.reason, "expected a JSON object");
    }
}
