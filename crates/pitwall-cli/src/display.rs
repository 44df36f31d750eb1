//! Card display for answers and evidence.

use std::fmt::Write;

use pitwall_core::{AnswerDetail, AnswerResult, EvidenceBundle, EvidenceItem};

const MAX_EVIDENCE_ITEMS: usize = 10;
const MAX_SNIPPET_CHARS: usize = 90;

// ── Public API ──

/// Print an answer as a card: header, answer body, then kind-specific
/// fields and any supporting evidence.
pub fn print_answer_card(result: &AnswerResult) {
    print!("{}", render_answer(result));
}

pub fn print_evidence_card(bundle: &EvidenceBundle) {
    print!("{}", render_evidence(bundle));
}

// ── Rendering ──

fn render_answer(result: &AnswerResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== {} ===", result.kind.as_str());
    let _ = writeln!(out, "{}", result.answer);
    let _ = writeln!(out);

    let mut fields: Vec<(&str, String)> = Vec::new();
    if let Some(confidence) = result.confidence {
        fields.push(("confidence", format!("{confidence:.2}")));
    }
    match &result.detail {
        Some(AnswerDetail::Sentiment { label, score, .. }) => {
            fields.push(("label", label.as_str().to_string()));
            fields.push(("score", format!("{score:+.2}")));
        }
        Some(AnswerDetail::Summary {
            original_length,
            max_words,
        }) => {
            fields.push(("original words", original_length.to_string()));
            fields.push(("max words", max_words.to_string()));
        }
        Some(AnswerDetail::Multilingual { target_language }) => {
            fields.push(("language", target_language.clone()));
        }
        None => {}
    }
    if !fields.is_empty() {
        let _ = writeln!(out, "Details");
        for (name, value) in fields {
            let _ = writeln!(out, "  {name:<16} {value}");
        }
        let _ = writeln!(out);
    }

    if let Some(bundle) = result.evidence.as_ref().filter(|b| !b.is_empty()) {
        out.push_str(&render_evidence(bundle));
    }
    out
}

fn render_evidence(bundle: &EvidenceBundle) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Evidence ({} items, confidence {:.2})",
        bundle.len(),
        bundle.confidence()
    );
    for item in bundle.items().iter().take(MAX_EVIDENCE_ITEMS) {
        let _ = writeln!(out, "  {}", evidence_line(item));
    }
    if bundle.len() > MAX_EVIDENCE_ITEMS {
        let _ = writeln!(out, "  ... and {} more", bundle.len() - MAX_EVIDENCE_ITEMS);
    }
    let _ = writeln!(out);
    out
}

fn evidence_line(item: &EvidenceItem) -> String {
    let score = item
        .score()
        .map(|s| format!("{s:+.3}"))
        .unwrap_or_else(|| "  -   ".to_string());
    match item {
        EvidenceItem::Text(text) => format!(
            "[text]      {score}  {}  ({})",
            snippet(&text.text),
            text.source.as_deref().unwrap_or("unknown")
        ),
        EvidenceItem::Telemetry(t) => {
            let lap = match t.lap {
                Some(lap) => format!("lap {lap}"),
                None => "lap ?".to_string(),
            };
            let mut line = format!("[telemetry] {score}  {lap}");
            for (key, value) in &t.metadata {
                let _ = write!(line, "  {key}={value}");
            }
            line
        }
    }
}

fn snippet(text: &str) -> String {
    if text.chars().count() > MAX_SNIPPET_CHARS {
        let head: String = text.chars().take(MAX_SNIPPET_CHARS - 3).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}
