//! Text agents that work without retrieval: sentiment, summaries, and
//! multilingual answers over a caller-supplied context.

use pitwall_ai::{classify_offline, parse_sentiment};
use pitwall_core::query::DEFAULT_SUMMARY_WORDS;
use pitwall_core::{AnswerResult, EvidenceItem, SentimentLabel};
use tracing::{debug, warn};

use crate::assistant::{Assistant, trimmed_text};
use crate::prompts;

pub const NO_TEXT: &str = "No text was provided.";
pub const NO_EVIDENCE: &str = "No evidence available to summarize.";
pub const MULTILINGUAL_UNAVAILABLE: &str = "Multilingual QA model is currently unavailable. \
     Please try again later with a simpler question.";

impl Assistant {
    /// Classify the sentiment of `text`.
    ///
    /// Uses the model when it answers with a parseable contract, the keyword
    /// classifier when generation is unavailable, and `unknown` when the model
    /// answers with something that cannot be parsed.
    pub async fn analyze_sentiment(&self, text: &str, language: Option<&str>) -> AnswerResult {
        if text.trim().is_empty() {
            return AnswerResult::sentiment(
                SentimentLabel::Unknown,
                0.0,
                NO_TEXT.to_string(),
                text.to_string(),
            );
        }

        let prompt = prompts::sentiment_prompt(text, language);
        let generation = self.attempt(&prompt).await;
        let Some(raw) = trimmed_text(generation) else {
            let offline = classify_offline(text);
            debug!(label = offline.label.as_str(), "offline sentiment");
            return AnswerResult::sentiment(
                offline.label,
                offline.score,
                offline.explanation(),
                text.to_string(),
            );
        };

        match parse_sentiment(&raw) {
            Ok(contract) => {
                let explanation = if contract.explanation.trim().is_empty() {
                    format!("Classified as {}.", contract.label.as_str())
                } else {
                    contract.explanation
                };
                AnswerResult::sentiment(
                    contract.label,
                    contract.score,
                    explanation,
                    text.to_string(),
                )
            }
            Err(failure) => {
                warn!(reason = %failure.reason, "sentiment response did not parse");
                AnswerResult::sentiment(
                    SentimentLabel::Unknown,
                    0.0,
                    format!("LLM response (unparsed): {}", failure.raw),
                    text.to_string(),
                )
            }
        }
    }

    /// Summarize `text` in at most `max_words` words, in the text's language.
    /// Offline, the summary is the first `max_words` words.
    pub async fn summarize_text(&self, text: &str, max_words: usize) -> AnswerResult {
        let words: Vec<&str> = text.split_whitespace().collect();
        if words.is_empty() {
            return AnswerResult::summary(String::new(), 0, max_words);
        }

        let prompt = prompts::summary_prompt(text, max_words);
        let summary = trimmed_text(self.attempt(&prompt).await)
            .unwrap_or_else(|| truncate_words(&words, max_words));
        AnswerResult::summary(summary, words.len(), max_words)
    }

    /// Short summary of retrieved evidence, in English or Arabic (`"ar"`).
    pub async fn summarize_evidence(
        &self,
        evidence: &[EvidenceItem],
        language: &str,
    ) -> AnswerResult {
        let lines: Vec<String> = evidence
            .iter()
            .filter_map(EvidenceItem::context_line)
            .collect();
        if lines.is_empty() {
            return AnswerResult::summary(NO_EVIDENCE.to_string(), 0, DEFAULT_SUMMARY_WORDS);
        }

        let texts: Vec<&str> = evidence
            .iter()
            .filter_map(EvidenceItem::text)
            .flat_map(str::split_whitespace)
            .collect();
        let prompt = prompts::evidence_summary_prompt(&lines.join("\n\n"), language);
        let summary = trimmed_text(self.attempt(&prompt).await)
            .unwrap_or_else(|| truncate_words(&texts, DEFAULT_SUMMARY_WORDS));
        AnswerResult::summary(summary, texts.len(), DEFAULT_SUMMARY_WORDS)
    }

    /// Answer `question` from `context` in `target_lang`.
    pub async fn multilingual_qa(
        &self,
        context: &str,
        question: &str,
        target_lang: &str,
    ) -> AnswerResult {
        let prompt = prompts::multilingual_prompt(context, question, target_lang);
        let answer = trimmed_text(self.attempt(&prompt).await)
            .unwrap_or_else(|| MULTILINGUAL_UNAVAILABLE.to_string());
        AnswerResult::multilingual(answer, target_lang.to_string())
    }
}

fn truncate_words(words: &[&str], max_words: usize) -> String {
    words[..words.len().min(max_words)].join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ScriptedGenerator, assistant_with, scripted};
    use pitwall_core::{AnswerDetail, AnswerKind, TextEvidence};

    fn sentiment_of(result: &AnswerResult) -> (SentimentLabel, f64) {
        match result.detail {
            Some(AnswerDetail::Sentiment { label, score, .. }) => (label, score),
            ref other => panic!("expected sentiment detail, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn sentiment_from_fenced_contract() {
        let reply = concat!(
            "```json\n",
            r#"{"label": "positive", "score": 0.85, "explanation": "Fans loved the win."}"#,
            "\n```"
        );
        let (assistant, generator) = scripted(ScriptedGenerator::success(reply));
        let result = assistant.analyze_sentiment("What a win!", Some("en")).await;

        assert_eq!(result.kind, AnswerKind::Sentiment);
        assert_eq!(result.answer, "Fans loved the win.");
        assert_eq!(sentiment_of(&result), (SentimentLabel::Positive, 0.85));
        let prompts = generator.prompts.lock().unwrap();
        assert!(prompts[0].contains("The text is in en."));
    }

    #[tokio::test]
    async fn sentiment_offline_uses_lexicon() {
        let assistant = assistant_with(ScriptedGenerator::offline());
        let result = assistant
            .analyze_sentiment("Terrible strategy, awful pit stop and a bad crash", None)
            .await;
        let (label, score) = sentiment_of(&result);
        assert_eq!(label, SentimentLabel::Negative);
        assert!(score < 0.0);
        assert!(result.answer.starts_with("Offline sentiment estimate"));
    }

    #[tokio::test]
    async fn sentiment_unparseable_is_unknown() {
        let assistant = assistant_with(ScriptedGenerator::success("I think it is positive"));
        let result = assistant.analyze_sentiment("Great drive", None).await;
        assert_eq!(sentiment_of(&result), (SentimentLabel::Unknown, 0.0));
        assert_eq!(
            result.answer,
            "LLM response (unparsed): I think it is positive"
        );
    }

    #[tokio::test]
    async fn sentiment_of_nothing() {
        let (assistant, generator) = scripted(ScriptedGenerator::success("unused"));
        let result = assistant.analyze_sentiment("  ", None).await;
        assert_eq!(sentiment_of(&result), (SentimentLabel::Unknown, 0.0));
        assert_eq!(result.answer, NO_TEXT);
        assert!(generator.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn summary_fallback_truncates() {
        let assistant = assistant_with(ScriptedGenerator::offline());
        let result = assistant
            .summarize_text("Verstappen led from pole and never looked back", 4)
            .await;
        assert_eq!(result.answer, "Verstappen led from pole");
        assert_eq!(
            result.detail,
            Some(AnswerDetail::Summary {
                original_length: 8,
                max_words: 4
            })
        );
    }

    #[tokio::test]
    async fn summary_uses_generation() {
        let (assistant, generator) = scripted(ScriptedGenerator::success(" Max won. \n"));
        let result = assistant.summarize_text("Long race report ...", 40).await;
        assert_eq!(result.answer, "Max won.");
        let prompts = generator.prompts.lock().unwrap();
        assert!(prompts[0].contains("at most 40 words"));
    }

    #[tokio::test]
    async fn summary_of_empty_text() {
        let assistant = assistant_with(ScriptedGenerator::success("unused"));
        let result = assistant.summarize_text("", 70).await;
        assert_eq!(result.answer, "");
        assert!(matches!(
            result.detail,
            Some(AnswerDetail::Summary {
                original_length: 0,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn evidence_summary_in_arabic() {
        let (assistant, generator) = scripted(ScriptedGenerator::success("ملخص"));
        let evidence = vec![EvidenceItem::Text(TextEvidence {
            text: "Hamilton pitted on lap 30.".into(),
            source: Some("race_report".into()),
            score: 0.5,
        })];
        let result = assistant.summarize_evidence(&evidence, "ar").await;
        assert_eq!(result.answer, "ملخص");
        let prompts = generator.prompts.lock().unwrap();
        assert!(prompts[0].contains("- Hamilton pitted on lap 30. (source: race_report)"));
        assert!(prompts[0].contains("الملخص:"));
    }

    #[tokio::test]
    async fn evidence_summary_empty_and_offline() {
        let assistant = assistant_with(ScriptedGenerator::offline());
        let empty = assistant.summarize_evidence(&[], "en").await;
        assert_eq!(empty.answer, NO_EVIDENCE);

        let evidence = vec![EvidenceItem::Text(TextEvidence {
            text: "Safety car on lap 12.".into(),
            source: None,
            score: 0.2,
        })];
        let result = assistant.summarize_evidence(&evidence, "en").await;
        assert_eq!(result.answer, "Safety car on lap 12.");
    }

    #[tokio::test]
    async fn multilingual_fallback_message() {
        let assistant = assistant_with(ScriptedGenerator::offline());
        let result = assistant.multilingual_qa("ctx", "من فاز؟", "ar").await;
        assert_eq!(result.kind, AnswerKind::MultilingualQa);
        assert_eq!(result.answer, MULTILINGUAL_UNAVAILABLE);
        assert_eq!(
            result.detail,
            Some(AnswerDetail::Multilingual {
                target_language: "ar".into()
            })
        );
    }
}
