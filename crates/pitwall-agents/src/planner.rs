//! Query routing and the retrieval-free general answer.

use pitwall_core::{AnswerResult, Query};
use tracing::info;

use crate::assistant::{Assistant, trimmed_text};
use crate::offline::matching_rule;
use crate::prompts::general_prompt;
use crate::qa::EMPTY_QUESTION_ANSWER;

pub const NO_LIVE_DATA: &str = "I can't access live Formula 1 data right now. For the latest \
     calendar and race information, please check the official Formula 1 website or app.";

impl Assistant {
    /// Dispatch a query to the agent that handles it. Never fails; every
    /// path produces an answer.
    pub async fn handle(&self, query: Query) -> AnswerResult {
        match query {
            Query::Qa {
                question,
                entity,
                subkey,
            } => {
                let entity = entity.as_deref().map(str::trim).filter(|e| !e.is_empty());
                if entity.is_none() && subkey.is_none() {
                    info!(route = "general", "question has no driver or lap");
                    return self.general_answer(&question).await;
                }
                info!(route = "qa", entity, subkey);
                self.answer_question(&question, entity, subkey).await
            }
            Query::General { question } => {
                info!(route = "general");
                self.general_answer(&question).await
            }
            Query::Sentiment { text, language } => {
                info!(route = "sentiment");
                self.analyze_sentiment(&text, language.as_deref()).await
            }
            Query::Summary { text, max_words } => {
                info!(route = "summary", max_words);
                self.summarize_text(&text, max_words).await
            }
            Query::MultilingualQa {
                context,
                question,
                target_lang: lang,
            } => {
                info!(route = "multilingual_qa", target_lang = %lang);
                if question.trim().is_empty() {
                    let answer = EMPTY_QUESTION_ANSWER.to_string();
                    return AnswerResult::multilingual(answer, lang);
                }
                self.multilingual_qa(&context, &question, &lang).await
            }
        }
    }

    /// Answer from general F1 knowledge, without retrieval.
    ///
    /// Offline, a canned explanation is used when one fits the question;
    /// anything else gets the no-live-data notice.
    pub async fn general_answer(&self, question: &str) -> AnswerResult {
        if question.trim().is_empty() {
            return AnswerResult::general(EMPTY_QUESTION_ANSWER.to_string());
        }
        let generation = self.attempt(&general_prompt(question)).await;
        let answer = trimmed_text(generation).unwrap_or_else(|| match matching_rule(question) {
            Some(rule) => rule.respond(&[]),
            None => NO_LIVE_DATA.to_string(),
        });
        AnswerResult::general(answer)
    }
}
