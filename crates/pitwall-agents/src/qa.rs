//! Race question answering: retrieve, fuse, generate, fall back.

use std::sync::Arc;

use pitwall_core::{AnswerResult, EvidenceBundle, EvidenceItem};
use pitwall_store::fusion;
use tokio::task::JoinError;
use tracing::{debug, info, warn};

use crate::assistant::{Assistant, usable_text};
use crate::offline::offline_answer;
use crate::prompts::qa_prompt;

pub const EMPTY_QUESTION_ANSWER: &str = "Please ask a question about Formula 1, for example \
     what DRS does or why a driver pitted on a given lap.";

/// Pipeline position, reported on every `debug!` line of a QA run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QaStage {
    Retrieve,
    Fuse,
    GenerateAttempt,
    GenerateSuccess,
    GenerateFallback,
    Done,
}

impl Assistant {
    /// Answer a race question from retrieved evidence.
    ///
    /// Always produces an answer. When generation is unavailable the answer
    /// comes from the offline table; confidence and evidence are the fused
    /// retrieval results either way.
    pub async fn answer_question(
        &self,
        question: &str,
        entity: Option<&str>,
        subkey: Option<i64>,
    ) -> AnswerResult {
        if question.trim().is_empty() {
            info!("empty question, skipping retrieval");
            return AnswerResult::qa(EMPTY_QUESTION_ANSWER.to_string(), EvidenceBundle::empty());
        }

        let bundle = self.gather_evidence(question, entity, subkey).await;

        debug!(stage = ?QaStage::GenerateAttempt, "generating answer");
        let generation = self.attempt(&qa_prompt(question, &bundle)).await;
        let answer = match usable_text(generation) {
            Some(text) => {
                debug!(stage = ?QaStage::GenerateSuccess, chars = text.len());
                text
            }
            None => {
                debug!(stage = ?QaStage::GenerateFallback, "answering offline");
                offline_answer(question, bundle.items())
            }
        };

        debug!(stage = ?QaStage::Done, confidence = bundle.confidence());
        AnswerResult::qa(answer, bundle)
    }

    /// Retrieve text and telemetry evidence concurrently and fuse them.
    pub async fn gather_evidence(
        &self,
        question: &str,
        entity: Option<&str>,
        subkey: Option<i64>,
    ) -> EvidenceBundle {
        debug!(stage = ?QaStage::Retrieve, entity, subkey);
        let retrieval = &self.settings.retrieval;

        let kb = Arc::clone(&self.knowledge);
        let query = question.to_string();
        let text_k = retrieval.text_top_k;
        let text = tokio::task::spawn_blocking(move || kb.retrieve_text(&query, text_k));

        let kb = Arc::clone(&self.knowledge);
        let entity = entity.map(str::to_string);
        let telemetry_k = retrieval.telemetry_top_k;
        let telemetry = tokio::task::spawn_blocking(move || {
            kb.retrieve_telemetry(entity.as_deref(), subkey, telemetry_k)
        });

        let (text, telemetry) = tokio::join!(text, telemetry);
        let mut items = joined(text, "text");
        items.extend(joined(telemetry, "telemetry"));

        debug!(stage = ?QaStage::Fuse, count = items.len());
        fusion::fuse(items)
    }
}

fn joined(result: Result<Vec<EvidenceItem>, JoinError>, source: &str) -> Vec<EvidenceItem> {
    result.unwrap_or_else(|e| {
        warn!(error = %e, source, "retrieval task failed, continuing without it");
        Vec::new()
    })
}
