use std::sync::Arc;
use std::time::Duration;

use pitwall_core::{GenerationSettings, RetrievalSettings};
use pitwall_llm::{FALLBACK_MARKER, Generation, Generator};
use pitwall_store::KnowledgeBase;
use tracing::warn;

/// Knobs shared by every agent.
#[derive(Debug, Clone)]
pub struct AgentSettings {
    pub retrieval: RetrievalSettings,
    pub max_output_tokens: u32,
    /// Upper bound on one generation attempt, including a stalled backend.
    pub generation_timeout: Duration,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self::from_generation(&GenerationSettings::default(), RetrievalSettings::default())
    }
}

impl AgentSettings {
    pub fn from_generation(generation: &GenerationSettings, retrieval: RetrievalSettings) -> Self {
        Self {
            retrieval,
            max_output_tokens: generation.max_output_tokens,
            generation_timeout: generation.timeout,
        }
    }
}

/// Entry point for every query type. Holds the read-only knowledge base and
/// the generation backend; cheap to clone and safe to share across tasks.
#[derive(Clone)]
pub struct Assistant {
    pub(crate) knowledge: Arc<KnowledgeBase>,
    generator: Arc<dyn Generator>,
    pub(crate) settings: AgentSettings,
}

impl Assistant {
    pub fn new(
        knowledge: Arc<KnowledgeBase>,
        generator: Arc<dyn Generator>,
        settings: AgentSettings,
    ) -> Self {
        Self {
            knowledge,
            generator,
            settings,
        }
    }

    /// Run one generation attempt on its own task.
    ///
    /// A panicking backend or one that outlives `generation_timeout` yields
    /// `Fallback`, same as a backend that reports failure itself.
    pub(crate) async fn attempt(&self, prompt: &str) -> Generation {
        let generator = Arc::clone(&self.generator);
        let max_tokens = self.settings.max_output_tokens;
        let task_prompt = prompt.to_string();
        let mut task =
            tokio::spawn(async move { generator.generate(&task_prompt, max_tokens).await });

        match tokio::time::timeout(self.settings.generation_timeout, &mut task).await {
            Ok(Ok(generation)) => generation,
            Ok(Err(e)) => {
                warn!(error = %e, "generation task failed, using local fallback");
                Generation::fallback(prompt)
            }
            Err(_) => {
                task.abort();
                warn!(
                    timeout_ms = self.settings.generation_timeout.as_millis() as u64,
                    "generation timed out, using local fallback"
                );
                Generation::fallback(prompt)
            }
        }
    }
}

/// Text of a generation worth showing, exactly as generated, or `None` when
/// the caller should substitute its own answer. Blank output and
/// sentinel-shaped text from backends that still speak the prefix protocol
/// both count as unavailable.
pub(crate) fn usable_text(generation: Generation) -> Option<String> {
    match generation {
        Generation::Success(text) => {
            let start = text.trim_start();
            if start.is_empty() || start.starts_with(FALLBACK_MARKER) {
                None
            } else {
                Some(text)
            }
        }
        Generation::Fallback(_) => None,
    }
}

/// `usable_text` with surrounding whitespace removed, for agents that
/// present generated text as a label or summary.
pub(crate) fn trimmed_text(generation: Generation) -> Option<String> {
    usable_text(generation).map(|text| text.trim().to_string())
}
