use async_trait::async_trait;

/// Marker that prefixes the rendered fallback sentinel.
pub const FALLBACK_MARKER: &str = "[Local fallback answer]";

/// How much of the prompt a fallback echoes back.
pub const PROMPT_ECHO_CHARS: usize = 300;

/// Outcome of a generation attempt.
///
/// Generation never fails from the caller's point of view: every transport,
/// status, or decoding problem becomes `Fallback`, and callers substitute a
/// deterministic answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Generation {
    Success(String),
    Fallback(Fallback),
}

impl Generation {
    pub fn fallback(prompt: &str) -> Self {
        Self::Fallback(Fallback::for_prompt(prompt))
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }

    /// Generated text, if generation succeeded.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Success(text) => Some(text),
            Self::Fallback(_) => None,
        }
    }
}

/// Generation was unavailable for a prompt.
///
/// Keeps the head of the prompt so logs and tests can tell which request fell
/// back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fallback {
    prompt_echo: String,
}

impl Fallback {
    pub fn for_prompt(prompt: &str) -> Self {
        Self {
            prompt_echo: prompt.chars().take(PROMPT_ECHO_CHARS).collect(),
        }
    }

    /// The first [`PROMPT_ECHO_CHARS`] characters of the prompt.
    pub fn prompt_echo(&self) -> &str {
        &self.prompt_echo
    }

    /// Legacy sentinel rendering, `"[Local fallback answer] <prompt head>"`.
    /// Diagnostic only; never shown as an answer.
    pub fn sentinel(&self) -> String {
        format!("{FALLBACK_MARKER} {}", self.prompt_echo)
    }
}

/// A text-generation backend.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generate a completion for `prompt`. Implementations report every
    /// failure as [`Generation::Fallback`].
    async fn generate(&self, prompt: &str, max_output_tokens: u32) -> Generation;
}

/// Generator for offline operation: always falls back.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineGenerator;

#[async_trait]
impl Generator for OfflineGenerator {
    async fn generate(&self, prompt: &str, _max_output_tokens: u32) -> Generation {
        Generation::fallback(prompt)
    }
}
