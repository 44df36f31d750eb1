//! Process configuration: generation service, data files, retrieval sizes.
//!
//! Everything has a working default. A missing credential is not an error;
//! it only forces the generation client into fallback mode.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

pub const ENV_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_MODEL: &str = "OPENAI_MODEL";
pub const ENV_ENDPOINT: &str = "PITWALL_GENERATION_URL";
pub const ENV_TIMEOUT_SECS: &str = "PITWALL_GENERATION_TIMEOUT_SECS";
pub const ENV_PASSAGES: &str = "PITWALL_PASSAGES";
pub const ENV_TELEMETRY: &str = "PITWALL_TELEMETRY";

pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

const DEFAULT_SYSTEM_PROMPT: &str = "\
You are a helpful assistant and Formula 1 race engineer. \
Answer clearly and concisely.";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key} must be a whole number of seconds, got {value:?}")]
    InvalidTimeout { key: &'static str, value: String },
}

/// Settings for the external text-generation service.
#[derive(Clone)]
pub struct GenerationSettings {
    pub api_key: Option<String>,
    pub endpoint: String,
    pub model: String,
    pub temperature: f32,
    pub timeout: Duration,
    pub max_output_tokens: u32,
    pub system_prompt: String,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.2,
            timeout: Duration::from_secs(30),
            max_output_tokens: 250,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }
}

// Keep the credential out of logs.
impl fmt::Debug for GenerationSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationSettings")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("timeout", &self.timeout)
            .field("max_output_tokens", &self.max_output_tokens)
            .finish()
    }
}

impl GenerationSettings {
    /// Read settings through a key lookup, keyed by the `ENV_*` names.
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let mut settings = Self::default();

        settings.api_key = get(ENV_API_KEY);
        if let Some(model) = get(ENV_MODEL) {
            settings.model = model;
        }
        if let Some(endpoint) = get(ENV_ENDPOINT) {
            settings.endpoint = endpoint;
        }
        if let Some(raw) = get(ENV_TIMEOUT_SECS) {
            let secs: u64 = raw.parse().map_err(|_| ConfigError::InvalidTimeout {
                key: ENV_TIMEOUT_SECS,
                value: raw.clone(),
            })?;
            settings.timeout = Duration::from_secs(secs);
        }
        Ok(settings)
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }
}

/// Locations of the static knowledge files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    pub passages: PathBuf,
    pub telemetry: PathBuf,
}

impl Default for DataPaths {
    fn default() -> Self {
        Self {
            passages: PathBuf::from("data/passages.json"),
            telemetry: PathBuf::from("data/telemetry_embeddings.json"),
        }
    }
}

impl DataPaths {
    /// Paths from a key lookup, falling back to the defaults per file.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let path = |key: &str, fallback: PathBuf| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(fallback)
        };
        Self {
            passages: path(ENV_PASSAGES, defaults.passages),
            telemetry: path(ENV_TELEMETRY, defaults.telemetry),
        }
    }
}

/// How much evidence each retriever contributes per question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetrievalSettings {
    pub text_top_k: usize,
    pub telemetry_top_k: usize,
    pub embedding_dim: usize,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            text_top_k: 3,
            telemetry_top_k: 2,
            embedding_dim: 64,
        }
    }
}
