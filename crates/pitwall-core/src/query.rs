//! Incoming queries, one variant per agent.

use serde::{Deserialize, Serialize};

/// Default summary length when the caller gives none.
pub const DEFAULT_SUMMARY_WORDS: usize = 70;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Query {
    /// Race question, optionally scoped to a driver (`entity`) and lap (`subkey`).
    Qa {
        question: String,
        #[serde(default)]
        entity: Option<String>,
        #[serde(default)]
        subkey: Option<i64>,
    },
    General {
        question: String,
    },
    Sentiment {
        text: String,
        #[serde(default)]
        language: Option<String>,
    },
    Summary {
        text: String,
        #[serde(default = "default_summary_words")]
        max_words: usize,
    },
    #[serde(rename = "multi_qa")]
    MultilingualQa {
        context: String,
        question: String,
        #[serde(default = "default_target_lang")]
        target_lang: String,
    },
}

fn default_summary_words() -> usize {
    DEFAULT_SUMMARY_WORDS
}

fn default_target_lang() -> String {
    "en".to_string()
}

/// Named summary length presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryLength {
    Short,
    #[default]
    Medium,
    Long,
}

impl SummaryLength {
    pub fn max_words(&self) -> usize {
        match self {
            Self::Short => 40,
            Self::Medium => 80,
            Self::Long => 160,
        }
    }
}

/// Rough language detection: any Arabic-script character means `"ar"`,
/// everything else is `"en"`.
pub fn detect_language(text: &str) -> &'static str {
    if text.chars().any(|c| ('\u{0600}'..='\u{06FF}').contains(&c)) {
        "ar"
    } else {
        "en"
    }
}
