//! Shared types for Pitwall: evidence, answers, queries, and configuration.

pub mod answer;
pub mod config;
pub mod evidence;
pub mod query;

pub use answer::{AnswerDetail, AnswerKind, AnswerResult, SentimentLabel};
pub use config::{ConfigError, DataPaths, GenerationSettings, RetrievalSettings};
pub use evidence::{EvidenceBundle, EvidenceItem, TelemetryEvidence, TextEvidence};
pub use query::{Query, SummaryLength, detect_language};
