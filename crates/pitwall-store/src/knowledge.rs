//! The two evidence sources, constructed once at startup and shared by
//! reference across requests.

use pitwall_ai::PseudoEmbedder;
use pitwall_core::{DataPaths, EvidenceItem, RetrievalSettings};
use tracing::warn;

use crate::corpus::{TextRetriever, load_passages};
use crate::telemetry::TelemetryIndex;

pub struct KnowledgeBase {
    text: TextRetriever,
    telemetry: TelemetryIndex,
}

impl KnowledgeBase {
    pub fn new(text: TextRetriever, telemetry: TelemetryIndex) -> Self {
        Self { text, telemetry }
    }

    /// Load both sources. A missing or unreadable file is logged and leaves
    /// that source empty; retrieval then degrades to no evidence.
    pub fn load(paths: &DataPaths, settings: &RetrievalSettings) -> Self {
        let passages = load_passages(&paths.passages).unwrap_or_else(|e| {
            warn!(error = %e, "passage corpus unavailable, text retrieval disabled");
            Vec::new()
        });
        let telemetry = TelemetryIndex::load(&paths.telemetry).unwrap_or_else(|e| {
            warn!(error = %e, "telemetry index unavailable, telemetry retrieval disabled");
            TelemetryIndex::default()
        });
        let embedder = PseudoEmbedder::new(settings.embedding_dim);
        Self::new(TextRetriever::new(passages, embedder), telemetry)
    }

    pub fn text(&self) -> &TextRetriever {
        &self.text
    }

    pub fn telemetry(&self) -> &TelemetryIndex {
        &self.telemetry
    }

    pub fn retrieve_text(&self, query: &str, top_k: usize) -> Vec<EvidenceItem> {
        self.text.retrieve(query, top_k)
    }

    pub fn retrieve_telemetry(
        &self,
        entity_key: Option<&str>,
        lap: Option<i64>,
        top_k: usize,
    ) -> Vec<EvidenceItem> {
        self.telemetry.retrieve(entity_key, lap, top_k)
    }
}
