//! Static passage corpus and cosine-similarity retrieval over it.
//!
//! The corpus is loaded once and never modified. Its embedding matrix is
//! computed on first retrieval, at most once even when several requests race
//! to initialise it, and shared read-only afterwards.

use std::path::Path;
use std::sync::OnceLock;

use pitwall_ai::{PseudoEmbedder, cosine_sim, normalize};
use pitwall_core::{EvidenceItem, TextEvidence};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::StoreError;
use crate::error::read_json;

/// One passage of the knowledge corpus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassageCorpusEntry {
    pub text: String,
    #[serde(default)]
    pub source: Option<String>,
}

/// Load a corpus file: a JSON array of `{"text": ..., "source": ...}`.
pub fn load_passages(path: &Path) -> Result<Vec<PassageCorpusEntry>, StoreError> {
    let passages: Vec<PassageCorpusEntry> = read_json(path)?;
    info!(count = passages.len(), path = %path.display(), "loaded passage corpus");
    Ok(passages)
}

/// Ranks corpus passages against a query by cosine similarity.
pub struct TextRetriever {
    passages: Vec<PassageCorpusEntry>,
    embedder: PseudoEmbedder,
    /// Unit-length passage embeddings, row `i` belongs to `passages[i]`.
    unit_embeddings: OnceLock<Vec<Vec<f32>>>,
}

impl TextRetriever {
    /// Retriever whose passage embeddings are computed lazily with `embedder`.
    pub fn new(passages: Vec<PassageCorpusEntry>, embedder: PseudoEmbedder) -> Self {
        Self {
            passages,
            embedder,
            unit_embeddings: OnceLock::new(),
        }
    }

    /// Retriever over caller-supplied passage embeddings. Queries are still
    /// embedded with `embedder`.
    pub fn with_embeddings(
        passages: Vec<PassageCorpusEntry>,
        mut embeddings: Vec<Vec<f32>>,
        embedder: PseudoEmbedder,
    ) -> Result<Self, StoreError> {
        if embeddings.len() != passages.len() {
            return Err(StoreError::EmbeddingCount {
                passages: passages.len(),
                embeddings: embeddings.len(),
            });
        }
        for row in &mut embeddings {
            normalize(row);
        }
        Ok(Self {
            passages,
            embedder,
            unit_embeddings: OnceLock::from(embeddings),
        })
    }

    pub fn len(&self) -> usize {
        self.passages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passages.is_empty()
    }

    fn unit_embeddings(&self) -> &[Vec<f32>] {
        self.unit_embeddings.get_or_init(|| {
            let texts: Vec<&str> = self.passages.iter().map(|p| p.text.as_str()).collect();
            let mut rows = self.embedder.embed_batch(&texts);
            for row in &mut rows {
                normalize(row);
            }
            info!(
                count = rows.len(),
                dim = self.embedder.dim(),
                "computed passage embeddings"
            );
            rows
        })
    }

    /// Top `top_k` passages for `query`, most similar first.
    pub fn retrieve(&self, query: &str, top_k: usize) -> Vec<EvidenceItem> {
        if self.passages.is_empty() {
            return Vec::new();
        }
        self.rank_vector(self.embedder.embed(query), top_k)
    }

    /// Rank passages against an already-embedded query.
    ///
    /// All passages are scored and stably sorted before truncating, so equal
    /// scores keep corpus order. Scores are raw cosine similarities in
    /// `[-1, 1]`.
    pub fn rank_vector(&self, mut query: Vec<f32>, top_k: usize) -> Vec<EvidenceItem> {
        if self.passages.is_empty() {
            return Vec::new();
        }
        normalize(&mut query);

        let mut scored: Vec<(usize, f32)> = self
            .unit_embeddings()
            .iter()
            .map(|row| cosine_sim(row, &query))
            .enumerate()
            .collect();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.truncate(top_k);

        debug!(top_k, hits = scored.len(), "ranked passages");
        scored
            .into_iter()
            .map(|(i, score)| {
                let passage = &self.passages[i];
                EvidenceItem::Text(TextEvidence {
                    text: passage.text.clone(),
                    source: passage.source.clone(),
                    score: f64::from(score),
                })
            })
            .collect()
    }
}
