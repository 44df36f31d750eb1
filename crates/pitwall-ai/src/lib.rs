//! Local inference: deterministic pseudo-embeddings, the offline sentiment
//! classifier, and sanitising of structured generation output.

pub mod contract;
mod embedder;
pub mod sentiment;

pub use contract::{ParseFailure, SentimentContract, parse_sentiment, sanitize};
pub use embedder::{DEFAULT_DIM, PseudoEmbedder, cosine_sim, normalize};
pub use sentiment::{OfflineSentiment, classify_offline};
