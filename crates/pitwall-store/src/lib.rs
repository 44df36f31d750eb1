//! Evidence layer: passage corpus (cosine retrieval), telemetry index
//! (keyed lookup), and fusion of both streams into a scored bundle.

mod corpus;
mod error;
pub mod fusion;
mod knowledge;
mod telemetry;

pub use corpus::{PassageCorpusEntry, TextRetriever, load_passages};
pub use error::StoreError;
pub use fusion::fuse;
pub use knowledge::KnowledgeBase;
pub use telemetry::{TelemetryIndex, TelemetryRecord};
