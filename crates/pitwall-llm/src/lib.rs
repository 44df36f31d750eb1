//! Generation layer: the `Generator` seam, its tagged result, and the
//! chat-completions HTTP client.

mod generation;
pub mod http;

pub use generation::{
    FALLBACK_MARKER, Fallback, Generation, Generator, OfflineGenerator, PROMPT_ECHO_CHARS,
};
pub use http::{GenerationClient, GenerationError};
