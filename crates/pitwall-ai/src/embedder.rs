//! Deterministic pseudo-embeddings.
//!
//! No learned weights: the text's BLAKE3 digest seeds a ChaCha8 generator and
//! `dim` draws from the standard normal distribution form the vector. The
//! same text yields a bit-identical vector on every call and in every process.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, StandardNormal};

/// Default embedding dimensionality.
pub const DEFAULT_DIM: usize = 64;

/// Added to vector norms so zero vectors normalise to zero instead of NaN.
const NORM_EPSILON: f32 = 1e-8;

/// Text → fixed-length vector, a pure function of the text's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PseudoEmbedder {
    dim: usize,
}

impl Default for PseudoEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_DIM)
    }
}

impl PseudoEmbedder {
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }

    /// Embedding dimensionality.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Embed a single text. The vector is not normalised.
    pub fn embed(&self, text: &str) -> Vec<f32> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed_for(text));
        (0..self.dim)
            .map(|_| -> f32 { StandardNormal.sample(&mut rng) })
            .collect()
    }

    /// Embed a batch of texts. Each vector equals `embed` of that text alone.
    pub fn embed_batch(&self, texts: &[&str]) -> Vec<Vec<f32>> {
        texts.iter().map(|t| self.embed(t)).collect()
    }
}

/// Stable 64-bit seed: the first eight bytes of the BLAKE3 digest.
fn seed_for(text: &str) -> u64 {
    let digest = blake3::hash(text.as_bytes());
    let mut seed = [0u8; 8];
    seed.copy_from_slice(&digest.as_bytes()[..8]);
    u64::from_le_bytes(seed)
}

/// L2-normalise a vector in place.
pub fn normalize(v: &mut [f32]) {
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt() + NORM_EPSILON;
    for x in v.iter_mut() {
        *x /= norm;
    }
}

/// Dot product; equals cosine similarity for normalised inputs.
pub fn cosine_sim(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}
