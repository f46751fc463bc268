//! Embedding providers and vector math.
//!
//! Everything in the pipeline that needs meaning (the chunker's adjacency
//! test, theme assignment, clustering, centrality ranking) goes through the
//! [`Embedder`](crate::Embedder) trait. The provider is constructed once per
//! process and shared by reference; no component loads its own model.
//!
//! Two providers ship with the crate:
//!
//! - [`HashEmbedder`]: deterministic hashed bag-of-words vectors. No model,
//!   no I/O, identical output on every run. Used for tests and offline runs.
//! - [`FastembedEmbedder`] (feature `embeddings`): ONNX-backed sentence
//!   embeddings via fastembed. Probes the primary model (BGE-small-en-v1.5)
//!   at construction and falls back to all-MiniLM-L6-v2 when the primary is
//!   unavailable, emitting a warning the caller can observe.
//!
//! ## Fallback is a local recovery
//!
//! Primary-model unavailability is not an error: the provider substitutes
//! the fallback and continues. It IS observable: `used_fallback()` reports
//! which model is live, and construction logs a `tracing` warning. Only when
//! both models fail to load does construction return an error.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::{Embedder, Result};

/// Cosine similarity between two embeddings.
#[must_use]
pub fn cosine(a: &[f32], b: &[f32]) -> f32 {
    #[cfg(feature = "innr")]
    {
        innr::cosine(a, b)
    }

    #[cfg(not(feature = "innr"))]
    {
        let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
        let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm_a > 0.0 && norm_b > 0.0 {
            dot / (norm_a * norm_b)
        } else {
            0.0
        }
    }
}

/// Euclidean distance between two embeddings.
#[must_use]
pub fn euclidean(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f32>()
        .sqrt()
}

/// Deterministic hashed bag-of-words embeddings.
///
/// Each token (lowercased, stripped of surrounding punctuation) is hashed
/// into one of `dim` buckets; the vector is the L2-normalized bucket
/// histogram. This is classic feature hashing: texts sharing vocabulary
/// land near each other, texts with disjoint vocabulary are
/// near-orthogonal, and repeating a sentence leaves its direction
/// unchanged. That makes it a faithful stand-in for a real model in
/// tests: similarity structure without the model download.
///
/// ```rust
/// use abridge::{Embedder, HashEmbedder};
/// use abridge::embed::cosine;
///
/// let embedder = HashEmbedder::default();
/// let vecs = embedder
///     .embed(&["the cat sat", "the cat sat the cat sat", "quantum flux"])
///     .unwrap();
///
/// // Repetition preserves direction; disjoint vocabulary diverges.
/// assert!(cosine(&vecs[0], &vecs[1]) > 0.99);
/// assert!(cosine(&vecs[0], &vecs[2]) < 0.5);
/// ```
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dim: usize,
}

impl HashEmbedder {
    /// Create a hash embedder with the given bucket count.
    ///
    /// # Panics
    ///
    /// Panics if `dim == 0`.
    #[must_use]
    pub fn new(dim: usize) -> Self {
        assert!(dim > 0, "embedding dimension must be > 0");
        Self { dim }
    }

    fn bucket(token: &str, dim: usize) -> usize {
        let mut hasher = DefaultHasher::new();
        token.hash(&mut hasher);
        (hasher.finish() as usize) % dim
    }

    fn vectorize(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0.0f32; self.dim];
        for raw in text.split_whitespace() {
            let token = raw
                .trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase();
            if token.is_empty() {
                continue;
            }
            v[Self::bucket(&token, self.dim)] += 1.0;
        }
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut v {
                *x /= norm;
            }
        }
        v
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        // 256 buckets keeps accidental token collisions rare for test-sized
        // vocabularies while staying cheap to cluster.
        Self::new(256)
    }
}

impl Embedder for HashEmbedder {
    fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.vectorize(t)).collect())
    }

    fn id(&self) -> &str {
        "hash-bow"
    }
}

/// Model-backed embeddings via fastembed (requires the `embeddings` feature).
///
/// Construction probes the primary model first. If it cannot be loaded the
/// provider logs a warning and substitutes the fallback, a local recovery
/// rather than an error. [`used_fallback`](FastembedEmbedder::used_fallback) exposes
/// which model is live so callers can surface the substitution.
#[cfg(feature = "embeddings")]
pub struct FastembedEmbedder {
    model: fastembed::TextEmbedding,
    fallback: bool,
}

#[cfg(feature = "embeddings")]
impl FastembedEmbedder {
    /// Load the primary embedding model (BGE-small-en-v1.5), falling back to
    /// all-MiniLM-L6-v2 when the primary is unavailable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Embedding`](crate::Error::Embedding) only when both
    /// models fail to load.
    pub fn new() -> Result<Self> {
        use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};

        match TextEmbedding::try_new(InitOptions::new(EmbeddingModel::BGESmallENV15)) {
            Ok(model) => Ok(Self {
                model,
                fallback: false,
            }),
            Err(primary_err) => {
                tracing::warn!(
                    error = %primary_err,
                    "primary embedding model unavailable, loading fallback"
                );
                let model =
                    TextEmbedding::try_new(InitOptions::new(EmbeddingModel::AllMiniLML6V2))
                        .map_err(|fallback_err| {
                            crate::Error::Embedding(format!(
                                "no embedding model available: primary: {primary_err}; \
                                 fallback: {fallback_err}"
                            ))
                        })?;
                Ok(Self {
                    model,
                    fallback: true,
                })
            }
        }
    }

    /// Whether the fallback model was substituted for the primary.
    #[must_use]
    pub fn used_fallback(&self) -> bool {
        self.fallback
    }
}

#[cfg(feature = "embeddings")]
impl Embedder for FastembedEmbedder {
    fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        self.model
            .embed(texts.to_vec(), None)
            .map_err(|e| crate::Error::Embedding(e.to_string()))
    }

    fn id(&self) -> &str {
        if self.fallback {
            "fastembed/all-MiniLM-L6-v2"
        } else {
            "fastembed/bge-small-en-v1.5"
        }
    }
}

#[cfg(feature = "embeddings")]
impl std::fmt::Debug for FastembedEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FastembedEmbedder")
            .field("fallback", &self.fallback)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_similarity() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![1.0, 0.0, 0.0];
        let c = vec![0.0, 1.0, 0.0];
        assert!(cosine(&a, &b) > 0.99);
        assert!(cosine(&a, &c).abs() < 0.01);
    }

    #[test]
    fn test_cosine_zero_vector() {
        let z = vec![0.0, 0.0];
        let a = vec![1.0, 0.0];
        assert_eq!(cosine(&z, &a), 0.0);
    }

    #[test]
    fn test_euclidean_distance() {
        let a = vec![0.0, 0.0];
        let b = vec![3.0, 4.0];
        assert!((euclidean(&a, &b) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_hash_embedder_deterministic() {
        let embedder = HashEmbedder::default();
        let v1 = embedder.embed(&["some text here"]).unwrap();
        let v2 = embedder.embed(&["some text here"]).unwrap();
        assert_eq!(v1, v2);
    }

    #[test]
    fn test_hash_embedder_order_preserving() {
        let embedder = HashEmbedder::default();
        let vecs = embedder.embed(&["alpha", "beta"]).unwrap();
        let alpha = embedder.embed(&["alpha"]).unwrap();
        assert_eq!(vecs[0], alpha[0]);
    }

    #[test]
    fn test_hash_embedder_repetition_invariant() {
        let embedder = HashEmbedder::default();
        let vecs = embedder.embed(&["topic words", "topic words topic words"]).unwrap();
        assert!(cosine(&vecs[0], &vecs[1]) > 0.99);
    }

    #[test]
    fn test_hash_embedder_empty_text() {
        let embedder = HashEmbedder::default();
        let vecs = embedder.embed(&[""]).unwrap();
        assert!(vecs[0].iter().all(|&x| x == 0.0));
    }

    #[test]
    #[should_panic]
    fn test_zero_dim_panics() {
        HashEmbedder::new(0);
    }
}
