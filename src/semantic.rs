//! Semantic chunking: merge adjacent sentences while the topic holds.
//!
//! ## The Idea
//!
//! Adjacent sentences about the same topic have similar embeddings. We walk
//! the document in order, growing a chunk while each new sentence stays
//! similar to the one before it, and cutting when the topic shifts or the
//! chunk would exceed its word ceiling.
//!
//! ```text
//! Sentences:    [S1] [S2] [S3] [S4] [S5]
//! Similarity:      0.9  0.85  0.3  0.8
//!                              ↑
//!                         topic shift
//!
//! Chunks: [S1 S2 S3] | [S4 S5]
//! ```
//!
//! Two cut conditions, checked independently:
//!
//! - similarity to the **immediately preceding sentence** drops below the
//!   threshold (not similarity to the chunk mean: local drift is what
//!   signals a shift), or
//! - appending the sentence would push the chunk past `max_words`.
//!
//! ## Threshold Selection
//!
//! | Threshold | Effect |
//! |-----------|--------|
//! | 0.5 | Loose; long mixed chunks |
//! | 0.7 | Balanced (default) |
//! | 0.9 | Aggressive; near-duplicate sentences only |
//!
//! ## Oversized Sentences
//!
//! A single sentence longer than `max_words` still becomes its own chunk.
//! The ceiling bounds merging; it never truncates text.

use crate::chunk::word_count;
use crate::embed::cosine;
use crate::sentence::split_sentences;
use crate::{Chunk, Embedder, Result};

/// Greedy semantic chunker.
///
/// ## Example
///
/// ```rust
/// use abridge::{HashEmbedder, SemanticChunker};
///
/// let chunker = SemanticChunker::default();
/// let embedder = HashEmbedder::default();
///
/// let text = "The cat sat on the mat. The cat sat on the mat. \
///             Interest rates rose sharply this quarter.";
/// let chunks = chunker.chunk(text, &embedder).unwrap();
///
/// // The repeated cat sentences merge; the finance sentence splits off.
/// assert_eq!(chunks.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct SemanticChunker {
    threshold: f32,
    max_words: usize,
}

impl SemanticChunker {
    /// Default similarity threshold for merging adjacent sentences.
    pub const DEFAULT_THRESHOLD: f32 = 0.7;

    /// Default chunk word ceiling.
    pub const DEFAULT_MAX_WORDS: usize = 200;

    /// Create a chunker with the given similarity threshold and word ceiling.
    ///
    /// # Panics
    ///
    /// Panics if `max_words == 0`.
    #[must_use]
    pub fn new(threshold: f32, max_words: usize) -> Self {
        assert!(max_words > 0, "max_words must be > 0");
        Self {
            threshold,
            max_words,
        }
    }

    /// Set the similarity threshold.
    #[must_use]
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the chunk word ceiling.
    #[must_use]
    pub fn with_max_words(mut self, max_words: usize) -> Self {
        assert!(max_words > 0, "max_words must be > 0");
        self.max_words = max_words;
        self
    }

    /// Split text into semantically coherent chunks.
    ///
    /// Returns an empty list for empty or whitespace-only input; downstream
    /// stages treat that as "no content to cluster".
    ///
    /// # Errors
    ///
    /// Propagates embedding-provider failures.
    pub fn chunk(&self, text: &str, embedder: &dyn Embedder) -> Result<Vec<Chunk>> {
        let sentences = split_sentences(text);
        if sentences.is_empty() {
            return Ok(Vec::new());
        }

        let embeddings = embedder.embed(&sentences)?;

        let mut chunks: Vec<Chunk> = Vec::new();
        let mut current: Vec<&str> = vec![sentences[0]];
        let mut current_words = word_count(sentences[0]);

        for i in 1..sentences.len() {
            let similarity = cosine(&embeddings[i], &embeddings[i - 1]);
            let sentence_words = word_count(sentences[i]);

            if similarity >= self.threshold && current_words + sentence_words <= self.max_words {
                current.push(sentences[i]);
                current_words += sentence_words;
            } else {
                chunks.push(Chunk::new(current.join(" "), chunks.len()));
                current = vec![sentences[i]];
                current_words = sentence_words;
            }
        }

        chunks.push(Chunk::new(current.join(" "), chunks.len()));

        tracing::debug!(chunks = chunks.len(), "assembled semantic chunks");

        Ok(chunks)
    }
}

impl Default for SemanticChunker {
    fn default() -> Self {
        Self::new(Self::DEFAULT_THRESHOLD, Self::DEFAULT_MAX_WORDS)
    }
}
