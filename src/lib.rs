//! # abridge
//!
//! Document reduction for LLM summarization pipelines.
//!
//! ## The Problem
//!
//! You want a hosted model to summarize a 60-page report. The model has a
//! context window; the report doesn't fit. Truncating loses the back half.
//! Sampling random paragraphs loses coherence. Map-reduce summarization
//! multiplies cost and latency by the number of pieces.
//!
//! This crate takes a different route: shrink the document to a compact
//! **proxy text** that preserves its thematic structure, then summarize the
//! proxy in a single call.
//!
//! ## The Pipeline
//!
//! ```text
//! document ──► sentences ──► semantic chunks ──► theme clusters
//!                                                     │
//!      proxy text ◄── merge ◄── select typical ◄── allocate budget
//! ```
//!
//! 1. **Chunk** ([`SemanticChunker`]): split into sentences (UAX #29), then
//!    greedily merge adjacent sentences while their embeddings stay similar
//!    and the chunk stays under a word ceiling.
//! 2. **Cluster** ([`Clusterer`]): group chunks by theme, either against
//!    caller-supplied theme labels, or with seeded k-means and an automatic
//!    silhouette-scored search for the cluster count.
//! 3. **Budget** ([`chunk_budget`]): estimate how many representative
//!    chunks fit in the model's context window after reserving room for
//!    the prompt and the summary itself.
//! 4. **Allocate** ([`allocate`]): split that budget across clusters
//!    proportionally to their size, with exact rounding-error correction:
//!    the table always sums to the budget, to the chunk.
//! 5. **Select** ([`select_representatives`]): within each cluster, prefer
//!    the chunks whose distance to the centroid is closest to the cluster's
//!    *mean* distance. These are the most typical members, not the densest core.
//! 6. **Merge** ([`merge_proxy`]): concatenate selections under per-cluster
//!    labels into the proxy text.
//!
//! Documents of 3700 words or fewer skip all of this and pass through raw;
//! they fit as-is.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use abridge::{HashEmbedder, PromptSpec, Reducer, SummaryLength};
//!
//! let reducer = Reducer::new(Arc::new(HashEmbedder::default()));
//!
//! let outcome = reducer
//!     .reduce("A short memo.", SummaryLength::Moderate, &[], None)
//!     .unwrap();
//!
//! // Short input passes through; long input comes back as a labeled proxy.
//! let prompt = PromptSpec::new(outcome.target_words()).render(outcome.text());
//! assert!(prompt.contains("A short memo."));
//! ```
//!
//! With the `embeddings` feature, swap [`HashEmbedder`] for
//! [`FastembedEmbedder`] to use real sentence embeddings
//! (BGE-small-en-v1.5, falling back to all-MiniLM-L6-v2 when the primary
//! model is unavailable).
//!
//! ## Determinism
//!
//! The whole reduction is reproducible: k-means runs from a fixed seed,
//! ties break first-encountered, sorts are stable, and the allocation
//! correction is ordered. Same input, same output, every run.
//!
//! ## What This Crate Is Not
//!
//! Not a general-purpose clustering library, not a vector database, and
//! not an optimal summarizer. The goal is a deterministic, good-enough
//! reduction that fits a token budget. The summarization call itself, and
//! file-format text extraction, live outside this crate.

mod allocate;
mod budget;
mod chunk;
mod cluster;
mod error;
mod merge;
mod pipeline;
mod prompt;
mod select;
mod semantic;
mod sentence;

pub mod embed;

pub use allocate::allocate;
pub use budget::{
    chunk_budget, count_tokens, tokens_for_words, SummaryLength, PROMPT_OVERHEAD, TOKEN_CEILING,
};
pub use chunk::{word_count, Chunk};
pub use cluster::{silhouette_score, ClusterInfo, Clusterer, Partition, DEFAULT_SEED};
pub use embed::HashEmbedder;
pub use error::{Error, Result};
pub use merge::merge_proxy;
pub use pipeline::{Reducer, Reduction, ReductionStats, SHORT_DOCUMENT_WORDS};
pub use prompt::{PromptSpec, SummaryFormat, Vocabulary};
pub use select::{select_representatives, Selection};
pub use semantic::SemanticChunker;
pub use sentence::split_sentences;

#[cfg(feature = "embeddings")]
pub use embed::FastembedEmbedder;

/// An embedding provider: text spans in, fixed-dimension vectors out.
///
/// The single seam between the pipeline and any embedding backend.
/// Implementations must be order-preserving (vector `i` corresponds to
/// text `i`), deterministic for a fixed model and input, and dimensionally
/// consistent within one call. Callers never assume a specific
/// dimensionality, only that it is constant within a run.
///
/// Providers are constructed once per process and shared by reference
/// ([`SharedEmbedder`]); no pipeline component loads its own model.
///
/// ```rust
/// use abridge::{Embedder, HashEmbedder};
///
/// fn dimensions(embedder: &dyn Embedder) -> usize {
///     embedder.embed(&["probe"]).unwrap()[0].len()
/// }
///
/// assert!(dimensions(&HashEmbedder::default()) > 0);
/// ```
pub trait Embedder: Send + Sync {
    /// Embed each text, preserving order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Embedding`] when the backing model fails.
    fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>>;

    /// Short identifier for logs and diagnostics.
    fn id(&self) -> &str {
        "embedder"
    }
}

/// Shared reference type for embedding providers.
pub type SharedEmbedder = std::sync::Arc<dyn Embedder>;
