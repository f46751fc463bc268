//! The reduction pipeline: from raw document to proxy text.
//!
//! ## Control Flow
//!
//! ```text
//! document text
//!      │
//!      ├─ ≤ 3700 words ──────────────────────────► Reduction::Short
//!      │                                           (raw text, untouched)
//!      ▼
//! SemanticChunker ── sentences → embeddings → chunks
//!      ▼
//! embed chunks (once; shared below)
//!      ▼
//! Clusterer ── themes given? assign-to-theme : k-means (auto or explicit)
//!      ▼
//! chunk_budget ──► allocate ──► select_representatives ──► merge_proxy
//!                                                             │
//!                                                             ▼
//!                                                    Reduction::Proxy
//! ```
//!
//! One embedding pass covers clustering and selection: the chunk vectors
//! are computed once per call and shared by reference. The sentence-level
//! pass inside the chunker is separate; it sees sentences, not chunks.
//!
//! ## Degenerate Inputs
//!
//! A document that segments to zero chunks (empty, whitespace) or to too
//! few chunks for the automatic cluster search passes through unreduced,
//! exactly like a short document. Clustering is never invoked on input it
//! cannot handle.

use std::sync::Arc;

use crate::allocate::allocate;
use crate::budget::{chunk_budget, PROMPT_OVERHEAD};
use crate::chunk::word_count;
use crate::cluster::Clusterer;
use crate::merge::merge_proxy;
use crate::select::select_representatives;
use crate::{Embedder, Result, SemanticChunker, SummaryLength};

/// Documents at or below this many words skip reduction entirely.
pub const SHORT_DOCUMENT_WORDS: usize = 3700;

/// Automatic cluster search needs at least this many chunks.
const MIN_CHUNKS_FOR_AUTO_K: usize = 3;

/// Diagnostics from one reduction run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReductionStats {
    /// Chunks produced by the semantic chunker.
    pub chunks: usize,
    /// Non-empty clusters in the partition.
    pub clusters: usize,
    /// Total representative-chunk budget.
    pub budget: usize,
    /// Final allocation table, in merge order.
    pub allocations: Vec<(usize, i64)>,
}

/// Outcome of [`Reducer::reduce`].
#[derive(Debug, Clone)]
pub enum Reduction {
    /// The document was short (or degenerate); its raw text passes through.
    Short {
        /// The original document text, unmodified.
        text: String,
        /// Normalized target summary length in words.
        target_words: usize,
    },
    /// The document was reduced to a labeled proxy text.
    Proxy {
        /// The merged, labeled proxy text.
        text: String,
        /// Normalized target summary length in words.
        target_words: usize,
        /// Pipeline diagnostics.
        stats: ReductionStats,
    },
}

impl Reduction {
    /// The text to hand to the summarization collaborator.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Short { text, .. } | Self::Proxy { text, .. } => text,
        }
    }

    /// Normalized target summary length in words.
    #[must_use]
    pub fn target_words(&self) -> usize {
        match self {
            Self::Short { target_words, .. } | Self::Proxy { target_words, .. } => *target_words,
        }
    }

    /// Whether the document went through the reduction pipeline.
    #[must_use]
    pub fn is_reduced(&self) -> bool {
        matches!(self, Self::Proxy { .. })
    }
}

/// The document-reduction pipeline.
///
/// Owns a shared embedding provider and the stage configurations. One
/// `Reducer` serves any number of documents; each call is independent and
/// recomputes everything from its input.
///
/// ## Example
///
/// ```rust
/// use std::sync::Arc;
/// use abridge::{HashEmbedder, Reducer, SummaryLength};
///
/// let reducer = Reducer::new(Arc::new(HashEmbedder::default()));
///
/// // Short documents pass through untouched.
/// let outcome = reducer
///     .reduce("Just a few words.", SummaryLength::Moderate, &[], None)
///     .unwrap();
/// assert!(!outcome.is_reduced());
/// assert_eq!(outcome.text(), "Just a few words.");
/// ```
///
/// Long documents come back as a labeled proxy:
///
/// ```rust
/// use std::sync::Arc;
/// use abridge::{HashEmbedder, Reducer, SummaryLength};
///
/// let reducer = Reducer::new(Arc::new(HashEmbedder::default()));
///
/// let mut text = String::new();
/// for _ in 0..350 {
///     text.push_str("Solar panels convert sunlight into usable electricity. ");
/// }
/// for _ in 0..350 {
///     text.push_str("The committee approved the annual municipal budget. ");
/// }
///
/// let themes = vec!["solar electricity".to_string(), "municipal budget".to_string()];
/// let outcome = reducer
///     .reduce(&text, SummaryLength::Words(300), &themes, None)
///     .unwrap();
///
/// assert!(outcome.is_reduced());
/// assert!(outcome.text().contains("[solar electricity]"));
/// assert!(outcome.text().contains("[municipal budget]"));
/// ```
pub struct Reducer {
    embedder: Arc<dyn Embedder>,
    chunker: SemanticChunker,
    clusterer: Clusterer,
    short_doc_words: usize,
    prompt_overhead: usize,
}

impl Reducer {
    /// Create a reducer with default stage settings.
    #[must_use]
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self {
            embedder,
            chunker: SemanticChunker::default(),
            clusterer: Clusterer::new(),
            short_doc_words: SHORT_DOCUMENT_WORDS,
            prompt_overhead: PROMPT_OVERHEAD,
        }
    }

    /// Replace the semantic chunker configuration.
    #[must_use]
    pub fn with_chunker(mut self, chunker: SemanticChunker) -> Self {
        self.chunker = chunker;
        self
    }

    /// Replace the clusterer configuration.
    #[must_use]
    pub fn with_clusterer(mut self, clusterer: Clusterer) -> Self {
        self.clusterer = clusterer;
        self
    }

    /// Override the short-document word threshold.
    #[must_use]
    pub fn with_short_doc_words(mut self, words: usize) -> Self {
        self.short_doc_words = words;
        self
    }

    /// Override the prompt-overhead token estimate.
    #[must_use]
    pub fn with_prompt_overhead(mut self, tokens: usize) -> Self {
        self.prompt_overhead = tokens;
        self
    }

    /// Reduce a document to a summarization-ready text.
    ///
    /// `themes` selects predefined-theme clustering when non-empty;
    /// otherwise `k` picks explicit-k k-means, and `None` triggers the
    /// automatic cluster-count search.
    ///
    /// # Errors
    ///
    /// Propagates embedding-provider failures and infeasible explicit
    /// cluster counts. Degenerate documents are not errors; they pass
    /// through as [`Reduction::Short`].
    pub fn reduce(
        &self,
        text: &str,
        length: SummaryLength,
        themes: &[String],
        k: Option<usize>,
    ) -> Result<Reduction> {
        let doc_words = word_count(text);
        let target_words = length.normalize(doc_words);

        if doc_words <= self.short_doc_words {
            tracing::debug!(doc_words, "short document, skipping reduction");
            return Ok(Reduction::Short {
                text: text.to_string(),
                target_words,
            });
        }

        let chunks = self.chunker.chunk(text, self.embedder.as_ref())?;
        if chunks.is_empty()
            || (themes.is_empty() && k.is_none() && chunks.len() < MIN_CHUNKS_FOR_AUTO_K)
        {
            tracing::debug!(chunks = chunks.len(), "too few chunks, passing through");
            return Ok(Reduction::Short {
                text: text.to_string(),
                target_words,
            });
        }

        // One embedding pass; clustering and selection share these vectors.
        let chunk_texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        let embeddings = self.embedder.embed(&chunk_texts)?;

        let partition = if themes.is_empty() {
            self.clusterer.fit(&embeddings, k)?
        } else {
            let theme_texts: Vec<&str> = themes.iter().map(String::as_str).collect();
            let theme_embeddings = self.embedder.embed(&theme_texts)?;
            self.clusterer
                .assign_themes(&embeddings, themes, &theme_embeddings)?
        };

        let total_words: usize = chunks.iter().map(|c| c.words).sum();
        let avg_chunk_words = total_words as f64 / chunks.len() as f64;
        let budget = chunk_budget(target_words, avg_chunk_words, self.prompt_overhead);

        let shares: Vec<(usize, f64)> = partition
            .clusters
            .iter()
            .map(|c| (c.id, c.percentage))
            .collect();
        let allocations = allocate(&shares, budget);

        let selections = select_representatives(
            &chunks,
            &embeddings,
            &partition.labels,
            &partition.centroids,
            &allocations,
        );
        let proxy = merge_proxy(&selections, &partition);

        let stats = ReductionStats {
            chunks: chunks.len(),
            clusters: partition.clusters.len(),
            budget,
            allocations,
        };
        tracing::info!(
            chunks = stats.chunks,
            clusters = stats.clusters,
            budget = stats.budget,
            "reduced document to proxy text"
        );

        Ok(Reduction::Proxy {
            text: proxy,
            target_words,
            stats,
        })
    }
}

impl std::fmt::Debug for Reducer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reducer")
            .field("embedder", &self.embedder.id())
            .field("chunker", &self.chunker)
            .field("short_doc_words", &self.short_doc_words)
            .field("prompt_overhead", &self.prompt_overhead)
            .finish()
    }
}
