//! Property-based tests for the reduction pipeline.
//!
//! These tests verify the pipeline's key invariants:
//! - Ceiling: chunks respect the word ceiling (oversized sentences aside)
//! - Exactness: allocation tables sum to the budget, always
//! - Cap: selections never exceed allocation or cluster size
//! - Determinism: clustering is reproducible

use proptest::prelude::*;

use abridge::{
    allocate, select_representatives, split_sentences, Chunk, Clusterer, HashEmbedder,
    SemanticChunker,
};

// =============================================================================
// Test Generators
// =============================================================================

/// Generate sentence-structured documents from a small vocabulary.
///
/// Sentences open with a capitalized word — UAX #29 suppresses sentence
/// breaks before lowercase continuations, so an all-lowercase corpus would
/// segment as one giant sentence.
fn document() -> impl Strategy<Value = String> {
    let opener = prop::sample::select(vec!["Alpha", "Rivers", "Markets", "Engines", "Stones"]);
    let word = prop::sample::select(vec![
        "beta", "gamma", "delta", "rain", "river", "stone", "market", "engine",
    ]);
    let sentence = (opener, prop::collection::vec(word, 0..18)).prop_map(|(first, rest)| {
        if rest.is_empty() {
            format!("{first}.")
        } else {
            format!("{first} {}.", rest.join(" "))
        }
    });
    prop::collection::vec(sentence, 1..40).prop_map(|sentences| sentences.join(" "))
}

/// Generate arbitrary percentage tables (deliberately NOT summing to 100).
fn percentages() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(0.0f64..150.0, 1..10)
}

/// Generate small embedding sets with a dimension of 3.
fn points() -> impl Strategy<Value = Vec<Vec<f32>>> {
    prop::collection::vec(prop::collection::vec(-10.0f32..10.0, 3), 4..30)
}

// =============================================================================
// Chunk Ceiling
// =============================================================================

proptest! {
    #[test]
    fn chunks_respect_word_ceiling(text in document(), max_words in 5usize..50) {
        let chunker = SemanticChunker::new(0.7, max_words);
        let chunks = chunker.chunk(&text, &HashEmbedder::default()).unwrap();

        for chunk in &chunks {
            // A chunk over the ceiling is only legal when it is a single
            // unavoidably oversized sentence.
            if chunk.words > max_words {
                prop_assert_eq!(
                    split_sentences(&chunk.text).len(),
                    1,
                    "multi-sentence chunk over the ceiling: {:?}",
                    chunk
                );
            }
        }
    }

    #[test]
    fn chunk_indices_sequential(text in document()) {
        let chunker = SemanticChunker::default();
        let chunks = chunker.chunk(&text, &HashEmbedder::default()).unwrap();
        for (i, chunk) in chunks.iter().enumerate() {
            prop_assert_eq!(chunk.index, i);
        }
    }

    #[test]
    fn chunks_never_lose_words(text in document()) {
        let chunker = SemanticChunker::default();
        let chunks = chunker.chunk(&text, &HashEmbedder::default()).unwrap();
        let chunk_words: usize = chunks.iter().map(|c| c.words).sum();
        prop_assert_eq!(chunk_words, abridge::word_count(&text));
    }
}

// =============================================================================
// Allocation Exactness
// =============================================================================

proptest! {
    #[test]
    fn allocation_sums_to_budget_exactly(pcts in percentages(), budget in 1usize..500) {
        let shares: Vec<(usize, f64)> =
            pcts.iter().copied().enumerate().collect();
        let table = allocate(&shares, budget);

        let total: i64 = table.iter().map(|&(_, n)| n).sum();
        prop_assert_eq!(total, budget as i64);
    }

    #[test]
    fn allocation_preserves_ids_and_order(pcts in percentages(), budget in 1usize..100) {
        let shares: Vec<(usize, f64)> =
            pcts.iter().copied().enumerate().collect();
        let table = allocate(&shares, budget);

        let ids: Vec<usize> = table.iter().map(|&(id, _)| id).collect();
        let expected: Vec<usize> = (0..pcts.len()).collect();
        prop_assert_eq!(ids, expected);
    }
}

// =============================================================================
// Selection Cap
// =============================================================================

proptest! {
    #[test]
    fn selection_respects_allocation_and_size(
        data in points(),
        k in 1usize..4,
        raw_allocs in prop::collection::vec(-2i64..10, 1..4),
    ) {
        let chunks: Vec<Chunk> = (0..data.len())
            .map(|i| Chunk::new(format!("chunk {i}"), i))
            .collect();
        let labels: Vec<usize> = (0..data.len()).map(|i| i % k).collect();
        let centroids: Vec<Vec<f32>> = (0..k).map(|_| vec![0.0, 0.0, 0.0]).collect();
        let allocation: Vec<(usize, i64)> = raw_allocs
            .iter()
            .copied()
            .enumerate()
            .filter(|&(id, _)| id < k)
            .collect();

        let selections =
            select_representatives(&chunks, &data, &labels, &centroids, &allocation);

        for (selection, &(cluster, allocated)) in selections.iter().zip(&allocation) {
            let cluster_size = labels.iter().filter(|&&l| l == cluster).count();
            let cap = (allocated.max(0) as usize).min(cluster_size);
            prop_assert!(
                selection.chunks.len() <= cap,
                "cluster {} selected {} > cap {}",
                cluster,
                selection.chunks.len(),
                cap
            );
        }
    }
}

// =============================================================================
// Clustering Determinism
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn kmeans_labels_are_reproducible(data in points(), k in 2usize..4) {
        prop_assume!(k <= data.len());
        let clusterer = Clusterer::new();
        let first = clusterer.fit(&data, Some(k)).unwrap();
        let second = clusterer.fit(&data, Some(k)).unwrap();
        prop_assert_eq!(first.labels, second.labels);
    }

    #[test]
    fn every_label_is_in_range(data in points(), k in 1usize..4) {
        prop_assume!(k <= data.len());
        let partition = Clusterer::new().fit(&data, Some(k)).unwrap();
        for &label in &partition.labels {
            prop_assert!(label < k);
        }
    }
}
