//! The Chunk type: a merged group of adjacent sentences.

/// A group of adjacent sentences treated as one clustering unit.
///
/// Chunks are the currency of the reduction pipeline: the chunker produces
/// them, the clusterer groups them, and the selector picks a representative
/// subset to stand in for the whole document.
///
/// A chunk is immutable once created. Its `words` count is fixed at
/// construction (whitespace-delimited), which is also the unit the chunker's
/// size ceiling is measured in.
///
/// ```rust
/// use abridge::Chunk;
///
/// let chunk = Chunk::new("The quick brown fox. It jumped.", 0);
/// assert_eq!(chunk.words, 6);
/// assert_eq!(chunk.index, 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Chunk {
    /// The chunk text: member sentences joined with single spaces.
    pub text: String,
    /// Whitespace-delimited word count of `text`.
    pub words: usize,
    /// Zero-based position of this chunk in document order.
    pub index: usize,
}

impl Chunk {
    /// Create a new chunk, counting its words.
    #[must_use]
    pub fn new(text: impl Into<String>, index: usize) -> Self {
        let text = text.into();
        let words = word_count(&text);
        Self { text, words, index }
    }

    /// Whether this chunk holds no text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl std::fmt::Display for Chunk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Chunk {{ index: {}, words: {} }}", self.index, self.words)
    }
}

/// Count whitespace-delimited words.
///
/// This is the size measure used throughout the pipeline: the chunker's
/// ceiling, the average chunk size fed to the budget calculator, and the
/// short-document threshold all count words this way.
#[must_use]
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_count() {
        assert_eq!(word_count(""), 0);
        assert_eq!(word_count("   \n\t "), 0);
        assert_eq!(word_count("one"), 1);
        assert_eq!(word_count("one  two\nthree"), 3);
    }

    #[test]
    fn test_chunk_counts_words() {
        let chunk = Chunk::new("a b c", 4);
        assert_eq!(chunk.words, 3);
        assert_eq!(chunk.index, 4);
        assert!(!chunk.is_empty());
    }
}
