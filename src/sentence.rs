//! Sentence segmentation.
//!
//! The chunker works sentence by sentence, so everything downstream depends
//! on finding sentence boundaries correctly. That is harder than it looks:
//!
//! ```text
//! "Dr. Smith went to Washington D.C. on Jan. 15th."
//!     ^                          ^       ^
//!     Not a sentence end (abbreviation)
//! ```
//!
//! We use Unicode Standard Annex #29 (UAX #29) sentence segmentation, which
//! handles abbreviations, decimal numbers, ellipses, and URLs. Whitespace-only
//! spans are dropped, so an empty or blank document yields zero sentences,
//! the pipeline's terminal "no content" case.

use unicode_segmentation::UnicodeSegmentation;

/// Split text into trimmed, non-empty sentences in document order.
///
/// Returns borrowed slices of the input; no allocation per sentence.
///
/// ```rust
/// use abridge::split_sentences;
///
/// let sentences = split_sentences("Hello world. How are you?");
/// assert_eq!(sentences, vec!["Hello world.", "How are you?"]);
///
/// assert!(split_sentences("   \n\t  ").is_empty());
/// ```
#[must_use]
pub fn split_sentences(text: &str) -> Vec<&str> {
    text.split_sentence_bounds()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_sentences() {
        let sentences = split_sentences("Hello world. How are you? I am fine.");
        assert_eq!(sentences.len(), 3);
        assert!(sentences[0].contains("Hello"));
        assert!(sentences[2].contains("fine"));
    }

    #[test]
    fn test_abbreviations() {
        let sentences = split_sentences("Dr. Smith went to Washington D.C. on Tuesday.");
        // Unicode segmentation handles "Dr." but may split on "D.C.".
        // The important thing is it doesn't split on every period.
        assert!(sentences.len() <= 2, "Too many splits: {sentences:?}");
    }

    #[test]
    fn test_empty_and_whitespace() {
        assert!(split_sentences("").is_empty());
        assert!(split_sentences("  \n\t ").is_empty());
    }

    #[test]
    fn test_sentences_are_trimmed() {
        let sentences = split_sentences("One.  Two.");
        assert_eq!(sentences, vec!["One.", "Two."]);
    }
}
