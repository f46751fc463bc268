//! Token budgeting: how many representative chunks can we afford?
//!
//! The downstream summarizer has a fixed context window. After reserving
//! room for the prompt scaffolding and the summary the model is asked to
//! write, whatever remains is the space the proxy text may occupy. Dividing
//! that remainder by the token cost of an average chunk (plus a small
//! per-chunk margin for separators and labels) gives the total number of
//! representative chunks the allocator may hand out.
//!
//! ## Words to Tokens Without Real Text
//!
//! The budget is computed before the proxy text exists, so the word→token
//! ratio is estimated by tokenizing a synthetic string of N repeated
//! placeholder words. That keeps the estimate tied to the actual tokenizer
//! instead of a hardcoded ratio.
//!
//! Token counting uses the cl100k BPE (default `tiktoken` feature), with a
//! whitespace count as the fallback when the feature is disabled.

#[cfg(feature = "tiktoken")]
use std::sync::OnceLock;

#[cfg(feature = "tiktoken")]
use tiktoken_rs::CoreBPE;

use crate::{Error, Result};

/// Hard model-input ceiling the budget is carved out of.
pub const TOKEN_CEILING: usize = 8000;

/// Default token estimate reserved for prompt scaffolding.
pub const PROMPT_OVERHEAD: usize = 450;

/// Per-chunk safety margin, covering separators and cluster labels.
const PER_CHUNK_MARGIN: i64 = 10;

/// Placeholder word used for synthetic token estimation. Deliberately longer
/// than average so the estimate errs conservative.
const PLACEHOLDER_WORD: &str = "exampleword";

/// Count tokens in a string, via BPE when available.
pub fn count_tokens(text: &str) -> usize {
    #[cfg(feature = "tiktoken")]
    {
        if let Some(encoder) = encoder() {
            return encoder.encode_with_special_tokens(text).len();
        }
    }

    fallback_count(text)
}

/// Estimate the token cost of `n` words of ordinary prose.
#[must_use]
pub fn tokens_for_words(n: usize) -> usize {
    if n == 0 {
        return 0;
    }
    let synthetic = vec![PLACEHOLDER_WORD; n].join(" ");
    count_tokens(&synthetic)
}

/// Compute the total representative-chunk budget.
///
/// `summary_words` is the normalized target summary length; its token cost
/// is reserved alongside `prompt_overhead` before dividing the remainder by
/// the cost of an average chunk. Never returns less than 1, even when the
/// reservations exceed the ceiling outright.
#[must_use]
pub fn chunk_budget(summary_words: usize, avg_chunk_words: f64, prompt_overhead: usize) -> usize {
    let summary_tokens = tokens_for_words(summary_words) as i64;
    let chunk_tokens = tokens_for_words(avg_chunk_words as usize) as i64;

    let remaining = TOKEN_CEILING as i64 - summary_tokens - prompt_overhead as i64;
    let per_chunk = chunk_tokens + PER_CHUNK_MARGIN;

    (remaining / per_chunk).max(1) as usize
}

fn fallback_count(text: &str) -> usize {
    let count = text.split_whitespace().count();
    if count == 0 && !text.is_empty() {
        1
    } else {
        count
    }
}

#[cfg(feature = "tiktoken")]
fn encoder() -> Option<&'static CoreBPE> {
    static ENCODER: OnceLock<Option<CoreBPE>> = OnceLock::new();
    ENCODER
        .get_or_init(|| tiktoken_rs::cl100k_base().ok())
        .as_ref()
}

/// Target summary length: a preset band or an explicit word count.
///
/// Presets scale with the document and clamp to a band; every path,
/// including explicit counts, additionally clamps to `[150, 1700]`.
///
/// | Input        | Target            | Band          |
/// |--------------|-------------------|---------------|
/// | `"low"`      | 10% of doc words  | `[150, 350]`  |
/// | `"moderate"` | 20% of doc words  | `[400, 650]`  |
/// | `"high"`     | 30% of doc words  | `[700, 1200]` |
/// | a number     | as given          | final clamp only |
///
/// ```rust
/// use abridge::SummaryLength;
///
/// let length: SummaryLength = "moderate".parse().unwrap();
/// assert_eq!(length.normalize(2000), 400);
///
/// let length: SummaryLength = "500".parse().unwrap();
/// assert_eq!(length.normalize(0), 500);
///
/// assert!("brief".parse::<SummaryLength>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SummaryLength {
    /// Roughly a tenth of the document.
    Low,
    /// Roughly a fifth of the document.
    Moderate,
    /// Roughly a third of the document.
    High,
    /// An explicit word count.
    Words(u32),
}

impl SummaryLength {
    /// Resolve to a concrete word count for a document of `doc_words` words.
    #[must_use]
    pub fn normalize(&self, doc_words: usize) -> usize {
        let target = match self {
            Self::Low => (0.1 * doc_words as f64).round().clamp(150.0, 350.0),
            Self::Moderate => (0.2 * doc_words as f64).round().clamp(400.0, 650.0),
            Self::High => (0.3 * doc_words as f64).round().clamp(700.0, 1200.0),
            Self::Words(n) => f64::from(*n),
        };
        target.clamp(150.0, 1700.0) as usize
    }
}

impl std::str::FromStr for SummaryLength {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "low" => Ok(Self::Low),
            "moderate" => Ok(Self::Moderate),
            "high" => Ok(Self::High),
            other => other
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .map(|n| Self::Words(n.round().max(0.0) as u32))
                .ok_or_else(|| Error::InvalidSummaryLength(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_low_clamps_to_band() {
        let length: SummaryLength = "low".parse().unwrap();
        let target = length.normalize(1000); // 10% = 100, below the band floor
        assert!((150..=350).contains(&target));
    }

    #[test]
    fn test_high_clamps_to_band() {
        let length: SummaryLength = "high".parse().unwrap();
        let target = length.normalize(10_000); // 30% = 3000, above the band ceiling
        assert!((700..=1200).contains(&target));
    }

    #[test]
    fn test_explicit_count_passes_through() {
        let length: SummaryLength = "500".parse().unwrap();
        assert_eq!(length.normalize(123_456), 500);
    }

    #[test]
    fn test_explicit_count_final_clamp() {
        let length: SummaryLength = "5000".parse().unwrap();
        assert_eq!(length.normalize(0), 1700);
        let length: SummaryLength = "10".parse().unwrap();
        assert_eq!(length.normalize(0), 150);
    }

    #[test]
    fn test_moderate_scales_with_document() {
        let length = SummaryLength::Moderate;
        assert_eq!(length.normalize(2500), 500); // 20% inside the band
    }

    #[test]
    fn test_invalid_input_is_a_hard_error() {
        let err = "brief".parse::<SummaryLength>().unwrap_err();
        assert!(matches!(err, Error::InvalidSummaryLength(_)));
        assert!("NaN".parse::<SummaryLength>().is_err());
    }

    #[test]
    fn test_negative_count_clamps_up() {
        // Numeric input is accepted even when silly; the final clamp applies.
        let length: SummaryLength = "-20".parse().unwrap();
        assert_eq!(length.normalize(0), 150);
    }

    #[test]
    fn test_tokens_for_words_monotonic() {
        assert_eq!(tokens_for_words(0), 0);
        let small = tokens_for_words(10);
        let large = tokens_for_words(100);
        assert!(small >= 10);
        assert!(large > small);
    }

    #[test]
    fn test_budget_is_at_least_one() {
        // Reservations exceed the ceiling; the budget still floors at 1.
        assert_eq!(chunk_budget(1700, 5000.0, TOKEN_CEILING), 1);
    }

    #[test]
    fn test_budget_shrinks_with_longer_summaries() {
        let short = chunk_budget(150, 150.0, PROMPT_OVERHEAD);
        let long = chunk_budget(1700, 150.0, PROMPT_OVERHEAD);
        assert!(short >= long);
        assert!(short >= 1);
    }

    #[test]
    fn test_budget_shrinks_with_bigger_chunks() {
        let small_chunks = chunk_budget(500, 50.0, PROMPT_OVERHEAD);
        let big_chunks = chunk_budget(500, 200.0, PROMPT_OVERHEAD);
        assert!(small_chunks > big_chunks);
    }
}
