//! Summarization prompt configuration.
//!
//! The boundary artifact between this crate and the hosted summarizer: a
//! validated, immutable configuration record that renders the finished
//! prompt string. Construction is the validation point: the format and
//! vocabulary options are enums, so an invalid combination cannot exist,
//! and the record never mutates after it is built.

/// Output shape of the requested summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SummaryFormat {
    /// Continuous prose.
    #[default]
    Paragraph,
    /// Bullet-point list.
    BulletPoints,
}

/// Summarization technique to request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Vocabulary {
    /// Rephrase in the model's own words.
    #[default]
    Abstractive,
    /// Prefer wording lifted from the source.
    Extractive,
}

/// Immutable prompt configuration.
///
/// Built once with [`PromptSpec::new`] plus `with_*` setters, then rendered
/// against the proxy text (or the raw text of a short document).
///
/// ```rust
/// use abridge::{PromptSpec, SummaryFormat};
///
/// let spec = PromptSpec::new(500)
///     .with_format(SummaryFormat::BulletPoints)
///     .with_tone("formal")
///     .with_language("French");
///
/// let prompt = spec.render("[Cluster 0]\nSome representative text.");
/// assert!(prompt.contains("approximately 500 words"));
/// assert!(prompt.contains("bullet points"));
/// assert!(prompt.contains("French"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PromptSpec {
    summary_words: usize,
    format: SummaryFormat,
    tone: String,
    language: String,
    vocabulary: Vocabulary,
    structure: Option<String>,
    instruction: String,
}

impl PromptSpec {
    /// Create a spec targeting the given (already normalized) word count.
    ///
    /// Defaults: paragraph format, neutral tone, English, abstractive.
    #[must_use]
    pub fn new(summary_words: usize) -> Self {
        Self {
            summary_words,
            format: SummaryFormat::default(),
            tone: "neutral".to_string(),
            language: "English".to_string(),
            vocabulary: Vocabulary::default(),
            structure: None,
            instruction: "You are an expert at summarizing long documents. Your task is to \
                          generate a well-structured summary of the text while keeping the \
                          key ideas and removing unnecessary details."
                .to_string(),
        }
    }

    /// Set the output format.
    #[must_use]
    pub fn with_format(mut self, format: SummaryFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the tone descriptor (free text, e.g. `"formal"`).
    #[must_use]
    pub fn with_tone(mut self, tone: impl Into<String>) -> Self {
        self.tone = tone.into();
        self
    }

    /// Set the output language (free text).
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Set the summarization technique.
    #[must_use]
    pub fn with_vocabulary(mut self, vocabulary: Vocabulary) -> Self {
        self.vocabulary = vocabulary;
        self
    }

    /// Require the summary to follow a structure template: free text
    /// enumerating the section labels the summary must keep.
    #[must_use]
    pub fn with_structure(mut self, structure: impl Into<String>) -> Self {
        self.structure = Some(structure.into());
        self
    }

    /// Replace the leading instruction.
    #[must_use]
    pub fn with_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.instruction = instruction.into();
        self
    }

    /// The target summary length in words.
    #[must_use]
    pub fn summary_words(&self) -> usize {
        self.summary_words
    }

    /// Render the finished prompt for the given text.
    #[must_use]
    pub fn render(&self, text: &str) -> String {
        let mut prompt = format!("{}\n\nTEXT:\n{text}\n\n", self.instruction);

        if let Some(structure) = &self.structure {
            prompt.push_str(&format!(
                "The answer must strictly follow the structure below. Keep all titles, \
                 numberings (1, 2, 3...) and lettered sub-points (a, b, c...), and add the \
                 corresponding paragraphs under each section without altering the format:\n\
                 {structure}\n\n"
            ));
        }

        let format = match self.format {
            SummaryFormat::Paragraph => "normal text",
            SummaryFormat::BulletPoints => "bullet points",
        };
        let vocabulary = match self.vocabulary {
            Vocabulary::Abstractive => "abstractive",
            Vocabulary::Extractive => "extractive",
        };

        prompt.push_str(&format!(
            "The summary should be approximately {} words long, written in {format} format. \
             Please use a {} tone, write in {}, and apply {vocabulary} summarization \
             techniques.\n\nNow, provide the summary:",
            self.summary_words,
            self.tone.to_lowercase(),
            self.language,
        ));

        prompt
    }
}
