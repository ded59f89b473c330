//! Document-level counts written to `OOP`.
use once_cell::sync::Lazy;
use oop_core::params::get_parsed;
use oop_core::{
    Annotator, AnnotatorError, ConfigurationError, Contribution, Document, Metadata, Namespace,
    ParameterStore,
};
use regex::Regex;

/// Sentence terminators followed by whitespace or end of text.
static SENTENCE_END: Lazy<Regex> = Lazy::new(|| Regex::new(r#"[.!?]+["')\]]*(?:\s+|$)"#).unwrap());

pub const MIN_WORD_LENGTH_PARAM: &str = "wordCount.minLength";

/// `OOP.Length`: number of characters in the text.
#[derive(Default)]
pub struct LengthAnnotator;

impl Annotator for LengthAnnotator {
    fn name(&self) -> &str {
        "Length"
    }

    fn namespace(&self) -> Namespace {
        Namespace::Oop
    }

    fn annotate(&self, document: &Document, _metadata: &Metadata) -> Result<Contribution, AnnotatorError> {
        Ok(Contribution::new().with("Length", document.text().chars().count()))
    }
}

/// `OOP.WordCount`: whitespace-separated words at least `min_length`
/// characters long.
pub struct WordCountAnnotator {
    min_length: usize,
}

impl Default for WordCountAnnotator {
    fn default() -> Self {
        Self { min_length: 1 }
    }
}

impl Annotator for WordCountAnnotator {
    fn name(&self) -> &str {
        "WordCount"
    }

    fn namespace(&self) -> Namespace {
        Namespace::Oop
    }

    fn initialize(&mut self, params: &dyn ParameterStore) -> Result<(), ConfigurationError> {
        self.min_length = get_parsed(params, MIN_WORD_LENGTH_PARAM, self.min_length)?;
        Ok(())
    }

    fn annotate(&self, document: &Document, _metadata: &Metadata) -> Result<Contribution, AnnotatorError> {
        let count = document
            .text()
            .split_whitespace()
            .filter(|w| w.chars().count() >= self.min_length)
            .count();
        Ok(Contribution::new().with("WordCount", count))
    }
}

/// `OOP.SentenceCount`: runs of text ending in `.`, `!` or `?` (or the end
/// of the document).
#[derive(Default)]
pub struct SentenceCountAnnotator;

pub fn count_sentences(text: &str) -> usize {
    SENTENCE_END
        .split(text)
        .filter(|s| s.chars().any(char::is_alphanumeric))
        .count()
}

impl Annotator for SentenceCountAnnotator {
    fn name(&self) -> &str {
        "SentenceCount"
    }

    fn namespace(&self) -> Namespace {
        Namespace::Oop
    }

    fn annotate(&self, document: &Document, _metadata: &Metadata) -> Result<Contribution, AnnotatorError> {
        Ok(Contribution::new().with("SentenceCount", count_sentences(document.text())))
    }
}
