//! OOP Annotators: reference implementations registered by default.
//!
//! Small and deterministic. Real linguistic annotators plug in
//! through the same `Annotator` trait and `AnnotatorRegistry`.
//!
//! # Dependencies
//!
//! ```text
//! Tokens ──► TypeTokenRatio     reads STANFORD.Tokens
//! ```
//!
//! `Length`, `WordCount` and `SentenceCount` are independent; the aggregator
//! combines them into `AverageWordLength` and `WordsPerSentence`.

mod counts;
mod provenance;
mod tokens;
mod type_token_ratio;

pub use counts::{count_sentences, LengthAnnotator, SentenceCountAnnotator, WordCountAnnotator};
pub use provenance::ProvenanceAnnotator;
pub use tokens::{is_word, tokenize, TokensAnnotator};
pub use type_token_ratio::TypeTokenRatioAnnotator;

use oop_registry::AnnotatorRegistry;

/// Registry with every reference annotator under its list name.
pub fn default_registry() -> AnnotatorRegistry {
    let mut registry = AnnotatorRegistry::new();
    register_defaults(&mut registry);
    registry
}

/// Add the reference annotators to an existing registry.
pub fn register_defaults(registry: &mut AnnotatorRegistry) {
    registry
        .register("Tokens", || Box::new(TokensAnnotator::default()))
        .register("Length", || Box::new(LengthAnnotator))
        .register("WordCount", || Box::new(WordCountAnnotator::default()))
        .register("SentenceCount", || Box::new(SentenceCountAnnotator))
        .register("TypeTokenRatio", || Box::new(TypeTokenRatioAnnotator))
        .register("Provenance", || Box::new(ProvenanceAnnotator));
}
