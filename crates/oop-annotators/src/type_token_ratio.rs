use crate::tokens::is_word;
use oop_core::{Annotator, AnnotatorError, Contribution, Document, Metadata, Namespace};
use std::collections::HashSet;

/// `OOP.TypeTokenRatio`: distinct words over total words, computed from
/// `STANFORD.Tokens`. Depends on the `Tokens` annotator running first.
#[derive(Default)]
pub struct TypeTokenRatioAnnotator;

impl Annotator for TypeTokenRatioAnnotator {
    fn name(&self) -> &str {
        "TypeTokenRatio"
    }

    fn namespace(&self) -> Namespace {
        Namespace::Oop
    }

    fn annotate(&self, document: &Document, _metadata: &Metadata) -> Result<Contribution, AnnotatorError> {
        let Some(tokens) = document.get(Namespace::Stanford, "Tokens") else {
            return Ok(Contribution::missing_dependency(
                "TypeTokenRatio",
                Namespace::Stanford,
                "Tokens",
            ));
        };

        let tokens = tokens
            .as_array()
            .ok_or_else(|| AnnotatorError::InvalidInput("STANFORD.Tokens is not an array".to_string()))?;

        let mut total = 0usize;
        let mut types = HashSet::new();
        for token in tokens {
            let token = token
                .as_str()
                .ok_or_else(|| AnnotatorError::InvalidInput("STANFORD.Tokens holds a non-string".to_string()))?;
            if is_word(token) {
                total += 1;
                types.insert(token.to_lowercase());
            }
        }

        let ratio = if total == 0 {
            0.0
        } else {
            types.len() as f64 / total as f64
        };
        Ok(Contribution::new().with("TypeTokenRatio", ratio))
    }
}
