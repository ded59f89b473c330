use once_cell::sync::Lazy;
use oop_core::params::get_bool;
use oop_core::{
    Annotator, AnnotatorError, ConfigurationError, Contribution, Document, Metadata, Namespace,
    ParameterStore,
};
use regex::Regex;

/// Words (with inner apostrophes) or single punctuation marks.
static TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+(?:'\w+)*|[^\w\s]").unwrap());

pub const LOWERCASE_PARAM: &str = "tokens.lowercase";
pub const PUNCTUATION_PARAM: &str = "tokens.punctuation";

/// Writes the token sequence to `STANFORD.Tokens`.
pub struct TokensAnnotator {
    lowercase: bool,
    punctuation: bool,
}

impl Default for TokensAnnotator {
    fn default() -> Self {
        Self {
            lowercase: false,
            punctuation: true,
        }
    }
}

/// Token is a word rather than punctuation.
pub fn is_word(token: &str) -> bool {
    token.chars().any(char::is_alphanumeric)
}

pub fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    TOKEN.find_iter(text).map(|m| m.as_str())
}

impl Annotator for TokensAnnotator {
    fn name(&self) -> &str {
        "Tokens"
    }

    fn namespace(&self) -> Namespace {
        Namespace::Stanford
    }

    fn initialize(&mut self, params: &dyn ParameterStore) -> Result<(), ConfigurationError> {
        self.lowercase = get_bool(params, LOWERCASE_PARAM, self.lowercase)?;
        self.punctuation = get_bool(params, PUNCTUATION_PARAM, self.punctuation)?;
        Ok(())
    }

    fn annotate(&self, document: &Document, _metadata: &Metadata) -> Result<Contribution, AnnotatorError> {
        let tokens: Vec<String> = tokenize(document.text())
            .filter(|t| self.punctuation || is_word(t))
            .map(|t| if self.lowercase { t.to_lowercase() } else { t.to_string() })
            .collect();

        let mut contribution = Contribution::new();
        contribution.insert_serialized("Tokens", &tokens)?;
        Ok(contribution)
    }
}
