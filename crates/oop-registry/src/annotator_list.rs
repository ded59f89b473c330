//! Annotator list: the ordered configuration naming which annotators run
use oop_core::ConfigurationError;
use serde::{Deserialize, Serialize};

/// One non-comment line of the list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotatorEntry {
    pub name: String,
    /// 1-based line number in the source list.
    pub line: usize,
    /// Set by a trailing `?` on the line.
    pub optional: bool,
}

/// Ordered annotator names. Order is execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotatorList {
    entries: Vec<AnnotatorEntry>,
}

impl AnnotatorList {
    /// Parse one name per line. Lines starting with `#` or `/` are comments,
    /// blank lines are skipped, `Name?` marks an entry optional.
    pub fn parse(text: &str) -> Result<Self, ConfigurationError> {
        Self::from_lines(text.lines())
    }

    pub fn from_lines<I, S>(lines: I) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut entries = Vec::new();

        for (idx, raw) in lines.into_iter().enumerate() {
            let line_no = idx + 1;
            let line = raw.as_ref().trim();
            if line.is_empty() || is_comment(line) {
                continue;
            }

            let (name, optional) = match line.strip_suffix('?') {
                Some(name) => (name.trim_end(), true),
                None => (line, false),
            };

            if name.is_empty() {
                return Err(ConfigurationError::MalformedList {
                    line: line_no,
                    reason: "missing annotator name".to_string(),
                });
            }
            if name.chars().any(char::is_whitespace) {
                return Err(ConfigurationError::MalformedList {
                    line: line_no,
                    reason: format!("'{}' is not a single annotator name", name),
                });
            }

            entries.push(AnnotatorEntry {
                name: name.to_string(),
                line: line_no,
                optional,
            });
        }

        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[AnnotatorEntry] {
        &self.entries
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn is_comment(line: &str) -> bool {
    line.starts_with('#') || line.starts_with('/')
}
