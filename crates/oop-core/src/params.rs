//! Parameter store: read-only configuration lent to annotators at
//! initialization time.
use crate::error::ConfigurationError;
use std::collections::BTreeMap;
use std::str::FromStr;

/// Read surface over externally owned configuration.
///
/// Implementations must be safe to share between concurrent runs.
pub trait ParameterStore: Send + Sync {
    fn get(&self, key: &str) -> Option<&str>;

    fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    /// Look up a key the named annotator cannot run without.
    fn require(&self, annotator: &str, key: &str) -> Result<&str, ConfigurationError> {
        self.get(key)
            .ok_or_else(|| ConfigurationError::MissingParameter {
                annotator: annotator.to_string(),
                key: key.to_string(),
            })
    }
}

/// Parse `key` into `T`, falling back to `default` when absent.
pub fn get_parsed<T>(
    store: &dyn ParameterStore,
    key: &str,
    default: T,
) -> Result<T, ConfigurationError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match store.get(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigurationError::InvalidParameter {
                key: key.to_string(),
                value: raw.to_string(),
                reason: e.to_string(),
            }),
    }
}

/// Boolean lookup accepting `true/false`, `yes/no`, `1/0` (case-insensitive).
pub fn get_bool(
    store: &dyn ParameterStore,
    key: &str,
    default: bool,
) -> Result<bool, ConfigurationError> {
    let Some(raw) = store.get(key) else {
        return Ok(default);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        _ => Err(ConfigurationError::InvalidParameter {
            key: key.to_string(),
            value: raw.to_string(),
            reason: "expected a boolean".to_string(),
        }),
    }
}

/// In-memory store, also the target of the file loaders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapParameterStore {
    values: BTreeMap<String, String>,
}

impl MapParameterStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl ParameterStore for MapParameterStore {
    fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

impl FromIterator<(String, String)> for MapParameterStore {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
