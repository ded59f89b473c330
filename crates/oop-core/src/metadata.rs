//! Metadata: caller-owned properties for one document run
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Key-value properties describing the document (title, author, ...).
///
/// The engine adds exactly one key, the document identity. Everything else
/// is supplied by the caller and persisted unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata {
    properties: BTreeMap<String, String>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.properties.insert(key.into(), value.into());
    }

    /// The document identity, once the executor has stamped it.
    pub fn doc_id(&self) -> Option<&str> {
        self.get(crate::identity::DOC_ID_KEY)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.properties
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

impl FromIterator<(String, String)> for Metadata {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            properties: iter.into_iter().collect(),
        }
    }
}

impl From<BTreeMap<String, String>> for Metadata {
    fn from(properties: BTreeMap<String, String>) -> Self {
        Self { properties }
    }
}
