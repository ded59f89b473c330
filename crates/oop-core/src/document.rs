//! Document state shared by the annotators of one run.
use crate::error::{AnnotatorError, PipelineError, Stage};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Owner recorded for keys the executor writes itself.
pub(crate) const ENGINE_OWNER: &str = "pipeline";

/// The result namespaces an annotator may write to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Namespace {
    /// Pass-through of the underlying toolkit's native output.
    Stanford,
    /// Derived annotations.
    Oop,
    /// Bookkeeping and provenance about the run itself.
    Pipeline,
}

impl Namespace {
    pub const ALL: [Namespace; 3] = [Namespace::Stanford, Namespace::Oop, Namespace::Pipeline];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stanford => "STANFORD",
            Self::Oop => "OOP",
            Self::Pipeline => "PIPELINE",
        }
    }
}

impl std::fmt::Display for Namespace {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output of a single `annotate` call. Keys are merged into the namespace
/// the annotator declares.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Contribution {
    entries: Map<String, Value>,
}

impl Contribution {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Insert any serializable value.
    pub fn insert_serialized<T: Serialize>(
        &mut self,
        key: impl Into<String>,
        value: &T,
    ) -> Result<(), AnnotatorError> {
        self.entries.insert(key.into(), serde_json::to_value(value)?);
        Ok(())
    }

    /// Outcome for an annotator whose upstream input has not been recorded
    /// (absent, or its producer ran later in the list).
    pub fn missing_dependency(key: impl Into<String>, namespace: Namespace, requires: &str) -> Self {
        Self::new().with(
            key,
            serde_json::json!({
                "status": "missing_dependency",
                "requires": format!("{}.{}", namespace, requires),
            }),
        )
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_entries(self) -> Map<String, Value> {
        self.entries
    }
}

impl From<Map<String, Value>> for Contribution {
    fn from(entries: Map<String, Value>) -> Self {
        Self { entries }
    }
}

/// Normalized text plus everything annotators have contributed so far.
///
/// Owned by the executor for the duration of one run. Annotators only ever
/// see it through a shared borrow.
#[derive(Debug, Clone)]
pub struct Document {
    pub(crate) text: String,
    pub(crate) id: String,
    pub(crate) stanford: Map<String, Value>,
    pub(crate) oop: Map<String, Value>,
    pub(crate) pipeline: Map<String, Value>,
    owners: HashMap<(Namespace, String), String>,
}

impl Document {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let id = crate::identity::identity(&text);
        Self::with_id(text, id)
    }

    /// Build from text whose identity is already known.
    pub(crate) fn with_id(text: String, id: String) -> Self {
        Self {
            text,
            id,
            stanford: Map::new(),
            oop: Map::new(),
            pipeline: Map::new(),
            owners: HashMap::new(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Content hash of the text.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn namespace(&self, namespace: Namespace) -> &Map<String, Value> {
        match namespace {
            Namespace::Stanford => &self.stanford,
            Namespace::Oop => &self.oop,
            Namespace::Pipeline => &self.pipeline,
        }
    }

    pub fn get(&self, namespace: Namespace, key: &str) -> Option<&Value> {
        self.namespace(namespace).get(key)
    }

    /// Name of the annotator that wrote `namespace.key`.
    pub fn owner(&self, namespace: Namespace, key: &str) -> Option<&str> {
        self.owners
            .get(&(namespace, key.to_string()))
            .map(String::as_str)
    }

    /// Key-wise insert of a contribution. All-or-nothing: a collision on any
    /// key leaves the document untouched.
    pub(crate) fn merge(
        &mut self,
        namespace: Namespace,
        annotator: &str,
        contribution: Contribution,
    ) -> Result<(), PipelineError> {
        for key in contribution.keys() {
            if let Some(previous) = self.owner(namespace, key) {
                return Err(PipelineError::MergeConflict {
                    stage: Stage::Merge,
                    namespace,
                    key: key.clone(),
                    annotator: annotator.to_string(),
                    previous: previous.to_string(),
                });
            }
        }

        for (key, value) in contribution.into_entries() {
            self.owners
                .insert((namespace, key.clone()), annotator.to_string());
            self.namespace_mut(namespace).insert(key, value);
        }
        Ok(())
    }

    fn namespace_mut(&mut self, namespace: Namespace) -> &mut Map<String, Value> {
        match namespace {
            Namespace::Stanford => &mut self.stanford,
            Namespace::Oop => &mut self.oop,
            Namespace::Pipeline => &mut self.pipeline,
        }
    }
}
