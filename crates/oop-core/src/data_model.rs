//! Data Model: RunResult, provenance records, failure markers
use crate::document::Namespace;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnotatorStatus {
    Ok,
    Failed,
}

/// One entry of `PIPELINE.Annotators`, in execution order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatorRecord {
    pub name: String,
    pub namespace: Namespace,
    pub optional: bool,
    pub status: AnnotatorStatus,
    /// Keys merged by this annotator (empty on failure).
    pub keys: Vec<String>,
    /// Hash of the accumulated namespaces the annotator saw.
    pub in_hash: String,
    /// Hash of the contribution, when there was one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub out_hash: Option<String>,
}

/// Marker recorded under `PIPELINE.<annotator>` when an optional
/// annotator fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureMarker {
    pub status: AnnotatorStatus,
    pub kind: String,
    pub message: String,
}

impl FailureMarker {
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: AnnotatorStatus::Failed,
            kind: kind.into(),
            message: message.into(),
        }
    }
}

/// The fourth namespace, derived from the other three.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AggregateResult {
    pub fields: Map<String, Value>,
}

impl AggregateResult {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}

/// Everything one run produces, handed to the output writer.
///
/// `run_id` and `started_at` identify the execution for logging only; they
/// never appear in the namespaces.
#[derive(Debug, Clone)]
pub struct RunResult {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub doc_id: String,
    pub text: String,
    pub stanford: Map<String, Value>,
    pub oop: Map<String, Value>,
    pub pipeline: Map<String, Value>,
    pub aggregates: AggregateResult,
}

impl RunResult {
    pub fn namespace(&self, namespace: Namespace) -> &Map<String, Value> {
        match namespace {
            Namespace::Stanford => &self.stanford,
            Namespace::Oop => &self.oop,
            Namespace::Pipeline => &self.pipeline,
        }
    }

    /// Failure marker recorded for `annotator`, if it failed in isolation.
    pub fn failure(&self, annotator: &str) -> Option<FailureMarker> {
        self.pipeline
            .get(annotator)
            .and_then(|v| serde_json::from_value::<FailureMarker>(v.clone()).ok())
    }
}
