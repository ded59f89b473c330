//! Pipeline Runner: executes annotators in list order against one document
use crate::aggregate::Aggregator;
use crate::annotator::{Annotator, ResolvedAnnotator};
use crate::data_model::{AnnotatorRecord, AnnotatorStatus, FailureMarker, RunResult};
use crate::document::{Contribution, Document, Namespace, ENGINE_OWNER};
use crate::error::{AnnotatorError, PipelineError, Stage};
use crate::identity;
use crate::metadata::Metadata;
use chrono::Utc;
use serde_json::json;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::time::Instant;
use uuid::Uuid;

pub const ANNOTATORS_EXECUTED_KEY: &str = "AnnotatorsExecuted";
pub const ANNOTATORS_FAILED_KEY: &str = "AnnotatorsFailed";
pub const PIPELINE_ID_KEY: &str = "PipelineId";
pub const ANNOTATORS_KEY: &str = "Annotators";

/// A resolved, initialized annotator sequence plus the final aggregator.
///
/// `run` takes `&self` and allocates its own document state, so one
/// pipeline can serve concurrent runs over different documents.
pub struct Pipeline {
    annotators: Vec<ResolvedAnnotator>,
    aggregator: Aggregator,
    pipeline_id: String,
}

impl Pipeline {
    pub fn new(annotators: Vec<ResolvedAnnotator>, aggregator: Aggregator) -> Self {
        let pipeline_id = annotators
            .iter()
            .map(|a| a.name())
            .collect::<Vec<_>>()
            .join("→");

        Self {
            annotators,
            aggregator,
            pipeline_id,
        }
    }

    pub fn pipeline_id(&self) -> &str {
        &self.pipeline_id
    }

    pub fn annotators(&self) -> &[ResolvedAnnotator] {
        &self.annotators
    }

    pub fn len(&self) -> usize {
        self.annotators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotators.is_empty()
    }

    /// Stamp the document identity into `metadata`, run every annotator in
    /// order, then aggregate. Any fatal error aborts with no result.
    pub fn run(&self, text: &str, metadata: &mut Metadata) -> Result<RunResult, PipelineError> {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let started = Instant::now();

        let doc_id = identity::stamp(text, metadata);
        let mut document = Document::with_id(text.to_string(), doc_id);

        let span = tracing::info_span!(
            "run",
            %run_id,
            started_at = %started_at.to_rfc3339(),
            doc_id = %document.id()
        );
        let _enter = span.enter();
        tracing::info!(
            pipeline = %self.pipeline_id,
            annotators = self.annotators.len(),
            "starting annotation run"
        );

        let mut records = Vec::with_capacity(self.annotators.len());
        let mut executed = 0u64;
        let mut failed = 0u64;

        for entry in &self.annotators {
            let annotator = entry.annotator();
            let name = annotator.name();
            let namespace = annotator.namespace();
            let in_hash = state_hash(&document);
            let step = Instant::now();

            match invoke(annotator, &document, metadata) {
                Ok(contribution) => {
                    let out_hash = hash_bytes(contribution_bytes(&contribution).as_bytes());
                    let keys: Vec<String> = contribution.keys().cloned().collect();

                    if let Err(err) = document.merge(namespace, name, contribution) {
                        tracing::error!(annotator = name, error = %err, "merge conflict, aborting run");
                        return Err(err);
                    }

                    tracing::debug!(
                        annotator = name,
                        %namespace,
                        keys = ?keys,
                        elapsed_ms = step.elapsed().as_millis() as u64,
                        "annotator finished"
                    );

                    records.push(AnnotatorRecord {
                        name: name.to_string(),
                        namespace,
                        optional: entry.is_optional(),
                        status: AnnotatorStatus::Ok,
                        keys,
                        in_hash,
                        out_hash: Some(out_hash),
                    });
                    executed += 1;
                }
                Err(err) if entry.is_optional() => {
                    tracing::warn!(annotator = name, error = %err, "optional annotator failed, continuing");

                    let marker = FailureMarker::new(err.kind(), err.message());
                    document.merge(
                        Namespace::Pipeline,
                        name,
                        Contribution::new().with(name, json!(marker)),
                    )?;

                    records.push(AnnotatorRecord {
                        name: name.to_string(),
                        namespace,
                        optional: true,
                        status: AnnotatorStatus::Failed,
                        keys: Vec::new(),
                        in_hash,
                        out_hash: None,
                    });
                    failed += 1;
                }
                Err(err) => {
                    tracing::error!(annotator = name, error = %err, "required annotator failed, aborting run");
                    return Err(PipelineError::AnnotatorFailed {
                        stage: Stage::Annotate,
                        annotator: name.to_string(),
                        source: err,
                    });
                }
            }
        }

        let bookkeeping = Contribution::new()
            .with(ANNOTATORS_EXECUTED_KEY, executed)
            .with(ANNOTATORS_FAILED_KEY, failed)
            .with(PIPELINE_ID_KEY, self.pipeline_id.clone())
            .with(ANNOTATORS_KEY, json!(records));
        document.merge(Namespace::Pipeline, ENGINE_OWNER, bookkeeping)?;

        let aggregates = self.aggregator.aggregate(
            &document.stanford,
            &document.oop,
            &document.pipeline,
            metadata,
        );

        tracing::info!(
            executed,
            failed,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "annotation run finished"
        );

        Ok(RunResult {
            run_id,
            started_at,
            doc_id: document.id,
            text: document.text,
            stanford: document.stanford,
            oop: document.oop,
            pipeline: document.pipeline,
            aggregates,
        })
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("pipeline_id", &self.pipeline_id)
            .field("annotators", &self.annotators)
            .field("measures", &self.aggregator.len())
            .finish()
    }
}

/// Run one annotator. A panic is reported as an execution failure so the
/// optional/required rules apply to it like any other error.
fn invoke(
    annotator: &dyn Annotator,
    document: &Document,
    metadata: &Metadata,
) -> Result<Contribution, AnnotatorError> {
    std::panic::catch_unwind(AssertUnwindSafe(|| annotator.annotate(document, metadata)))
        .unwrap_or_else(|payload| {
            Err(AnnotatorError::ExecutionFailed(format!(
                "panicked: {}",
                panic_message(payload.as_ref())
            )))
        })
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}

fn contribution_bytes(contribution: &Contribution) -> String {
    serde_json::to_string(contribution).unwrap_or_default()
}

/// Hash of the namespaces accumulated so far.
fn state_hash(document: &Document) -> String {
    let mut hasher = blake3::Hasher::new();
    for namespace in Namespace::ALL {
        hasher.update(namespace.as_str().as_bytes());
        hasher.update(
            serde_json::to_string(document.namespace(namespace))
                .unwrap_or_default()
                .as_bytes(),
        );
    }
    format!("blake3:{}", hasher.finalize())
}

fn hash_bytes(data: &[u8]) -> String {
    format!("blake3:{}", blake3::hash(data))
}
