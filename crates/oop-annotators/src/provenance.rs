use oop_core::{Annotator, AnnotatorError, Contribution, Document, Metadata, Namespace, OOP_VERSION};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProvenanceOutput<'a> {
    engine: &'static str,
    version: &'static str,
    doc_id: &'a str,
    bytes: usize,
}

/// `PIPELINE.Provenance`: which engine produced the artifacts and for which
/// document. Optional by default; a failure here never hides analysis.
#[derive(Default)]
pub struct ProvenanceAnnotator;

impl Annotator for ProvenanceAnnotator {
    fn name(&self) -> &str {
        "Provenance"
    }

    fn namespace(&self) -> Namespace {
        Namespace::Pipeline
    }

    fn optional(&self) -> bool {
        true
    }

    fn annotate(&self, document: &Document, metadata: &Metadata) -> Result<Contribution, AnnotatorError> {
        let doc_id = metadata
            .doc_id()
            .ok_or_else(|| AnnotatorError::InvalidInput("metadata has no document id".to_string()))?;

        let output = ProvenanceOutput {
            engine: "oopnlp",
            version: OOP_VERSION,
            doc_id,
            bytes: document.text().len(),
        };

        let mut contribution = Contribution::new();
        contribution.insert_serialized("Provenance", &output)?;
        Ok(contribution)
    }
}
