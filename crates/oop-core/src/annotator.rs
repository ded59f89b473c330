//! Annotator trait: the single contract every pipeline step implements
use crate::document::{Contribution, Document, Namespace};
use crate::error::{AnnotatorError, ConfigurationError};
use crate::metadata::Metadata;
use crate::params::ParameterStore;

/// A pluggable analysis step.
///
/// Annotators read the text and whatever earlier annotators recorded, and
/// return a contribution that the executor merges into `namespace()`.
pub trait Annotator: Send + Sync {
    /// Name used in the annotator list and in provenance records.
    fn name(&self) -> &str;

    /// The single namespace this annotator writes to.
    fn namespace(&self) -> Namespace;

    /// Whether a failure may be isolated instead of aborting the run.
    /// The annotator list can also mark an entry optional.
    fn optional(&self) -> bool {
        false
    }

    /// Read configuration. Called once, before any annotator runs.
    fn initialize(&mut self, _params: &dyn ParameterStore) -> Result<(), ConfigurationError> {
        Ok(())
    }

    fn annotate(
        &self,
        document: &Document,
        metadata: &Metadata,
    ) -> Result<Contribution, AnnotatorError>;
}

/// An annotator together with the failure policy chosen for it.
pub struct ResolvedAnnotator {
    annotator: Box<dyn Annotator>,
    optional: bool,
}

impl ResolvedAnnotator {
    /// `optional_override` comes from the annotator list; the annotator's own
    /// declaration applies otherwise.
    pub fn new(annotator: Box<dyn Annotator>, optional_override: bool) -> Self {
        let optional = optional_override || annotator.optional();
        Self { annotator, optional }
    }

    pub fn required(annotator: Box<dyn Annotator>) -> Self {
        Self::new(annotator, false)
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    pub fn annotator(&self) -> &dyn Annotator {
        self.annotator.as_ref()
    }

    pub fn name(&self) -> &str {
        self.annotator.name()
    }
}

impl std::fmt::Debug for ResolvedAnnotator {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("ResolvedAnnotator")
            .field("name", &self.annotator.name())
            .field("namespace", &self.annotator.namespace())
            .field("optional", &self.optional)
            .finish()
    }
}
