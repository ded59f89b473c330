//! OOP Core: Annotator trait, Pipeline runner, Aggregator and data model
//!
//! An ordered list of annotators runs against one normalized document. Each
//! annotator writes into exactly one namespace (`STANFORD`, `OOP`,
//! `PIPELINE`); a final aggregation pass derives `AGGREGATES` from the other
//! three.

pub mod aggregate;
pub mod annotator;
pub mod data_model;
pub mod document;
pub mod error;
pub mod identity;
pub mod metadata;
pub mod normalizer;
pub mod params;
pub mod runner;

pub use aggregate::{AggregateInputs, Aggregator, Measure};
pub use annotator::{Annotator, ResolvedAnnotator};
pub use data_model::{AggregateResult, AnnotatorRecord, AnnotatorStatus, FailureMarker, RunResult};
pub use document::{Contribution, Document, Namespace};
pub use error::{AggregationError, AnnotatorError, ConfigurationError, PipelineError, Stage};
pub use identity::{identity, DOC_ID_KEY};
pub use metadata::Metadata;
pub use normalizer::{normalize_plain_unicode, PlainUnicode, TextNormalizer};
pub use params::{MapParameterStore, ParameterStore};
pub use runner::Pipeline;

/// Engine version, recorded by callers that stamp provenance.
pub const OOP_VERSION: &str = env!("CARGO_PKG_VERSION");
