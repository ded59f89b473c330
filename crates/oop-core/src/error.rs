//! Unified error model for the annotation pipeline.
use crate::document::Namespace;
use thiserror::Error;

/// Raised while loading the annotator list or initializing annotators.
/// Always detected before the first `annotate` call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("CONFIG/UNKNOWN: no annotator named '{name}' (line {line})")]
    UnknownAnnotator { name: String, line: usize },

    #[error("CONFIG/LIST: line {line}: {reason}")]
    MalformedList { line: usize, reason: String },

    #[error("CONFIG/PARAM: annotator '{annotator}' requires parameter '{key}'")]
    MissingParameter { annotator: String, key: String },

    #[error("CONFIG/PARAM: parameter '{key}' has invalid value '{value}': {reason}")]
    InvalidParameter {
        key: String,
        value: String,
        reason: String,
    },

    #[error("CONFIG/INIT: annotator '{annotator}' failed to initialize: {reason}")]
    Initialization { annotator: String, reason: String },
}

/// Failure raised by an individual annotator during `annotate`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnnotatorError {
    #[error("ANNOTATOR/EXEC: {0}")]
    ExecutionFailed(String),

    #[error("ANNOTATOR/INPUT: {0}")]
    InvalidInput(String),

    #[error("ANNOTATOR/SERIALIZE: {0}")]
    Serialize(String),
}

impl AnnotatorError {
    /// Short machine-readable kind, written into failure markers.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ExecutionFailed(_) => "execution_failed",
            Self::InvalidInput(_) => "invalid_input",
            Self::Serialize(_) => "serialize",
        }
    }

    /// The message without its code prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::ExecutionFailed(msg) | Self::InvalidInput(msg) | Self::Serialize(msg) => msg,
        }
    }
}

impl From<serde_json::Error> for AnnotatorError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialize(err.to_string())
    }
}

/// A derived value could not be computed. Never aborts a run; the affected
/// aggregate field is recorded as null.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AggregationError {
    #[error("AGG/MISSING: {namespace}.{key} is absent")]
    MissingContribution { namespace: Namespace, key: String },

    #[error("AGG/TYPE: {namespace}.{key} is not {expected}")]
    UnexpectedType {
        namespace: Namespace,
        key: String,
        expected: &'static str,
    },

    #[error("AGG/ZERO: {0} is zero")]
    ZeroDenominator(String),
}

/// Pipeline stage an error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Load,
    Annotate,
    Merge,
    Aggregate,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let s = match self {
            Self::Load => "load",
            Self::Annotate => "annotate",
            Self::Merge => "merge",
            Self::Aggregate => "aggregate",
        };
        f.write_str(s)
    }
}

/// Fatal errors. Any of these aborts the run with no partial output.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    #[error("[load] {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("[{stage}] required annotator '{annotator}' failed: {source}")]
    AnnotatorFailed {
        stage: Stage,
        annotator: String,
        #[source]
        source: AnnotatorError,
    },

    #[error("[{stage}] MERGE/CONFLICT: '{annotator}' wrote {namespace}.{key}, already set by '{previous}'")]
    MergeConflict {
        stage: Stage,
        namespace: Namespace,
        key: String,
        annotator: String,
        previous: String,
    },
}

impl PipelineError {
    pub fn stage(&self) -> Stage {
        match self {
            Self::Configuration(_) => Stage::Load,
            Self::AnnotatorFailed { stage, .. } | Self::MergeConflict { stage, .. } => *stage,
        }
    }

    /// Name of the annotator the error is attributed to, if any.
    pub fn annotator(&self) -> Option<&str> {
        match self {
            Self::Configuration(ConfigurationError::UnknownAnnotator { name, .. }) => Some(name.as_str()),
            Self::Configuration(ConfigurationError::MissingParameter { annotator, .. })
            | Self::Configuration(ConfigurationError::Initialization { annotator, .. }) => {
                Some(annotator.as_str())
            }
            Self::Configuration(_) => None,
            Self::AnnotatorFailed { annotator, .. } | Self::MergeConflict { annotator, .. } => {
                Some(annotator.as_str())
            }
        }
    }
}
