//! Annotator Registry: explicit name → factory table
use crate::annotator_list::{AnnotatorEntry, AnnotatorList};
use oop_core::{Aggregator, Annotator, ConfigurationError, ParameterStore, Pipeline, ResolvedAnnotator};
use std::collections::BTreeMap;

/// Builds a fresh annotator instance.
pub type AnnotatorFactory = Box<dyn Fn() -> Box<dyn Annotator> + Send + Sync>;

/// Maps the names used in annotator lists to factories. Populated at
/// startup; resolution never inspects types at runtime.
#[derive(Default)]
pub struct AnnotatorRegistry {
    factories: BTreeMap<String, AnnotatorFactory>,
}

impl AnnotatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `factory` under `name`, replacing any earlier registration.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn() -> Box<dyn Annotator> + Send + Sync + 'static,
    {
        self.factories.insert(name.into(), Box::new(factory));
        self
    }

    pub fn with<F>(mut self, name: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> Box<dyn Annotator> + Send + Sync + 'static,
    {
        self.register(name, factory);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Construct the annotator registered as `name`.
    pub fn resolve(&self, name: &str) -> Option<Box<dyn Annotator>> {
        self.factories.get(name).map(|factory| factory())
    }

    fn resolve_entry(&self, entry: &AnnotatorEntry) -> Result<Box<dyn Annotator>, ConfigurationError> {
        self.resolve(&entry.name)
            .ok_or_else(|| ConfigurationError::UnknownAnnotator {
                name: entry.name.clone(),
                line: entry.line,
            })
    }

    /// Construct every listed annotator, then initialize each with `params`.
    /// Any unknown name fails before a single annotator is initialized.
    pub fn resolve_all(
        &self,
        list: &AnnotatorList,
        params: &dyn ParameterStore,
    ) -> Result<Vec<ResolvedAnnotator>, ConfigurationError> {
        let constructed = list
            .entries()
            .iter()
            .map(|entry| self.resolve_entry(entry).map(|a| (entry, a)))
            .collect::<Result<Vec<_>, _>>()?;

        let mut resolved = Vec::with_capacity(constructed.len());
        for (entry, mut annotator) in constructed {
            annotator
                .initialize(params)
                .map_err(|err| attribute(entry, err))?;
            tracing::debug!(
                annotator = %entry.name,
                line = entry.line,
                namespace = %annotator.namespace(),
                optional = entry.optional || annotator.optional(),
                "annotator resolved"
            );
            resolved.push(ResolvedAnnotator::new(annotator, entry.optional));
        }

        Ok(resolved)
    }

    /// Resolve `list` into a runnable pipeline with the standard aggregator.
    pub fn build_pipeline(
        &self,
        list: &AnnotatorList,
        params: &dyn ParameterStore,
    ) -> Result<Pipeline, ConfigurationError> {
        let annotators = self.resolve_all(list, params)?;
        let aggregator = Aggregator::from_params(params)?;
        let pipeline = Pipeline::new(annotators, aggregator);
        tracing::info!(pipeline = %pipeline.pipeline_id(), annotators = pipeline.len(), "pipeline built");
        Ok(pipeline)
    }
}

/// Errors from `initialize` that don't already name an annotator are
/// reported against the list entry that triggered them.
fn attribute(entry: &AnnotatorEntry, err: ConfigurationError) -> ConfigurationError {
    match err {
        ConfigurationError::MissingParameter { .. } | ConfigurationError::Initialization { .. } => err,
        other => ConfigurationError::Initialization {
            annotator: entry.name.clone(),
            reason: format!("line {}: {}", entry.line, other),
        },
    }
}

impl std::fmt::Debug for AnnotatorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("AnnotatorRegistry")
            .field("names", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}
