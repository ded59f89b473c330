//! Loading run inputs from disk: parameter store, metadata, annotator list,
//! story text.
use crate::error::IoError;
use crate::properties::parse_properties;
use oop_core::{MapParameterStore, Metadata};
use oop_registry::AnnotatorList;
use std::collections::BTreeMap;
use std::path::Path;

/// Default file names, relative to the input path.
pub const DEFAULT_PARAMETER_STORE: &str = "parameterStore.properties";
pub const DEFAULT_METADATA: &str = "metadata.properties";
pub const DEFAULT_ANNOTATORS: &str = "annotators.txt";
pub const DEFAULT_STORY: &str = "story.txt";

pub fn read_text(path: &Path) -> Result<String, IoError> {
    std::fs::read_to_string(path).map_err(|source| IoError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a parameter store from `.properties`, `.yaml` or `.yml`.
pub fn load_parameter_store(path: &Path) -> Result<MapParameterStore, IoError> {
    let text = read_text(path)?;
    let values = match extension(path).as_deref() {
        Some("yaml") | Some("yml") => parse_yaml_params(path, &text)?,
        _ => parse_properties_file(path, &text)?,
    };
    tracing::debug!(path = %path.display(), keys = values.len(), "parameter store loaded");
    Ok(values.into_iter().collect())
}

pub fn load_metadata(path: &Path) -> Result<Metadata, IoError> {
    let text = read_text(path)?;
    Ok(Metadata::from(parse_properties_file(path, &text)?))
}

pub fn read_annotator_list(path: &Path) -> Result<AnnotatorList, IoError> {
    let text = read_text(path)?;
    Ok(AnnotatorList::parse(&text)?)
}

fn parse_properties_file(path: &Path, text: &str) -> Result<BTreeMap<String, String>, IoError> {
    parse_properties(text).map_err(|reason| IoError::Format {
        path: path.to_path_buf(),
        reason,
    })
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
}

/// Flat YAML mapping of scalars. Nested values are rejected.
fn parse_yaml_params(path: &Path, text: &str) -> Result<BTreeMap<String, String>, IoError> {
    let format_err = |reason: String| IoError::Format {
        path: path.to_path_buf(),
        reason,
    };

    let parsed: BTreeMap<String, serde_yaml::Value> =
        serde_yaml::from_str(text).map_err(|e| format_err(e.to_string()))?;

    parsed
        .into_iter()
        .map(|(key, value)| {
            let value = match value {
                serde_yaml::Value::String(s) => s,
                serde_yaml::Value::Bool(b) => b.to_string(),
                serde_yaml::Value::Number(n) => n.to_string(),
                serde_yaml::Value::Null => String::new(),
                _ => return Err(format_err(format!("'{}' must be a scalar", key))),
            };
            Ok((key, value))
        })
        .collect()
}
