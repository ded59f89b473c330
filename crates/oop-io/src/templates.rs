//! Starter input files written by `generate`.
use crate::config::{DEFAULT_ANNOTATORS, DEFAULT_METADATA, DEFAULT_PARAMETER_STORE, DEFAULT_STORY};
use crate::error::IoError;
use crate::writer::{write_dir, write_file};
use std::path::{Path, PathBuf};

pub const PARAMETER_STORE_TEMPLATE: &str = include_str!("../templates/parameterStore.properties");
pub const METADATA_TEMPLATE: &str = include_str!("../templates/metadata.properties");
pub const ANNOTATORS_TEMPLATE: &str = include_str!("../templates/annotators.txt");
pub const STORY_TEMPLATE: &str = include_str!("../templates/story.txt");

/// (file name, content) for every template.
pub fn templates() -> [(&'static str, &'static str); 4] {
    [
        (DEFAULT_PARAMETER_STORE, PARAMETER_STORE_TEMPLATE),
        (DEFAULT_METADATA, METADATA_TEMPLATE),
        (DEFAULT_ANNOTATORS, ANNOTATORS_TEMPLATE),
        (DEFAULT_STORY, STORY_TEMPLATE),
    ]
}

/// Write the templates into `dir`, creating it if needed.
pub fn generate_templates(dir: &Path) -> Result<Vec<PathBuf>, IoError> {
    write_dir(dir)?;
    let mut written = Vec::new();
    for (name, content) in templates() {
        let path = dir.join(name);
        write_file(&path, content.as_bytes())?;
        written.push(path);
    }
    tracing::info!(dir = %dir.display(), "templates generated");
    Ok(written)
}
