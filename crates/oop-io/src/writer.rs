//! Artifact writer: five files per run, named after the document identity
use crate::error::IoError;
use oop_core::{Namespace, RunResult};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Text,
    Stanford,
    Oop,
    Pipeline,
    Aggregates,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 5] = [
        ArtifactKind::Text,
        ArtifactKind::Stanford,
        ArtifactKind::Oop,
        ArtifactKind::Pipeline,
        ArtifactKind::Aggregates,
    ];

    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Text => "TXT",
            Self::Stanford => "STANFORD",
            Self::Oop => "OOP",
            Self::Pipeline => "PIPELINE",
            Self::Aggregates => "AGGREGATES",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Text => "txt",
            _ => "json",
        }
    }

    /// `<PREFIX>_<doc id>.<ext>`
    pub fn file_name(&self, doc_id: &str) -> String {
        format!("{}_{}.{}", self.prefix(), doc_id, self.extension())
    }
}

impl From<Namespace> for ArtifactKind {
    fn from(namespace: Namespace) -> Self {
        match namespace {
            Namespace::Stanford => Self::Stanford,
            Namespace::Oop => Self::Oop,
            Namespace::Pipeline => Self::Pipeline,
        }
    }
}

/// Persists a finished run.
pub trait OutputWriter {
    /// Returns the paths written, in `ArtifactKind::ALL` order.
    fn write(&self, result: &RunResult) -> Result<Vec<PathBuf>, IoError>;
}

/// Writes artifacts into one directory, overwriting earlier runs on the
/// same content.
#[derive(Debug, Clone)]
pub struct DirectoryWriter {
    root: PathBuf,
}

impl DirectoryWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, kind: ArtifactKind, doc_id: &str) -> PathBuf {
        self.root.join(kind.file_name(doc_id))
    }

    fn render(result: &RunResult, kind: ArtifactKind) -> Result<String, IoError> {
        let rendered = match kind {
            ArtifactKind::Text => result.text.clone(),
            ArtifactKind::Stanford => pretty(&result.stanford)?,
            ArtifactKind::Oop => pretty(&result.oop)?,
            ArtifactKind::Pipeline => pretty(&result.pipeline)?,
            ArtifactKind::Aggregates => pretty(&result.aggregates)?,
        };
        Ok(rendered)
    }
}

impl OutputWriter for DirectoryWriter {
    fn write(&self, result: &RunResult) -> Result<Vec<PathBuf>, IoError> {
        write_dir(&self.root)?;

        let mut written = Vec::with_capacity(ArtifactKind::ALL.len());
        for kind in ArtifactKind::ALL {
            let path = self.path_for(kind, &result.doc_id);
            let content = Self::render(result, kind)?;
            write_file(&path, content.as_bytes())?;
            written.push(path);
        }

        tracing::info!(
            doc_id = %result.doc_id,
            dir = %self.root.display(),
            files = written.len(),
            "artifacts written"
        );
        Ok(written)
    }
}

fn pretty<T: Serialize>(value: &T) -> Result<String, IoError> {
    Ok(serde_json::to_string_pretty(value)?)
}

pub(crate) fn write_dir(dir: &Path) -> Result<(), IoError> {
    std::fs::create_dir_all(dir).map_err(|source| IoError::Write {
        path: dir.to_path_buf(),
        source,
    })
}

pub(crate) fn write_file(path: &Path, content: &[u8]) -> Result<(), IoError> {
    std::fs::write(path, content).map_err(|source| IoError::Write {
        path: path.to_path_buf(),
        source,
    })
}
