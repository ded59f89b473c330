use oop_core::ConfigurationError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IoError {
    #[error("IO/READ: {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("IO/WRITE: {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("IO/FORMAT: {}: {reason}", .path.display())]
    Format { path: PathBuf, reason: String },

    #[error("IO/SERIALIZE: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}
