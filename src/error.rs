// file: src/error.rs
// description: Custom error types and result type aliases
// reference: https://docs.rs/thiserror

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SourceError>;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Repository sync failed: {0}")]
    Sync(String),

    #[error("Mirror at {path} belongs to remote {found}, refusing to sync against {expected}")]
    RemoteMismatch {
        path: PathBuf,
        expected: String,
        found: String,
    },

    #[error("File operation failed for {path}: {source}")]
    FileOperation {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Frontmatter error in {file}: {message}")]
    Frontmatter { file: String, message: String },

    #[error("Content store error: {0}")]
    Store(String),

    #[error("Invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Git error: {0}")]
    Git(#[from] git2::Error),
}

impl SourceError {
    /// Remote mismatch is the only sync failure that must abort the run
    /// instead of degrading it to an empty file set.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::RemoteMismatch { .. } | Self::Config(_))
    }
}
