use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Core error type for scaffolding operations.
#[derive(Error, Debug)]
pub enum ScaffoldError {
    #[error("{0}")]
    Usage(String),

    #[error("Invalid project name {name:?}: {reason}")]
    InvalidName { name: String, reason: String },

    #[error("{stage} failed: {detail}")]
    StepFailed { stage: String, detail: String },

    #[error("{stage} timed out after {after:?}")]
    Timeout { stage: String, after: Duration },

    #[error("Error reading or parsing JSON from {}: {detail}", path.display())]
    ConfigRead { path: PathBuf, detail: String },

    #[error("Error writing JSON to {}: {detail}", path.display())]
    ConfigWrite { path: PathBuf, detail: String },

    #[error("Failed to write {}: {source}", path.display())]
    TemplateWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Settings error: {0}")]
    Settings(String),
}

impl ScaffoldError {
    /// Stage label of the step that produced this error, if any.
    pub fn stage(&self) -> Option<&str> {
        match self {
            Self::StepFailed { stage, .. } | Self::Timeout { stage, .. } => Some(stage),
            _ => None,
        }
    }
}

/// Result type alias using ScaffoldError.
pub type Result<T> = std::result::Result<T, ScaffoldError>;
