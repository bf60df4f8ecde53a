use std::path::PathBuf;
use thiserror::Error;

/// Why `predict` or `evaluate` produced no result.
#[derive(Error, Debug)]
pub enum PredictionError {
    #[error("artifact not found: {}", path.display())]
    ArtifactNotFound { path: PathBuf },

    /// The artifact exists but could not be read or decoded.
    #[error("failed to load {}: {reason}", path.display())]
    DeserializationFailed { path: PathBuf, reason: String },

    #[error("inference failed: {0}")]
    InferenceFailed(String),
}

impl PredictionError {
    pub fn inference(reason: impl Into<String>) -> Self {
        PredictionError::InferenceFailed(reason.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, PredictionError::ArtifactNotFound { .. })
    }
}
