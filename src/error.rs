//! Error taxonomy shared by the loaders, analyzers and the simulator.

use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum TardisError {
    /// A dataset or model artifact could not be read, parsed, or does not
    /// have the expected schema.
    #[error("failed to load {path}: {reason}")]
    Load { path: PathBuf, reason: String },
    #[error("no data for {0}")]
    EmptyResult(String),
    #[error("prediction failed: {0}")]
    Prediction(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("no model loaded in this context")]
    ModelUnavailable,
}

impl TardisError {
    pub fn load(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        TardisError::Load {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn is_empty_result(&self) -> bool {
        matches!(self, TardisError::EmptyResult(_))
    }
}

pub type Result<T> = std::result::Result<T, TardisError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_error_mentions_path() {
        let err = TardisError::load("data/missing.csv", "No such file");
        let msg = err.to_string();
        assert!(msg.contains("data/missing.csv"));
        assert!(msg.contains("No such file"));
    }

    #[test]
    fn test_is_empty_result() {
        assert!(TardisError::EmptyResult("Paris".into()).is_empty_result());
        assert!(!TardisError::ModelUnavailable.is_empty_result());
    }
}
