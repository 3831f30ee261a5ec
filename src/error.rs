//! Error taxonomy for loading the prediction table and classifier artifact

use std::path::PathBuf;
use thiserror::Error;

/// Failures while loading one of the two input artifacts.
///
/// Both artifacts are produced by upstream notebooks, so a missing file is a
/// distinct, actionable condition: the error message names the step that
/// should have produced it.
#[derive(Debug, Error)]
pub enum ArtifactError {
    /// The artifact file does not exist at the given path.
    #[error("'{}' not found. {hint}", path.display())]
    NotFound { path: PathBuf, hint: &'static str },

    /// The artifact file exists but could not be read or parsed.
    #[error("'{}' is malformed: {reason}", path.display())]
    Malformed { path: PathBuf, reason: String },
}

impl ArtifactError {
    /// Shorthand for a malformed-artifact error.
    pub fn malformed(path: &std::path::Path, reason: impl Into<String>) -> Self {
        ArtifactError::Malformed {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }
}
