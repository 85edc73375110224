//! Error types for sketch document processing.

use thiserror::Error;

/// Result type for sketch document operations.
pub type SketchResult<T> = Result<T, SketchError>;

/// Errors that can occur while turning generator output into a document.
///
/// Anything recoverable (missing fields, wrong signs, mismatched paths) is
/// repaired instead of reported, so only structural problems surface here.
#[derive(Debug, Error)]
pub enum SketchError {
    /// Input is not a sequence of element mappings.
    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    /// Document serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SketchError {
    /// Build a [`SketchError::MalformedDocument`] from any message.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedDocument(message.into())
    }
}
