//! Error types for the subword tokenizer library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for training and tokenization.
#[derive(Error, Debug)]
pub enum TokenizerError {
    /// A precondition on caller-supplied input failed before any work was done
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Error saving a trained model
    #[error("Save error: {0}")]
    Save(String),

    /// Error loading a trained model
    #[error("Load error: {0}")]
    Load(String),

    /// I/O error with file context
    #[error("I/O error for {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A merge record is inconsistent with the vocabulary it refers to
    #[error("Invalid merge: {0}")]
    InvalidMerge(String),
}

/// Result type alias for tokenizer operations.
pub type Result<T> = std::result::Result<T, TokenizerError>;
