//! Format definitions for model serialization.

use serde::{Deserialize, Serialize};

/// One merge in serialized form. Rank is implicit in list position, which
/// makes order preservation structural rather than something to validate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerializedMerge {
    /// Text of the left symbol
    pub left: String,
    /// Text of the right symbol
    pub right: String,
}

/// Configuration captured alongside the artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerializedConfig {
    /// Boundary marker the model was trained with
    pub boundary_marker: char,
    /// Vocabulary size at save time
    pub vocab_size: usize,
}

/// Complete model serialization format (`model.json`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerializedModel {
    /// Format version
    pub version: String,
    /// Symbol text -> id mapping
    pub vocab: std::collections::HashMap<String, u32>,
    /// Merges in learned order
    pub merges: Vec<SerializedMerge>,
    /// Configuration
    pub config: SerializedConfig,
}
