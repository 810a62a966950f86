//! Sentence splitting.
//!
//! Words are the unit of segmentation: each split word gets its own
//! boundary marker and symbol sequence. The default splits on Unicode
//! whitespace; a custom regex pattern can replace it.

use regex::Regex;
use subpair_core::{Result, TokenizerError};

/// Sentence splitter.
pub struct Splitter {
    pattern: SplitPattern,
}

enum SplitPattern {
    Whitespace,
    Custom(Regex),
}

impl Splitter {
    /// Create a whitespace splitter.
    pub fn whitespace() -> Self {
        Self {
            pattern: SplitPattern::Whitespace,
        }
    }

    /// Create a splitter that splits on a custom regex pattern.
    pub fn custom(pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern).map_err(|e| {
            TokenizerError::InvalidInput(format!("invalid split pattern '{pattern}': {e}"))
        })?;
        Ok(Self {
            pattern: SplitPattern::Custom(regex),
        })
    }

    /// Split text into words. Empty fragments are dropped.
    pub fn split<'a>(&self, text: &'a str) -> Vec<&'a str> {
        match &self.pattern {
            SplitPattern::Whitespace => text.split_whitespace().collect(),
            SplitPattern::Custom(regex) => {
                regex.split(text).filter(|part| !part.is_empty()).collect()
            }
        }
    }
}

impl Default for Splitter {
    fn default() -> Self {
        Self::whitespace()
    }
}
