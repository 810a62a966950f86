//! Subpair-tokenizer - High-level tokenizer API
//!
//! This crate applies a trained `(Vocabulary, MergeList)` artifact to
//! segment arbitrary text into subword symbols, and persists/restores the
//! artifact itself.
//!
//! # Features
//!
//! - Ordered replay of learned merges for inference
//! - Character-level fallback for symbols never seen in training
//! - Pre-tokenization pipeline (whitespace/regex splitting, normalization)
//! - Saving and loading in structured JSON or plain line-oriented formats
//!
//! # Example
//!
//! ```rust
//! use subpair_tokenizer::{Tokenizer, TokenizerOptions};
//! use subpair_training::{TrainingConfig, WordFrequencies};
//!
//! let mut words = WordFrequencies::new();
//! words.insert("newer_".to_string(), 6);
//! words.insert("wider_".to_string(), 3);
//!
//! let tokenizer = Tokenizer::train_from_words(
//!     &words,
//!     TrainingConfig { vocab_limit: 12, ..Default::default() },
//!     TokenizerOptions::default(),
//! )?;
//!
//! let tokens = tokenizer.tokenize("wider");
//! assert_eq!(tokens.concat(), "wider");
//! # Ok::<(), subpair_tokenizer::TokenizerError>(())
//! ```

// Re-export core types
pub use subpair_core::{Result, TokenizerError};

// Tokenizer API
pub mod tokenizer;
pub use tokenizer::{Tokenizer, TokenizerOptions};

// IO/Serialization
pub mod io;
pub use io::{ModelLoader, ModelSaver, SerializedModel};

// Pre-tokenization
pub mod pre_tokenizer;
pub use pre_tokenizer::{NormalizationForm, Normalizer, Splitter};

// Utilities
pub mod utils;
pub use utils::SegmentCache;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
