//! Subpair-core - Core data structures for BPE subword training
//!
//! This crate provides the shared building blocks for learning a subword
//! vocabulary by iterative pair merging: symbol interning, ordered merge
//! records, and the merge-candidate priority queue.
//!
//! # Features
//!
//! - Symbol storage with `AHashMap` and compact strings
//! - Ordered, duplicate-free merge lists with rank lookups
//! - Deterministic merge selection (frequency, then lexicographic pair order)
//! - Error handling with detailed diagnostics
//!
//! # Example
//!
//! ```rust
//! use subpair_core::Vocabulary;
//!
//! let mut vocab = Vocabulary::new();
//! let id = vocab.add_symbol("e");
//! assert_eq!(vocab.get_symbol(id), Some("e"));
//! ```

pub mod error;
pub use error::{Result, TokenizerError};

// Core data structures
pub mod core;
pub use core::{
    MergeCandidate, MergeList, MergeRecord, Pair, PairPriorityQueue, SymbolMap, SymbolMapR,
    Vocabulary,
};
