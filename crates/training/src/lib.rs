//! Subpair-training - BPE training infrastructure
//!
//! This crate learns an ordered merge list from a weighted word-frequency
//! table: the most frequent adjacent symbol pair is merged repeatedly, with
//! pair statistics maintained incrementally, until the vocabulary limit is
//! reached or no pair is frequent enough to generalize.
//!
//! Corpus ingestion is not this crate's concern; callers hand over a table
//! mapping boundary-marked words to positive occurrence counts.
//!
//! # Example
//!
//! ```rust,ignore
//! use subpair_training::{BpeTrainer, TrainingConfig, WordFrequencies};
//!
//! let mut words = WordFrequencies::new();
//! words.insert("newer_".to_string(), 6);
//! words.insert("wider_".to_string(), 3);
//!
//! let trainer = BpeTrainer::new(TrainingConfig {
//!     vocab_limit: 20,
//!     ..Default::default()
//! });
//! let (vocab, merges, summary) = trainer.train(&words)?;
//! ```

pub use subpair_core::{Result, TokenizerError};

// Training infrastructure
pub mod training;
pub use training::{
    BpeTrainer, MergeChanges, PairCounter, SequenceStore, StopReason, TrainingConfig,
    TrainingSummary, WordFrequencies,
};
