//! Training infrastructure for subword vocabularies.
//!
//! This module provides the per-word symbol sequences, the weighted pair
//! counter, and the merge-selection loop.

pub mod counter;
pub mod sequence;
pub mod trainer;

pub use counter::PairCounter;
pub use sequence::{MergeChanges, SequenceStore};
pub use trainer::{BpeTrainer, StopReason, TrainingConfig, TrainingSummary, WordFrequencies};
