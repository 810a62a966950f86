//! Core data structures for pair-merge training.
//!
//! This module contains the vocabulary, merge-record, and priority-queue
//! types shared between the trainer and the tokenizer.

pub mod merges;
pub mod priority;
pub mod vocab;

pub use merges::{MergeList, MergeRecord, Pair};
pub use priority::{MergeCandidate, PairPriorityQueue};
pub use vocab::{SymbolMap, SymbolMapR, Vocabulary};
