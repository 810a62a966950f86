//! Priority queue for merge candidates.
//!
//! Selection must be reproducible across runs and platforms: the winning
//! candidate is the pair with the highest aggregate frequency, and ties are
//! broken by the lexicographically smallest pair (left symbol text, then
//! right symbol text, in codepoint order). The tie-break lives in
//! `MergeCandidate`'s `Ord` so the heap surfaces the winner directly.

use crate::core::merges::Pair;
use ahash::AHashMap;
use compact_str::CompactString;
use dary_heap::OctonaryHeap;

/// A merge candidate: an adjacent pair and its current aggregate frequency.
///
/// Candidates snapshot the pair's symbol text at creation time for the
/// tie-break; symbol text is immutable once interned, so snapshots cannot
/// go stale even when counts do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeCandidate {
    /// The pair of symbol ids to merge
    pub pair: Pair,
    /// Aggregate weighted frequency of this pair
    pub count: u64,
    /// Text of the left symbol
    pub left: CompactString,
    /// Text of the right symbol
    pub right: CompactString,
}

impl MergeCandidate {
    /// Create a new merge candidate.
    pub fn new(pair: Pair, count: u64, left: CompactString, right: CompactString) -> Self {
        Self {
            pair,
            count,
            left,
            right,
        }
    }
}

impl Ord for MergeCandidate {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Higher count wins; among equal counts the lexicographically
        // smallest (left, right) pair wins, so its comparison is reversed
        // for the max-heap.
        self.count
            .cmp(&other.count)
            .then_with(|| {
                (other.left.as_str(), other.right.as_str())
                    .cmp(&(self.left.as_str(), self.right.as_str()))
            })
            .then_with(|| other.pair.cmp(&self.pair))
    }
}

impl PartialOrd for MergeCandidate {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Priority queue over merge candidates.
///
/// Uses an 8-ary heap for cache locality. Entries are never removed in
/// place; instead the queue tracks the current count per pair and discards
/// stale entries lazily on `pop`.
pub struct PairPriorityQueue {
    heap: OctonaryHeap<MergeCandidate>,
    current_counts: AHashMap<Pair, u64>,
}

impl PairPriorityQueue {
    /// Create a new empty priority queue.
    pub fn new() -> Self {
        Self {
            heap: OctonaryHeap::new(),
            current_counts: AHashMap::new(),
        }
    }

    /// Create a new priority queue with the given capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: OctonaryHeap::with_capacity(capacity),
            current_counts: AHashMap::with_capacity(capacity),
        }
    }

    /// Push a merge candidate onto the queue.
    pub fn push(&mut self, candidate: MergeCandidate) {
        self.current_counts.insert(candidate.pair, candidate.count);
        self.heap.push(candidate);
    }

    /// Record a changed count for a pair and enqueue the fresh candidate.
    ///
    /// Any earlier entry for the pair becomes stale and is skipped on `pop`.
    pub fn update(&mut self, candidate: MergeCandidate) {
        self.push(candidate);
    }

    /// Drop a pair from consideration.
    ///
    /// Heap entries for the pair become stale and die on `pop`.
    pub fn invalidate(&mut self, pair: Pair) {
        self.current_counts.remove(&pair);
    }

    /// Pop the best live candidate.
    ///
    /// Returns None once the queue holds only stale entries or nothing.
    pub fn pop(&mut self) -> Option<MergeCandidate> {
        while let Some(candidate) = self.heap.pop() {
            if let Some(&current) = self.current_counts.get(&candidate.pair) {
                if current == candidate.count {
                    self.current_counts.remove(&candidate.pair);
                    return Some(candidate);
                }
            }
            // stale entry
        }
        None
    }

    /// Number of (potentially stale) entries in the heap.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Check if the heap is empty.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Clear all entries.
    pub fn clear(&mut self) {
        self.heap.clear();
        self.current_counts.clear();
    }
}

impl Default for PairPriorityQueue {
    fn default() -> Self {
        Self::new()
    }
}
