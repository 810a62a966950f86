//! Weighted pair counting.
//!
//! Aggregate frequency of every adjacent symbol pair across all words,
//! weighted by word frequency. Built once by a full scan, then maintained
//! incrementally from the deltas each merge emits; the training loop never
//! rescans the corpus.

use super::sequence::SequenceStore;
use ahash::AHashMap;
use rayon::prelude::*;
use subpair_core::Pair;

/// Counter of weighted adjacent-pair frequencies.
#[derive(Debug, Default)]
pub struct PairCounter {
    counts: AHashMap<Pair, u64>,
}

impl PairCounter {
    /// Build the counter by scanning every sequence in the store.
    ///
    /// `parallel` shards the scan across words with a sum reduction;
    /// results are identical either way.
    pub fn from_store(store: &SequenceStore, parallel: bool) -> Self {
        let counts = if parallel {
            Self::count_parallel(store)
        } else {
            Self::count_sequential(store)
        };
        Self { counts }
    }

    fn count_sequential(store: &SequenceStore) -> AHashMap<Pair, u64> {
        let mut counts: AHashMap<Pair, u64> = AHashMap::new();

        for (seq, freq) in store.iter() {
            for window in seq.windows(2) {
                *counts.entry((window[0], window[1])).or_insert(0) += freq;
            }
        }

        counts
    }

    fn count_parallel(store: &SequenceStore) -> AHashMap<Pair, u64> {
        store
            .sequences()
            .par_iter()
            .zip(store.frequencies().par_iter())
            .map(|(seq, &freq)| {
                let mut counts: AHashMap<Pair, u64> = AHashMap::new();
                for window in seq.windows(2) {
                    *counts.entry((window[0], window[1])).or_insert(0) += freq;
                }
                counts
            })
            .reduce(AHashMap::new, |mut acc, counts| {
                for (pair, count) in counts {
                    *acc.entry(pair).or_insert(0) += count;
                }
                acc
            })
    }

    /// Apply signed deltas from a merge application.
    ///
    /// Deltas are aggregated per pair first; counts clamp at zero and empty
    /// entries are dropped. Returns each changed pair with its new count so
    /// the caller can refresh its selection queue.
    pub fn apply_deltas(&mut self, deltas: &[(Pair, i64)]) -> Vec<(Pair, u64)> {
        let mut aggregated: AHashMap<Pair, i64> = AHashMap::new();
        for &(pair, delta) in deltas {
            *aggregated.entry(pair).or_insert(0) += delta;
        }

        let mut changed = Vec::with_capacity(aggregated.len());
        for (pair, delta) in aggregated {
            if delta == 0 {
                continue;
            }

            let current = self.counts.get(&pair).copied().unwrap_or(0);
            let updated = (current as i64 + delta).max(0) as u64;

            if updated == 0 {
                self.counts.remove(&pair);
            } else {
                self.counts.insert(pair, updated);
            }
            changed.push((pair, updated));
        }

        changed
    }

    /// Current count for a pair (zero if absent).
    #[inline]
    pub fn get(&self, pair: Pair) -> u64 {
        self.counts.get(&pair).copied().unwrap_or(0)
    }

    /// Iterate over (pair, count) entries in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (Pair, u64)> + '_ {
        self.counts.iter().map(|(&pair, &count)| (pair, count))
    }

    /// Number of distinct pairs with a nonzero count.
    #[inline]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Check if no pair has a nonzero count.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}
