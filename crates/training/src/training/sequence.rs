//! Per-word symbol sequences.
//!
//! Each corpus word is held as its current decomposition into symbol ids,
//! mutated in place as merges are applied. The concatenation of a word's
//! sequence always reconstructs the word itself.

use super::trainer::WordFrequencies;
use subpair_core::{Pair, Vocabulary};

/// Weighted pair-count deltas produced by one merge application.
#[derive(Debug, Default)]
pub struct MergeChanges {
    /// (pair, signed weighted delta) entries, unaggregated
    pub deltas: Vec<(Pair, i64)>,
    /// Number of words whose sequence changed
    pub words_touched: usize,
}

/// Store of all per-word symbol sequences with their frequencies.
pub struct SequenceStore {
    sequences: Vec<Vec<u32>>,
    frequencies: Vec<u64>,
}

impl SequenceStore {
    /// Build the store from a word-frequency table.
    ///
    /// Seeds `vocab` with the sorted character alphabet first, then splits
    /// each word into one symbol per character (the trailing boundary
    /// marker included; input words arrive already suffixed). Words are
    /// laid out in sorted order so store contents are reproducible.
    pub fn from_word_frequencies(words: &WordFrequencies, vocab: &mut Vocabulary) -> Self {
        vocab.seed_alphabet(words.keys().flat_map(|word| word.chars()));

        let mut entries: Vec<(&str, u64)> = words
            .iter()
            .map(|(word, &freq)| (word.as_str(), freq))
            .collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));

        let mut sequences = Vec::with_capacity(entries.len());
        let mut frequencies = Vec::with_capacity(entries.len());
        let mut buf = [0u8; 4];

        for (word, freq) in entries {
            let seq: Vec<u32> = word
                .chars()
                .map(|ch| vocab.add_symbol(ch.encode_utf8(&mut buf)))
                .collect();
            sequences.push(seq);
            frequencies.push(freq);
        }

        Self {
            sequences,
            frequencies,
        }
    }

    /// Replace every adjacent occurrence of `pair` with `new_id`.
    ///
    /// Occurrences are replaced greedily left-to-right within each word;
    /// after a replacement the scan resumes past the newly formed symbol,
    /// so overlapping occurrences ("aaa" with pair (a, a)) yield one merge
    /// per non-overlapping pair. Emits weighted count deltas for the merged
    /// pair itself and for the neighbor pairs destroyed and created at each
    /// merge site, so pair statistics can be maintained without rescanning.
    pub fn apply_merge(&mut self, pair: Pair, new_id: u32) -> MergeChanges {
        let mut changes = MergeChanges::default();

        for (seq, &freq) in self.sequences.iter_mut().zip(self.frequencies.iter()) {
            let weight = freq as i64;
            let mut touched = false;
            let mut i = 0;

            while i + 1 < seq.len() {
                if seq[i] != pair.0 || seq[i + 1] != pair.1 {
                    i += 1;
                    continue;
                }

                changes.deltas.push((pair, -weight));
                if i > 0 {
                    changes.deltas.push(((seq[i - 1], seq[i]), -weight));
                    changes.deltas.push(((seq[i - 1], new_id), weight));
                }
                if i + 2 < seq.len() {
                    changes.deltas.push(((seq[i + 1], seq[i + 2]), -weight));
                    changes.deltas.push(((new_id, seq[i + 2]), weight));
                }

                seq[i] = new_id;
                seq.remove(i + 1);
                touched = true;
                i += 1;
            }

            if touched {
                changes.words_touched += 1;
            }
        }

        changes
    }

    /// The current sequences, one per word.
    #[inline]
    pub fn sequences(&self) -> &[Vec<u32>] {
        &self.sequences
    }

    /// Word frequencies, parallel to `sequences()`.
    #[inline]
    pub fn frequencies(&self) -> &[u64] {
        &self.frequencies
    }

    /// Iterate over (sequence, frequency) entries.
    pub fn iter(&self) -> impl Iterator<Item = (&[u32], u64)> {
        self.sequences
            .iter()
            .map(|seq| seq.as_slice())
            .zip(self.frequencies.iter().copied())
    }

    /// Number of distinct words in the store.
    #[inline]
    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    /// Check if the store is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ahash::AHashMap;

    fn table(entries: &[(&str, u64)]) -> WordFrequencies {
        entries
            .iter()
            .map(|&(word, freq)| (word.to_string(), freq))
            .collect()
    }

    fn collect_counts(changes: &MergeChanges) -> AHashMap<Pair, i64> {
        let mut out = AHashMap::new();
        for &(pair, delta) in &changes.deltas {
            *out.entry(pair).or_insert(0) += delta;
        }
        out
    }

    #[test]
    fn test_initial_split_one_symbol_per_char() {
        let mut vocab = Vocabulary::new();
        let store = SequenceStore::from_word_frequencies(&table(&[("low_", 5)]), &mut vocab);

        assert_eq!(store.len(), 1);
        assert_eq!(store.frequencies(), &[5]);

        let seq = &store.sequences()[0];
        let text: String = seq
            .iter()
            .map(|&id| vocab.get_symbol(id).unwrap())
            .collect();
        assert_eq!(text, "low_");
    }

    #[test]
    fn test_words_laid_out_sorted() {
        let mut vocab = Vocabulary::new();
        let store = SequenceStore::from_word_frequencies(
            &table(&[("wider_", 3), ("low_", 5), ("newer_", 6)]),
            &mut vocab,
        );

        let first: String = store.sequences()[0]
            .iter()
            .map(|&id| vocab.get_symbol(id).unwrap())
            .collect();
        assert_eq!(first, "low_");
        assert_eq!(store.frequencies(), &[5, 6, 3]);
    }

    #[test]
    fn test_apply_merge_replaces_and_reports_deltas() {
        let mut vocab = Vocabulary::new();
        let mut store = SequenceStore::from_word_frequencies(&table(&[("abc_", 4)]), &mut vocab);

        let a = vocab.get_id("a").unwrap();
        let b = vocab.get_id("b").unwrap();
        let c = vocab.get_id("c").unwrap();
        let ab = vocab.add_symbol("ab");

        let changes = store.apply_merge((a, b), ab);
        assert_eq!(changes.words_touched, 1);

        let counts = collect_counts(&changes);
        assert_eq!(counts.get(&(a, b)), Some(&-4));
        assert_eq!(counts.get(&(b, c)), Some(&-4));
        assert_eq!(counts.get(&(ab, c)), Some(&4));

        let seq = &store.sequences()[0];
        assert_eq!(seq.len(), 3);
        assert_eq!(seq[0], ab);
    }

    #[test]
    fn test_overlapping_occurrences_merge_non_overlapping() {
        let mut vocab = Vocabulary::new();
        let mut store = SequenceStore::from_word_frequencies(&table(&[("aaa", 1)]), &mut vocab);

        let a = vocab.get_id("a").unwrap();
        let aa = vocab.add_symbol("aa");

        let changes = store.apply_merge((a, a), aa);
        // "aaa" -> [aa, a]: exactly one merge, left to right.
        assert_eq!(store.sequences()[0], vec![aa, a]);

        let counts = collect_counts(&changes);
        // Both original (a, a) occurrences gone, one (aa, a) formed.
        assert_eq!(counts.get(&(a, a)), Some(&-2));
        assert_eq!(counts.get(&(aa, a)), Some(&1));
    }

    #[test]
    fn test_chained_occurrences() {
        let mut vocab = Vocabulary::new();
        let mut store = SequenceStore::from_word_frequencies(&table(&[("aaaa", 1)]), &mut vocab);

        let a = vocab.get_id("a").unwrap();
        let aa = vocab.add_symbol("aa");

        let changes = store.apply_merge((a, a), aa);
        assert_eq!(store.sequences()[0], vec![aa, aa]);

        let counts = collect_counts(&changes);
        assert_eq!(counts.get(&(a, a)), Some(&-3));
        assert_eq!(counts.get(&(aa, aa)), Some(&1));
        assert_eq!(counts.get(&(aa, a)), Some(&0));
    }

    #[test]
    fn test_deltas_weighted_by_frequency() {
        let mut vocab = Vocabulary::new();
        let mut store =
            SequenceStore::from_word_frequencies(&table(&[("ab", 6), ("cab", 3)]), &mut vocab);

        let a = vocab.get_id("a").unwrap();
        let b = vocab.get_id("b").unwrap();
        let c = vocab.get_id("c").unwrap();
        let ab = vocab.add_symbol("ab");

        let changes = store.apply_merge((a, b), ab);
        assert_eq!(changes.words_touched, 2);

        let counts = collect_counts(&changes);
        assert_eq!(counts.get(&(a, b)), Some(&-9));
        assert_eq!(counts.get(&(c, a)), Some(&-3));
        assert_eq!(counts.get(&(c, ab)), Some(&3));
    }
}
