//! The merge-selection training loop.
//!
//! Repeatedly merges the most frequent adjacent symbol pair, breaking
//! frequency ties by lexicographically smallest pair, until the vocabulary
//! limit is reached or no remaining pair is frequent enough. Pair counts
//! are maintained incrementally from the deltas each merge emits; the loop
//! never rescans the corpus.

use super::counter::PairCounter;
use super::sequence::SequenceStore;
use ahash::AHashMap;
use compact_str::CompactString;
use log::{debug, info};
use subpair_core::{
    MergeCandidate, MergeList, MergeRecord, Pair, PairPriorityQueue, Result, TokenizerError,
    Vocabulary,
};

/// Input contract: boundary-marked word -> positive occurrence count.
///
/// Built by a corpus-loading collaborator; the trainer treats it as already
/// validated and never opens corpus files itself.
pub type WordFrequencies = AHashMap<String, u64>;

/// Configuration for training.
#[derive(Debug, Clone)]
pub struct TrainingConfig {
    /// Target vocabulary size (alphabet + merges); training stops when the
    /// vocabulary reaches it
    pub vocab_limit: usize,
    /// Minimum aggregate frequency for a pair to be merged; a pair below
    /// this provides no generalizable merge
    pub min_frequency: u64,
    /// Shard the initial corpus scan across threads
    pub parallel: bool,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            vocab_limit: 30_000,
            min_frequency: 2,
            parallel: true,
        }
    }
}

/// Why training reached a terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The vocabulary reached the configured limit
    LimitReached,
    /// No remaining pair met the minimum frequency
    Converged,
}

/// Summary of a completed training run.
#[derive(Debug, Clone)]
pub struct TrainingSummary {
    /// Number of distinct characters in the initial alphabet
    pub alphabet_size: usize,
    /// Number of merges learned
    pub merges_performed: usize,
    /// Terminal state of the run
    pub stop_reason: StopReason,
}

/// BPE trainer.
///
/// Learns a vocabulary and an ordered merge list from a weighted
/// word-frequency table. Training is a pure function of its inputs: the
/// same table and configuration always produce the same artifact.
pub struct BpeTrainer {
    config: TrainingConfig,
}

impl BpeTrainer {
    /// Create a new trainer with the given configuration.
    pub fn new(config: TrainingConfig) -> Self {
        Self { config }
    }

    /// Create a new trainer with default configuration and the given limit.
    pub fn with_vocab_limit(vocab_limit: usize) -> Self {
        Self::new(TrainingConfig {
            vocab_limit,
            ..Default::default()
        })
    }

    /// The trainer's configuration.
    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Train on a word-frequency table.
    ///
    /// Returns the vocabulary, the ordered merge list, and a run summary.
    /// Fails fast on an empty table or a vocabulary limit that does not
    /// exceed the initial alphabet; no partial state escapes an error.
    pub fn train(
        &self,
        words: &WordFrequencies,
    ) -> Result<(Vocabulary, MergeList, TrainingSummary)> {
        if words.is_empty() {
            return Err(TokenizerError::InvalidInput(
                "word frequency table is empty".to_string(),
            ));
        }
        if self.config.vocab_limit == 0 {
            return Err(TokenizerError::InvalidInput(
                "vocabulary limit must be positive".to_string(),
            ));
        }

        let mut vocab = Vocabulary::new();
        let mut store = SequenceStore::from_word_frequencies(words, &mut vocab);
        let alphabet_size = vocab.len();

        if self.config.vocab_limit <= alphabet_size {
            return Err(TokenizerError::InvalidInput(format!(
                "vocabulary limit {} does not exceed the initial alphabet size {}",
                self.config.vocab_limit, alphabet_size
            )));
        }

        let mut counter = PairCounter::from_store(&store, self.config.parallel);
        info!(
            "training on {} words: alphabet {}, {} initial pairs, limit {}",
            store.len(),
            alphabet_size,
            counter.len(),
            self.config.vocab_limit
        );

        let mut queue = PairPriorityQueue::with_capacity(counter.len());
        for (pair, count) in counter.iter() {
            if count >= self.config.min_frequency {
                queue.push(make_candidate(&vocab, pair, count));
            }
        }

        let mut merges = MergeList::with_capacity(self.config.vocab_limit - alphabet_size);

        let stop_reason = loop {
            if vocab.len() >= self.config.vocab_limit {
                break StopReason::LimitReached;
            }

            let Some(candidate) = queue.pop() else {
                break StopReason::Converged;
            };
            if candidate.count < self.config.min_frequency {
                break StopReason::Converged;
            }

            let mut merged = candidate.left.clone();
            merged.push_str(&candidate.right);
            let new_id = vocab.add_symbol(&merged);

            merges.push(MergeRecord {
                left: candidate.pair.0,
                right: candidate.pair.1,
                new_id,
            })?;

            let changes = store.apply_merge(candidate.pair, new_id);
            for (pair, count) in counter.apply_deltas(&changes.deltas) {
                if count > 0 && count >= self.config.min_frequency {
                    queue.update(make_candidate(&vocab, pair, count));
                } else {
                    queue.invalidate(pair);
                }
            }

            if merges.len() % 1000 == 0 {
                debug!(
                    "{} merges learned, {} candidate pairs live",
                    merges.len(),
                    counter.len()
                );
            }
        };

        let summary = TrainingSummary {
            alphabet_size,
            merges_performed: merges.len(),
            stop_reason,
        };
        info!(
            "training stopped ({:?}): vocabulary {}, {} merges",
            stop_reason,
            vocab.len(),
            merges.len()
        );

        Ok((vocab, merges, summary))
    }
}

fn make_candidate(vocab: &Vocabulary, pair: Pair, count: u64) -> MergeCandidate {
    let left = CompactString::new(vocab.get_symbol(pair.0).unwrap_or(""));
    let right = CompactString::new(vocab.get_symbol(pair.1).unwrap_or(""));
    MergeCandidate::new(pair, count, left, right)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_table() -> WordFrequencies {
        [
            ("low_", 5),
            ("lowest_", 2),
            ("newer_", 6),
            ("wider_", 3),
            ("new_", 2),
        ]
        .iter()
        .map(|&(word, freq)| (word.to_string(), freq))
        .collect()
    }

    fn merge_texts(vocab: &Vocabulary, merges: &MergeList) -> Vec<(String, String, String)> {
        merges
            .iter()
            .map(|record| {
                (
                    vocab.get_symbol(record.left).unwrap().to_string(),
                    vocab.get_symbol(record.right).unwrap().to_string(),
                    vocab.get_symbol(record.new_id).unwrap().to_string(),
                )
            })
            .collect()
    }

    #[test]
    fn test_first_three_merges_on_reference_corpus() {
        // Alphabet: _ d e i l n o r s t w (11 symbols). (e, r) and (r, _)
        // both weigh 9; "e" < "r" picks (e, r). After the first two merges
        // (n, e) and (e, w) both weigh 8; "e" < "n" picks (e, w).
        let trainer = BpeTrainer::with_vocab_limit(14);
        let (vocab, merges, summary) = trainer.train(&reference_table()).unwrap();

        assert_eq!(summary.alphabet_size, 11);
        assert_eq!(summary.merges_performed, 3);
        assert_eq!(summary.stop_reason, StopReason::LimitReached);

        let texts = merge_texts(&vocab, &merges);
        assert_eq!(
            texts,
            vec![
                ("e".to_string(), "r".to_string(), "er".to_string()),
                ("er".to_string(), "_".to_string(), "er_".to_string()),
                ("e".to_string(), "w".to_string(), "ew".to_string()),
            ]
        );
    }

    #[test]
    fn test_training_is_deterministic() {
        let trainer = BpeTrainer::with_vocab_limit(30);

        let (vocab_a, merges_a, _) = trainer.train(&reference_table()).unwrap();
        let (vocab_b, merges_b, _) = trainer.train(&reference_table()).unwrap();

        assert_eq!(vocab_a.len(), vocab_b.len());
        assert_eq!(
            merge_texts(&vocab_a, &merges_a),
            merge_texts(&vocab_b, &merges_b)
        );
    }

    #[test]
    fn test_parallel_and_sequential_runs_agree() {
        let sequential = BpeTrainer::new(TrainingConfig {
            vocab_limit: 25,
            parallel: false,
            ..Default::default()
        });
        let parallel = BpeTrainer::new(TrainingConfig {
            vocab_limit: 25,
            parallel: true,
            ..Default::default()
        });

        let (vocab_s, merges_s, _) = sequential.train(&reference_table()).unwrap();
        let (vocab_p, merges_p, _) = parallel.train(&reference_table()).unwrap();

        assert_eq!(
            merge_texts(&vocab_s, &merges_s),
            merge_texts(&vocab_p, &merges_p)
        );
        assert_eq!(vocab_s.len(), vocab_p.len());
    }

    #[test]
    fn test_vocabulary_grows_by_one_per_merge() {
        let trainer = BpeTrainer::with_vocab_limit(30);
        let (vocab, merges, summary) = trainer.train(&reference_table()).unwrap();

        assert_eq!(vocab.len(), summary.alphabet_size + merges.len());
        assert_eq!(summary.merges_performed, merges.len());
    }

    #[test]
    fn test_limit_one_above_alphabet_stops_after_one_merge() {
        let trainer = BpeTrainer::with_vocab_limit(12);
        let (vocab, merges, summary) = trainer.train(&reference_table()).unwrap();

        assert_eq!(merges.len(), 1);
        assert_eq!(vocab.len(), 12);
        assert_eq!(summary.stop_reason, StopReason::LimitReached);
        assert_eq!(vocab.get_symbol(merges.get(0).unwrap().new_id), Some("er"));
    }

    #[test]
    fn test_converges_when_no_pair_repeats() {
        // Every pair occurs once: nothing to generalize.
        let words: WordFrequencies = [("abc_".to_string(), 1)].into_iter().collect();

        let trainer = BpeTrainer::with_vocab_limit(100);
        let (vocab, merges, summary) = trainer.train(&words).unwrap();

        assert!(merges.is_empty());
        assert_eq!(vocab.len(), summary.alphabet_size);
        assert_eq!(summary.stop_reason, StopReason::Converged);
    }

    #[test]
    fn test_converges_once_remaining_pairs_fall_below_threshold() {
        let trainer = BpeTrainer::with_vocab_limit(1_000);
        let (_vocab, _merges, summary) = trainer.train(&reference_table()).unwrap();

        assert_eq!(summary.stop_reason, StopReason::Converged);
    }

    #[test]
    fn test_empty_table_fails_fast() {
        let trainer = BpeTrainer::with_vocab_limit(100);
        let err = trainer.train(&WordFrequencies::new());

        assert!(matches!(err, Err(TokenizerError::InvalidInput(_))));
    }

    #[test]
    fn test_zero_limit_fails_fast() {
        let trainer = BpeTrainer::with_vocab_limit(0);
        let err = trainer.train(&reference_table());

        assert!(matches!(err, Err(TokenizerError::InvalidInput(_))));
    }

    #[test]
    fn test_limit_not_above_alphabet_fails_fast() {
        // The reference alphabet has 11 symbols; a limit of 11 leaves no
        // room for a single merge.
        let trainer = BpeTrainer::with_vocab_limit(11);
        let err = trainer.train(&reference_table());

        assert!(matches!(err, Err(TokenizerError::InvalidInput(_))));
    }
}
