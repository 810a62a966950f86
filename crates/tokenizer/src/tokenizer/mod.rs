//! Main tokenizer implementation.
//!
//! Applies a trained `(Vocabulary, MergeList)` artifact to arbitrary text.
//! Each whitespace-delimited word is split into one symbol per character
//! plus the boundary marker, exactly the initialization used in training,
//! and the learned merges are then replayed in their recorded order.

use crate::pre_tokenizer::{NormalizationForm, Normalizer, Splitter};
use crate::utils::SegmentCache;
use compact_str::CompactString;
use rayon::prelude::*;
use std::path::Path;
use std::sync::Mutex;
use subpair_core::{MergeList, Result, TokenizerError, Vocabulary};
use subpair_training::{BpeTrainer, TrainingConfig, WordFrequencies};

/// Options controlling inference behavior.
#[derive(Debug, Clone)]
pub struct TokenizerOptions {
    /// Boundary marker appended to each word before segmentation
    pub boundary_marker: char,
    /// Keep the marker on emitted symbols instead of stripping it
    pub keep_boundary: bool,
    /// Unicode normalization applied to input sentences
    pub normalization: NormalizationForm,
    /// Capacity of the per-word segmentation cache (0 disables it)
    pub cache_capacity: usize,
}

impl Default for TokenizerOptions {
    fn default() -> Self {
        Self {
            boundary_marker: '_',
            keep_boundary: false,
            normalization: NormalizationForm::None,
            cache_capacity: 1000,
        }
    }
}

impl TokenizerOptions {
    /// Set the boundary marker.
    pub fn boundary_marker(mut self, marker: char) -> Self {
        self.boundary_marker = marker;
        self
    }

    /// Keep boundary markers on emitted symbols.
    pub fn keep_boundary(mut self, keep: bool) -> Self {
        self.keep_boundary = keep;
        self
    }

    /// Set the normalization form.
    pub fn normalization(mut self, form: NormalizationForm) -> Self {
        self.normalization = form;
        self
    }

    /// Set the segmentation cache capacity.
    pub fn cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }
}

/// A merge record with its symbol text resolved for replay.
struct ResolvedMerge {
    left: CompactString,
    right: CompactString,
    merged: CompactString,
}

/// Tokenizer over a trained artifact.
pub struct Tokenizer {
    vocab: Vocabulary,
    merges: MergeList,
    resolved: Vec<ResolvedMerge>,
    options: TokenizerOptions,
    splitter: Splitter,
    normalizer: Normalizer,
    cache: Mutex<SegmentCache>,
}

impl Tokenizer {
    /// Create a tokenizer from a trained artifact.
    ///
    /// Validates that every merge record resolves against the vocabulary
    /// and that each merged symbol is the concatenation of its pair.
    pub fn new(vocab: Vocabulary, merges: MergeList, options: TokenizerOptions) -> Result<Self> {
        let mut resolved = Vec::with_capacity(merges.len());

        for record in merges.iter() {
            let left = vocab.get_symbol(record.left).ok_or_else(|| {
                TokenizerError::InvalidMerge(format!("unknown left symbol id {}", record.left))
            })?;
            let right = vocab.get_symbol(record.right).ok_or_else(|| {
                TokenizerError::InvalidMerge(format!("unknown right symbol id {}", record.right))
            })?;
            let merged = vocab.get_symbol(record.new_id).ok_or_else(|| {
                TokenizerError::InvalidMerge(format!("unknown merged symbol id {}", record.new_id))
            })?;

            if merged.len() != left.len() + right.len()
                || !merged.starts_with(left)
                || !merged.ends_with(right)
            {
                return Err(TokenizerError::InvalidMerge(format!(
                    "merged symbol '{merged}' is not the concatenation of '{left}' and '{right}'"
                )));
            }

            resolved.push(ResolvedMerge {
                left: CompactString::new(left),
                right: CompactString::new(right),
                merged: CompactString::new(merged),
            });
        }

        let cache = Mutex::new(SegmentCache::with_capacity(options.cache_capacity));
        let normalizer = Normalizer::new(options.normalization);

        Ok(Self {
            vocab,
            merges,
            resolved,
            options,
            splitter: Splitter::default(),
            normalizer,
            cache,
        })
    }

    /// Train on a word-frequency table and build a tokenizer from the result.
    pub fn train_from_words(
        words: &WordFrequencies,
        config: TrainingConfig,
        options: TokenizerOptions,
    ) -> Result<Self> {
        let trainer = BpeTrainer::new(config);
        let (vocab, merges, _summary) = trainer.train(words)?;
        Self::new(vocab, merges, options)
    }

    /// Tokenize a sentence into subword symbols.
    ///
    /// A character never seen in training has no merge path and falls out
    /// as its own single-character symbol; it is never an error.
    pub fn tokenize(&self, sentence: &str) -> Vec<CompactString> {
        let normalized = self.normalizer.normalize(sentence);

        let mut tokens = Vec::new();
        for word in self.splitter.split(&normalized) {
            let mut segments = self.segment_cached(word);
            if !self.options.keep_boundary {
                strip_boundary(&mut segments, self.options.boundary_marker);
            }
            tokens.extend(segments);
        }
        tokens
    }

    /// Tokenize a batch of sentences in parallel.
    pub fn tokenize_batch(&self, sentences: &[String]) -> Vec<Vec<CompactString>> {
        sentences
            .par_iter()
            .map(|sentence| self.tokenize(sentence))
            .collect()
    }

    fn segment_cached(&self, word: &str) -> Vec<CompactString> {
        let marker = self.options.boundary_marker;
        if let Ok(mut cache) = self.cache.lock() {
            return cache.get_or_segment(word, |w| segment_word(w, &self.resolved, marker));
        }
        segment_word(word, &self.resolved, marker)
    }

    /// The vocabulary backing this tokenizer.
    pub fn vocab(&self) -> &Vocabulary {
        &self.vocab
    }

    /// The ordered merge list backing this tokenizer.
    pub fn merges(&self) -> &MergeList {
        &self.merges
    }

    /// Number of symbols in the vocabulary.
    pub fn vocab_size(&self) -> usize {
        self.vocab.len()
    }

    /// The inference options.
    pub fn options(&self) -> &TokenizerOptions {
        &self.options
    }

    /// Save the artifact to a directory as `model.json`.
    pub fn save(&self, path: &Path) -> Result<()> {
        use crate::io::ModelSaver;

        ModelSaver::new(&self.vocab, &self.merges, self.options.boundary_marker).save(path)
    }

    /// Load a tokenizer from a directory containing `model.json`.
    ///
    /// The artifact's boundary marker overrides the one in `options`.
    pub fn load(path: &Path, options: TokenizerOptions) -> Result<Self> {
        use crate::io::ModelLoader;

        let (vocab, merges, marker) = ModelLoader::load(path)?;
        Self::new(vocab, merges, options.boundary_marker(marker))
    }
}

/// Segment one word: one symbol per character plus the boundary marker,
/// then repeated full passes over the merge list in recorded order until a
/// pass changes nothing. Within a pass each pair is replaced greedily
/// left-to-right, the scan resuming past the newly formed symbol.
fn segment_word(word: &str, merges: &[ResolvedMerge], marker: char) -> Vec<CompactString> {
    let mut buf = [0u8; 4];
    let mut seq: Vec<CompactString> = word
        .chars()
        .map(|ch| CompactString::new(ch.encode_utf8(&mut buf)))
        .collect();
    seq.push(CompactString::new(marker.encode_utf8(&mut buf)));

    loop {
        let mut changed = false;

        for merge in merges {
            let mut i = 0;
            while i + 1 < seq.len() {
                if seq[i] == merge.left && seq[i + 1] == merge.right {
                    seq[i] = merge.merged.clone();
                    seq.remove(i + 1);
                    changed = true;
                }
                i += 1;
            }
        }

        if !changed {
            break;
        }
    }

    seq
}

/// Strip the trailing boundary marker from a word's final symbol, dropping
/// the symbol entirely when it is the bare marker.
fn strip_boundary(tokens: &mut Vec<CompactString>, marker: char) {
    if let Some(last) = tokens.last_mut() {
        if last.ends_with(marker) {
            last.pop();
            if last.is_empty() {
                tokens.pop();
            }
        }
    }
}
