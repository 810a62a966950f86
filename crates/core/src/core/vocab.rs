//! Symbol storage and lookup.
//!
//! Symbols are interned strings: each distinct piece of text (a single
//! character, or the concatenation produced by a merge) is stored once and
//! addressed by a dense `u32` id. Pair statistics and merge records work on
//! ids, so symbol text is compared exactly once, at interning time.

use crate::error::{Result, TokenizerError};
use ahash::AHashMap;
use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Forward mapping: symbol text -> id
pub type SymbolMap = AHashMap<CompactString, u32>;

/// Reverse mapping: id -> symbol text
pub type SymbolMapR = AHashMap<u32, CompactString>;

/// Vocabulary with forward and reverse symbol mappings.
///
/// Ids are assigned densely in insertion order. The trainer seeds the
/// initial alphabet in sorted codepoint order before any merge happens, so
/// id assignment (and with it the whole training run) is reproducible.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Vocabulary {
    symbols: SymbolMap,
    symbols_r: SymbolMapR,
}

impl Vocabulary {
    /// Create a new empty vocabulary.
    pub fn new() -> Self {
        Self {
            symbols: SymbolMap::new(),
            symbols_r: SymbolMapR::new(),
        }
    }

    /// Create a new vocabulary with capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            symbols: SymbolMap::with_capacity(capacity),
            symbols_r: SymbolMapR::with_capacity(capacity),
        }
    }

    /// Intern a symbol, returning its id.
    ///
    /// Interning the same text twice returns the same id.
    pub fn add_symbol(&mut self, text: &str) -> u32 {
        let text = CompactString::new(text);

        if let Some(&id) = self.symbols.get(&text) {
            return id;
        }

        let id = self.symbols.len() as u32;
        self.symbols_r.insert(id, text.clone());
        self.symbols.insert(text, id);

        id
    }

    /// Intern a symbol under a specific id.
    ///
    /// Used when rebuilding a vocabulary from a persisted model, where ids
    /// must match the original run. Returns an error if the id is taken.
    pub fn add_symbol_with_id(&mut self, text: &str, id: u32) -> Result<()> {
        let text = CompactString::new(text);

        if self.symbols_r.contains_key(&id) {
            return Err(TokenizerError::InvalidInput(format!(
                "symbol id {id} already exists"
            )));
        }

        self.symbols_r.insert(id, text.clone());
        self.symbols.insert(text, id);

        Ok(())
    }

    /// Seed the vocabulary with an alphabet of single characters.
    ///
    /// Characters are deduplicated and interned in sorted codepoint order.
    /// Returns the number of distinct characters added.
    pub fn seed_alphabet(&mut self, chars: impl IntoIterator<Item = char>) -> usize {
        let alphabet: BTreeSet<char> = chars.into_iter().collect();
        let mut buf = [0u8; 4];

        let before = self.len();
        for ch in alphabet {
            self.add_symbol(ch.encode_utf8(&mut buf));
        }
        self.len() - before
    }

    /// Get the id for a symbol's text.
    #[inline]
    pub fn get_id(&self, text: &str) -> Option<u32> {
        self.symbols.get(text).copied()
    }

    /// Get the text for a symbol id.
    #[inline]
    pub fn get_symbol(&self, id: u32) -> Option<&str> {
        self.symbols_r.get(&id).map(|s| s.as_str())
    }

    /// Number of symbols in the vocabulary.
    #[inline]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Check if the vocabulary is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Iterate over (text, id) entries in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.symbols.iter().map(|(text, &id)| (text.as_str(), id))
    }
}
