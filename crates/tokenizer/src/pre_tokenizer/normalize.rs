//! Unicode normalization.
//!
//! Off by default: the trainer never normalizes its word table, and
//! inference must see the same character stream as training unless the
//! caller explicitly opts in.

use unicode_normalization::UnicodeNormalization;

/// Normalization form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NormalizationForm {
    /// Canonical composition
    NFC,
    /// Canonical decomposition
    NFD,
    /// Compatibility composition
    NFKC,
    /// Compatibility decomposition
    NFKD,
    /// No normalization
    #[default]
    None,
}

/// Unicode normalizer.
pub struct Normalizer {
    form: NormalizationForm,
}

impl Normalizer {
    /// Create a normalizer for the given form.
    pub fn new(form: NormalizationForm) -> Self {
        Self { form }
    }

    /// The configured form.
    pub fn form(&self) -> NormalizationForm {
        self.form
    }

    /// Normalize text according to the configured form.
    pub fn normalize(&self, text: &str) -> String {
        match self.form {
            NormalizationForm::NFC => text.nfc().collect(),
            NormalizationForm::NFD => text.nfd().collect(),
            NormalizationForm::NFKC => text.nfkc().collect(),
            NormalizationForm::NFKD => text.nfkd().collect(),
            NormalizationForm::None => text.to_string(),
        }
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(NormalizationForm::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_passthrough() {
        let normalizer = Normalizer::default();
        let text = "e\u{0301}"; // e + combining acute accent
        assert_eq!(normalizer.normalize(text), text);
    }

    #[test]
    fn test_nfc_composes() {
        let normalizer = Normalizer::new(NormalizationForm::NFC);
        assert_eq!(normalizer.normalize("e\u{0301}"), "\u{00e9}");
    }

    #[test]
    fn test_nfd_decomposes() {
        let normalizer = Normalizer::new(NormalizationForm::NFD);
        assert_eq!(normalizer.normalize("\u{00e9}"), "e\u{0301}");
    }
}
