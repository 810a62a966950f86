//! Load functionality for trained models.

use super::format::SerializedModel;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use subpair_core::{MergeList, MergeRecord, Result, TokenizerError, Vocabulary};

/// Model loader - reads a trained artifact from disk.
pub struct ModelLoader;

impl ModelLoader {
    /// Load a model from a directory containing `model.json`.
    ///
    /// Returns the vocabulary, the merge list in its recorded order, and
    /// the boundary marker the model was trained with.
    pub fn load(path: &Path) -> Result<(Vocabulary, MergeList, char)> {
        let file_path = path.join("model.json");
        let file = File::open(&file_path).map_err(|e| TokenizerError::Io {
            path: file_path,
            source: e,
        })?;

        let serialized: SerializedModel = serde_json::from_reader(BufReader::new(file))?;

        let vocab = Self::rebuild_vocab(serialized.vocab)?;
        let merge_texts: Vec<(String, String)> = serialized
            .merges
            .into_iter()
            .map(|m| (m.left, m.right))
            .collect();
        let merges = Self::rebuild_merges(&vocab, &merge_texts)?;

        Ok((vocab, merges, serialized.config.boundary_marker))
    }

    /// Load from plain line-oriented form: `vocab.json` + `merges.txt`.
    pub fn load_plain(path: &Path) -> Result<(Vocabulary, MergeList)> {
        let vocab_path = path.join("vocab.json");
        let vocab_file = File::open(&vocab_path).map_err(|e| TokenizerError::Io {
            path: vocab_path,
            source: e,
        })?;
        let vocab_map: std::collections::HashMap<String, u32> =
            serde_json::from_reader(BufReader::new(vocab_file))?;

        let merges_path = path.join("merges.txt");
        let merges_content =
            std::fs::read_to_string(&merges_path).map_err(|e| TokenizerError::Io {
                path: merges_path,
                source: e,
            })?;

        let mut merge_texts = Vec::new();
        for (line_num, line) in merges_content.lines().enumerate() {
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() != 2 {
                return Err(TokenizerError::Load(format!(
                    "invalid merge at line {}: '{}'",
                    line_num + 1,
                    line
                )));
            }
            merge_texts.push((parts[0].to_string(), parts[1].to_string()));
        }

        let vocab = Self::rebuild_vocab(vocab_map)?;
        let merges = Self::rebuild_merges(&vocab, &merge_texts)?;

        Ok((vocab, merges))
    }

    fn rebuild_vocab(map: std::collections::HashMap<String, u32>) -> Result<Vocabulary> {
        let mut vocab = Vocabulary::with_capacity(map.len());
        for (text, id) in map {
            vocab.add_symbol_with_id(&text, id)?;
        }
        Ok(vocab)
    }

    fn rebuild_merges(vocab: &Vocabulary, merge_texts: &[(String, String)]) -> Result<MergeList> {
        let mut merges = MergeList::with_capacity(merge_texts.len());

        for (left, right) in merge_texts {
            let left_id = vocab
                .get_id(left)
                .ok_or_else(|| TokenizerError::Load(format!("unknown symbol in merges: {left}")))?;
            let right_id = vocab.get_id(right).ok_or_else(|| {
                TokenizerError::Load(format!("unknown symbol in merges: {right}"))
            })?;

            let merged = format!("{left}{right}");
            let new_id = vocab.get_id(&merged).ok_or_else(|| {
                TokenizerError::Load(format!("merge result '{merged}' missing from vocabulary"))
            })?;

            merges.push(MergeRecord {
                left: left_id,
                right: right_id,
                new_id,
            })?;
        }

        Ok(merges)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::save::ModelSaver;
    use subpair_training::{BpeTrainer, WordFrequencies};

    fn trained_artifact() -> (Vocabulary, MergeList) {
        let words: WordFrequencies = [
            ("low_".to_string(), 5),
            ("lowest_".to_string(), 2),
            ("newer_".to_string(), 6),
            ("wider_".to_string(), 3),
            ("new_".to_string(), 2),
        ]
        .into_iter()
        .collect();

        let (vocab, merges, _) = BpeTrainer::with_vocab_limit(16).train(&words).unwrap();
        (vocab, merges)
    }

    fn merge_texts(vocab: &Vocabulary, merges: &MergeList) -> Vec<(String, String)> {
        merges
            .iter()
            .map(|r| {
                (
                    vocab.get_symbol(r.left).unwrap().to_string(),
                    vocab.get_symbol(r.right).unwrap().to_string(),
                )
            })
            .collect()
    }

    #[test]
    fn test_json_roundtrip() {
        let (vocab, merges) = trained_artifact();
        let dir = std::env::temp_dir().join("subpair_test_load_json");

        ModelSaver::new(&vocab, &merges, '_').save(&dir).unwrap();
        let (loaded_vocab, loaded_merges, marker) = ModelLoader::load(&dir).unwrap();

        assert_eq!(marker, '_');
        assert_eq!(loaded_vocab.len(), vocab.len());
        assert_eq!(
            merge_texts(&loaded_vocab, &loaded_merges),
            merge_texts(&vocab, &merges)
        );

        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_plain_roundtrip() {
        let (vocab, merges) = trained_artifact();
        let dir = std::env::temp_dir().join("subpair_test_load_plain");

        ModelSaver::new(&vocab, &merges, '_')
            .save_plain(&dir)
            .unwrap();
        let (loaded_vocab, loaded_merges) = ModelLoader::load_plain(&dir).unwrap();

        assert_eq!(loaded_vocab.len(), vocab.len());
        assert_eq!(
            merge_texts(&loaded_vocab, &loaded_merges),
            merge_texts(&vocab, &merges)
        );

        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_malformed_merge_line_rejected() {
        let dir = std::env::temp_dir().join("subpair_test_load_malformed");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("vocab.json"), r#"{"e": 0, "r": 1, "er": 2}"#).unwrap();
        std::fs::write(dir.join("merges.txt"), "e r\nthree part line\n").unwrap();

        let err = ModelLoader::load_plain(&dir);
        assert!(matches!(err, Err(TokenizerError::Load(_))));

        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_merge_referencing_unknown_symbol_rejected() {
        let dir = std::env::temp_dir().join("subpair_test_load_unknown");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("vocab.json"), r#"{"e": 0, "r": 1, "er": 2}"#).unwrap();
        std::fs::write(dir.join("merges.txt"), "e z\n").unwrap();

        let err = ModelLoader::load_plain(&dir);
        assert!(matches!(err, Err(TokenizerError::Load(_))));

        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = std::env::temp_dir().join("subpair_test_load_missing");

        let err = ModelLoader::load(&dir);
        assert!(matches!(err, Err(TokenizerError::Io { .. })));
    }
}
