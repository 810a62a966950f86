//! Save functionality for trained models.

use super::format::{SerializedConfig, SerializedMerge, SerializedModel};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use subpair_core::{MergeList, Result, TokenizerError, Vocabulary};

/// Model saver - writes a trained artifact to disk.
pub struct ModelSaver<'a> {
    vocab: &'a Vocabulary,
    merges: &'a MergeList,
    boundary_marker: char,
}

impl<'a> ModelSaver<'a> {
    /// Create a new model saver.
    pub fn new(vocab: &'a Vocabulary, merges: &'a MergeList, boundary_marker: char) -> Self {
        Self {
            vocab,
            merges,
            boundary_marker,
        }
    }

    /// Save the model to a directory as a single `model.json`.
    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::create_dir_all(path).map_err(|e| TokenizerError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let file_path = path.join("model.json");
        let file = File::create(&file_path).map_err(|e| TokenizerError::Io {
            path: file_path.clone(),
            source: e,
        })?;

        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, &self.serialize()?)?;

        Ok(())
    }

    /// Save in plain line-oriented form: `vocab.json` + `merges.txt`.
    ///
    /// `merges.txt` holds one "left right" pair per line; the line number
    /// is the rank.
    pub fn save_plain(&self, path: &Path) -> Result<()> {
        std::fs::create_dir_all(path).map_err(|e| TokenizerError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let vocab_path = path.join("vocab.json");
        let vocab_file = File::create(&vocab_path).map_err(|e| TokenizerError::Io {
            path: vocab_path.clone(),
            source: e,
        })?;
        serde_json::to_writer_pretty(BufWriter::new(vocab_file), &self.vocab_map())?;

        let merges_path = path.join("merges.txt");
        let merges_file = File::create(&merges_path).map_err(|e| TokenizerError::Io {
            path: merges_path.clone(),
            source: e,
        })?;

        let mut writer = BufWriter::new(merges_file);
        for merge in self.merge_texts()? {
            writeln!(writer, "{} {}", merge.left, merge.right).map_err(|e| TokenizerError::Io {
                path: merges_path.clone(),
                source: e,
            })?;
        }

        Ok(())
    }

    fn serialize(&self) -> Result<SerializedModel> {
        Ok(SerializedModel {
            version: env!("CARGO_PKG_VERSION").to_string(),
            vocab: self.vocab_map(),
            merges: self.merge_texts()?,
            config: SerializedConfig {
                boundary_marker: self.boundary_marker,
                vocab_size: self.vocab.len(),
            },
        })
    }

    fn vocab_map(&self) -> std::collections::HashMap<String, u32> {
        self.vocab
            .iter()
            .map(|(text, id)| (text.to_string(), id))
            .collect()
    }

    fn merge_texts(&self) -> Result<Vec<SerializedMerge>> {
        self.merges
            .iter()
            .map(|record| {
                let left = self.vocab.get_symbol(record.left).ok_or_else(|| {
                    TokenizerError::Save(format!(
                        "merge references unknown symbol id {}",
                        record.left
                    ))
                })?;
                let right = self.vocab.get_symbol(record.right).ok_or_else(|| {
                    TokenizerError::Save(format!(
                        "merge references unknown symbol id {}",
                        record.right
                    ))
                })?;
                Ok(SerializedMerge {
                    left: left.to_string(),
                    right: right.to_string(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use subpair_core::MergeRecord;

    #[test]
    fn test_serialize_keeps_merge_order() {
        let mut vocab = Vocabulary::new();
        let e = vocab.add_symbol("e");
        let r = vocab.add_symbol("r");
        let underscore = vocab.add_symbol("_");
        let er = vocab.add_symbol("er");
        let er_ = vocab.add_symbol("er_");

        let mut merges = MergeList::new();
        merges
            .push(MergeRecord {
                left: e,
                right: r,
                new_id: er,
            })
            .unwrap();
        merges
            .push(MergeRecord {
                left: er,
                right: underscore,
                new_id: er_,
            })
            .unwrap();

        let saver = ModelSaver::new(&vocab, &merges, '_');
        let serialized = saver.serialize().unwrap();

        assert_eq!(serialized.vocab.len(), 5);
        assert_eq!(serialized.merges[0].left, "e");
        assert_eq!(serialized.merges[0].right, "r");
        assert_eq!(serialized.merges[1].left, "er");
        assert_eq!(serialized.merges[1].right, "_");
        assert_eq!(serialized.config.boundary_marker, '_');
    }
}
