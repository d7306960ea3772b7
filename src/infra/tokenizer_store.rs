// ============================================================
// Layer 6 — Tokenizer Store
// ============================================================
// Loads the tokenizer the classifier was trained with, from an
// explicit path. `fit` (tests only) builds a word-level vocabulary
// in the same shape the training stage writes:
//
//   [PAD] = 0, [UNK] = 1, then words by descending frequency
//   (ties broken alphabetically) starting at 2.
//
// The JSON is written by hand in HuggingFace format and loaded
// back, which avoids the trainer type plumbing of `tokenizers`.

use std::path::PathBuf;
use tokenizers::Tokenizer;

use crate::domain::error::StageFault;

#[cfg(test)]
const FIRST_WORD_ID: usize = 2;

pub struct TokenizerStore {
    path: PathBuf,
}

impl TokenizerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load a previously saved tokenizer
    pub fn load(&self) -> Result<Tokenizer, StageFault> {
        if !self.path.is_file() {
            return Err(StageFault::tokenizer(&self.path, "file not found"));
        }
        let tokenizer = Tokenizer::from_file(&self.path)
            .map_err(|e| StageFault::tokenizer(&self.path, e))?;
        tracing::debug!(
            "Loaded tokenizer from '{}' ({} entries)",
            self.path.display(),
            tokenizer.get_vocab_size(true),
        );
        Ok(tokenizer)
    }

    /// Build a vocabulary of at most `vocab_size` ids from `texts`, save it, and load it back.
    #[cfg(test)]
    pub fn fit(&self, texts: &[String], vocab_size: usize) -> Result<Tokenizer, StageFault> {
        use std::collections::HashMap;

        let mut freq: HashMap<String, usize> = HashMap::new();
        for text in texts {
            for word in text.split_whitespace() {
                let w = word.to_lowercase();
                let w = w.trim_matches(|c: char| !c.is_alphanumeric());
                if !w.is_empty() {
                    *freq.entry(w.to_string()).or_insert(0) += 1;
                }
            }
        }

        let mut words: Vec<(String, usize)> = freq.into_iter().collect();
        words.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        words.truncate(vocab_size.saturating_sub(FIRST_WORD_ID));

        let mut vocab = serde_json::json!({ "[PAD]": 0, "[UNK]": 1 });
        for (i, (word, _)) in words.iter().enumerate() {
            vocab[word] = serde_json::json!(FIRST_WORD_ID + i);
        }

        let tokenizer_json = serde_json::json!({
            "version": "1.0",
            "truncation": null,
            "padding": null,
            "added_tokens": [
                {"id": 0, "content": "[PAD]", "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true},
                {"id": 1, "content": "[UNK]", "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true}
            ],
            "normalizer": {
                "type": "BertNormalizer",
                "clean_text": true,
                "handle_chinese_chars": true,
                "strip_accents": null,
                "lowercase": true
            },
            "pre_tokenizer": { "type": "Whitespace" },
            "post_processor": null,
            "decoder": null,
            "model": {
                "type": "WordLevel",
                "vocab": vocab,
                "unk_token": "[UNK]"
            }
        });

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StageFault::io(parent, e))?;
        }
        let json = serde_json::to_string_pretty(&tokenizer_json)
            .map_err(|e| StageFault::tokenizer(&self.path, e))?;
        std::fs::write(&self.path, json).map_err(|e| StageFault::io(&self.path, e))?;

        tracing::info!(
            "Tokenizer fitted with {} words, saved to '{}'",
            words.len(),
            self.path.display()
        );
        self.load()
    }
}
