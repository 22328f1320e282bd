// ============================================================
// Layer 6 — Tokenizer Store
// ============================================================
// Builds, saves, and loads the word-level tokenizer.
//
// Driller vocabulary is small and repetitive ("clay", "sandy",
// "gravel", "weathered"...), so a word-level model over the
// lowercased corpus covers it comfortably — no subword merges
// needed. The tokenizer JSON is written in the HuggingFace
// format that tokenizers::Tokenizer::from_file expects,
// bypassing the trainer API's ModelWrapper type mismatch in
// tokenizers 0.15 entirely.
//
// Caching: building touches the whole corpus, so the result is
// saved to <artifacts>/tokenizer.json and reloaded on later
// runs instead of rebuilt. The file belongs to one training
// run — delete the artifacts directory to rebuild from fresh
// data.
//
// Reference: HuggingFace tokenizers documentation

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokenizers::Tokenizer;

/// Special token ids — fixed, sequential, and shared with the
/// sample encoder. The vocabulary proper starts after them.
pub const PAD_ID: u32 = 0;
pub const UNK_ID: u32 = 1;
pub const CLS_ID: u32 = 2;
pub const SEP_ID: u32 = 3;

const SPECIAL_TOKENS: [(&str, u32); 4] = [
    ("[PAD]", PAD_ID),
    ("[UNK]", UNK_ID),
    ("[CLS]", CLS_ID),
    ("[SEP]", SEP_ID),
];

pub struct TokenizerStore {
    dir: PathBuf,
}

impl TokenizerStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Load the cached tokenizer, or build one from `texts` and
    /// cache it. `vocab_size` caps the vocabulary including the
    /// special tokens.
    pub fn load_or_build(&self, texts: &[String], vocab_size: usize) -> Result<Tokenizer> {
        let tok_path = self.dir.join("tokenizer.json");
        if tok_path.exists() {
            tracing::info!("Loading existing tokenizer from disk");
            self.load()
        } else {
            tracing::info!("Building new tokenizer (vocab_size={})", vocab_size);
            self.build_and_save(texts, vocab_size)
        }
    }

    /// Load a previously saved tokenizer from its JSON file
    pub fn load(&self) -> Result<Tokenizer> {
        let path = self.dir.join("tokenizer.json");
        Tokenizer::from_file(&path)
            .map_err(|e| anyhow::anyhow!(
                "Cannot load tokenizer from '{}': {}", path.display(), e
            ))
    }

    fn build_and_save(&self, texts: &[String], vocab_size: usize) -> Result<Tokenizer> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create '{}'", self.dir.display()))?;

        // ── Step 1: Count word frequencies over the corpus ────────────────────
        // Texts reach this point already lowercased and
        // whitespace-normalised by the preprocessor.
        let mut freq: HashMap<String, usize> = HashMap::new();
        for text in texts {
            for word in text.split_whitespace() {
                let w = word.trim_matches(|c: char| !c.is_alphanumeric());
                if !w.is_empty() {
                    *freq.entry(w.to_string()).or_insert(0) += 1;
                }
            }
        }

        // ── Step 2: Rank and cap the vocabulary ───────────────────────────────
        // Frequency descending, ties by word for a stable id
        // assignment across identical corpora.
        let mut ranked: Vec<(String, usize)> = freq.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        let max_words = vocab_size.saturating_sub(SPECIAL_TOKENS.len());
        ranked.truncate(max_words);

        let mut vocab = serde_json::Map::new();
        for (token, id) in SPECIAL_TOKENS {
            vocab.insert(token.to_string(), serde_json::json!(id));
        }
        let mut next_id = SPECIAL_TOKENS.len() as u32;
        for (word, _) in &ranked {
            vocab.insert(word.clone(), serde_json::json!(next_id));
            next_id += 1;
        }

        // ── Step 3: Write the tokenizer JSON ──────────────────────────────────
        // This is the format Tokenizer::from_file() expects.
        let added_tokens: Vec<serde_json::Value> = SPECIAL_TOKENS
            .iter()
            .map(|(token, id)| serde_json::json!({
                "id": id, "content": token,
                "single_word": false, "lstrip": false, "rstrip": false,
                "normalized": false, "special": true,
            }))
            .collect();

        let tokenizer_json = serde_json::json!({
            "version": "1.0",
            "truncation": null,
            "padding": null,
            "added_tokens": added_tokens,
            "normalizer": {
                "type": "BertNormalizer",
                "clean_text": true,
                "handle_chinese_chars": true,
                "strip_accents": null,
                "lowercase": true
            },
            "pre_tokenizer": {
                "type": "Whitespace"
            },
            "post_processor": null,
            "decoder": null,
            "model": {
                "type": "WordLevel",
                "vocab": serde_json::Value::Object(vocab),
                "unk_token": "[UNK]"
            }
        });

        let tok_path = self.dir.join("tokenizer.json");
        std::fs::write(
            &tok_path,
            serde_json::to_string_pretty(&tokenizer_json)?,
        ).with_context(|| "Cannot write tokenizer JSON")?;

        tracing::info!(
            "Tokenizer built with {} entries, saved to '{}'",
            next_id,
            tok_path.display()
        );

        // Load back as a proper Tokenizer instance
        Tokenizer::from_file(&tok_path)
            .map_err(|e| anyhow::anyhow!("Cannot reload tokenizer: {e}"))
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store(tag: &str) -> (TokenizerStore, PathBuf) {
        let dir = std::env::temp_dir().join(format!("litho_tok_{tag}_{}", std::process::id()));
        std::fs::create_dir_all(&dir).ok();
        (TokenizerStore::new(&dir), dir)
    }

    #[test]
    fn test_build_then_encode_known_words() {
        let (store, dir) = temp_store("encode");
        let texts = vec![
            "clay, very sandy".to_string(),
            "coarse sand and clay".to_string(),
        ];
        let tok = store.load_or_build(&texts, 64).unwrap();

        let enc = tok.encode("sandy clay", false).unwrap();
        // Both words are in the corpus, so neither maps to [UNK]
        assert_eq!(enc.get_ids().len(), 2);
        assert!(enc.get_ids().iter().all(|&id| id != UNK_ID));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_unknown_word_maps_to_unk() {
        let (store, dir) = temp_store("unk");
        let texts = vec!["clay and sand".to_string()];
        let tok = store.load_or_build(&texts, 64).unwrap();

        let enc = tok.encode("basalt", false).unwrap();
        assert_eq!(enc.get_ids(), &[UNK_ID]);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_vocab_cap_is_respected() {
        let (store, dir) = temp_store("cap");
        // 20 distinct words, cap at 10 total → 6 real entries kept
        let texts: Vec<String> = (0..20).map(|i| format!("word{i}")).collect();
        let tok = store.load_or_build(&texts, 10).unwrap();
        assert!(tok.get_vocab_size(true) <= 10);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_second_load_uses_cache() {
        let (store, dir) = temp_store("cache");
        let texts = vec!["clay".to_string()];
        store.load_or_build(&texts, 64).unwrap();

        // Different corpus, same directory — the cached file wins
        let other = vec!["gravel".to_string()];
        let tok = store.load_or_build(&other, 64).unwrap();
        let enc = tok.encode("gravel", false).unwrap();
        assert_eq!(enc.get_ids(), &[UNK_ID]);

        std::fs::remove_dir_all(&dir).ok();
    }
}
