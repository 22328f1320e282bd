// ============================================================
// Layer 4 — Sample Encoder
// ============================================================
// Turns one cleaned description plus its class index into a
// fixed-length training sample.
//
// Sequence format:
//   [CLS] description tokens [SEP] [PAD]...
//
// Every sample is padded (or truncated) to exactly max_seq_len
// token ids so batches are rectangular — uniform shapes keep
// the GPU happy and make batching a plain reshape. Most
// descriptions are a dozen tokens, so with the default length
// of 128 truncation is the rare case, not the common one.
//
// The attention mask is 1 over real tokens and 0 over padding
// so the model can ignore the filler positions.
//
// Reference: Devlin et al. (2019) BERT paper (input format)

use anyhow::Result;
use tokenizers::Tokenizer;

use crate::data::dataset::LithoSample;
use crate::infra::tokenizer_store::{CLS_ID, PAD_ID, SEP_ID};

pub struct SampleEncoder<'a> {
    tokenizer:   &'a Tokenizer,
    max_seq_len: usize,
}

impl<'a> SampleEncoder<'a> {
    pub fn new(tokenizer: &'a Tokenizer, max_seq_len: usize) -> Self {
        assert!(max_seq_len >= 3, "max_seq_len must fit [CLS] token [SEP]");
        Self { tokenizer, max_seq_len }
    }

    /// Encode one description into a fixed-length sample.
    pub fn encode(&self, description: &str, label: usize) -> Result<LithoSample> {
        let enc = self.tokenizer
            .encode(description, false)
            .map_err(|e| anyhow::anyhow!("Tokenisation error: {e}"))?;

        let mut input_ids: Vec<u32> = vec![CLS_ID];
        input_ids.extend_from_slice(enc.get_ids());
        input_ids.push(SEP_ID);

        // Truncate over-long descriptions, keeping the closing [SEP]
        if input_ids.len() > self.max_seq_len {
            input_ids.truncate(self.max_seq_len);
            input_ids[self.max_seq_len - 1] = SEP_ID;
        }

        // Attention mask: 1 for real tokens, 0 for padding
        let real_len      = input_ids.len();
        let mut attn_mask = vec![1u32; real_len];

        while input_ids.len() < self.max_seq_len {
            input_ids.push(PAD_ID);
            attn_mask.push(0);
        }

        Ok(LithoSample { input_ids, attention_mask: attn_mask, label })
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::tokenizer_store::TokenizerStore;

    fn test_tokenizer(tag: &str) -> Tokenizer {
        let dir = std::env::temp_dir()
            .join(format!("litho_enc_tok_{tag}_{}", std::process::id()));
        std::fs::create_dir_all(&dir).ok();
        let store = TokenizerStore::new(&dir);
        let texts = vec![
            "clay, very sandy".to_string(),
            "coarse sand with gravel".to_string(),
        ];
        let tok = store.load_or_build(&texts, 64).unwrap();
        std::fs::remove_dir_all(&dir).ok();
        tok
    }

    #[test]
    fn test_fixed_length_and_mask() {
        let tok = test_tokenizer("mask");
        let enc = SampleEncoder::new(&tok, 16);
        let s   = enc.encode("clay, very sandy", 3).unwrap();

        assert_eq!(s.input_ids.len(), 16);
        assert_eq!(s.attention_mask.len(), 16);
        assert_eq!(s.label, 3);
        assert_eq!(s.input_ids[0], CLS_ID);

        // Mask is 1 exactly where ids are real, 0 over padding
        let real = s.attention_mask.iter().filter(|&&m| m == 1).count();
        assert!(real >= 3);
        assert!(s.input_ids[real..].iter().all(|&id| id == PAD_ID));
        assert!(s.attention_mask[real..].iter().all(|&m| m == 0));
    }

    #[test]
    fn test_truncation_keeps_sep() {
        let tok  = test_tokenizer("trunc");
        let enc  = SampleEncoder::new(&tok, 4);
        let long = "clay sand gravel clay sand gravel clay sand gravel";
        let s    = enc.encode(long, 0).unwrap();

        assert_eq!(s.input_ids.len(), 4);
        assert_eq!(s.input_ids[0], CLS_ID);
        assert_eq!(s.input_ids[3], SEP_ID);
        assert!(s.attention_mask.iter().all(|&m| m == 1));
    }
}
